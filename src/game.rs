//! Centralized game state and the tick schedule.

use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::query::With;
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::system::RunSystemOnce;
use bevy_ecs::world::World;
use tracing::{debug, error, info};

use crate::asset::{AssetLoader, AssetResource, NullAssets, SpriteSet, TileImages};
use crate::audio::{NullSound, SoundPlayer};
use crate::config::Config;
use crate::constants::PURSUER_COUNT;
use crate::content::{ContentResource, ContentSource};
use crate::error::{GameError, GameResult};
use crate::events::GameEvent;
use crate::hiscore::{self, HiScoreResource, HiScoreStore, HiScores, MemoryHiScoreStore};
use crate::map::catalog::TileCatalog;
use crate::map::grid::TileGrid;
use crate::map::palette::LevelPalette;
use crate::map::parser::LevelParser;
use crate::path::PathGrid;
use crate::systems::{
    self, audio_system, bonus_movement_system, camera_system, gameplay_active, input_system, level_clear_system,
    level_system, mode_system, player_control_system, player_movement_system, pursuer_movement_system, render_system,
    timer_system, AudioEvent, AudioResource, AudioState, BonusBundle, BonusItem, Camera, GlobalState, InputResource,
    InputSource, LevelRequest, LevelRequests, ModeState, Mover, NullInput, NullRenderer, Player, PlayerBundle, Pursuer,
    PursuerBundle, RenderResource, Renderer, Scoreboard, SimRng,
};

/// Stages of a tick, run strictly in this order.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum TickSet {
    /// Sample host input.
    Input,
    /// Advance the mode machine and apply the level work it queued.
    Mode,
    /// Movement and collision; only while playing.
    Gameplay,
    /// Sounds and drawing.
    Output,
}

/// The collaborators a host provides to the simulation.
pub struct Host {
    pub content: Box<dyn ContentSource>,
    pub assets: Box<dyn AssetLoader>,
    pub sound: Box<dyn SoundPlayer>,
    pub renderer: Box<dyn Renderer>,
    pub input: Box<dyn InputSource>,
    pub hiscores: Box<dyn HiScoreStore>,
}

impl Host {
    /// A host with the given content and no-op everything else. High scores are kept in
    /// memory.
    pub fn headless(content: impl ContentSource + 'static) -> Self {
        Self {
            content: Box::new(content),
            assets: Box::new(NullAssets::default()),
            sound: Box::new(NullSound),
            renderer: Box::new(NullRenderer),
            input: Box::new(NullInput),
            hiscores: Box::new(MemoryHiScoreStore::default()),
        }
    }

    pub fn with_input(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    pub fn with_sound(mut self, sound: impl SoundPlayer + 'static) -> Self {
        self.sound = Box::new(sound);
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_assets(mut self, assets: impl AssetLoader + 'static) -> Self {
        self.assets = Box::new(assets);
        self
    }

    pub fn with_hiscores(mut self, store: impl HiScoreStore + 'static) -> Self {
        self.hiscores = Box::new(store);
        self
    }
}

/// Core simulation state built on the Bevy ECS.
///
/// The `World` holds the maze, the movers and every collaborator; the `Schedule` runs one
/// fixed-rate tick: input, then the mode machine and level loading, then (while playing)
/// movement and collision, and finally audio and drawing.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
}

impl Game {
    /// Loads the tile catalog and level 1, then sets up the world in `GameOver`, waiting for
    /// start input.
    ///
    /// # Errors
    ///
    /// Any content, catalog, level or asset failure is fatal here.
    pub fn new(config: Config, host: Host) -> GameResult<Self> {
        let Host {
            mut content,
            mut assets,
            sound,
            renderer,
            input,
            mut hiscores,
        } = host;

        let catalog = TileCatalog::parse(&content.catalog_text()?)?;
        debug!(tiles = catalog.len(), "Tile catalog loaded");
        let level = LevelParser::parse(&content.level_text(1)?)?;
        let grid = TileGrid::new(&level, catalog.special());
        let paths = PathGrid::from_tiles(&grid, config.path_strategy);
        let sprites = SpriteSet::load(assets.as_mut())?;
        let table = hiscore::load(hiscores.as_mut());

        let mut world = World::default();
        EventRegistry::register_event::<GameError>(&mut world);
        EventRegistry::register_event::<GameEvent>(&mut world);
        EventRegistry::register_event::<AudioEvent>(&mut world);

        world.insert_resource(ModeState::default());
        world.insert_resource(Scoreboard::default());
        world.insert_resource(LevelRequests::default());
        world.insert_resource(LevelPalette::new(level.palette));
        world.insert_resource(TileImages::default());
        world.insert_resource(sprites);
        world.insert_resource(HiScores(table));
        world.insert_resource(grid);
        world.insert_resource(paths);
        world.insert_resource(catalog);
        world.insert_resource(SimRng::new(config.seed));
        world.insert_resource(Camera::default());
        world.insert_resource(GlobalState::default());
        world.insert_resource(AudioState { muted: !config.sfx });
        world.insert_resource(config);

        world.insert_non_send_resource(ContentResource(content));
        world.insert_non_send_resource(AssetResource(assets));
        world.insert_non_send_resource(AudioResource(sound));
        world.insert_non_send_resource(RenderResource(renderer));
        world.insert_non_send_resource(InputResource(input));
        world.insert_non_send_resource(HiScoreResource(hiscores));

        world.spawn(PlayerBundle::default());
        for id in 0..PURSUER_COUNT {
            world.spawn(PursuerBundle::new(id));
        }
        world.spawn(BonusBundle::default());

        world.resource_mut::<LevelRequests>().push(LevelRequest::Load(1));
        world
            .run_system_once(level_system)
            .map_err(|e| GameError::InvalidState(e.to_string()))?;
        if let Some(e) = world.resource_mut::<Events<GameError>>().drain().next() {
            return Err(e);
        }

        let mut schedule = Schedule::default();
        Self::configure_schedule(&mut schedule);

        info!("Simulation ready");
        Ok(Self { world, schedule })
    }

    fn configure_schedule(schedule: &mut Schedule) {
        schedule
            .add_systems((
                input_system.in_set(TickSet::Input),
                (mode_system, level_system).chain().in_set(TickSet::Mode),
                (
                    player_control_system,
                    player_movement_system,
                    timer_system,
                    pursuer_movement_system,
                    bonus_movement_system,
                    level_clear_system,
                )
                    .chain()
                    .in_set(TickSet::Gameplay),
                (audio_system, camera_system, render_system).chain().in_set(TickSet::Output),
            ))
            .configure_sets(
                (
                    TickSet::Input,
                    TickSet::Mode,
                    TickSet::Gameplay.run_if(gameplay_active),
                    TickSet::Output,
                )
                    .chain(),
            );
    }

    /// Runs one tick.
    ///
    /// Returns `Ok(true)` once the host has asked to quit.
    ///
    /// # Errors
    ///
    /// The first error any system reported during the tick. Errors are fatal; the caller
    /// should stop ticking.
    pub fn tick(&mut self) -> GameResult<bool> {
        self.schedule.run(&mut self.world);

        let failure = self.world.resource_mut::<Events<GameError>>().drain().next();
        self.world.resource_mut::<Events<GameEvent>>().update();
        self.world.resource_mut::<Events<AudioEvent>>().update();

        if let Some(e) = failure {
            error!(error = %e, "Tick failed");
            return Err(e);
        }
        Ok(self.world.resource::<GlobalState>().exit)
    }

    pub fn mode(&self) -> systems::Mode {
        self.world.resource::<ModeState>().mode()
    }

    pub fn mode_state(&self) -> &ModeState {
        self.world.resource::<ModeState>()
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        self.world.resource::<Scoreboard>()
    }

    pub fn scoreboard_mut(&mut self) -> bevy_ecs::world::Mut<'_, Scoreboard> {
        self.world.resource_mut::<Scoreboard>()
    }

    pub fn grid(&self) -> &TileGrid {
        self.world.resource::<TileGrid>()
    }

    pub fn hiscores(&self) -> &HiScores {
        self.world.resource::<HiScores>()
    }

    /// The player's mover.
    pub fn player(&mut self) -> Option<Mover> {
        self.world
            .query_filtered::<&Mover, With<Player>>()
            .single(&self.world)
            .ok()
            .copied()
    }

    /// Every pursuer, in id order.
    pub fn pursuers(&mut self) -> Vec<(Mover, Pursuer)> {
        let mut pursuers: Vec<(Mover, Pursuer)> = self
            .world
            .query::<(&Mover, &Pursuer)>()
            .iter(&self.world)
            .map(|(mover, pursuer)| (*mover, pursuer.clone()))
            .collect();
        pursuers.sort_by_key(|(_, pursuer)| pursuer.id);
        pursuers
    }

    pub fn bonus(&mut self) -> Option<(Mover, BonusItem)> {
        self.world
            .query::<(&Mover, &BonusItem)>()
            .single(&self.world)
            .ok()
            .map(|(mover, item)| (*mover, item.clone()))
    }
}
