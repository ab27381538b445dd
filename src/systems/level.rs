//! Level loading and the restart that follows a lost life.

use bevy_ecs::{
    event::EventWriter,
    query::Without,
    resource::Resource,
    system::{NonSendMut, Query, Res, ResMut},
};
use smallvec::SmallVec;
use tracing::{debug, error, info};

use crate::asset::{AssetResource, TileImages};
use crate::config::Config;
use crate::constants::speed;
use crate::content::{ContentResource, ContentSource};
use crate::error::{GameError, GameResult};
use crate::map::catalog::TileCatalog;
use crate::map::direction::Direction;
use crate::map::grid::TileGrid;
use crate::map::palette::LevelPalette;
use crate::map::parser::LevelParser;
use crate::path::PathGrid;
use crate::systems::{
    components::{BonusItem, Mover, Player, Pursuer, PursuerState, SimRng},
    pursuer::Navigator,
    score::Scoreboard,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelRequest {
    /// Load level `n` and restart on it.
    Load(u32),
    /// Send every mover home.
    Restart,
    /// Reload tile images for the current palette.
    ReloadTiles,
}

/// Level work queued by the mode machine, applied in order by [`level_system`].
#[derive(Resource, Debug, Default)]
pub struct LevelRequests(SmallVec<[LevelRequest; 2]>);

impl LevelRequests {
    pub fn push(&mut self, request: LevelRequest) {
        self.0.push(request);
    }

    fn drain(&mut self) -> SmallVec<[LevelRequest; 2]> {
        std::mem::take(&mut self.0)
    }
}

type PlayerQuery<'w, 's> = Query<'w, 's, (&'static mut Mover, &'static mut Player), (Without<Pursuer>, Without<BonusItem>)>;
type PursuerQuery<'w, 's> =
    Query<'w, 's, (&'static mut Mover, &'static mut Pursuer), (Without<Player>, Without<BonusItem>)>;
type BonusQuery<'w, 's> = Query<'w, 's, (&'static mut Mover, &'static mut BonusItem), (Without<Player>, Without<Pursuer>)>;

/// Applies queued [`LevelRequest`]s.
#[allow(clippy::too_many_arguments)]
pub fn level_system(
    mut requests: ResMut<LevelRequests>,
    mut content: NonSendMut<ContentResource>,
    mut assets: NonSendMut<AssetResource>,
    catalog: Res<TileCatalog>,
    config: Res<Config>,
    mut grid: ResMut<TileGrid>,
    mut paths: ResMut<PathGrid>,
    mut palette: ResMut<LevelPalette>,
    mut images: ResMut<TileImages>,
    mut scoreboard: ResMut<Scoreboard>,
    mut rng: ResMut<SimRng>,
    mut players: PlayerQuery,
    mut pursuers: PursuerQuery,
    mut bonus: BonusQuery,
    mut errors: EventWriter<GameError>,
) {
    for request in requests.drain() {
        let result = match request {
            LevelRequest::Load(number) => load_level(
                number,
                content.0.as_mut(),
                &catalog,
                &config,
                &mut grid,
                &mut paths,
                &mut palette,
                &mut players,
                &mut pursuers,
                &mut bonus,
            )
            .and_then(|()| {
                restart(&grid, &mut paths, &mut rng, &mut scoreboard, &mut players, &mut pursuers, &mut bonus)
            })
            .and_then(|()| images.reload(&catalog, &palette.current, assets.0.as_mut()).map_err(Into::into)),
            LevelRequest::Restart => {
                restart(&grid, &mut paths, &mut rng, &mut scoreboard, &mut players, &mut pursuers, &mut bonus)
            }
            LevelRequest::ReloadTiles => images
                .reload(&catalog, &palette.current, assets.0.as_mut())
                .map_err(Into::into),
        };

        if let Err(e) = result {
            error!(?request, error = %e, "Level request failed");
            errors.write(e);
        }
    }
}

/// Parses level `number` and rebuilds the grid, path grid and palette from it.
#[allow(clippy::too_many_arguments)]
fn load_level(
    number: u32,
    content: &mut dyn ContentSource,
    catalog: &TileCatalog,
    config: &Config,
    grid: &mut TileGrid,
    paths: &mut PathGrid,
    palette: &mut LevelPalette,
    players: &mut PlayerQuery,
    pursuers: &mut PursuerQuery,
    bonus: &mut BonusQuery,
) -> GameResult<()> {
    let text = content.level_text(number)?;
    let level = LevelParser::parse(&text)?;

    *grid = TileGrid::new(&level, catalog.special());
    *paths = PathGrid::from_tiles(grid, config.path_strategy);
    *palette = LevelPalette::new(level.palette);

    for (mut mover, _) in players.iter_mut() {
        mover.spawn_at(level.player_spawn);
    }
    for (mut mover, pursuer) in pursuers.iter_mut() {
        if let Some(&spawn) = level.pursuer_spawns.get(pursuer.id) {
            mover.spawn_at(spawn);
        }
    }
    for (_, mut item) in bonus.iter_mut() {
        item.kind = level.bonus_kind;
    }

    info!(
        number,
        width = level.size.x,
        height = level.size.y,
        pellets = level.pellets,
        "Level loaded"
    );
    Ok(())
}

/// Puts every mover back at its spawn.
///
/// Pursuers come back at normal speed, patrolling, with a fresh wander route. The bonus item
/// is removed and its spawn countdown starts over.
fn restart(
    grid: &TileGrid,
    paths: &mut PathGrid,
    rng: &mut SimRng,
    scoreboard: &mut Scoreboard,
    players: &mut PlayerQuery,
    pursuers: &mut PursuerQuery,
    bonus: &mut BonusQuery,
) -> GameResult<()> {
    let mut player_cell = Default::default();
    for (mut mover, mut player) in players.iter_mut() {
        mover.reset_to_home();
        player.facing = Direction::default();
        player_cell = mover.nearest;
    }

    let mut navigator = Navigator {
        grid,
        paths,
        rng: &mut rng.0,
        player_cell,
    };

    let mut ordered: SmallVec<[_; 4]> = pursuers.iter_mut().collect();
    ordered.sort_by_key(|(_, pursuer)| pursuer.id);
    for (mut mover, mut pursuer) in ordered {
        mover.reset_to_home();
        mover.speed = speed::PURSUER;
        pursuer.state = PursuerState::Patrol;
        pursuer.route.clear();
        navigator.wander(&mut mover, &mut pursuer)?;
    }

    for (mut mover, mut item) in bonus.iter_mut() {
        mover.stop();
        item.active = false;
        item.route.clear();
    }
    scoreboard.bonus_spawn_timer = 0;

    debug!("Movers restarted");
    Ok(())
}
