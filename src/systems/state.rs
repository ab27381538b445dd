use glam::IVec2;
use strum_macros::{AsRefStr, Display, EnumIter};
use tracing::{debug, info};

use crate::config::Config;
use crate::constants::mode;
use crate::events::{GameCommand, GameEvent};
use crate::hiscore::{self, HiScoreResource, HiScores};
use crate::map::direction::Direction;
use crate::map::grid::TileGrid;
use crate::map::palette::LevelPalette;
use crate::systems::{LevelRequest, LevelRequests, Mover, Player, Scoreboard};
use bevy_ecs::{
    event::EventReader,
    resource::Resource,
    system::{NonSendMut, Query, Res, ResMut},
};

/// The discrete phases of a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
pub enum Mode {
    /// Idle until start input arrives.
    #[default]
    GameOver,
    /// Countdown before play begins.
    Ready,
    Playing,
    /// Freeze after a lethal contact.
    PlayerCaught,
    /// Short freeze after eating a frightened pursuer.
    GhostEatenPause,
    /// Pause after the last pellet is eaten.
    LevelClearPause,
    /// The maze blinks between its palette and the flash palette.
    LevelFlash,
    /// Blank interval while the next level loads.
    LevelTransition,
}

/// The current mode and how many ticks it has been active.
///
/// The mode governing a tick is latched by [`mode_system`] when the tick begins. Gameplay
/// systems that request a transition change `mode` immediately, but the rest of that tick
/// still runs under the latched mode.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeState {
    mode: Mode,
    ticks: u32,
    latched: Mode,
}

impl ModeState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ticks: 0,
            latched: mode,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Ticks elapsed in the current mode.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// The mode this tick started in.
    pub fn latched(&self) -> Mode {
        self.latched
    }

    /// Switches mode and restarts the tick counter.
    pub fn set(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!(from = self.mode.as_ref(), to = mode.as_ref(), "Mode transition");
        }
        self.mode = mode;
        self.ticks = 0;
    }

    fn advance(&mut self) -> u32 {
        self.ticks += 1;
        self.ticks
    }
}

/// Run condition for the gameplay set: only ticks that started in `Playing`.
pub fn gameplay_active(state: Res<ModeState>) -> bool {
    state.latched() == Mode::Playing
}

/// Advances the mode machine by one tick.
///
/// Handles every timed transition; the event-driven ones (lethal contact, eaten pursuer,
/// cleared level) are raised by the gameplay systems.
#[allow(clippy::too_many_arguments)]
pub fn mode_system(
    mut state: ResMut<ModeState>,
    mut scoreboard: ResMut<Scoreboard>,
    mut requests: ResMut<LevelRequests>,
    mut palette: ResMut<LevelPalette>,
    mut hiscores: ResMut<HiScores>,
    mut store: NonSendMut<HiScoreResource>,
    config: Res<Config>,
    mut events: EventReader<GameEvent>,
    mut player: Query<(&mut Mover, &mut Player)>,
) {
    let start_requested = events
        .read()
        .any(|event| matches!(event, GameEvent::Command(GameCommand::StartGame)));

    let current = state.mode;
    state.latched = current;

    match current {
        Mode::GameOver => {
            if start_requested {
                scoreboard.start_game();
                requests.push(LevelRequest::Load(scoreboard.level));
                state.set(Mode::Ready);
            }
        }
        Mode::Ready => {
            if state.advance() == mode::READY_TICKS {
                state.set(Mode::Playing);
                for (mut mover, mut player) in player.iter_mut() {
                    mover.vel = IVec2::new(mover.speed, 0);
                    player.facing = Direction::Right;
                }
            }
        }
        Mode::Playing => {
            state.advance();
        }
        Mode::PlayerCaught => {
            if state.advance() == mode::CAUGHT_TICKS {
                requests.push(LevelRequest::Restart);
                if scoreboard.lose_life(config.infinite_lives) {
                    info!(score = scoreboard.score, level = scoreboard.level, "Game over");
                    hiscores.0 = hiscore::record(store.0.as_mut(), &config.user_name, scoreboard.score);
                    state.set(Mode::GameOver);
                } else {
                    state.set(Mode::Ready);
                }
            }
        }
        Mode::GhostEatenPause => {
            if state.advance() == mode::GHOST_EATEN_TICKS {
                state.set(Mode::Playing);
            }
        }
        Mode::LevelClearPause => {
            if state.advance() == mode::LEVEL_CLEAR_TICKS {
                palette.take_snapshot();
                state.set(Mode::LevelFlash);
            }
        }
        Mode::LevelFlash => {
            let ticks = state.advance();
            if ticks == mode::FLASH_TICKS {
                palette.restore();
                requests.push(LevelRequest::ReloadTiles);
                state.set(Mode::LevelTransition);
            } else if ticks % mode::FLASH_INTERVAL == 0 {
                if (ticks / mode::FLASH_INTERVAL) % 2 == 1 {
                    palette.flash();
                } else {
                    palette.restore();
                }
                requests.push(LevelRequest::ReloadTiles);
            }
        }
        Mode::LevelTransition => {
            if state.advance() == mode::TRANSITION_TICKS {
                scoreboard.level += 1;
                info!(level = scoreboard.level, "Advancing to next level");
                requests.push(LevelRequest::Load(scoreboard.level));
                state.set(Mode::Ready);
            }
        }
    }
}

/// Raises [`Mode::LevelClearPause`] once the last pellet is gone.
///
/// Runs last in the gameplay set, so a lethal contact earlier in the same tick wins.
pub fn level_clear_system(mut state: ResMut<ModeState>, grid: Res<TileGrid>, scoreboard: Res<Scoreboard>) {
    if state.mode() == Mode::Playing && grid.pellets_remaining() == 0 {
        info!(level = scoreboard.level, score = scoreboard.score, "Level cleared");
        state.set(Mode::LevelClearPause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn set_restarts_the_counter() {
        let mut state = ModeState::new(Mode::Ready);
        state.advance();
        state.advance();
        assert_eq!(state.ticks(), 2);

        state.set(Mode::Playing);
        assert_eq!(state.mode(), Mode::Playing);
        assert_eq!(state.ticks(), 0);
        assert_eq!(state.latched(), Mode::Ready);
    }

    #[test]
    fn only_playing_runs_gameplay() {
        let active: Vec<Mode> = Mode::iter()
            .filter(|&mode| ModeState::new(mode).latched() == Mode::Playing)
            .collect();
        assert_eq!(active, vec![Mode::Playing]);
        assert_eq!(Mode::iter().count(), 8);
    }
}
