use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::config::Config;
use crate::constants::LOOP_TIME;
use crate::error::GameResult;
use crate::formatter;
use crate::game::{Game, Host};
use crate::platform;

/// Drives a [`Game`] at a fixed tick rate.
pub struct App {
    pub game: Game,
    focused: bool,
    ticks: u64,
    max_ticks: Option<u64>,
}

impl App {
    pub fn new(config: Config, host: Host) -> GameResult<Self> {
        let max_ticks = config.max_ticks;
        info!(content = %config.content_dir.display(), seed = ?config.seed, strategy = %config.path_strategy, "Starting simulation");
        let game = Game::new(config, host)?;
        Ok(Self {
            game,
            focused: true,
            ticks: 0,
            max_ticks,
        })
    }

    /// Runs one tick and sleeps out the remainder of the frame.
    ///
    /// Returns `Ok(false)` once the game asked to exit or the tick limit was reached.
    pub fn run(&mut self) -> GameResult<bool> {
        let start = Instant::now();

        formatter::increment_tick();
        self.ticks += 1;

        if self.game.tick()? {
            debug!(ticks = self.ticks, "Exit requested by host");
            return Ok(false);
        }
        if self.max_ticks.is_some_and(|limit| self.ticks >= limit) {
            info!(ticks = self.ticks, score = self.game.scoreboard().score, "Tick limit reached");
            return Ok(false);
        }

        let elapsed = start.elapsed();
        if elapsed < LOOP_TIME {
            let time = LOOP_TIME.saturating_sub(elapsed);
            if time != Duration::ZERO {
                platform::sleep(time, self.focused);
            }
        } else {
            trace!(elapsed = ?elapsed, "Tick overran its frame budget");
        }

        Ok(true)
    }

    /// Hosts call this when their window gains or loses focus; unfocused frames sleep
    /// coarsely instead of spinning.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
