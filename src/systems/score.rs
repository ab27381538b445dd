//! Score, lives and the gameplay timers that ride along with them.

use bevy_ecs::resource::Resource;
use tracing::{debug, info};

use crate::constants::{score, timer};

#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    pub score: u32,
    pub lives: i32,
    pub level: u32,
    /// Ticks left before frightened pursuers recover; 0 when inactive.
    pub frighten_timer: u32,
    /// Points for the next frightened pursuer eaten.
    pub pursuer_value: u32,
    /// Playing ticks since the bonus item last left (or the level restarted).
    pub bonus_spawn_timer: u32,
    /// Ticks left to show the bonus item's points after it was eaten.
    pub bonus_score_timer: u32,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self {
            score: 0,
            lives: score::STARTING_LIVES,
            level: 1,
            frighten_timer: 0,
            pursuer_value: score::PURSUER_BASE,
            bonus_spawn_timer: 0,
            bonus_score_timer: 0,
        }
    }
}

impl Scoreboard {
    /// Resets everything for a fresh game starting at level 1.
    pub fn start_game(&mut self) {
        *self = Self::default();
        info!("New game started");
    }

    /// Adds points and returns how many extra lives this call awarded.
    ///
    /// A threshold counts as crossed when the score was below it before the call and is at
    /// or above it afterwards, so one large award can cross (and pay out) several at once.
    /// The score saturates at [`score::MAX`].
    pub fn add_score(&mut self, amount: u32) -> u32 {
        let before = self.score;
        self.score = self.score.saturating_add(amount).min(score::MAX);

        let awarded = score::EXTRA_LIFE_THRESHOLDS
            .iter()
            .filter(|&&threshold| before < threshold && self.score >= threshold)
            .count() as u32;

        if awarded > 0 {
            self.lives += awarded as i32;
            info!(score = self.score, awarded, lives = self.lives, "Extra life awarded");
        }
        awarded
    }

    /// Starts (or restarts) the frighten window and resets the pursuer value.
    pub fn frighten(&mut self) {
        self.frighten_timer = timer::FRIGHTEN_TICKS;
        self.pursuer_value = score::PURSUER_BASE;
    }

    /// Returns the value of the pursuer just eaten and doubles it for the next one.
    pub fn take_pursuer_value(&mut self) -> u32 {
        let value = self.pursuer_value;
        self.pursuer_value = self.pursuer_value.saturating_mul(2);
        value
    }

    /// Counts down the frighten window. Returns `true` on the tick it runs out.
    pub fn tick_frighten(&mut self) -> bool {
        if self.frighten_timer == 0 {
            return false;
        }
        self.frighten_timer -= 1;
        self.frighten_timer == 0
    }

    /// Counts up toward the bonus spawn. Returns `true` exactly once, on the spawn tick.
    pub fn tick_bonus_spawn(&mut self) -> bool {
        self.bonus_spawn_timer = self.bonus_spawn_timer.saturating_add(1);
        self.bonus_spawn_timer == timer::BONUS_SPAWN_TICKS
    }

    pub fn tick_bonus_score(&mut self) {
        self.bonus_score_timer = self.bonus_score_timer.saturating_sub(1);
    }

    /// Loses a life unless lives are infinite. Returns `true` when the game is over.
    pub fn lose_life(&mut self, infinite: bool) -> bool {
        if !infinite {
            self.lives -= 1;
        }
        debug!(lives = self.lives, infinite, "Life lost");
        self.lives < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frighten_resets_the_pursuer_value() {
        let mut board = Scoreboard::default();
        assert_eq!(board.take_pursuer_value(), 200);
        assert_eq!(board.take_pursuer_value(), 400);
        board.frighten();
        assert_eq!(board.take_pursuer_value(), 200);
        assert_eq!(board.frighten_timer, timer::FRIGHTEN_TICKS);
    }

    #[test]
    fn frighten_timer_fires_once() {
        let mut board = Scoreboard {
            frighten_timer: 2,
            ..Default::default()
        };
        assert!(!board.tick_frighten());
        assert!(board.tick_frighten());
        assert!(!board.tick_frighten());
    }

    #[test]
    fn bonus_spawn_fires_on_the_exact_tick() {
        let mut board = Scoreboard::default();
        let fired: Vec<u32> = (1..=timer::BONUS_SPAWN_TICKS + 5)
            .filter(|_| board.tick_bonus_spawn())
            .collect();
        assert_eq!(fired, vec![timer::BONUS_SPAWN_TICKS]);
    }
}
