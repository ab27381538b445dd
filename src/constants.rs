//! This module contains all the constants used by the simulation.

use std::time::Duration;

use glam::IVec2;

/// Duration of a single simulation tick (60 Hz).
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The size of each maze cell, in pixels.
pub const TILE_SIZE: i32 = 24;
/// Half a tile; used for rounding positions to cells and for the contact cushion.
pub const HALF_TILE: i32 = TILE_SIZE / 2;

/// The visible window, in cells. The camera keeps the player centered inside it.
pub const VIEW_CELLS: IVec2 = IVec2::new(21, 23);
/// The visible window, in pixels.
pub const VIEW_PIXELS: IVec2 = IVec2::new(VIEW_CELLS.x * TILE_SIZE, VIEW_CELLS.y * TILE_SIZE);

/// Movement speeds, in pixels per tick. Each one divides [`TILE_SIZE`] evenly.
pub mod speed {
    pub const PLAYER: i32 = 3;
    pub const PURSUER: i32 = 1;
    /// Multiplier applied while a pursuer is returning to the pen.
    pub const RETURNING_FACTOR: i32 = 4;
    pub const BONUS: i32 = 2;
    /// The bonus item only moves on every n-th tick.
    pub const BONUS_TICK_DIVISOR: u32 = 2;
}

/// Tile identifiers that carry fixed meaning regardless of the tile catalog.
pub mod tile {
    pub const EMPTY: u32 = 0;
    pub const PELLET: u32 = 2;
    pub const POWER_PELLET: u32 = 3;
    pub const PLAYER_SPAWN: u32 = 4;
    /// Pursuer spawns are `PURSUER_SPAWN_FIRST + id` for ids 0 through 3.
    pub const PURSUER_SPAWN_FIRST: u32 = 10;
    /// Tile without any image (drawn as nothing).
    pub const BLANK_IMAGE: u32 = 23;
    pub const WALL_FIRST: u32 = 100;
    pub const WALL_LAST: u32 = 199;
}

/// Number of pursuers in every level.
pub const PURSUER_COUNT: usize = 4;

/// Per-mode tick budgets.
pub mod mode {
    pub const READY_TICKS: u32 = 90;
    pub const CAUGHT_TICKS: u32 = 90;
    pub const GHOST_EATEN_TICKS: u32 = 30;
    pub const LEVEL_CLEAR_TICKS: u32 = 60;
    pub const FLASH_TICKS: u32 = 150;
    /// The palette toggles every time the flash counter reaches a multiple of this value.
    pub const FLASH_INTERVAL: u32 = 10;
    pub const TRANSITION_TICKS: u32 = 10;
}

/// Independent gameplay timers, measured in Playing ticks.
pub mod timer {
    pub const FRIGHTEN_TICKS: u32 = 360;
    pub const BONUS_SPAWN_TICKS: u32 = 500;
    pub const BONUS_SCORE_DISPLAY_TICKS: u32 = 120;
}

/// Points and thresholds.
pub mod score {
    pub const PELLET: u32 = 10;
    pub const POWER_PELLET: u32 = 100;
    pub const BONUS_ITEM: u32 = 2500;
    /// Value of the first pursuer eaten after a power pellet. Doubles per pursuer.
    pub const PURSUER_BASE: u32 = 200;
    /// Crossing each of these awards one extra life.
    pub const EXTRA_LIFE_THRESHOLDS: [u32; 4] = [25_000, 50_000, 100_000, 150_000];
    pub const MAX: u32 = 1_000_000_000;
    pub const STARTING_LIVES: i32 = 3;
}

/// High-score table shape.
pub mod hiscore {
    pub const ENTRIES: usize = 6;
    pub const NAME_WIDTH: usize = 22;
    pub const SCORE_WIDTH: usize = 9;
    pub const FILE_NAME: &str = "hiscore.txt";
}

/// Number of random targets a pursuer tries before giving up on wandering for this tick.
pub const WANDER_ATTEMPTS: usize = 8;

/// Vertical bounce offsets of the bonus item, indexed by bounce phase (1-based).
pub const BONUS_BOUNCE: [i32; 16] = [2, 4, 5, 5, 6, 6, 6, 6, 6, 5, 5, 4, 3, 2, 1, 0];
