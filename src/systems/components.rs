use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::IVec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use strum_macros::{AsRefStr, Display};

use crate::constants::speed;
use crate::map::direction::Direction;
use crate::map::geometry::{cell_origin, nearest_cell};
use crate::path::Route;
use crate::platform;

/// Pixel-space kinematics shared by every moving entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mover {
    pub pos: IVec2,
    pub vel: IVec2,
    /// Spawn position, in pixels.
    pub home: IVec2,
    /// Cell closest to `pos`, refreshed whenever the mover integrates.
    pub nearest: IVec2,
    pub speed: i32,
}

impl Mover {
    pub fn new(speed: i32) -> Self {
        Self {
            pos: IVec2::ZERO,
            vel: IVec2::ZERO,
            home: IVec2::ZERO,
            nearest: IVec2::ZERO,
            speed,
        }
    }

    /// Sets the spawn cell and moves there, at rest.
    pub fn spawn_at(&mut self, cell: IVec2) {
        self.home = cell_origin(cell);
        self.reset_to_home();
    }

    pub fn reset_to_home(&mut self) {
        self.pos = self.home;
        self.vel = IVec2::ZERO;
        self.refresh_nearest();
    }

    pub fn refresh_nearest(&mut self) {
        self.nearest = nearest_cell(self.pos);
    }

    /// Adds velocity to position and refreshes the nearest cell.
    pub fn integrate(&mut self) {
        self.pos += self.vel;
        self.refresh_nearest();
    }

    /// Moves exactly onto the nearest cell.
    pub fn snap_to_cell(&mut self) {
        self.refresh_nearest();
        self.pos = cell_origin(self.nearest);
    }

    /// Points the velocity along `direction` at the current speed.
    pub fn head(&mut self, direction: Direction) {
        self.vel = direction.as_ivec2() * self.speed;
    }

    pub fn stop(&mut self) {
        self.vel = IVec2::ZERO;
    }

    /// Current direction of travel, if moving.
    pub fn heading(&self) -> Option<Direction> {
        Direction::from_velocity(self.vel)
    }
}

/// A tag component for the player-controlled mover.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Player {
    /// Last direction of travel; kept while stopped so the sprite keeps facing it.
    pub facing: Direction,
    /// Which of the two pellet sounds plays next.
    pub alternate_pellet_sound: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum PursuerState {
    /// Roaming or chasing; lethal on contact.
    #[default]
    Patrol,
    /// Edible after a power pellet.
    Frightened,
    /// Eaten, heading back to the pen at increased speed; harmless.
    Returning,
}

#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct Pursuer {
    /// 0 through 3; also the contact-resolution order.
    pub id: usize,
    pub state: PursuerState,
    pub route: Route,
}

impl Pursuer {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct BonusItem {
    pub active: bool,
    /// Position in the 16-step bounce cycle; 0 means at rest.
    pub bounce_phase: u32,
    /// Vertical draw offset from the bounce cycle, in pixels.
    pub bounce_offset: i32,
    /// Counts ticks between moves; the item only moves every other tick.
    pub slow_timer: u32,
    pub route: Route,
    /// Sprite variant, taken from the level.
    pub kind: u32,
}

#[derive(Bundle)]
pub struct PlayerBundle {
    pub mover: Mover,
    pub player: Player,
}

impl Default for PlayerBundle {
    fn default() -> Self {
        Self {
            mover: Mover::new(speed::PLAYER),
            player: Player::default(),
        }
    }
}

#[derive(Bundle)]
pub struct PursuerBundle {
    pub mover: Mover,
    pub pursuer: Pursuer,
}

impl PursuerBundle {
    pub fn new(id: usize) -> Self {
        Self {
            mover: Mover::new(speed::PURSUER),
            pursuer: Pursuer::new(id),
        }
    }
}

#[derive(Bundle)]
pub struct BonusBundle {
    pub mover: Mover,
    pub bonus: BonusItem,
}

impl Default for BonusBundle {
    fn default() -> Self {
        let mut mover = Mover::new(speed::BONUS);
        mover.pos = IVec2::splat(-crate::constants::TILE_SIZE);
        mover.refresh_nearest();
        Self {
            mover,
            bonus: BonusItem::default(),
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct GlobalState {
    pub exit: bool,
}

/// The simulation's random source: wander targets and bonus door choice.
#[derive(Resource, Debug, Clone)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    /// Seeded for reproducible runs, or from the thread RNG otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(SmallRng::seed_from_u64(seed)),
            None => Self(SmallRng::from_rng(&mut platform::rng())),
        }
    }
}
