//! Pursuer routing: wandering, chasing the player and returning to the pen.

use bevy_ecs::{
    event::EventWriter,
    query::{With, Without},
    system::{Query, Res, ResMut},
};
use glam::IVec2;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::constants::{speed, WANDER_ATTEMPTS};
use crate::error::{GameError, GameResult};
use crate::map::geometry::{nearest_cell, on_boundary};
use crate::map::grid::TileGrid;
use crate::path::PathGrid;
use crate::systems::components::{Mover, Player, Pursuer, PursuerState, SimRng};

/// Borrowed view of everything a pursuer needs to pick its next route.
pub struct Navigator<'a> {
    pub grid: &'a TileGrid,
    pub paths: &'a mut PathGrid,
    pub rng: &'a mut SmallRng,
    /// The player's nearest cell, the target of a chase.
    pub player_cell: IVec2,
}

impl Navigator<'_> {
    /// Routes toward a random target, trying up to [`WANDER_ATTEMPTS`] of them.
    ///
    /// Stops the pursuer when no attempt finds a route. A maze with no candidate targets
    /// at all is an error.
    pub fn wander(&mut self, mover: &mut Mover, pursuer: &mut Pursuer) -> GameResult<()> {
        let targets = self.grid.wander_targets();
        if targets.is_empty() {
            return Err(GameError::NoWanderTarget { pursuer: pursuer.id });
        }

        for _ in 0..WANDER_ATTEMPTS {
            let Some(&target) = targets.choose(self.rng) else {
                break;
            };
            if let Some(route) = self.paths.find(mover.nearest, target) {
                trace!(pursuer = pursuer.id, ?target, steps = route.len(), "Wandering");
                pursuer.route = route;
                match pursuer.route.front() {
                    Some(direction) => mover.head(direction),
                    None => mover.stop(),
                }
                return Ok(());
            }
        }

        debug!(pursuer = pursuer.id, "No wander route found, holding position");
        pursuer.route.clear();
        mover.stop();
        Ok(())
    }

    /// Routes toward the player, wandering instead when the player is unreachable.
    pub fn chase(&mut self, mover: &mut Mover, pursuer: &mut Pursuer) -> GameResult<()> {
        match self.paths.find(mover.nearest, self.player_cell) {
            Some(route) => {
                pursuer.route = route;
                match pursuer.route.front() {
                    Some(direction) => mover.head(direction),
                    None => mover.stop(),
                }
                Ok(())
            }
            None => self.wander(mover, pursuer),
        }
    }

    /// Heads along the current route, or decides what to do once it has run out.
    ///
    /// A returning pursuer that reaches the end of its route is back in the pen: it recovers
    /// its normal speed and wanders off. Anyone else resumes the chase.
    pub fn follow(&mut self, mover: &mut Mover, pursuer: &mut Pursuer) -> GameResult<()> {
        if let Some(direction) = pursuer.route.front() {
            mover.head(direction);
            return Ok(());
        }

        match pursuer.state {
            PursuerState::Returning => {
                debug!(pursuer = pursuer.id, "Back in the pen");
                pursuer.state = PursuerState::Patrol;
                mover.speed /= speed::RETURNING_FACTOR;
                self.wander(mover, pursuer)
            }
            PursuerState::Patrol | PursuerState::Frightened => self.chase(mover, pursuer),
        }
    }

    /// Sends an eaten pursuer back to the pen at increased speed.
    ///
    /// The pen entrance is the cell just below the ghost door; mazes without one send the
    /// pursuer to its own spawn instead. If that is unreachable the pursuer recovers where
    /// it stands.
    pub fn send_home(&mut self, mover: &mut Mover, pursuer: &mut Pursuer) -> GameResult<()> {
        pursuer.state = PursuerState::Returning;
        mover.speed *= speed::RETURNING_FACTOR;
        mover.snap_to_cell();

        let target = match self.grid.ghost_box_cell() {
            Some(door) => door + IVec2::Y,
            None => nearest_cell(mover.home),
        };

        match self.paths.find(mover.nearest, target) {
            Some(route) => {
                debug!(pursuer = pursuer.id, ?target, steps = route.len(), "Returning to pen");
                pursuer.route = route;
                self.follow(mover, pursuer)
            }
            None => {
                warn!(pursuer = pursuer.id, ?target, "Pen unreachable, recovering in place");
                pursuer.state = PursuerState::Patrol;
                mover.speed /= speed::RETURNING_FACTOR;
                self.wander(mover, pursuer)
            }
        }
    }
}

/// Moves every pursuer one step and re-plans those that land on a cell boundary.
///
/// Pursuers are processed in id order so a seeded run always draws the same wander targets.
pub fn pursuer_movement_system(
    grid: Res<TileGrid>,
    mut paths: ResMut<PathGrid>,
    mut rng: ResMut<SimRng>,
    player: Query<&Mover, (With<Player>, Without<Pursuer>)>,
    mut pursuers: Query<(&mut Mover, &mut Pursuer), Without<Player>>,
    mut errors: EventWriter<GameError>,
) {
    let player_cell = match player.single() {
        Ok(mover) => mover.nearest,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for pursuer movement: {}",
                e
            )));
            return;
        }
    };

    let mut navigator = Navigator {
        grid: &grid,
        paths: &mut paths,
        rng: &mut rng.0,
        player_cell,
    };

    let mut ordered: SmallVec<[_; 4]> = pursuers.iter_mut().collect();
    ordered.sort_by_key(|(_, pursuer)| pursuer.id);

    for (mut mover, mut pursuer) in ordered {
        mover.integrate();
        if !on_boundary(mover.pos) {
            continue;
        }

        pursuer.route.pop_front();
        if let Err(e) = navigator.follow(&mut mover, &mut pursuer) {
            errors.write(e);
        }
    }
}
