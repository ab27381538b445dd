//! The bonus item: it enters through one door, bounces across the maze and leaves through
//! the paired door.

use bevy_ecs::{
    event::EventWriter,
    query::Without,
    system::{Query, ResMut},
};
use glam::IVec2;
use tracing::{debug, trace};

use crate::audio::Sound;
use crate::constants::{speed, BONUS_BOUNCE};
use crate::map::geometry::{cell_origin, on_boundary};
use crate::path::PathGrid;
use crate::systems::{
    components::{BonusItem, Mover, Player, Pursuer},
    score::Scoreboard,
    AudioEvent,
};

/// Places the item on `entrance` and starts it toward `exit`.
///
/// Nothing happens when no route connects the two doors.
pub fn spawn_bonus(mover: &mut Mover, item: &mut BonusItem, paths: &mut PathGrid, entrance: IVec2, exit: IVec2) {
    let Some(route) = paths.find(entrance, exit) else {
        debug!(?entrance, ?exit, "Bonus item has no route between doors");
        return;
    };
    let Some(first) = route.front() else {
        return;
    };

    mover.pos = cell_origin(entrance);
    mover.refresh_nearest();
    mover.speed = speed::BONUS;
    mover.head(first);

    item.active = true;
    item.bounce_phase = 0;
    item.bounce_offset = 0;
    item.slow_timer = 0;
    item.route = route;
    debug!(?entrance, ?exit, kind = item.kind, steps = item.route.len(), "Bonus item spawned");
}

/// Bounces the active item every tick and moves it every other tick.
///
/// At each cell boundary the item turns onto the next leg of its route. After the last
/// turn it keeps going for one more tile, then disappears on the following boundary.
pub fn bonus_movement_system(
    mut scoreboard: ResMut<Scoreboard>,
    mut bonus: Query<(&mut Mover, &mut BonusItem), (Without<Player>, Without<Pursuer>)>,
    mut audio: EventWriter<AudioEvent>,
) {
    let Ok((mut mover, mut item)) = bonus.single_mut() else {
        return;
    };
    if !item.active {
        return;
    }

    item.bounce_phase += 1;
    item.bounce_offset = BONUS_BOUNCE[item.bounce_phase as usize - 1];
    if item.bounce_phase as usize == BONUS_BOUNCE.len() {
        item.bounce_phase = 0;
        audio.write(AudioEvent::PlaySound(Sound::BonusBounce));
    }

    item.slow_timer += 1;
    if item.slow_timer < speed::BONUS_TICK_DIVISOR {
        return;
    }
    item.slow_timer = 0;

    mover.integrate();
    if !on_boundary(mover.pos) {
        return;
    }

    if item.route.is_empty() {
        mover.snap_to_cell();
        mover.stop();
        item.active = false;
        scoreboard.bonus_spawn_timer = 0;
        debug!(cell = ?mover.nearest, "Bonus item left the maze");
        return;
    }

    item.route.pop_front();
    if let Some(direction) = item.route.front() {
        trace!(?direction, remaining = item.route.len(), "Bonus item turning");
        mover.head(direction);
    }
}
