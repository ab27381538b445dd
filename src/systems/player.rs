use bevy_ecs::{
    event::{EventReader, EventWriter},
    query::Without,
    system::{Query, Res, ResMut},
};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::audio::Sound;
use crate::constants::{score, timer, HALF_TILE};
use crate::error::GameError;
use crate::events::{GameCommand, GameEvent};
use crate::map::geometry::in_contact;
use crate::map::grid::{Pickup, TileGrid};
use crate::path::PathGrid;
use crate::systems::{
    bonus::spawn_bonus,
    components::{BonusItem, Mover, Player, Pursuer, PursuerState, SimRng},
    pursuer::Navigator,
    score::Scoreboard,
    state::{Mode, ModeState},
    AudioEvent,
};

/// Adds points and plays the extra-life jingle once per life the award paid out.
fn award(scoreboard: &mut Scoreboard, points: u32, audio: &mut EventWriter<AudioEvent>) {
    for _ in 0..scoreboard.add_score(points) {
        audio.write(AudioEvent::PlaySound(Sound::ExtraLife));
    }
}

/// Applies the latest direction request.
///
/// A direction is accepted when it changes the velocity and the player could take one step
/// that way without touching a wall. Otherwise the current velocity is kept, so a turn
/// pressed slightly early is simply ignored.
pub fn player_control_system(
    mut events: EventReader<GameEvent>,
    grid: Res<TileGrid>,
    mut players: Query<(&mut Mover, &mut Player)>,
    mut errors: EventWriter<GameError>,
) {
    let (mut mover, mut player) = match players.single_mut() {
        Ok(tuple) => tuple,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for player system: {}",
                e
            )));
            return;
        }
    };

    let requested = events.read().fold(None, |last, event| match event {
        GameEvent::Command(GameCommand::MovePlayer(direction)) => Some(*direction),
        _ => last,
    });

    let Some(direction) = requested else {
        return;
    };

    let step = direction.as_ivec2() * mover.speed;
    if mover.vel != step && !grid.hits_wall(mover.pos + step, mover.nearest) {
        mover.vel = step;
        player.facing = direction;
    }
}

/// Moves the player one step and resolves everything that step touches.
///
/// Walls stop the player without moving it, and nothing else happens that tick. Otherwise
/// the player consumes what it overlaps, then checks contact with each pursuer in id order
/// and finally with the bonus item.
#[allow(clippy::too_many_arguments)]
pub fn player_movement_system(
    mut grid: ResMut<TileGrid>,
    mut paths: ResMut<PathGrid>,
    mut rng: ResMut<SimRng>,
    mut state: ResMut<ModeState>,
    mut scoreboard: ResMut<Scoreboard>,
    mut players: Query<(&mut Mover, &mut Player), (Without<Pursuer>, Without<BonusItem>)>,
    mut pursuers: Query<(&mut Mover, &mut Pursuer), (Without<Player>, Without<BonusItem>)>,
    mut bonus: Query<(&Mover, &mut BonusItem), (Without<Player>, Without<Pursuer>)>,
    mut audio: EventWriter<AudioEvent>,
    mut errors: EventWriter<GameError>,
) {
    let (mut mover, mut player) = match players.single_mut() {
        Ok(tuple) => tuple,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for player movement: {}",
                e
            )));
            return;
        }
    };

    mover.refresh_nearest();
    let next = mover.pos + mover.vel;
    if grid.hits_wall(next, mover.nearest) {
        mover.stop();
        return;
    }
    mover.pos = next;
    if let Some(direction) = mover.heading() {
        player.facing = direction;
    }

    let (nearest, vel) = (mover.nearest, mover.vel);
    for pickup in grid.consume_at(next, nearest, vel) {
        match pickup {
            Pickup::Pellet => {
                let sound = if player.alternate_pellet_sound {
                    Sound::PelletB
                } else {
                    Sound::PelletA
                };
                player.alternate_pellet_sound = !player.alternate_pellet_sound;
                audio.write(AudioEvent::PlaySound(sound));
                award(&mut scoreboard, score::PELLET, &mut audio);
            }
            Pickup::PowerPellet => {
                audio.write(AudioEvent::PlaySound(Sound::PowerPellet));
                award(&mut scoreboard, score::POWER_PELLET, &mut audio);
                scoreboard.frighten();
                for (_, mut pursuer) in pursuers.iter_mut() {
                    if pursuer.state == PursuerState::Patrol {
                        pursuer.state = PursuerState::Frightened;
                    }
                }
                debug!(ticks = scoreboard.frighten_timer, "Pursuers frightened");
            }
            Pickup::Teleport(target) => {
                mover.pos = target;
            }
        }
    }
    mover.refresh_nearest();

    let mut navigator = Navigator {
        grid: &grid,
        paths: &mut paths,
        rng: &mut rng.0,
        player_cell: mover.nearest,
    };

    let mut ordered: SmallVec<[_; 4]> = pursuers.iter_mut().collect();
    ordered.sort_by_key(|(_, pursuer)| pursuer.id);

    for (mut pursuer_mover, mut pursuer) in ordered {
        if !in_contact(mover.pos, pursuer_mover.pos, HALF_TILE) {
            continue;
        }
        match pursuer.state {
            PursuerState::Patrol => {
                info!(pursuer = pursuer.id, score = scoreboard.score, "Player caught");
                state.set(Mode::PlayerCaught);
            }
            PursuerState::Frightened => {
                let value = scoreboard.take_pursuer_value();
                info!(pursuer = pursuer.id, value, "Pursuer eaten");
                award(&mut scoreboard, value, &mut audio);
                audio.write(AudioEvent::PlaySound(Sound::EatPursuer));
                if let Err(e) = navigator.send_home(&mut pursuer_mover, &mut pursuer) {
                    errors.write(e);
                }
                state.set(Mode::GhostEatenPause);
            }
            PursuerState::Returning => {}
        }
    }

    if let Ok((bonus_mover, mut item)) = bonus.single_mut() {
        if item.active && in_contact(mover.pos, bonus_mover.pos, HALF_TILE) {
            info!(kind = item.kind, "Bonus item eaten");
            item.active = false;
            award(&mut scoreboard, score::BONUS_ITEM, &mut audio);
            scoreboard.bonus_spawn_timer = 0;
            scoreboard.bonus_score_timer = timer::BONUS_SCORE_DISPLAY_TICKS;
            audio.write(AudioEvent::PlaySound(Sound::EatBonus));
        }
    }
}

/// Advances the frighten, bonus spawn and bonus score timers.
///
/// Runs after the player has moved, including on ticks where a wall stopped it.
pub fn timer_system(
    grid: Res<TileGrid>,
    mut paths: ResMut<PathGrid>,
    mut rng: ResMut<SimRng>,
    mut scoreboard: ResMut<Scoreboard>,
    mut pursuers: Query<&mut Pursuer>,
    mut bonus: Query<(&mut Mover, &mut BonusItem), (Without<Player>, Without<Pursuer>)>,
) {
    if scoreboard.tick_frighten() {
        debug!("Frighten window over");
        for mut pursuer in pursuers.iter_mut() {
            if pursuer.state == PursuerState::Frightened {
                pursuer.state = PursuerState::Patrol;
            }
        }
    }

    if scoreboard.tick_bonus_spawn() {
        if let Some((entrance, exit)) = grid.door_pair(&mut rng.0) {
            if let Ok((mut mover, mut item)) = bonus.single_mut() {
                if !item.active {
                    spawn_bonus(&mut mover, &mut item, &mut paths, entrance, exit);
                }
            }
        }
    }

    scoreboard.tick_bonus_score();
}
