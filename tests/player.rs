use glam::IVec2;
use maze_chase::audio::Sound;
use maze_chase::constants::tile;
use maze_chase::map::direction::Direction;
use maze_chase::systems::{InputFrame, Mode, ScriptedInput};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

use common::{game, game_with, run, start_playing, ticks_until, SoundLog, CORRIDOR, DOOR_RUN, REVERSE_CORRIDOR, TUNNEL};

#[test]
fn test_corridor_is_eaten_in_order() {
    let log = SoundLog::default();
    let sounds = log.clone();
    let mut game = game_with(CORRIDOR, |host| host.with_sound(sounds));
    start_playing(&mut game);

    let ticks = ticks_until(&mut game, Mode::LevelClearPause, 100);
    assert_that(&ticks).is_some();

    assert_eq!(game.scoreboard().score, 60);
    assert_eq!(game.grid().pellets_remaining(), 0);
    assert_eq!(
        log.sounds(),
        vec![
            Sound::PelletA,
            Sound::PelletB,
            Sound::PelletA,
            Sound::PelletB,
            Sound::PelletA,
            Sound::PelletB,
        ]
    );
}

#[test]
fn test_corridor_is_eaten_back_to_front() {
    let input = ScriptedInput::new([InputFrame::start()])
        .hold(InputFrame::default(), 90)
        .hold(InputFrame::moving(Direction::Left), 60);
    let mut game = game_with(REVERSE_CORRIDOR, |host| host.with_input(input));
    start_playing(&mut game);

    let mut eaten = Vec::new();
    for _ in 0..60 {
        let before = game.grid().pellets_remaining();
        run(&mut game, 1);

        let remaining = game.grid().pellets_remaining();
        let cells = game.grid().cells().filter(|&c| game.grid().tile(c) == tile::PELLET).count();
        assert_eq!(remaining as usize, cells);
        assert_that(&(before - remaining)).is_less_than_or_equal_to(1);
        assert_eq!(game.scoreboard().score, 10 * (6 - remaining));
        if remaining < before {
            eaten.push(game.player().unwrap().pos.x);
        }
        if remaining == 0 {
            break;
        }
    }

    assert_eq!(eaten, vec![165, 141, 117, 93, 69, 45]);
    assert_that(&ticks_until(&mut game, Mode::LevelClearPause, 5)).is_some();
}

#[test]
fn test_horizontal_door_wraps_to_its_partner() {
    let mut game = game(DOOR_RUN);
    start_playing(&mut game);

    run(&mut game, 32);
    assert_eq!(game.player().unwrap().pos, IVec2::new(168, 24));

    run(&mut game, 1);
    let player = game.player().unwrap();
    assert_eq!(player.pos, IVec2::new(24, 24));
    assert_eq!(player.nearest, IVec2::new(1, 1));
    assert_eq!(player.vel, IVec2::new(3, 0));
    assert_eq!(game.mode(), Mode::Playing);

    run(&mut game, 1);
    assert_eq!(game.player().unwrap().pos, IVec2::new(27, 24));
}

#[test]
fn test_first_pellet_goes_on_the_first_step() {
    let mut game = game(CORRIDOR);
    start_playing(&mut game);

    run(&mut game, 1);

    assert_eq!(game.player().unwrap().pos, IVec2::new(27, 24));
    assert_eq!(game.scoreboard().score, 10);
    assert_eq!(game.grid().pellets_remaining(), 5);
}

#[test]
fn test_wall_stops_the_player_in_place() {
    let mut game = game(TUNNEL);
    start_playing(&mut game);
    let home = game.player().unwrap().pos;

    run(&mut game, 1);

    let player = game.player().unwrap();
    assert_eq!(player.pos, home);
    assert_eq!(player.vel, IVec2::ZERO);
    assert_eq!(game.mode(), Mode::Playing);
}

#[test]
fn test_turn_into_wall_is_ignored() {
    let input = ScriptedInput::new([InputFrame::start()])
        .hold(InputFrame::default(), 90)
        .hold(InputFrame::moving(Direction::Up), 3);
    let mut game = game_with(CORRIDOR, |host| host.with_input(input));
    start_playing(&mut game);

    run(&mut game, 3);

    let player = game.player().unwrap();
    assert_eq!(player.vel, IVec2::new(3, 0));
    assert_eq!(player.pos, IVec2::new(33, 24));
}

#[test]
fn test_reversing_is_accepted_immediately() {
    let input = ScriptedInput::new([InputFrame::start()])
        .hold(InputFrame::default(), 92)
        .hold(InputFrame::moving(Direction::Left), 1);
    let mut game = game_with(CORRIDOR, |host| host.with_input(input));
    start_playing(&mut game);

    run(&mut game, 2);
    assert_eq!(game.player().unwrap().pos, IVec2::new(30, 24));

    run(&mut game, 1);
    let player = game.player().unwrap();
    assert_eq!(player.vel, IVec2::new(-3, 0));
    assert_eq!(player.pos, IVec2::new(27, 24));
}
