use glam::IVec2;
use maze_chase::map::palette::{LevelPalette, Palette};
use maze_chase::systems::{InputFrame, Mode, NullInput, ScriptedInput};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

use common::{game, game_with, run, start_playing, ticks_until, CORRIDOR, EMPTY_CORRIDOR};

#[test]
fn test_starts_in_game_over() {
    let game = game(CORRIDOR);
    assert_eq!(game.mode(), Mode::GameOver);
    assert_eq!(game.scoreboard().lives, 3);
}

#[test]
fn test_idles_until_start_is_pressed() {
    let mut game = game_with(CORRIDOR, |host| host.with_input(NullInput));
    let before = game.player();

    run(&mut game, 120);

    assert_eq!(game.mode(), Mode::GameOver);
    assert_eq!(game.player(), before);
}

#[test]
fn test_ready_countdown_sends_player_right() {
    let mut game = game(CORRIDOR);
    start_playing(&mut game);

    let player = game.player().unwrap();
    assert_eq!(player.vel, IVec2::new(3, 0));
    assert_eq!(player.pos, IVec2::new(24, 24));
    assert_eq!(game.scoreboard().level, 1);
}

#[test]
fn test_nothing_moves_during_ready() {
    let mut game = game(CORRIDOR);
    run(&mut game, 45);

    assert_eq!(game.mode(), Mode::Ready);
    assert_eq!(game.player().unwrap().pos, IVec2::new(24, 24));
}

#[test]
fn test_level_clear_flash_and_transition() {
    let mut game = game(EMPTY_CORRIDOR);
    start_playing(&mut game);
    let original = game.world.resource::<LevelPalette>().current;

    run(&mut game, 1);
    assert_eq!(game.mode(), Mode::LevelClearPause);

    assert_eq!(ticks_until(&mut game, Mode::LevelFlash, 100), Some(60));

    run(&mut game, 10);
    let flashing = game.world.resource::<LevelPalette>().current;
    assert_eq!(flashing, original.flashed());

    run(&mut game, 10);
    assert_eq!(game.world.resource::<LevelPalette>().current, original);

    assert_eq!(ticks_until(&mut game, Mode::LevelTransition, 200), Some(130));
    assert_eq!(game.world.resource::<LevelPalette>().current, original);

    assert_eq!(ticks_until(&mut game, Mode::Ready, 20), Some(10));
    assert_eq!(game.scoreboard().level, 2);
}

#[test]
fn test_flash_palette_is_white_on_black() {
    let flashed = Palette::default().flashed();
    assert_that(&flashed.fill.r).is_equal_to(0);
    assert_that(&flashed.edge_light.b).is_equal_to(254);
}

#[test]
fn test_quit_requests_exit() {
    let input = ScriptedInput::new([InputFrame::start(), InputFrame::default(), InputFrame::quit()]);
    let mut game = game_with(CORRIDOR, |host| host.with_input(input));

    assert_that(&game.tick().unwrap()).is_false();
    assert_that(&game.tick().unwrap()).is_false();
    assert_that(&game.tick().unwrap()).is_true();
}
