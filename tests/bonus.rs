use glam::IVec2;
use maze_chase::audio::Sound;
use maze_chase::constants::timer;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

use common::{game, game_with, run, start_playing, SoundLog, TUNNEL};

/// Doors at both ends of the middle row, with the player loose in it.
const LOOP: &str = "\
# lvlwidth 9
# lvlheight 5
# startleveldata
100 100 100 100 100 100 100 100 100
6 0 0 0 4 0 0 0 6
100 100 100 100 100 100 100 100 100
100 2 100 10 11 12 13 100 100
100 100 100 100 100 100 100 100 100
# endleveldata
";

#[test]
fn test_bonus_waits_for_its_timer() {
    let mut game = game(TUNNEL);
    start_playing(&mut game);
    run(&mut game, 100);

    let (_, item) = game.bonus().unwrap();
    assert_that(&item.active).is_false();
    assert_eq!(item.kind, 3);
    assert_eq!(game.scoreboard().bonus_spawn_timer, 100);
}

#[test]
fn test_bonus_crosses_between_doors_and_leaves() {
    let log = SoundLog::default();
    let sounds = log.clone();
    let mut game = game_with(TUNNEL, |host| host.with_sound(sounds));
    start_playing(&mut game);
    game.scoreboard_mut().bonus_spawn_timer = timer::BONUS_SPAWN_TICKS - 1;

    run(&mut game, 1);
    let (mover, item) = game.bonus().unwrap();
    assert_that(&item.active).is_true();
    assert_that(&[IVec2::new(0, 24), IVec2::new(192, 24)].to_vec()).contains(&mover.pos);
    assert_eq!(mover.speed, 2);
    let entrance = mover.pos;

    let mut ticks = 0;
    while game.bonus().unwrap().1.active {
        run(&mut game, 1);
        ticks += 1;
        assert_that(&ticks).is_less_than(400);
    }

    let (mover, _) = game.bonus().unwrap();
    assert_eq!(mover.vel, IVec2::ZERO);
    assert_eq!(mover.pos.y, 24);
    assert_eq!((mover.pos.x - entrance.x).abs(), 9 * 24);
    assert_eq!(game.scoreboard().bonus_spawn_timer, 0);
    assert_that(&log.count(Sound::BonusBounce)).is_greater_than(0);
}

#[test]
fn test_bonus_bounces_through_its_arc() {
    let mut game = game(TUNNEL);
    start_playing(&mut game);
    game.scoreboard_mut().bonus_spawn_timer = timer::BONUS_SPAWN_TICKS - 1;

    let mut offsets = Vec::new();
    for _ in 0..16 {
        run(&mut game, 1);
        offsets.push(game.bonus().unwrap().1.bounce_offset);
    }

    assert_eq!(offsets, maze_chase::constants::BONUS_BOUNCE.to_vec());
    assert_eq!(game.bonus().unwrap().1.bounce_phase, 0);
}

#[test]
fn test_eating_the_bonus_scores_and_resets_its_timer() {
    let log = SoundLog::default();
    let sounds = log.clone();
    let mut game = game_with(LOOP, |host| host.with_sound(sounds));
    start_playing(&mut game);
    game.scoreboard_mut().bonus_spawn_timer = timer::BONUS_SPAWN_TICKS - 1;

    let mut ticks = 0;
    while log.count(Sound::EatBonus) == 0 {
        run(&mut game, 1);
        ticks += 1;
        assert_that(&ticks).is_less_than(400);
    }

    assert_eq!(game.scoreboard().score, 2500);
    assert_that(&game.bonus().unwrap().1.active).is_false();
    assert_eq!(game.scoreboard().bonus_spawn_timer, 1);
    assert_eq!(game.scoreboard().bonus_score_timer, timer::BONUS_SCORE_DISPLAY_TICKS - 1);
}
