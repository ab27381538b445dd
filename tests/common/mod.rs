#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use maze_chase::{
    audio::{Sound, SoundPlayer},
    config::Config,
    content::StaticContent,
    game::{Game, Host},
    map::catalog::TileCatalog,
    map::grid::TileGrid,
    map::parser::LevelParser,
    path::{PathGrid, SearchStrategy},
    systems::{InputFrame, Mode, ScriptedInput},
};

pub const CATALOG: &str = "\
' tile cross-reference
# id name
2 pellet
3 pellet-power
5 ghost-door
6 door-h
7 door-v
8 glasses
23 blank
100 wall
";

/// A single corridor of six pellets, with every pursuer shut in its own pocket.
pub const CORRIDOR: &str = "\
# lvlwidth 9
# lvlheight 5
# startleveldata
100 100 100 100 100 100 100 100 100
100 4 2 2 2 2 2 2 100
100 100 100 100 100 100 100 100 100
100 10 100 11 100 12 100 13 100
100 100 100 100 100 100 100 100 100
# endleveldata
";

/// The corridor mirrored: the player starts at the far end and has to turn back.
pub const REVERSE_CORRIDOR: &str = "\
# lvlwidth 9
# lvlheight 5
# startleveldata
100 100 100 100 100 100 100 100 100
100 2 2 2 2 2 2 4 100
100 100 100 100 100 100 100 100 100
100 10 100 11 100 12 100 13 100
100 100 100 100 100 100 100 100 100
# endleveldata
";

/// The player's row wraps through a pair of horizontal doors.
pub const DOOR_RUN: &str = "\
# lvlwidth 9
# lvlheight 5
# startleveldata
100 100 100 100 100 100 100 100 100
6 0 0 4 0 0 0 0 6
100 100 100 100 100 100 100 100 100
100 10 100 11 100 12 100 13 2
100 100 100 100 100 100 100 100 100
# endleveldata
";

/// The corridor with its pellets removed.
pub const EMPTY_CORRIDOR: &str = "\
# lvlwidth 9
# lvlheight 5
# startleveldata
100 100 100 100 100 100 100 100 100
100 4 0 0 0 0 0 0 100
100 100 100 100 100 100 100 100 100
100 10 100 11 100 12 100 13 100
100 100 100 100 100 100 100 100 100
# endleveldata
";

/// Pursuer 0 shares the player's corridor; one unreachable pellet keeps the level going.
pub const AMBUSH: &str = "\
# lvlwidth 7
# lvlheight 5
# startleveldata
100 100 100 100 100 100 100
100 4 0 0 10 0 100
100 100 100 100 100 100 100
100 11 100 12 100 13 100
100 2 100 100 100 100 100
# endleveldata
";

/// Like the ambush, but with a power pellet right in front of the player.
pub const POWER_AMBUSH: &str = "\
# lvlwidth 8
# lvlheight 5
# startleveldata
100 100 100 100 100 100 100 100
100 4 3 0 0 10 0 100
100 100 100 100 100 100 100 100
100 11 100 12 100 13 100 2
100 100 100 100 100 100 100 100
# endleveldata
";

/// A door-to-door tunnel for the bonus item; the player is boxed in below it.
pub const TUNNEL: &str = "\
# lvlwidth 9
# lvlheight 5
# fruittype 3
# startleveldata
100 100 100 100 100 100 100 100 100
6 0 0 0 0 0 0 0 6
100 100 100 100 100 100 100 100 100
100 4 100 2 100 10 11 12 13
100 100 100 100 100 100 100 100 100
# endleveldata
";

/// An open room split by a wall, with a sealed chamber at the bottom right.
pub const ROOMS: &str = "\
# lvlwidth 8
# lvlheight 7
# startleveldata
100 100 100 100 100 100 100 100
100 4 0 0 100 0 0 100
100 0 100 0 100 0 0 100
100 0 100 0 0 0 0 100
100 10 11 0 100 100 100 100
100 12 13 0 100 2 0 100
100 100 100 100 100 100 100 100
# endleveldata
";

pub fn catalog() -> TileCatalog {
    TileCatalog::parse(CATALOG).unwrap()
}

pub fn tile_grid(level: &str) -> TileGrid {
    TileGrid::new(&LevelParser::parse(level).unwrap(), catalog().special())
}

pub fn path_grid(level: &str, strategy: SearchStrategy) -> PathGrid {
    PathGrid::from_tiles(&tile_grid(level), strategy)
}

pub fn config() -> Config {
    Config {
        seed: Some(7),
        user_name: "Tester".to_string(),
        ..Config::default()
    }
}

pub fn content(level: &str) -> StaticContent {
    StaticContent::new(CATALOG).with_level(level)
}

/// Records every sound it is asked to play. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct SoundLog(Rc<RefCell<Vec<Sound>>>);

impl SoundLog {
    pub fn sounds(&self) -> Vec<Sound> {
        self.0.borrow().clone()
    }

    pub fn count(&self, sound: Sound) -> usize {
        self.0.borrow().iter().filter(|&&s| s == sound).count()
    }
}

impl SoundPlayer for SoundLog {
    fn play(&mut self, sound: Sound) {
        self.0.borrow_mut().push(sound);
    }
}

/// A game on `level` whose input presses start on the first tick and nothing afterwards.
pub fn game(level: &str) -> Game {
    game_with(level, |host| host)
}

pub fn game_with(level: &str, customize: impl FnOnce(Host) -> Host) -> Game {
    let input = ScriptedInput::new([InputFrame::start()]);
    let host = customize(Host::headless(content(level)).with_input(input));
    Game::new(config(), host).unwrap()
}

pub fn run(game: &mut Game, ticks: usize) {
    for _ in 0..ticks {
        game.tick().unwrap();
    }
}

/// Ticks until `mode` is reached and returns how many ticks that took.
pub fn ticks_until(game: &mut Game, mode: Mode, limit: usize) -> Option<usize> {
    for n in 1..=limit {
        game.tick().unwrap();
        if game.mode() == mode {
            return Some(n);
        }
    }
    None
}

/// Presses start and sits through the ready countdown. The next tick is the first one
/// played.
pub fn start_playing(game: &mut Game) {
    run(game, 1);
    assert_eq!(game.mode(), Mode::Ready);
    let waited = ticks_until(game, Mode::Playing, 200);
    assert_eq!(waited, Some(90));
}
