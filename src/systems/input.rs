//! Host input, sampled once per tick and turned into [`GameEvent`]s.

use std::collections::VecDeque;

use bevy_ecs::{
    event::EventWriter,
    system::{NonSendMut, ResMut},
};
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::events::{GameCommand, GameEvent};
use crate::map::direction::Direction;
use crate::systems::components::GlobalState;

/// One tick of scripted input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFrame {
    /// Direction currently held, if any.
    pub direction: Option<Direction>,
    pub start: bool,
    pub quit: bool,
}

impl InputFrame {
    pub fn moving(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            ..Default::default()
        }
    }

    pub fn start() -> Self {
        Self {
            start: true,
            ..Default::default()
        }
    }

    pub fn quit() -> Self {
        Self {
            quit: true,
            ..Default::default()
        }
    }
}

pub trait InputSource {
    /// Called once at the start of every tick, before any of the polls.
    fn begin_tick(&mut self) {}

    /// Direction currently held, if any.
    fn poll_direction(&mut self) -> Option<Direction>;
    fn poll_start(&mut self) -> bool;
    fn poll_quit(&mut self) -> bool;
}

/// Never presses anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullInput;

impl InputSource for NullInput {
    fn poll_direction(&mut self) -> Option<Direction> {
        None
    }

    fn poll_start(&mut self) -> bool {
        false
    }

    fn poll_quit(&mut self) -> bool {
        false
    }
}

/// Replays a fixed list of frames, one per tick, then reports nothing.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    frames: VecDeque<InputFrame>,
    current: InputFrame,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = InputFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            current: InputFrame::default(),
        }
    }

    /// Queues `frame` to be reported `ticks` times in a row.
    pub fn hold(mut self, frame: InputFrame, ticks: usize) -> Self {
        self.frames.extend(std::iter::repeat_n(frame, ticks));
        self
    }
}

impl InputSource for ScriptedInput {
    fn begin_tick(&mut self) {
        self.current = self.frames.pop_front().unwrap_or_default();
    }

    fn poll_direction(&mut self) -> Option<Direction> {
        self.current.direction
    }

    fn poll_start(&mut self) -> bool {
        self.current.start
    }

    fn poll_quit(&mut self) -> bool {
        self.current.quit
    }
}

/// Plays on its own: starts a game whenever idle and picks a new direction every so often.
#[derive(Debug, Clone)]
pub struct AutoPilot {
    rng: SmallRng,
    ticks: u64,
    current: Direction,
}

impl AutoPilot {
    const START_INTERVAL: u64 = 60;
    const TURN_INTERVAL: u64 = 20;

    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            ticks: 0,
            current: Direction::default(),
        }
    }
}

impl InputSource for AutoPilot {
    fn begin_tick(&mut self) {
        self.ticks += 1;
        if self.ticks % Self::TURN_INTERVAL == 0 {
            if let Some(&direction) = Direction::DIRECTIONS.choose(&mut self.rng) {
                self.current = direction;
            }
        }
    }

    fn poll_direction(&mut self) -> Option<Direction> {
        Some(self.current)
    }

    fn poll_start(&mut self) -> bool {
        self.ticks % Self::START_INTERVAL == 1
    }

    fn poll_quit(&mut self) -> bool {
        false
    }
}

/// Non-send resource wrapper for the host's input source.
pub struct InputResource(pub Box<dyn InputSource>);

/// Polls the input source and publishes the frame as commands.
pub fn input_system(
    mut input: NonSendMut<InputResource>,
    mut state: ResMut<GlobalState>,
    mut writer: EventWriter<GameEvent>,
) {
    input.0.begin_tick();

    if input.0.poll_quit() {
        info!("Exit requested");
        state.exit = true;
        writer.write(GameCommand::Exit.into());
    }
    if input.0.poll_start() {
        debug!("Start pressed");
        writer.write(GameCommand::StartGame.into());
    }
    if let Some(direction) = input.0.poll_direction() {
        writer.write(GameCommand::MovePlayer(direction).into());
    }
}
