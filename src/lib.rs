//! Headless core of a tile-based maze-chase game.
//!
//! A [`game::Game`] owns the ECS world and runs one fixed-rate tick at a time. Everything
//! host-specific (level content, images, sound, drawing, input, high-score storage) comes
//! in through the traits collected in [`game::Host`].

pub mod app;
pub mod asset;
pub mod audio;
pub mod config;
pub mod constants;
pub mod content;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod hiscore;
pub mod map;
pub mod path;
pub mod platform;
pub mod systems;
