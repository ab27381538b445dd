//! Centralized error types for the simulation.
//!
//! Load-time problems (malformed levels, incomplete tile catalogs, missing assets) are fatal.
//! Persistence problems never surface here; the high-score store falls back to defaults.

use std::io;

use bevy_ecs::event::Event;

/// Main error type for the simulation.
///
/// Systems report failures by writing this as an event; `Game::tick` drains them and hands
/// the first one back to the caller.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Level parsing error: {0}")]
    LevelParse(#[from] ParseError),

    #[error("Tile catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No wander target exists for pursuer {pursuer}")]
    NoWanderTarget { pursuer: usize },

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to load asset {path}: {reason}")]
    LoadFailed { path: String, reason: String },
}

/// Error type for level text parsing.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Level dimensions were not declared before the grid")]
    MissingDimensions,

    #[error("Invalid number {token:?} on line {line}")]
    InvalidNumber { line: usize, token: String },

    #[error("Row on line {line} has {found} cells, expected {expected}")]
    RowWidth { line: usize, expected: usize, found: usize },

    #[error("Grid has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },

    #[error("Level is missing the {0} spawn")]
    MissingSpawn(String),
}

/// Error type for the tile cross-reference table.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Required tile name {0:?} is not defined")]
    MissingName(&'static str),

    #[error("Invalid tile id {token:?} on line {line}")]
    InvalidId { line: usize, token: String },

    #[error("Tile name \"pellet\" must map to id 2, found {0}")]
    PelletId(u32),
}

/// Result type for simulation operations.
pub type GameResult<T> = Result<T, GameError>;
