use std::path::PathBuf;

use bevy_ecs::resource::Resource;
use figment::{providers::Env, Figment};
use serde::Deserialize;

use crate::error::GameError;
use crate::path::SearchStrategy;

/// Prefix shared by every environment variable the simulation reads.
pub const ENV_PREFIX: &str = "MAZE_";

/// Runtime configuration, read from `MAZE_*` environment variables.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Directory holding `crossref.txt`, `levels/` and the images.
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,
    /// Where `hiscore.txt` is kept.
    #[serde(default = "default_pref_dir")]
    pub pref_dir: PathBuf,
    /// Sound effects on or off.
    #[serde(default = "default_sfx")]
    pub sfx: bool,
    /// Name recorded with a high score.
    #[serde(default = "default_user_name")]
    pub user_name: String,
    #[serde(default)]
    pub infinite_lives: bool,
    /// Fixed RNG seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub path_strategy: SearchStrategy,
    /// Stop the runner after this many ticks.
    #[serde(default)]
    pub max_ticks: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            pref_dir: default_pref_dir(),
            sfx: default_sfx(),
            user_name: default_user_name(),
            infinite_lives: false,
            seed: None,
            path_strategy: SearchStrategy::default(),
            max_ticks: None,
        }
    }
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_pref_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_sfx() -> bool {
    true
}

fn default_user_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "Player".to_string())
}

/// Extracts the configuration from `figment`.
pub fn extract(figment: Figment) -> Result<Config, GameError> {
    figment.extract().map_err(|e| GameError::Config(e.to_string()))
}

/// Reads the configuration from the environment.
pub fn load_config() -> Result<Config, GameError> {
    extract(Figment::new().merge(Env::prefixed(ENV_PREFIX)))
}
