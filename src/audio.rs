//! Sound effects and the playback contract the simulation talks to.

use strum_macros::{AsRefStr, EnumIter};
use tracing::trace;

/// Every sound effect the simulation can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Sound {
    /// The two pellet sounds alternate on every pellet eaten.
    PelletA,
    PelletB,
    PowerPellet,
    EatPursuer,
    BonusBounce,
    EatBonus,
    ExtraLife,
}

impl Sound {
    /// File name of the sound under the content directory's `sounds/` folder.
    pub const fn file_name(self) -> &'static str {
        match self {
            Sound::PelletA => "pellet1.wav",
            Sound::PelletB => "pellet2.wav",
            Sound::PowerPellet => "powerpellet.wav",
            Sound::EatPursuer => "eatgh2.wav",
            Sound::BonusBounce => "fruitbounce.wav",
            Sound::EatBonus => "eatfruit.wav",
            Sound::ExtraLife => "extralife.wav",
        }
    }
}

/// Plays sound effects. Implemented by whatever audio backend hosts the simulation.
pub trait SoundPlayer {
    fn play(&mut self, sound: Sound);
}

/// A player that discards every sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSound;

impl SoundPlayer for NullSound {
    fn play(&mut self, sound: Sound) {
        trace!(sound = sound.as_ref(), "Discarding sound");
    }
}
