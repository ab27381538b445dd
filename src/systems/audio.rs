//! Audio system for forwarding sound requests to the host's sound player.
//!
//! Gameplay systems never talk to the player directly; they write [`AudioEvent`]s and this
//! system drains them once per tick. The player lives in a `NonSend` resource so backends
//! that are tied to the main thread can be used unchanged.

use bevy_ecs::{
    event::{Event, EventReader},
    resource::Resource,
    system::{NonSendMut, Res},
};
use tracing::{debug, trace};

use crate::audio::{Sound, SoundPlayer};

/// Resource for tracking audio state
#[derive(Resource, Debug, Clone, Default)]
pub struct AudioState {
    /// Whether sound effects are suppressed
    pub muted: bool,
}

/// Events for triggering audio playback
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    PlaySound(Sound),
}

/// Non-send resource wrapper for the host's sound player.
pub struct AudioResource(pub Box<dyn SoundPlayer>);

/// System that processes audio events and plays sounds
pub fn audio_system(mut audio: NonSendMut<AudioResource>, state: Res<AudioState>, mut events: EventReader<AudioEvent>) {
    for event in events.read() {
        match event {
            AudioEvent::PlaySound(sound) => {
                if state.muted {
                    debug!(?sound, "Skipping sound, audio is muted");
                    continue;
                }
                trace!(?sound, "Playing sound");
                audio.0.play(*sound);
            }
        }
    }
}
