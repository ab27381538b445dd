//! Platform helpers: frame pacing and entropy.

use std::time::Duration;

use rand::rngs::ThreadRng;

/// Sleeps for `duration`. Spin-sleeps while the host is active for tighter frame pacing,
/// and falls back to a plain thread sleep otherwise.
pub fn sleep(duration: Duration, focused: bool) {
    if focused {
        spin_sleep::sleep(duration);
    } else {
        std::thread::sleep(duration);
    }
}

pub fn rng() -> ThreadRng {
    rand::rng()
}
