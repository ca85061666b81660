//! Audio clock abstraction.
//!
//! The scheduler never synthesizes audio. It reads a high-resolution clock
//! and hands the clock "play this tone at time T" requests. Whatever sits
//! behind the clock (a cpal stream, a test double) renders them.

mod manual;
mod tone;

pub use manual::{ManualBackend, ManualClock, ManualLease};
pub use tone::{ScheduledTone, ToneSpec};

use crate::error::SchedulerError;

/// A monotonic audio-domain clock that accepts scheduled tones.
pub trait AudioClock {
    /// Current clock time in seconds. Never decreases.
    fn now(&self) -> f64;

    /// Queue a tone for playback at `tone.start`.
    ///
    /// Must not block. Implementations with bounded queues drop the tone
    /// when full.
    fn schedule(&mut self, tone: ScheduledTone);
}

/// Source of audio clocks.
///
/// The scheduler acquires a clock on `start` and drops it on `stop`; dropping
/// the clock releases the underlying output.
pub trait AudioBackend {
    type Clock: AudioClock;

    fn acquire(&mut self) -> Result<Self::Clock, SchedulerError>;
}

impl<C: AudioClock + ?Sized> AudioClock for Box<C> {
    fn now(&self) -> f64 {
        (**self).now()
    }

    fn schedule(&mut self, tone: ScheduledTone) {
        (**self).schedule(tone)
    }
}
