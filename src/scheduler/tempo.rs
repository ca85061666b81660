#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::error::SchedulerError;

/// Tempo in beats per minute, always within [`Tempo::MIN`]..=[`Tempo::MAX`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tempo(u16);

impl Tempo {
    pub const MIN: Tempo = Tempo(40);
    pub const MAX: Tempo = Tempo(220);
    pub const DEFAULT: Tempo = Tempo(120);

    pub fn new(bpm: u32) -> Result<Self, SchedulerError> {
        if (Self::MIN.0 as u32..=Self::MAX.0 as u32).contains(&bpm) {
            Ok(Tempo(bpm as u16))
        } else {
            Err(SchedulerError::InvalidTempo(bpm))
        }
    }

    /// Saturate into range instead of failing (slider semantics).
    pub fn clamped(bpm: i64) -> Self {
        Tempo(bpm.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u16)
    }

    /// Move by `delta` BPM, stopping at the range ends.
    pub fn offset(self, delta: i32) -> Self {
        Self::clamped(self.0 as i64 + delta as i64)
    }

    pub fn bpm(self) -> u32 {
        self.0 as u32
    }

    /// Length of one beat in seconds: 60 / BPM.
    pub fn seconds_per_beat(self) -> f64 {
        60.0 / self.0 as f64
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Tempo {
    type Error = SchedulerError;

    fn try_from(bpm: u32) -> Result<Self, Self::Error> {
        Tempo::new(bpm)
    }
}

impl From<Tempo> for u32 {
    fn from(tempo: Tempo) -> u32 {
        tempo.bpm()
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.0)
    }
}
