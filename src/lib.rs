pub mod audio; // Output device and tone rendering
pub mod clock; // Audio clock abstraction
#[cfg(feature = "serde")]
pub mod config;
pub mod dsp;
pub mod error;
pub mod practice; // Practice widgets: metronome, stopwatch, trainers, log
pub mod scheduler; // Lookahead beat scheduling

pub use error::{CompanionError, SchedulerError};
pub use scheduler::{Beat, LookaheadScheduler, SchedulerConfig, SchedulerState, Tempo};

pub const MAX_BLOCK_SIZE: usize = 2048;
