//! Practice widgets.
//!
//! Each widget is plain state driven by the host loop: user actions are
//! method calls, time passes through `tick`/`poll(now)`. Only the metronome
//! and the pitch trainer touch audio, and both go through an
//! [`AudioBackend`](crate::clock::AudioBackend).

pub mod log;
pub mod metronome;
pub mod pitch;
pub mod stopwatch;
pub mod symbols;
pub mod warmup;

pub use log::{MemoryNoteStore, NoteEntry, NoteStore};
#[cfg(feature = "serde")]
pub use log::JsonNoteStore;
pub use metronome::Metronome;
pub use pitch::{PitchNote, PitchTrainer, RoundDelays, TrainerStatus, Verdict};
pub use stopwatch::Stopwatch;
pub use symbols::{Flashcard, SymbolsDeck};
pub use warmup::WarmupPicker;
