// Purpose - turning scheduled tones into sound on a real output device

pub mod mixer;
#[cfg(feature = "rtrb")]
pub mod output;

pub use mixer::ToneMixer;
#[cfg(feature = "rtrb")]
pub use output::{CpalBackend, CpalClock};
