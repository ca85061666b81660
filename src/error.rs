use thiserror::Error;

/// Conditions surfaced by the beat scheduler.
///
/// Neither is fatal: the scheduler is left `Stopped` (or unchanged) and can
/// always be started again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("audio output unavailable: {0}")]
    AudioUnavailable(String),

    #[error("invalid tempo {0} BPM (expected 40..=220)")]
    InvalidTempo(u32),
}

/// Crate-level error for everything outside the scheduler core.
#[derive(Error, Debug)]
pub enum CompanionError {
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "serde")]
    #[error("malformed note store {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[cfg(feature = "serde")]
    #[error("malformed config {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[cfg(feature = "serde")]
    #[error("invalid config {path}: {reason}")]
    InvalidConfig { path: String, reason: String },
}

impl CompanionError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        CompanionError::Io {
            path: path.into(),
            source,
        }
    }
}
