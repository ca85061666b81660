use serde::{Deserialize, Serialize};
use std::{fs, io::ErrorKind, path::Path, time::Duration};
use tracing::{info, warn};

use crate::{
    clock::ToneSpec,
    error::CompanionError,
    practice::RoundDelays,
    scheduler::{SchedulerConfig, Tempo, DEFAULT_LOOKAHEAD, DEFAULT_PUMP_INTERVAL},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetronomeConfig {
    #[serde(default)]
    pub tempo: Tempo,
    #[serde(default = "MetronomeConfig::default_lookahead_secs")]
    pub lookahead_secs: f64,
    #[serde(default = "MetronomeConfig::default_pump_interval_ms")]
    pub pump_interval_ms: u64,
    #[serde(default = "ToneSpec::metronome_click")]
    pub click: ToneSpec,
}

impl MetronomeConfig {
    fn default_lookahead_secs() -> f64 {
        DEFAULT_LOOKAHEAD
    }
    fn default_pump_interval_ms() -> u64 {
        DEFAULT_PUMP_INTERVAL.as_millis() as u64
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            lookahead: self.lookahead_secs,
            pump_interval: Duration::from_millis(self.pump_interval_ms),
            click: self.click,
        }
    }
}

impl Default for MetronomeConfig {
    fn default() -> Self {
        Self {
            tempo: Tempo::DEFAULT,
            lookahead_secs: Self::default_lookahead_secs(),
            pump_interval_ms: Self::default_pump_interval_ms(),
            click: ToneSpec::metronome_click(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Tones in flight between the UI thread and the audio callback
    #[serde(default = "AudioConfig::default_queue_capacity")]
    pub queue_capacity: usize,
}

impl AudioConfig {
    fn default_queue_capacity() -> usize {
        64
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            queue_capacity: Self::default_queue_capacity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchConfig {
    #[serde(default = "PitchConfig::default_correct_delay_ms")]
    pub correct_delay_ms: u64,
    #[serde(default = "PitchConfig::default_wrong_delay_ms")]
    pub wrong_delay_ms: u64,
}

impl PitchConfig {
    fn default_correct_delay_ms() -> u64 {
        1500
    }
    fn default_wrong_delay_ms() -> u64 {
        2000
    }

    pub fn round_delays(&self) -> RoundDelays {
        RoundDelays {
            after_correct: Duration::from_millis(self.correct_delay_ms),
            after_wrong: Duration::from_millis(self.wrong_delay_ms),
        }
    }
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            correct_delay_ms: Self::default_correct_delay_ms(),
            wrong_delay_ms: Self::default_wrong_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "StorageConfig::default_notes_path")]
    pub notes_path: String,
    #[serde(default = "StorageConfig::default_log_path")]
    pub log_path: String,
}

impl StorageConfig {
    fn default_notes_path() -> String {
        "practice_notes.json".into()
    }
    fn default_log_path() -> String {
        "practice.log".into()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            notes_path: Self::default_notes_path(),
            log_path: Self::default_log_path(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanionConfig {
    #[serde(default)]
    pub metronome: MetronomeConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub pitch: PitchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl CompanionConfig {
    /// Read `path`, or write the defaults there when it does not exist yet.
    ///
    /// A file that exists but does not parse, or holds values the metronome
    /// cannot run with, is an error and is left untouched.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, CompanionError> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        match fs::read_to_string(path) {
            Ok(contents) => {
                let cfg: Self =
                    toml::from_str(&contents).map_err(|source| CompanionError::Config {
                        path: shown.clone(),
                        source,
                    })?;
                cfg.validate().map_err(|reason| CompanionError::InvalidConfig {
                    path: shown,
                    reason,
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let default_cfg = Self::default();
                match toml::to_string_pretty(&default_cfg) {
                    Ok(text) => {
                        if let Err(e) = fs::write(path, text) {
                            warn!(path = %shown, %e, "could not write default config");
                        } else {
                            info!(path = %shown, "wrote default config");
                        }
                    }
                    Err(e) => warn!(%e, "failed to serialize default config"),
                }
                Ok(default_cfg)
            }
            Err(e) => Err(CompanionError::io(shown, e)),
        }
    }

    /// Range checks serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        let metronome = &self.metronome;
        if metronome.pump_interval_ms == 0 {
            return Err("metronome.pump_interval_ms must be at least 1".into());
        }
        let pump_secs = metronome.pump_interval_ms as f64 / 1000.0;
        let lookahead = metronome.lookahead_secs;
        if !lookahead.is_finite() || lookahead <= pump_secs {
            return Err(format!(
                "metronome.lookahead_secs must be a number greater than the pump interval \
                 ({pump_secs}s), got {lookahead}"
            ));
        }
        if self.audio.queue_capacity == 0 {
            return Err("audio.queue_capacity must be at least 1".into());
        }
        Ok(())
    }
}
