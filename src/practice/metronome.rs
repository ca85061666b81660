use std::time::Instant;

use crate::{
    clock::AudioBackend,
    error::SchedulerError,
    scheduler::{Beat, LookaheadScheduler, SchedulerConfig, Tempo},
};

/// How long after a beat the UI keeps its indicator lit, in clock seconds.
const FLASH_SECS: f64 = 0.1;

/// The metronome widget: a lookahead scheduler plus the tempo the user sees.
///
/// The displayed tempo survives stop/start; the scheduler only knows about
/// it while running.
pub struct Metronome<B: AudioBackend> {
    scheduler: LookaheadScheduler<B>,
    tempo: Tempo,
    last_beat: Option<Beat>,
}

impl<B: AudioBackend> Metronome<B> {
    pub fn new(backend: B, config: SchedulerConfig, tempo: Tempo) -> Self {
        Self {
            scheduler: LookaheadScheduler::new(backend, config),
            tempo,
            last_beat: None,
        }
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn scheduler(&self) -> &LookaheadScheduler<B> {
        &self.scheduler
    }

    pub fn start(&mut self) -> Result<(), SchedulerError> {
        self.last_beat = None;
        self.scheduler.start(self.tempo.bpm())
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
        self.last_beat = None;
    }

    /// Start/Stop button.
    pub fn toggle(&mut self) -> Result<(), SchedulerError> {
        if self.is_running() {
            self.stop();
            Ok(())
        } else {
            self.start()
        }
    }

    /// Slider semantics: move by `delta` BPM, clamped to the valid range,
    /// applied live if running.
    pub fn nudge_tempo(&mut self, delta: i32) -> Result<(), SchedulerError> {
        self.set_tempo(self.tempo.offset(delta))
    }

    pub fn set_tempo(&mut self, tempo: Tempo) -> Result<(), SchedulerError> {
        self.scheduler.set_tempo(tempo.bpm())?;
        self.tempo = tempo;
        Ok(())
    }

    /// Drive the scheduler from the host loop. Returns beats emitted.
    pub fn tick(&mut self, now: Instant) -> usize {
        let last_beat = &mut self.last_beat;
        self.scheduler.poll(now, |beat| *last_beat = Some(beat))
    }

    /// Beats emitted since the last start.
    pub fn beat_count(&self) -> u64 {
        self.last_beat.map(|beat| beat.index + 1).unwrap_or(0)
    }

    /// Whether a beat has sounded within the last flash window.
    ///
    /// Compares against the audio clock, so the light tracks the click the
    /// listener actually hears rather than the moment it was queued.
    pub fn is_flashing(&self) -> bool {
        let (Some(beat), Some(now)) = (self.last_beat, self.scheduler.clock_now()) else {
            return false;
        };
        now >= beat.time && now - beat.time < FLASH_SECS
    }
}
