//! Lookahead beat scheduler.
//!
//! Drives the metronome: emits beats spaced exactly `60 / tempo` seconds
//! apart on a high-resolution audio clock, discovered by a coarse polling
//! timer.

mod pump;
mod tempo;

pub use pump::PumpTimer;
pub use tempo::Tempo;

use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::{
    clock::{AudioBackend, AudioClock, ToneSpec},
    error::SchedulerError,
};

/*
Lookahead Scheduling
====================

A metronome that fires a timer once per beat drifts: every callback arrives
a little late, and the lateness accumulates. Instead, a fast polling timer
(the "pump", every 25ms) looks a short window ahead on the audio clock and
queues every beat that falls inside it. The beat *times* come from
arithmetic on the audio clock, so the polling jitter never reaches them.

    audio clock ──────────────────────────────────────────────────→
                  now        now + lookahead
                   │◄──────────►│
    pump tick:     │  ●         │              ● = beat queued this tick
                   │            │   ○          ○ = left for a later tick
                   next_beat_time advances by 60/tempo per queued beat


Vocabulary
----------

  lookahead       How far past `now` a beat may be queued (0.1s). Beats are
                  never queued further ahead than this.

  pump interval   Wall-clock polling period (25ms). Must be comfortably
                  shorter than the lookahead so consecutive windows overlap.

  next beat time  Clock time of the next beat to queue. Only ever moves
                  forward, by exactly one beat length at a time.


The Loop
--------

    seconds_per_beat = 60 / tempo
    while next_beat_time < clock.now() + lookahead:
        queue click at next_beat_time
        emit beat(next_beat_time)
        next_beat_time += seconds_per_beat

It is a `while`, not an `if`. When a pump tick is delayed (the process was
suspended, the UI thread stalled) the next tick catches up by queueing every
beat whose time has entered the window, in order and evenly spaced, rather
than bunching them into one.


Tempo Changes
-------------

`set_tempo` only changes the spacing used *after* the next beat. The next
beat time was computed with the old spacing and stays put, so a tempo change
never produces a jump in the audible pulse.


State Machine
-------------

    ┌─────────┐  start   ┌─────────┐
    │ Stopped │ ───────→ │ Running │ ──┐ start (no-op)
    └─────────┘ ←─────── └─────────┘ ←─┘
      │    ↑      stop
      └────┘ stop (no-op)

`Running` holds the audio clock; `Stopped` holds nothing. The state is
derived from whether a clock is held, so the two can never disagree.
*/

/// Default lookahead window in seconds.
pub const DEFAULT_LOOKAHEAD: f64 = 0.1;
/// Default wall-clock polling period of the pump.
pub const DEFAULT_PUMP_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// One emitted beat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beat {
    /// Beats emitted since the last `start`, counting from 0
    pub index: u64,
    /// Scheduled clock time in seconds; render the click at this time, not "now"
    pub time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerConfig {
    /// How far ahead of the audio clock beats may be queued, in seconds
    pub lookahead: f64,
    /// How often the pump re-checks the clock
    pub pump_interval: Duration,
    /// Sound queued on the clock for every beat
    pub click: ToneSpec,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            pump_interval: DEFAULT_PUMP_INTERVAL,
            click: ToneSpec::metronome_click(),
        }
    }
}

pub struct LookaheadScheduler<B: AudioBackend> {
    backend: B,
    /// Held only while running
    clock: Option<B::Clock>,
    config: SchedulerConfig,
    tempo: Tempo,
    next_beat_time: f64,
    next_index: u64,
    pump: PumpTimer,
}

impl<B: AudioBackend> LookaheadScheduler<B> {
    pub fn new(backend: B, config: SchedulerConfig) -> Self {
        Self {
            backend,
            clock: None,
            pump: PumpTimer::new(config.pump_interval),
            config,
            tempo: Tempo::DEFAULT,
            next_beat_time: 0.0,
            next_index: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.clock.is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_some()
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Clock time of the next beat to be queued.
    pub fn next_beat_time(&self) -> f64 {
        self.next_beat_time
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Current audio clock time, `None` while stopped.
    pub fn clock_now(&self) -> Option<f64> {
        self.clock.as_ref().map(|clock| clock.now())
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Start emitting beats at `bpm`.
    ///
    /// Acquires a clock, anchors the first beat at the clock's current time
    /// and makes the pump due on the next poll. Already running: no-op, the
    /// beat cursor is left alone.
    pub fn start(&mut self, bpm: u32) -> Result<(), SchedulerError> {
        let tempo = Tempo::new(bpm)?;
        if self.is_running() {
            return Ok(());
        }

        let clock = self.backend.acquire()?;
        self.next_beat_time = clock.now();
        self.next_index = 0;
        self.tempo = tempo;
        self.clock = Some(clock);
        self.pump.arm_immediately();

        info!(tempo = %tempo, at = self.next_beat_time, "scheduler started");
        Ok(())
    }

    /// Stop emitting beats and release the clock. Idempotent.
    pub fn stop(&mut self) {
        self.pump.cancel();
        if self.clock.take().is_some() {
            info!(beats = self.next_index, "scheduler stopped");
        }
    }

    /// Change the beat spacing. The already-computed next beat keeps its time.
    pub fn set_tempo(&mut self, bpm: u32) -> Result<(), SchedulerError> {
        let tempo = Tempo::new(bpm)?;
        if tempo != self.tempo {
            info!(from = %self.tempo, to = %tempo, "tempo changed");
            self.tempo = tempo;
        }
        Ok(())
    }

    /// Run the pump if its timer is due, then re-arm it.
    ///
    /// This is what a host event loop calls on every iteration. Returns the
    /// number of beats emitted.
    pub fn poll(&mut self, now: Instant, on_beat: impl FnMut(Beat)) -> usize {
        if !self.is_running() || !self.pump.is_due(now) {
            return 0;
        }

        let emitted = self.pump(on_beat);
        if self.is_running() {
            self.pump.arm(now);
        }
        emitted
    }

    /// Queue every beat inside the lookahead window. Returns how many were emitted.
    ///
    /// Does nothing while stopped.
    pub fn pump(&mut self, mut on_beat: impl FnMut(Beat)) -> usize {
        let Some(clock) = self.clock.as_mut() else {
            return 0;
        };

        let seconds_per_beat = self.tempo.seconds_per_beat();
        let horizon = clock.now() + self.config.lookahead;
        let mut emitted = 0;

        while self.next_beat_time < horizon {
            let beat = Beat {
                index: self.next_index,
                time: self.next_beat_time,
            };
            clock.schedule(self.config.click.at(beat.time));
            on_beat(beat);

            self.next_index += 1;
            self.next_beat_time += seconds_per_beat;
            emitted += 1;
        }

        if emitted > 1 {
            debug!(emitted, horizon, "pump caught up on late beats");
        }
        emitted
    }

    /// Time until the pump next wants to run, `None` while stopped.
    pub fn time_until_pump(&self, now: Instant) -> Option<Duration> {
        self.pump.remaining(now)
    }
}

impl<B: AudioBackend> Drop for LookaheadScheduler<B> {
    fn drop(&mut self) {
        self.stop();
    }
}
