use std::time::{Duration, Instant};

use crate::scheduler::PumpTimer;

/// Practice timer counting whole seconds.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    elapsed_secs: u64,
    tick: PumpTimer,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            elapsed_secs: 0,
            tick: PumpTimer::new(Duration::from_secs(1)),
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_armed()
    }

    /// Start/Pause button.
    pub fn toggle(&mut self, now: Instant) {
        if self.is_running() {
            self.tick.cancel();
        } else {
            self.tick.arm(now);
        }
    }

    /// Pause and zero.
    pub fn reset(&mut self) {
        self.tick.cancel();
        self.elapsed_secs = 0;
    }

    /// Count every second that has elapsed since the last poll.
    pub fn poll(&mut self, now: Instant) {
        while self.tick.is_due(now) {
            self.elapsed_secs += 1;
            self.tick.reschedule(now);
        }
    }

    /// `H:MM:SS`
    pub fn display(&self) -> String {
        format_time(self.elapsed_secs)
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Hours unpadded, minutes and seconds two digits: `1:02:03`.
pub fn format_time(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}
