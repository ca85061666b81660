use std::time::{Duration, Instant};

/// When the pump should next run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deadline {
    Idle,
    Immediate,
    At(Instant),
}

/// Cooperative re-arming timeout, polled by the host event loop.
///
/// Only one deadline exists at a time, so only one pump can ever be pending.
/// `cancel` takes effect synchronously: a cancelled timer is never due.
#[derive(Debug, Clone)]
pub struct PumpTimer {
    interval: Duration,
    deadline: Deadline,
}

impl PumpTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: Deadline::Idle,
        }
    }

    /// Due on the very next poll, whatever time it is.
    pub fn arm_immediately(&mut self) {
        self.deadline = Deadline::Immediate;
    }

    /// Due one interval after `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Deadline::At(now + self.interval);
    }

    /// Push an expired deadline forward by exactly one interval.
    ///
    /// Unlike [`arm`](Self::arm) this keeps the established cadence, so a host
    /// that polls late can fire repeatedly until it has caught up.
    pub fn reschedule(&mut self, now: Instant) {
        self.deadline = match self.deadline {
            Deadline::At(at) => Deadline::At(at + self.interval),
            Deadline::Immediate => Deadline::At(now + self.interval),
            Deadline::Idle => Deadline::Idle,
        };
    }

    pub fn cancel(&mut self) {
        self.deadline = Deadline::Idle;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline != Deadline::Idle
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.deadline {
            Deadline::Idle => false,
            Deadline::Immediate => true,
            Deadline::At(at) => now >= at,
        }
    }

    /// Time left until due, `None` if idle. Lets a host sleep exactly as long as needed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match self.deadline {
            Deadline::Idle => None,
            Deadline::Immediate => Some(Duration::ZERO),
            Deadline::At(at) => Some(at.saturating_duration_since(now)),
        }
    }
}
