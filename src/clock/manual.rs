use std::{cell::RefCell, rc::Rc};

use super::{AudioBackend, AudioClock, ScheduledTone};
use crate::error::SchedulerError;

#[derive(Debug, Default)]
struct ManualState {
    now: f64,
    scheduled: Vec<ScheduledTone>,
    leases: usize,
}

/// Hand-driven clock for tests, benches and offline rendering.
///
/// Cloning yields another handle onto the same clock, so a test can keep one
/// handle to move time forward while the scheduler owns a lease on it.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    state: Rc<RefCell<ManualState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.state.borrow().now
    }

    /// Jump to an absolute time. Moving backwards is ignored.
    pub fn set_time(&self, t: f64) {
        let mut state = self.state.borrow_mut();
        if t > state.now {
            state.now = t;
        }
    }

    pub fn advance(&self, dt: f64) {
        let mut state = self.state.borrow_mut();
        state.now += dt.max(0.0);
    }

    /// Every tone scheduled so far, in scheduling order.
    pub fn scheduled(&self) -> Vec<ScheduledTone> {
        self.state.borrow().scheduled.clone()
    }

    pub fn take_scheduled(&self) -> Vec<ScheduledTone> {
        std::mem::take(&mut self.state.borrow_mut().scheduled)
    }

    /// Whether some backend lease currently holds this clock.
    pub fn is_leased(&self) -> bool {
        self.state.borrow().leases > 0
    }
}

/// A clock handed out by [`ManualBackend`]; released on drop.
#[derive(Debug)]
pub struct ManualLease {
    clock: ManualClock,
}

impl AudioClock for ManualLease {
    fn now(&self) -> f64 {
        self.clock.now()
    }

    fn schedule(&mut self, tone: ScheduledTone) {
        self.clock.state.borrow_mut().scheduled.push(tone);
    }
}

impl Drop for ManualLease {
    fn drop(&mut self) {
        let mut state = self.clock.state.borrow_mut();
        state.leases = state.leases.saturating_sub(1);
    }
}

/// Backend that leases out a shared [`ManualClock`].
#[derive(Debug, Clone)]
pub struct ManualBackend {
    clock: ManualClock,
    available: bool,
    acquisitions: usize,
}

impl ManualBackend {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            available: true,
            acquisitions: 0,
        }
    }

    /// A backend whose every acquisition fails, like a host with no output device.
    pub fn unavailable() -> Self {
        Self {
            clock: ManualClock::new(),
            available: false,
            acquisitions: 0,
        }
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Number of successful acquisitions.
    pub fn acquisitions(&self) -> usize {
        self.acquisitions
    }
}

impl AudioBackend for ManualBackend {
    type Clock = ManualLease;

    fn acquire(&mut self) -> Result<ManualLease, SchedulerError> {
        if !self.available {
            return Err(SchedulerError::AudioUnavailable(
                "manual backend disabled".into(),
            ));
        }
        self.acquisitions += 1;
        self.clock.state.borrow_mut().leases += 1;
        Ok(ManualLease {
            clock: self.clock.clone(),
        })
    }
}
