use rand::{rngs::SmallRng, Rng, SeedableRng};

pub const WARMUP_EXERCISES: [&str; 6] = [
    "Long Tones (4 counts)",
    "Chromatic Scale (Slow)",
    "Right/Left Hand Independence",
    "Arpeggios in C Major",
    "Finger Gymnastics (Trills)",
    "Sight-reading simple melody",
];

/// Picks a warmup exercise at random. Starts on the first one.
pub struct WarmupPicker<R = SmallRng> {
    rng: R,
    current: usize,
}

impl WarmupPicker<SmallRng> {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_os_rng())
    }
}

impl Default for WarmupPicker<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> WarmupPicker<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng, current: 0 }
    }

    pub fn current(&self) -> &'static str {
        WARMUP_EXERCISES[self.current]
    }

    /// Uniform pick; the same exercise may come up twice in a row.
    pub fn shuffle(&mut self) -> &'static str {
        self.current = self.rng.random_range(0..WARMUP_EXERCISES.len());
        self.current()
    }
}
