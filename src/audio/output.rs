//! Audio clock backed by a cpal output stream.
//!
//! The clock *is* the stream: `now()` is the number of frames the callback
//! has rendered divided by the sample rate. Tones travel to the callback over
//! a lock-free SPSC ring, so neither side ever blocks the other.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, PushError, RingBuffer};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tracing::{info, warn};

use super::mixer::ToneMixer;
use crate::{
    clock::{AudioBackend, AudioClock, ScheduledTone},
    error::SchedulerError,
    MAX_BLOCK_SIZE,
};

/// Opens the host's default output device on every acquisition.
#[derive(Debug, Clone, Copy)]
pub struct CpalBackend {
    /// Capacity of the tone ring and of the mixer's tone pool
    pub queue_capacity: usize,
}

impl CpalBackend {
    pub fn new(queue_capacity: usize) -> Self {
        Self { queue_capacity }
    }
}

impl Default for CpalBackend {
    fn default() -> Self {
        Self::new(64)
    }
}

impl AudioBackend for CpalBackend {
    type Clock = CpalClock;

    fn acquire(&mut self) -> Result<CpalClock, SchedulerError> {
        CpalClock::open(self.queue_capacity)
    }
}

/// A running output stream plus the handles to drive it.
///
/// Dropping the clock drops the stream, which closes the device.
pub struct CpalClock {
    _stream: cpal::Stream,
    frames: Arc<AtomicU64>,
    sample_rate: f64,
    tones: Producer<ScheduledTone>,
}

fn unavailable(context: &str, err: impl std::fmt::Display) -> SchedulerError {
    SchedulerError::AudioUnavailable(format!("{context}: {err}"))
}

impl CpalClock {
    pub fn open(queue_capacity: usize) -> Result<Self, SchedulerError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| SchedulerError::AudioUnavailable("no default output device".into()))?;
        let config = device
            .default_output_config()
            .map_err(|e| unavailable("failed to fetch default output config", e))?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;

        let (tx, rx) = RingBuffer::<ScheduledTone>::new(queue_capacity);
        let frames = Arc::new(AtomicU64::new(0));

        let render = OutputRenderer {
            rx,
            mixer: ToneMixer::new(sample_rate as f32, queue_capacity),
            frames: frames.clone(),
            channels,
            render_buf: vec![0.0f32; MAX_BLOCK_SIZE],
        };

        let stream = device
            .build_output_stream(
                &config.into(),
                {
                    let mut render = render;
                    move |data: &mut [f32], _| render.fill(data)
                },
                |err| warn!(%err, "audio stream error"),
                None,
            )
            .map_err(|e| unavailable("failed to build output stream", e))?;

        stream
            .play()
            .map_err(|e| unavailable("failed to start output stream", e))?;

        info!(sample_rate, channels, "audio clock opened");

        Ok(Self {
            _stream: stream,
            frames,
            sample_rate: sample_rate as f64,
            tones: tx,
        })
    }
}

impl AudioClock for CpalClock {
    fn now(&self) -> f64 {
        self.frames.load(Ordering::Acquire) as f64 / self.sample_rate
    }

    fn schedule(&mut self, tone: ScheduledTone) {
        if let Err(PushError::Full(tone)) = self.tones.push(tone) {
            warn!(start = tone.start, "tone queue full, dropping tone");
        }
    }
}

impl Drop for CpalClock {
    fn drop(&mut self) {
        info!(at = self.now(), sample_rate = self.sample_rate, "audio clock closed");
    }
}

/// Audio-thread half: drains the ring, renders, advances the clock.
struct OutputRenderer {
    rx: Consumer<ScheduledTone>,
    mixer: ToneMixer,
    frames: Arc<AtomicU64>,
    channels: usize,
    render_buf: Vec<f32>,
}

impl OutputRenderer {
    fn fill(&mut self, data: &mut [f32]) {
        while let Ok(tone) = self.rx.pop() {
            // Logging here would allocate on the audio thread; a full pool just drops
            let _ = self.mixer.push(tone);
        }

        let total_frames = data.len() / self.channels;
        let mut frames_written = 0;
        let mut position = self.frames.load(Ordering::Relaxed);

        while frames_written < total_frames {
            let frames_remaining = total_frames - frames_written;
            let frames_to_render = frames_remaining.min(MAX_BLOCK_SIZE);

            let block = &mut self.render_buf[..frames_to_render];
            self.mixer.render(block, position);

            // Duplicate mono to all channels
            let out_off = frames_written * self.channels;
            for (i, &s) in block.iter().enumerate() {
                for ch in 0..self.channels {
                    data[out_off + i * self.channels + ch] = s;
                }
            }

            frames_written += frames_to_render;
            position += frames_to_render as u64;
        }

        self.frames.store(position, Ordering::Release);
    }
}
