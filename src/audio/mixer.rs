use crate::{
    clock::{ScheduledTone, ToneSpec},
    dsp::OscillatorBlock,
};

/// A tone waiting for, or in the middle of, playback.
struct ActiveTone {
    /// Absolute frame the tone begins on
    start_frame: u64,
    length_frames: u64,
    /// Whether any sample of the tone has been rendered
    started: bool,
    spec: ToneSpec,
    osc: OscillatorBlock,
}

impl ActiveTone {
    fn end_frame(&self) -> u64 {
        self.start_frame + self.length_frames
    }
}

/// Sums scheduled tones into audio blocks at frame accuracy.
///
/// Lives inside the audio callback. Tone storage is allocated once up front;
/// `push` and `render` never allocate.
pub struct ToneMixer {
    tones: Vec<ActiveTone>,
    capacity: usize,
    sample_rate: f32,
}

impl ToneMixer {
    pub fn new(sample_rate: f32, capacity: usize) -> Self {
        Self {
            tones: Vec::with_capacity(capacity),
            capacity,
            sample_rate,
        }
    }

    /// Tones pending or sounding.
    pub fn active_count(&self) -> usize {
        self.tones.len()
    }

    /// Accept a tone. Returns `false` (tone dropped) when the mixer is full.
    pub fn push(&mut self, tone: ScheduledTone) -> bool {
        if self.tones.len() >= self.capacity {
            return false;
        }

        let sr = self.sample_rate as f64;
        let start_frame = (tone.start.max(0.0) * sr).round() as u64;
        let length_frames = (tone.spec.duration.max(0.0) as f64 * sr).round() as u64;

        self.tones.push(ActiveTone {
            start_frame,
            length_frames,
            started: false,
            spec: tone.spec,
            osc: OscillatorBlock::new(tone.spec.waveform),
        });
        true
    }

    /// Render the block whose first sample is absolute frame `block_start`.
    ///
    /// `out` is overwritten and clamped to [-1, 1]. A tone whose start frame
    /// already passed before it was rendered begins at the top of this block
    /// instead of being lost. Late tones identical to one already starting
    /// there are merged into it, so a burst of owed clicks sounds once.
    pub fn render(&mut self, out: &mut [f32], block_start: u64) {
        out.fill(0.0);
        let block_end = block_start + out.len() as u64;
        let sample_rate = self.sample_rate;

        for i in 0..self.tones.len() {
            let tone = &self.tones[i];
            if tone.started || tone.start_frame >= block_start {
                continue;
            }
            let spec = tone.spec;
            let duplicate = self.tones[..i]
                .iter()
                .any(|t| !t.started && t.start_frame == block_start && t.spec == spec);

            let tone = &mut self.tones[i];
            tone.start_frame = block_start;
            if duplicate {
                // Zero length: never rendered, retired below
                tone.length_frames = 0;
            }
        }

        for tone in self.tones.iter_mut() {
            if tone.start_frame >= block_end || tone.length_frames == 0 {
                continue;
            }
            tone.started = true;

            let from = tone.start_frame.max(block_start);
            let to = tone.end_frame().min(block_end);
            for frame in from..to {
                let elapsed = (frame - tone.start_frame) as f32 / sample_rate;
                let gain = tone.spec.envelope.level(elapsed, tone.spec.duration);
                let sample = tone.osc.next_sample(tone.spec.frequency, sample_rate);
                out[(frame - block_start) as usize] += sample * gain;
            }
        }

        for sample in out.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }
        self.tones.retain(|tone| tone.end_frame() > block_end);
    }

    pub fn clear(&mut self) {
        self.tones.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 1_000.0;

    fn click() -> ToneSpec {
        // 10 frames at 1kHz
        ToneSpec {
            duration: 0.01,
            ..ToneSpec::metronome_click()
        }
    }

    #[test]
    fn test_tone_starts_on_its_exact_frame() {
        let mut mixer = ToneMixer::new(SR, 8);
        mixer.push(click().at(0.005));

        let mut block = [0.0f32; 16];
        mixer.render(&mut block, 0);

        assert!(block[..5].iter().all(|&s| s == 0.0));
        // Sine starts at zero phase; the next sample carries signal
        assert!(block[6].abs() > 0.0);
        assert!(block[15] == 0.0);
    }

    #[test]
    fn test_tone_spans_block_boundary() {
        let mut mixer = ToneMixer::new(SR, 8);
        mixer.push(click().at(0.012));

        let mut a = [0.0f32; 16];
        let mut b = [0.0f32; 16];
        mixer.render(&mut a, 0);
        assert_eq!(mixer.active_count(), 1);
        mixer.render(&mut b, 16);
        assert_eq!(mixer.active_count(), 0);

        assert!(a[13].abs() > 0.0);
        assert!(b[5].abs() > 0.0);
        assert!(b[6..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_late_tone_plays_immediately() {
        let mut mixer = ToneMixer::new(SR, 8);
        mixer.push(click().at(0.0));

        let mut block = [0.0f32; 16];
        mixer.render(&mut block, 100);
        assert!(block[1].abs() > 0.0);
        assert!(block[10..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_overlapping_tones_sum() {
        let mut solo = ToneMixer::new(SR, 8);
        solo.push(click().at(0.0));
        let mut one = [0.0f32; 10];
        solo.render(&mut one, 0);

        let mut duo = ToneMixer::new(SR, 8);
        duo.push(click().at(0.0));
        duo.push(click().at(0.0));
        let mut two = [0.0f32; 10];
        duo.render(&mut two, 0);

        for (a, b) in one.iter().zip(two.iter()) {
            assert!((a * 2.0 - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_late_burst_of_clicks_sounds_once() {
        let mut solo = ToneMixer::new(SR, 8);
        solo.push(click().at(0.0));
        let mut one = [0.0f32; 16];
        solo.render(&mut one, 100);

        // Four owed clicks after a stall, all already in the past
        let mut burst = ToneMixer::new(SR, 8);
        for start in [0.0, 0.02, 0.04, 0.06] {
            burst.push(click().at(start));
        }
        let mut block = [0.0f32; 16];
        burst.render(&mut block, 100);

        assert_eq!(block, one);
        assert_eq!(burst.active_count(), 0);
    }

    #[test]
    fn test_late_tone_of_other_kind_still_sounds() {
        let mut mixer = ToneMixer::new(SR, 8);
        mixer.push(click().at(0.0));
        mixer.push(ToneSpec::pitch(60).at(0.01));

        let mut block = [0.0f32; 16];
        mixer.render(&mut block, 100);
        // Click finished within the block, pitch tone carries on
        assert_eq!(mixer.active_count(), 1);
    }

    #[test]
    fn test_output_is_clamped() {
        let loud = ToneSpec {
            frequency: 250.0,
            ..click()
        };
        let mut mixer = ToneMixer::new(SR, 8);
        for _ in 0..8 {
            mixer.push(loud.at(0.0));
        }

        let mut block = [0.0f32; 10];
        mixer.render(&mut block, 0);
        // Eight on-time tones at 0.5 gain sum well past full scale
        assert_eq!(block[1], 1.0);
        assert!(block.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn test_full_mixer_drops_newest() {
        let mut mixer = ToneMixer::new(SR, 2);
        assert!(mixer.push(click().at(0.0)));
        assert!(mixer.push(click().at(0.1)));
        assert!(!mixer.push(click().at(0.2)));
        assert_eq!(mixer.active_count(), 2);

        mixer.clear();
        assert_eq!(mixer.active_count(), 0);
    }
}
