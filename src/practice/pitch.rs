use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::{
    fmt,
    time::{Duration, Instant},
};
use tracing::debug;

use crate::{
    clock::{AudioBackend, AudioClock, ToneSpec},
    dsp::midi_note_to_freq,
    error::SchedulerError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PitchNote {
    pub name: &'static str,
    pub midi: u8,
}

impl PitchNote {
    const fn new(name: &'static str, midi: u8) -> Self {
        Self { name, midi }
    }

    pub fn frequency(&self) -> f32 {
        midi_note_to_freq(self.midi)
    }
}

/// Target pool: the chromatic octave from middle C, plus a few outliers.
pub const PITCH_NOTES: [PitchNote; 16] = [
    PitchNote::new("C4", 60),
    PitchNote::new("C#4", 61),
    PitchNote::new("D4", 62),
    PitchNote::new("D#4", 63),
    PitchNote::new("E4", 64),
    PitchNote::new("F4", 65),
    PitchNote::new("F#4", 66),
    PitchNote::new("G4", 67),
    PitchNote::new("G#4", 68),
    PitchNote::new("A4", 69),
    PitchNote::new("A#4", 70),
    PitchNote::new("B4", 71),
    PitchNote::new("C3", 48),
    PitchNote::new("E3", 52),
    PitchNote::new("A3", 57),
    PitchNote::new("C5", 72),
];

/// Only the middle octave is offered as answer buttons.
pub const GUESS_CHOICES: usize = 12;

/// Answer buttons, C4 through B4.
pub fn guess_choices() -> &'static [PitchNote] {
    &PITCH_NOTES[..GUESS_CHOICES]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Wrong { answer: PitchNote },
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Correct => write!(f, "Correct!"),
            Verdict::Wrong { answer } => write!(f, "Wrong! It was {}", answer.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerStatus {
    Ready,
    Guessing,
}

/// Pause before the next round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundDelays {
    pub after_correct: Duration,
    pub after_wrong: Duration,
}

impl Default for RoundDelays {
    fn default() -> Self {
        Self {
            after_correct: Duration::from_millis(1500),
            after_wrong: Duration::from_millis(2000),
        }
    }
}

/// Ear trainer: play a random note, the student names it.
///
/// The audio clock is acquired on first playback and kept for the life of
/// the trainer.
pub struct PitchTrainer<B: AudioBackend, R = SmallRng> {
    backend: B,
    clock: Option<B::Clock>,
    rng: R,
    delays: RoundDelays,
    target: Option<PitchNote>,
    verdict: Option<Verdict>,
    next_round: Option<Instant>,
}

impl<B: AudioBackend> PitchTrainer<B, SmallRng> {
    pub fn new(backend: B, delays: RoundDelays) -> Self {
        Self::with_rng(backend, delays, SmallRng::from_os_rng())
    }
}

impl<B: AudioBackend, R: Rng> PitchTrainer<B, R> {
    pub fn with_rng(backend: B, delays: RoundDelays, rng: R) -> Self {
        Self {
            backend,
            clock: None,
            rng,
            delays,
            target: None,
            verdict: None,
            next_round: None,
        }
    }

    pub fn status(&self) -> TrainerStatus {
        if self.target.is_some() {
            TrainerStatus::Guessing
        } else {
            TrainerStatus::Ready
        }
    }

    pub fn target(&self) -> Option<PitchNote> {
        self.target
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    /// Begin a round: pick a target, clear the verdict, play the note.
    ///
    /// The round is live even if playback fails; `replay` can retry.
    pub fn start(&mut self) -> Result<PitchNote, SchedulerError> {
        let note = PITCH_NOTES[self.rng.random_range(0..PITCH_NOTES.len())];
        self.target = Some(note);
        self.verdict = None;
        self.next_round = None;
        debug!(target_note = note.name, "pitch round started");

        self.play(note)?;
        Ok(note)
    }

    /// Judge an answer by note name and schedule the next round.
    ///
    /// Ignored when no round is live or the round is already judged.
    pub fn guess(&mut self, note: PitchNote, now: Instant) -> Option<Verdict> {
        let target = self.target?;
        if self.verdict.is_some() {
            return None;
        }

        let (verdict, delay) = if note.name == target.name {
            (Verdict::Correct, self.delays.after_correct)
        } else {
            (Verdict::Wrong { answer: target }, self.delays.after_wrong)
        };
        self.verdict = Some(verdict);
        self.next_round = Some(now + delay);
        Some(verdict)
    }

    /// Start the next round once its delay has passed. Returns whether it did.
    pub fn poll(&mut self, now: Instant) -> Result<bool, SchedulerError> {
        match self.next_round {
            Some(at) if now >= at => {
                self.start()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Play the current target again.
    pub fn replay(&mut self) -> Result<(), SchedulerError> {
        match self.target {
            Some(note) => self.play(note),
            None => Ok(()),
        }
    }

    fn play(&mut self, note: PitchNote) -> Result<(), SchedulerError> {
        let clock = match self.clock.take() {
            Some(clock) => clock,
            None => self.backend.acquire()?,
        };
        let clock = self.clock.insert(clock);
        let now = clock.now();
        clock.schedule(ToneSpec::pitch(note.midi).at(now));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualBackend, ManualClock};

    fn trainer() -> (PitchTrainer<ManualBackend>, ManualClock) {
        let clock = ManualClock::new();
        let trainer = PitchTrainer::with_rng(
            ManualBackend::new(clock.clone()),
            RoundDelays::default(),
            SmallRng::seed_from_u64(3),
        );
        (trainer, clock)
    }

    fn note(name: &str) -> PitchNote {
        *PITCH_NOTES.iter().find(|n| n.name == name).unwrap()
    }

    fn other_than(target: PitchNote) -> PitchNote {
        *guess_choices().iter().find(|n| n.name != target.name).unwrap()
    }

    #[test]
    fn test_note_table() {
        assert_eq!(guess_choices().len(), 12);
        assert_eq!(guess_choices()[0].name, "C4");
        assert_eq!(guess_choices()[11].name, "B4");
        assert!((note("A4").frequency() - 440.0).abs() < 1e-3);
        assert_eq!(note("C5").midi, 72);
    }

    #[test]
    fn test_start_plays_target_with_swell() {
        let (mut trainer, clock) = trainer();
        assert_eq!(trainer.status(), TrainerStatus::Ready);

        clock.set_time(4.0);
        let target = trainer.start().unwrap();
        assert_eq!(trainer.status(), TrainerStatus::Guessing);

        let tones = clock.scheduled();
        assert_eq!(tones.len(), 1);
        assert_eq!(tones[0], ToneSpec::pitch(target.midi).at(4.0));
    }

    #[test]
    fn test_correct_guess_moves_on_after_short_pause() {
        let (mut trainer, _) = trainer();
        let t0 = Instant::now();
        let target = trainer.start().unwrap();

        assert_eq!(trainer.guess(target, t0), Some(Verdict::Correct));
        assert_eq!(trainer.verdict().unwrap().to_string(), "Correct!");

        assert!(!trainer.poll(t0 + Duration::from_millis(1499)).unwrap());
        assert!(trainer.poll(t0 + Duration::from_millis(1500)).unwrap());
        assert_eq!(trainer.verdict(), None);
    }

    #[test]
    fn test_wrong_guess_reveals_answer() {
        let (mut trainer, _) = trainer();
        let t0 = Instant::now();
        let target = trainer.start().unwrap();

        let verdict = trainer.guess(other_than(target), t0).unwrap();
        assert_eq!(verdict, Verdict::Wrong { answer: target });
        assert_eq!(verdict.to_string(), format!("Wrong! It was {}", target.name));

        assert!(!trainer.poll(t0 + Duration::from_millis(1999)).unwrap());
        assert!(trainer.poll(t0 + Duration::from_millis(2000)).unwrap());
    }

    #[test]
    fn test_guess_ignored_when_idle_or_judged() {
        let (mut trainer, _) = trainer();
        let t0 = Instant::now();
        assert_eq!(trainer.guess(note("C4"), t0), None);

        let target = trainer.start().unwrap();
        trainer.guess(target, t0);
        assert_eq!(trainer.guess(other_than(target), t0), None);
        assert_eq!(trainer.verdict(), Some(Verdict::Correct));
    }

    #[test]
    fn test_clock_acquired_once_and_replay_repeats() {
        let (mut trainer, clock) = trainer();
        let target = trainer.start().unwrap();
        clock.advance(1.0);
        trainer.replay().unwrap();

        let tones = clock.scheduled();
        assert_eq!(tones.len(), 2);
        assert_eq!(tones[1].start, 1.0);
        assert_eq!(tones[1].spec, ToneSpec::pitch(target.midi));
        assert_eq!(trainer.backend.acquisitions(), 1);
    }

    #[test]
    fn test_audio_failure_keeps_round_live() {
        let mut trainer = PitchTrainer::with_rng(
            ManualBackend::unavailable(),
            RoundDelays::default(),
            SmallRng::seed_from_u64(1),
        );
        assert!(matches!(
            trainer.start(),
            Err(SchedulerError::AudioUnavailable(_))
        ));
        assert_eq!(trainer.status(), TrainerStatus::Guessing);
    }
}
