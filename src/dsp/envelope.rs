#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
One-Shot Tone Envelopes
=======================

Every sound this crate makes is a fixed-length tone: it starts at a scheduled
clock time, lasts `duration` seconds and is gone. There is no gate and no
sustain stage, so the envelope is a pure function of the time elapsed since
the tone started:

    level = envelope.level(t, duration)      0 <= t < duration

Outside that interval the level is 0.0, which is what lets the mixer retire a
tone without a release phase.


Exponential decay (metronome click)
-----------------------------------

  Level
   peak ┐╲
        │ ╲
        │  ╲_
        │    ╲__
  floor └───────╲___──→ Time
        0           duration

    level(t) = peak · (floor / peak)^(t / duration)

Starts at `peak` and lands exactly on `floor` at the end. A floor well above
zero is required: an exponential can never reach 0.


Attack / release ramp (pitch trainer tone)
------------------------------------------

  Level
   peak ┐   ╱╲
        │  ╱  ╲___
        │ ╱       ╲___
    0.0 └╱────────────╲──→ Time
        0  attack     duration

Linear ramp 0 → peak over `attack` seconds, then linear ramp peak → 0 over the
rest of the tone. Both segments are straight lines, so the tone never clicks
at either end.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToneEnvelope {
    /// Exponential decay from `peak` to `floor` across the tone.
    Exponential { peak: f32, floor: f32 },
    /// Linear rise to `peak` over `attack` seconds, linear fall to zero at the end.
    AttackRelease { peak: f32, attack: f32 },
}

impl ToneEnvelope {
    /// Gain at `t` seconds into a tone lasting `duration` seconds.
    #[inline]
    pub fn level(&self, t: f32, duration: f32) -> f32 {
        if t < 0.0 || t >= duration || duration <= 0.0 {
            return 0.0;
        }

        match *self {
            ToneEnvelope::Exponential { peak, floor } => {
                if peak <= 0.0 || floor <= 0.0 {
                    return 0.0;
                }
                peak * (floor / peak).powf(t / duration)
            }
            ToneEnvelope::AttackRelease { peak, attack } => {
                let attack = attack.clamp(0.0, duration);
                if t < attack {
                    peak * t / attack
                } else {
                    let release = duration - attack;
                    if release <= 0.0 {
                        return 0.0;
                    }
                    peak * (1.0 - (t - attack) / release)
                }
            }
        }
    }

    pub fn peak(&self) -> f32 {
        match *self {
            ToneEnvelope::Exponential { peak, .. } | ToneEnvelope::AttackRelease { peak, .. } => {
                peak
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLICK: ToneEnvelope = ToneEnvelope::Exponential {
        peak: 0.5,
        floor: 0.0001,
    };
    const SWELL: ToneEnvelope = ToneEnvelope::AttackRelease {
        peak: 0.2,
        attack: 0.1,
    };

    #[test]
    fn test_exponential_decays_from_peak_toward_floor() {
        assert!((CLICK.level(0.0, 0.05) - 0.5).abs() < 1e-6);

        let near_end = CLICK.level(0.049_999, 0.05);
        assert!(near_end < 0.0002);

        // Monotonic decay
        let mut prev = f32::MAX;
        for i in 0..50 {
            let level = CLICK.level(i as f32 * 0.001, 0.05);
            assert!(level < prev);
            prev = level;
        }
    }

    #[test]
    fn test_attack_release_shape() {
        assert_eq!(SWELL.level(0.0, 1.0), 0.0);
        assert!((SWELL.level(0.05, 1.0) - 0.1).abs() < 1e-6);
        assert!((SWELL.level(0.1, 1.0) - 0.2).abs() < 1e-6);
        assert!((SWELL.level(0.55, 1.0) - 0.1).abs() < 1e-6);
        assert!(SWELL.level(0.999, 1.0) < 0.001);
    }

    #[test]
    fn test_silent_outside_tone() {
        assert_eq!(CLICK.level(-0.001, 0.05), 0.0);
        assert_eq!(CLICK.level(0.05, 0.05), 0.0);
        assert_eq!(SWELL.level(1.5, 1.0), 0.0);
    }
}
