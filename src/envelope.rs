//! Attack / hold / decay opacity envelopes.
//!
//! A particle's alpha is a piecewise-linear function of its age in ticks:
//!
//! ```text
//! alpha
//!   hold ┤      ┌──────┐
//!        │     ╱        ╲
//!        │    ╱          ╲
//!   init ┼───┘            └─── last
//!        0  attack  +hold  +decay   age
//! ```
//!
//! Once the full duration has elapsed the envelope reports itself expired.
//! Expiry is informational: particles are only removed by the
//! [`LifecycleGate`](crate::lifecycle::LifecycleGate).

use serde::{Deserialize, Serialize};

/// Envelope parameters, in ticks and alpha levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    /// Ramp-up duration.
    pub attack: u32,
    /// Plateau duration.
    pub hold: u32,
    /// Ramp-down duration.
    pub decay: u32,
    /// Alpha at age 0.
    pub init_value: f32,
    /// Plateau alpha.
    pub hold_value: f32,
    /// Alpha once decay completes.
    pub last_value: f32,
}

/// Result of sampling an envelope at a given age.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeSample {
    pub alpha: f32,
    pub expired: bool,
}

impl Envelope {
    /// Total duration in ticks.
    #[inline]
    pub fn duration(&self) -> u32 {
        self.attack.saturating_add(self.hold).saturating_add(self.decay)
    }

    /// Copy of this envelope with a different plateau level.
    pub fn with_hold_value(mut self, hold_value: f32) -> Self {
        self.hold_value = hold_value;
        self
    }

    /// Alpha and expiry for a particle of the given age.
    pub fn sample(&self, age: u32) -> EnvelopeSample {
        let hold_end = self.attack.saturating_add(self.hold);

        if age >= self.duration() {
            return EnvelopeSample {
                alpha: self.last_value,
                expired: true,
            };
        }

        let alpha = if age < self.attack {
            lerp(self.init_value, self.hold_value, age as f32 / self.attack as f32)
        } else if age < hold_end {
            self.hold_value
        } else {
            lerp(
                self.hold_value,
                self.last_value,
                (age - hold_end) as f32 / self.decay as f32,
            )
        };

        EnvelopeSample {
            alpha,
            expired: false,
        }
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            attack: 50,
            hold: 50,
            decay: 100,
            init_value: 0.0,
            hold_value: 1.0,
            last_value: 0.0,
        }
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_default_profile_checkpoints() {
        let env = Envelope::default();

        assert!(close(env.sample(0).alpha, 0.0));
        assert!(close(env.sample(25).alpha, 0.5));
        assert!(close(env.sample(50).alpha, 1.0));
        assert!(close(env.sample(75).alpha, 1.0));
        assert!(close(env.sample(100).alpha, 1.0));
        assert!(close(env.sample(150).alpha, 0.5));
        assert!(close(env.sample(199).alpha, 0.01));
        assert!(close(env.sample(200).alpha, 0.0));
    }

    #[test]
    fn test_expiry_only_at_full_duration() {
        let env = Envelope::default();
        assert_eq!(env.duration(), 200);

        for age in 0..200 {
            assert!(!env.sample(age).expired, "expired early at age {age}");
        }
        assert!(env.sample(200).expired);
        assert!(env.sample(10_000).expired);
    }

    #[test]
    fn test_decay_is_monotonic() {
        let env = Envelope::default();
        let mut last = env.sample(100).alpha;
        for age in 101..=200 {
            let a = env.sample(age).alpha;
            assert!(a <= last);
            last = a;
        }
    }

    #[test]
    fn test_zero_length_phases() {
        let env = Envelope {
            attack: 0,
            hold: 10,
            decay: 0,
            init_value: 0.0,
            hold_value: 0.8,
            last_value: 0.2,
        };

        assert!(close(env.sample(0).alpha, 0.8));
        assert!(close(env.sample(9).alpha, 0.8));
        let end = env.sample(10);
        assert!(end.expired);
        assert!(close(end.alpha, 0.2));
    }

    #[test]
    fn test_with_hold_value() {
        let env = Envelope::default().with_hold_value(0.6);
        assert!(close(env.sample(60).alpha, 0.6));
    }
}
