//! Aptitude evolution: folds one challenge outcome into a developer's 0–1000 aptitude.
//!
//! First-order exponential moving average:
//! `updated = current * weights.current + normalized * weights.new`, where
//! `normalized` is the outcome scaled onto the aptitude domain. This is the
//! only place aptitude is updated after the initial extraction seed.

use serde::{Deserialize, Serialize};

use crate::scoring::normalize::{clamp_int, clamp_round};

pub const APTITUDE_MIN: i32 = 0;
pub const APTITUDE_MAX: i32 = 1000;

/// One graded challenge attempt. Consumed once by `evolve_aptitude`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeOutcome {
    pub raw_score: i32,
    pub max_score: i32,
}

impl ChallengeOutcome {
    pub fn new(raw_score: i32, max_score: i32) -> Self {
        Self {
            raw_score,
            max_score,
        }
    }

    /// Outcome projected onto [0, 1000]. A non-positive `max_score` scores 0;
    /// raw scores outside `[0, max_score]` are bounded first.
    pub fn normalized(&self) -> f64 {
        if self.max_score <= 0 {
            return 0.0;
        }
        let raw = clamp_int(self.raw_score as i64, 0, self.max_score as i64);
        (raw as f64 / self.max_score as f64) * APTITUDE_MAX as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AptitudeWeights {
    pub current: f64,
    pub new: f64,
}

impl Default for AptitudeWeights {
    fn default() -> Self {
        Self {
            current: 0.8,
            new: 0.2,
        }
    }
}

/// Returns the developer's next aptitude, always within [0, 1000].
pub fn evolve_aptitude(current: i32, outcome: ChallengeOutcome, weights: AptitudeWeights) -> i32 {
    let current = clamp_int(current as i64, APTITUDE_MIN as i64, APTITUDE_MAX as i64) as f64;
    let updated = current * weights.current + outcome.normalized() * weights.new;
    clamp_round(updated, APTITUDE_MIN, APTITUDE_MAX)
}

/// Seeds aptitude from an extraction result.
pub fn seed_aptitude(value: i64) -> i32 {
    clamp_int(value, APTITUDE_MIN as i64, APTITUDE_MAX as i64) as i32
}
