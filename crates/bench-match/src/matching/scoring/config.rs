use serde::{Deserialize, Serialize};

use super::weights::{Weights, FIT_WEIGHTS};

/// Minimum confidence a best match must exceed before it counts as a match.
pub const DEFAULT_SKILL_THRESHOLD: u8 = 30;
/// Confidence multiplier for skills declared without supporting evidence.
pub const DEFAULT_UNEVIDENCED_FACTOR: f64 = 0.9;
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// What happens to candidates missing a mandatory certification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificationGatePolicy {
    /// Drop the candidate from the ranked list and report it as excluded.
    #[default]
    Exclude,
    /// Keep the candidate, flagged with `gate_failed`, scored by its certification sub-score.
    Penalize,
}

/// How bench dates influence the availability sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AvailabilityPolicy {
    /// Base score by bench status only.
    #[default]
    StatusOnly,
    /// Linear penalty when the candidate frees up after the desired start date.
    DateAdjusted { max_penalty: u8, horizon_days: u32 },
}

impl AvailabilityPolicy {
    pub const fn date_adjusted() -> Self {
        Self::DateAdjusted {
            max_penalty: 30,
            horizon_days: 30,
        }
    }
}

/// Dials of the scoring engine. Composite weights are fixed and live in `weights`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub skill_threshold: u8,
    pub unevidenced_skill_factor: f64,
    pub gate_policy: CertificationGatePolicy,
    pub availability_policy: AvailabilityPolicy,
    pub worker_count: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            skill_threshold: DEFAULT_SKILL_THRESHOLD,
            unevidenced_skill_factor: DEFAULT_UNEVIDENCED_FACTOR,
            gate_policy: CertificationGatePolicy::default(),
            availability_policy: AvailabilityPolicy::default(),
            worker_count: DEFAULT_WORKER_COUNT,
        }
    }
}

impl ScoringConfig {
    pub const fn weights(&self) -> Weights {
        FIT_WEIGHTS
    }

    /// Factor applied to unevidenced skills, kept within `[0, 1]`.
    pub(crate) fn sanitized_unevidenced_factor(&self) -> f64 {
        if self.unevidenced_skill_factor.is_finite() {
            self.unevidenced_skill_factor.clamp(0.0, 1.0)
        } else {
            DEFAULT_UNEVIDENCED_FACTOR
        }
    }

    pub(crate) fn workers(&self) -> usize {
        self.worker_count.max(1)
    }
}
