use serde::{Deserialize, Serialize};

use super::weights::clamp_percent;
use crate::matching::domain::Project;

/// Experience comparison for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceDetail {
    pub required_years: u32,
    pub candidate_years: f64,
}

impl ExperienceDetail {
    pub fn shortfall(&self) -> Option<f64> {
        let gap = f64::from(self.required_years) - self.candidate_years;
        (gap > 0.0).then_some(gap)
    }
}

/// Sub-score and total declared years. Overlapping projects are summed as declared.
pub fn evaluate(required_years: u32, projects: &[Project]) -> (u8, ExperienceDetail) {
    let candidate_years: f64 = projects
        .iter()
        .map(|project| project.duration_years)
        .filter(|years| years.is_finite() && *years > 0.0)
        .sum();

    let subscore = if required_years == 0 {
        100
    } else {
        clamp_percent(100.0 * candidate_years / f64::from(required_years.max(1)))
    };

    (
        subscore,
        ExperienceDetail {
            required_years,
            candidate_years,
        },
    )
}
