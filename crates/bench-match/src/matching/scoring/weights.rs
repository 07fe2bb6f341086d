use serde::Serialize;

/// Composite weights for the overall fit score. Fixed; must sum to 1.0.
pub const FIT_WEIGHTS: Weights = Weights {
    skill_match: 0.60,
    experience: 0.20,
    availability: 0.10,
    certifications: 0.10,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weights {
    pub skill_match: f64,
    pub experience: f64,
    pub availability: f64,
    pub certifications: f64,
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.skill_match + self.experience + self.availability + self.certifications
    }

    /// Weighted composite rounded to the nearest integer and bounded to 0-100.
    pub fn composite(
        &self,
        skill_match: u8,
        experience: u8,
        availability: u8,
        certifications: u8,
    ) -> u8 {
        let total = self.skill_match * f64::from(skill_match)
            + self.experience * f64::from(experience)
            + self.availability * f64::from(availability)
            + self.certifications * f64::from(certifications);
        clamp_percent(total)
    }
}

/// Round half away from zero and clamp into `[0, 100]`.
pub(crate) fn clamp_percent(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}
