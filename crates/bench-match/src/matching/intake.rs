use std::collections::HashSet;

use chrono::NaiveDate;

use super::domain::{Requirement, RequirementId, RequirementSubmission};

/// Reasons a requirement submission is rejected. Surfaced to the caller, never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("invalid requirement: client name is required")]
    MissingClientName,
    #[error("invalid requirement: role title is required")]
    MissingRoleTitle,
    #[error("invalid requirement: at least one required skill must be listed")]
    NoRequiredSkills,
    #[error("invalid requirement: minimum experience must be non-negative (found {0})")]
    NegativeExperience(i64),
    #[error("invalid requirement: minimum experience {0} exceeds the supported range")]
    ExperienceOutOfRange(i64),
    #[error("invalid requirement: availability date '{0}' is not an ISO 8601 date (YYYY-MM-DD)")]
    InvalidAvailabilityDate(String),
}

/// Turns intake form payloads into immutable [`Requirement`] values.
#[derive(Debug, Clone, Default)]
pub struct RequirementIntake;

impl RequirementIntake {
    pub fn new() -> Self {
        Self
    }

    /// Validate a submission. The returned requirement carries a placeholder id;
    /// the service assigns the real one.
    pub fn requirement_from_submission(
        &self,
        submission: RequirementSubmission,
    ) -> Result<Requirement, IntakeError> {
        let client_name = submission.client_name.trim().to_string();
        if client_name.is_empty() {
            return Err(IntakeError::MissingClientName);
        }

        let role_title = submission.role_title.trim().to_string();
        if role_title.is_empty() {
            return Err(IntakeError::MissingRoleTitle);
        }

        let required_skills = dedup_labels(submission.required_skills);
        if required_skills.is_empty() {
            return Err(IntakeError::NoRequiredSkills);
        }

        if submission.minimum_experience < 0 {
            return Err(IntakeError::NegativeExperience(submission.minimum_experience));
        }
        let minimum_years = u32::try_from(submission.minimum_experience)
            .map_err(|_| IntakeError::ExperienceOutOfRange(submission.minimum_experience))?;

        let desired_start = parse_iso_date(&submission.availability_date)?;

        Ok(Requirement {
            id: RequirementId("pending".to_string()),
            client_name,
            role_title,
            required_skills,
            minimum_years,
            mandatory_certifications: dedup_labels(submission.mandatory_certifications.entries()),
            preferred_certifications: dedup_labels(submission.preferred_certifications.entries()),
            desired_start,
            summary: submission.summary.trim().to_string(),
        })
    }
}

/// Accepts `YYYY-MM-DD` and full RFC 3339 timestamps (date part kept).
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate, IntakeError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    chrono::DateTime::parse_from_rfc3339(trimmed)
        .map(|value| value.date_naive())
        .map_err(|_| IntakeError::InvalidAvailabilityDate(raw.to_string()))
}

/// Trim, drop blanks and case-insensitive duplicates while keeping first-seen order.
pub(crate) fn dedup_labels<I>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    labels
        .into_iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .filter(|label| seen.insert(label.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::domain::CertificationList;

    fn submission() -> RequirementSubmission {
        RequirementSubmission {
            client_name: "Acme Retail".to_string(),
            role_title: "Senior Full Stack Engineer".to_string(),
            required_skills: vec![
                "React".to_string(),
                " Node.js ".to_string(),
                "react".to_string(),
                "".to_string(),
                "AWS".to_string(),
            ],
            minimum_experience: 5,
            mandatory_certifications: CertificationList::Delimited(
                "AWS Solutions Architect, ,PMP".to_string(),
            ),
            preferred_certifications: CertificationList::default(),
            availability_date: "2025-11-03".to_string(),
            summary: "  Loyalty platform rebuild ".to_string(),
        }
    }

    #[test]
    fn normalizes_skills_and_certifications() {
        let requirement = RequirementIntake::new()
            .requirement_from_submission(submission())
            .expect("valid submission");

        assert_eq!(requirement.required_skills, vec!["React", "Node.js", "AWS"]);
        assert_eq!(
            requirement.mandatory_certifications,
            vec!["AWS Solutions Architect", "PMP"]
        );
        assert_eq!(requirement.minimum_years, 5);
        assert_eq!(
            requirement.desired_start,
            NaiveDate::from_ymd_opt(2025, 11, 3).expect("valid")
        );
        assert_eq!(requirement.summary, "Loyalty platform rebuild");
    }

    #[test]
    fn rejects_empty_skill_list() {
        let mut submission = submission();
        submission.required_skills = vec!["  ".to_string()];

        let err = RequirementIntake::new()
            .requirement_from_submission(submission)
            .expect_err("blank skills rejected");
        assert_eq!(err, IntakeError::NoRequiredSkills);
    }

    #[test]
    fn rejects_negative_experience() {
        let mut submission = submission();
        submission.minimum_experience = -1;

        let err = RequirementIntake::new()
            .requirement_from_submission(submission)
            .expect_err("negative years rejected");
        assert_eq!(err, IntakeError::NegativeExperience(-1));
    }

    #[test]
    fn rejects_unparseable_dates() {
        let mut submission = submission();
        submission.availability_date = "next monday".to_string();

        let err = RequirementIntake::new()
            .requirement_from_submission(submission)
            .expect_err("date rejected");
        assert!(err.to_string().contains("next monday"));
    }

    #[test]
    fn accepts_rfc3339_timestamps() {
        let date = parse_iso_date("2025-11-03T09:30:00Z").expect("timestamp parses");
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 11, 3).expect("valid"));
    }
}
