use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted requirements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequirementId(pub String);

/// Identifier wrapper for candidate profiles. Ordering doubles as the ranking tie-break.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl std::fmt::Display for RequirementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Certification names as typed into the intake form: either one comma-delimited
/// string or an explicit list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CertificationList {
    Delimited(String),
    List(Vec<String>),
}

impl Default for CertificationList {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl CertificationList {
    /// Raw entries before trimming and de-duplication.
    pub fn entries(&self) -> Vec<String> {
        match self {
            Self::Delimited(raw) => raw.split(',').map(str::to_string).collect(),
            Self::List(items) => items.clone(),
        }
    }
}

/// Requirement intake payload, prior to validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementSubmission {
    pub client_name: String,
    pub role_title: String,
    pub required_skills: Vec<String>,
    pub minimum_experience: i64,
    #[serde(default)]
    pub mandatory_certifications: CertificationList,
    #[serde(default)]
    pub preferred_certifications: CertificationList,
    pub availability_date: String,
    #[serde(default)]
    pub summary: String,
}

/// Validated requirement. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: RequirementId,
    pub client_name: String,
    pub role_title: String,
    pub required_skills: Vec<String>,
    pub minimum_years: u32,
    pub mandatory_certifications: Vec<String>,
    pub preferred_certifications: Vec<String>,
    pub desired_start: NaiveDate,
    pub summary: String,
}

/// A declared or inferred skill, with optional supporting evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillClaim {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

impl SkillClaim {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            evidence: None,
        }
    }

    pub fn with_evidence(label: impl Into<String>, evidence: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            evidence: Some(evidence.into()),
        }
    }

    pub fn has_evidence(&self) -> bool {
        self.evidence
            .as_deref()
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Past project entry. Durations are summed as declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub role: String,
    pub duration_years: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchStatus {
    OnBench,
    PartiallyAllocated,
    NotOnBench,
}

impl BenchStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::OnBench, Self::PartiallyAllocated, Self::NotOnBench]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OnBench => "Bench",
            Self::PartiallyAllocated => "Partial",
            Self::NotOnBench => "Not Bench",
        }
    }

    /// Parse the labels used by the staffing and HR exports.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "bench" | "onbench" | "inactive" => Some(Self::OnBench),
            "partial" | "partiallyallocated" | "partialbench" => Some(Self::PartiallyAllocated),
            "notbench" | "notonbench" | "active" | "allocated" => Some(Self::NotOnBench),
            _ => None,
        }
    }
}

/// Candidate profile as read from the directory. Treated as immutable during a pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub current_role: String,
    pub skills: Vec<SkillClaim>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub certifications: Vec<String>,
    pub bench_status: BenchStatus,
    #[serde(default)]
    pub bench_since: Option<NaiveDate>,
    #[serde(default = "initial_profile_version")]
    pub profile_version: u64,
}

fn initial_profile_version() -> u64 {
    1
}

/// Lifecycle of a requirement inside the matching service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    Submitted,
    Matched,
}

impl RequirementStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RequirementStatus::Submitted => "In Progress",
            RequirementStatus::Matched => "Matched",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bench_status_parses_export_labels() {
        assert_eq!(BenchStatus::parse("Bench"), Some(BenchStatus::OnBench));
        assert_eq!(BenchStatus::parse("inactive"), Some(BenchStatus::OnBench));
        assert_eq!(
            BenchStatus::parse("Partial"),
            Some(BenchStatus::PartiallyAllocated)
        );
        assert_eq!(
            BenchStatus::parse("Not Bench"),
            Some(BenchStatus::NotOnBench)
        );
        assert_eq!(
            BenchStatus::parse("partially_allocated"),
            Some(BenchStatus::PartiallyAllocated)
        );
        assert_eq!(BenchStatus::parse("sabbatical"), None);
    }

    #[test]
    fn certification_list_accepts_delimited_and_list_payloads() {
        let delimited: CertificationList =
            serde_json::from_str("\"AWS Solutions Architect, PMP\"").expect("string form");
        assert_eq!(
            delimited.entries(),
            vec!["AWS Solutions Architect".to_string(), " PMP".to_string()]
        );

        let list: CertificationList =
            serde_json::from_str("[\"CKA\", \"CKAD\"]").expect("list form");
        assert_eq!(list.entries(), vec!["CKA".to_string(), "CKAD".to_string()]);
    }

    #[test]
    fn evidence_requires_non_blank_text() {
        assert!(SkillClaim::with_evidence("React", "5 yrs").has_evidence());
        assert!(!SkillClaim::with_evidence("React", "  ").has_evidence());
        assert!(!SkillClaim::new("React").has_evidence());
    }
}
