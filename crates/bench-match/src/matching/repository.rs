use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Requirement, RequirementId, RequirementStatus};
use super::scoring::RankedShortlist;

/// Stored requirement together with its latest shortlist, if one was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementRecord {
    pub requirement: Requirement,
    pub status: RequirementStatus,
    pub submitted_on: NaiveDate,
    pub shortlist: Option<RankedShortlist>,
}

impl RequirementRecord {
    pub fn top_fit_score(&self) -> Option<u8> {
        self.shortlist
            .as_ref()
            .and_then(RankedShortlist::top)
            .map(|entry| entry.overall_fit)
    }

    pub fn status_view(&self) -> RequirementStatusView {
        RequirementStatusView {
            requirement_id: self.requirement.id.clone(),
            client_name: self.requirement.client_name.clone(),
            role_title: self.requirement.role_title.clone(),
            status: self.status.label(),
            submitted_on: self.submitted_on,
            shortlisted: self
                .shortlist
                .as_ref()
                .map(|shortlist| shortlist.entries.len())
                .unwrap_or(0),
            top_candidate_fit_score: self.top_fit_score(),
        }
    }
}

/// Storage abstraction so the service can be exercised in isolation.
pub trait RequirementRepository: Send + Sync {
    fn insert(&self, record: RequirementRecord) -> Result<RequirementRecord, RepositoryError>;
    fn update(&self, record: RequirementRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &RequirementId) -> Result<Option<RequirementRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<RequirementRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Public projection of a requirement record.
#[derive(Debug, Clone, Serialize)]
pub struct RequirementStatusView {
    pub requirement_id: RequirementId,
    pub client_name: String,
    pub role_title: String,
    pub status: &'static str,
    pub submitted_on: NaiveDate,
    pub shortlisted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_candidate_fit_score: Option<u8>,
}
