use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::matching::directory::{CandidateDirectory, DirectoryError};
use crate::matching::domain::{
    BenchStatus, Candidate, CandidateId, CertificationList, Project, Requirement, RequirementId,
    RequirementSubmission, SkillClaim,
};
use crate::matching::repository::{RepositoryError, RequirementRecord, RequirementRepository};
use crate::matching::scoring::SkillSimilarity;
use crate::matching::{InMemoryCandidateDirectory, MatchingService, ScoringConfig};

pub(super) const AWS_ARCHITECT: &str = "AWS Solutions Architect";

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn fixed_today() -> NaiveDate {
    date(2025, 2, 10)
}

pub(super) fn cloud_requirement() -> Requirement {
    Requirement {
        id: RequirementId("req-test".to_string()),
        client_name: "Northwind".to_string(),
        role_title: "Full-stack Engineer".to_string(),
        required_skills: vec!["React".to_string(), "Node.js".to_string(), "AWS".to_string()],
        minimum_years: 5,
        mandatory_certifications: vec![AWS_ARCHITECT.to_string()],
        preferred_certifications: Vec::new(),
        desired_start: date(2025, 3, 1),
        summary: "Customer portal rebuild".to_string(),
    }
}

pub(super) fn cloud_submission() -> RequirementSubmission {
    RequirementSubmission {
        client_name: "Northwind".to_string(),
        role_title: "Full-stack Engineer".to_string(),
        required_skills: vec!["React".to_string(), "Node.js".to_string(), "AWS".to_string()],
        minimum_experience: 5,
        mandatory_certifications: CertificationList::Delimited(AWS_ARCHITECT.to_string()),
        preferred_certifications: CertificationList::default(),
        availability_date: "2025-03-01".to_string(),
        summary: "Customer portal rebuild".to_string(),
    }
}

pub(super) fn project(name: &str, years: f64) -> Project {
    Project {
        name: name.to_string(),
        role: "Engineer".to_string(),
        duration_years: years,
        description: format!("{name} delivery"),
    }
}

pub(super) fn candidate(
    id: &str,
    name: &str,
    skills: Vec<SkillClaim>,
    projects: Vec<Project>,
    certifications: &[&str],
    bench_status: BenchStatus,
) -> Candidate {
    Candidate {
        id: CandidateId(id.to_string()),
        name: name.to_string(),
        email: format!("{id}@example.com"),
        current_role: "Software Engineer".to_string(),
        skills,
        projects,
        certifications: certifications.iter().map(|c| c.to_string()).collect(),
        bench_status,
        bench_since: None,
        profile_version: 1,
    }
}

/// Evidenced React, Node.js and AWS Lambda, 9 years, certified, on bench.
pub(super) fn candidate_a() -> Candidate {
    candidate(
        "cand-a",
        "Asha Rao",
        vec![
            SkillClaim::with_evidence("React", "Led the storefront rewrite"),
            SkillClaim::with_evidence("Node.js", "Built the order API"),
            SkillClaim::with_evidence("AWS Lambda", "Serverless billing jobs"),
        ],
        vec![project("Storefront", 5.0), project("Billing", 4.0)],
        &[AWS_ARCHITECT],
        BenchStatus::OnBench,
    )
}

/// Candidate A's profile without the mandatory certification.
pub(super) fn candidate_b() -> Candidate {
    let mut candidate = candidate_a();
    candidate.id = CandidateId("cand-b".to_string());
    candidate.name = "Bilal Khan".to_string();
    candidate.email = "cand-b@example.com".to_string();
    candidate.certifications.clear();
    candidate
}

/// Unevidenced React plus Python, 3 years, certified, partially allocated.
pub(super) fn candidate_c() -> Candidate {
    candidate(
        "cand-c",
        "Chen Wei",
        vec![
            SkillClaim::new("React"),
            SkillClaim::with_evidence("Python", "ETL pipelines"),
        ],
        vec![project("Analytics", 3.0)],
        &[AWS_ARCHITECT],
        BenchStatus::PartiallyAllocated,
    )
}

pub(super) fn seeded_directory() -> InMemoryCandidateDirectory {
    InMemoryCandidateDirectory::from_candidates([candidate_a(), candidate_b(), candidate_c()])
}

pub(super) struct FixedSimilarity(pub f64);

impl SkillSimilarity for FixedSimilarity {
    fn similarity(&self, _required: &str, _candidate: &str) -> f64 {
        self.0
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<HashMap<RequirementId, RequirementRecord>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, id: &RequirementId) -> Option<RequirementRecord> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
    }
}

impl RequirementRepository for MemoryRepository {
    fn insert(&self, record: RequirementRecord) -> Result<RequirementRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.requirement.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.requirement.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: RequirementRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&record.requirement.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.requirement.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &RequirementId) -> Result<Option<RequirementRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned())
    }

    fn list(&self) -> Result<Vec<RequirementRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("repository mutex poisoned")
            .values()
            .cloned()
            .collect())
    }
}

pub(super) struct ConflictRepository;

impl RequirementRepository for ConflictRepository {
    fn insert(&self, _record: RequirementRecord) -> Result<RequirementRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: RequirementRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &RequirementId) -> Result<Option<RequirementRecord>, RepositoryError> {
        Ok(None)
    }

    fn list(&self) -> Result<Vec<RequirementRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl RequirementRepository for UnavailableRepository {
    fn insert(&self, _record: RequirementRecord) -> Result<RequirementRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: RequirementRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &RequirementId) -> Result<Option<RequirementRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<RequirementRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct OfflineDirectory;

impl CandidateDirectory for OfflineDirectory {
    fn candidate_ids(&self) -> Result<Vec<CandidateId>, DirectoryError> {
        Err(DirectoryError::Unavailable("HR export not mounted".to_string()))
    }

    fn fetch(&self, _id: &CandidateId) -> Result<Candidate, DirectoryError> {
        Err(DirectoryError::Unavailable("HR export not mounted".to_string()))
    }
}

pub(super) type TestService = MatchingService<MemoryRepository, InMemoryCandidateDirectory>;

pub(super) fn build_service() -> (
    TestService,
    Arc<MemoryRepository>,
    Arc<InMemoryCandidateDirectory>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let directory = Arc::new(seeded_directory());
    let service = MatchingService::new(
        Arc::clone(&repository),
        Arc::clone(&directory),
        ScoringConfig::default(),
    )
    .with_clock(fixed_today);
    (service, repository, directory)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
