use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::cache::{CacheStats, InMemoryScoreCache, ScoreCache};
use super::dashboard::DashboardSnapshot;
use super::directory::{CandidateDirectory, DirectoryError};
use super::domain::{
    BenchStatus, Candidate, RequirementId, RequirementStatus, RequirementSubmission,
};
use super::intake::{IntakeError, RequirementIntake};
use super::repository::{RequirementRecord, RequirementRepository, RepositoryError};
use super::scoring::{
    RankedShortlist, RankingWarning, ScoringConfig, ScoringEngine, ScoringError,
};

/// Which bench states a shortlist pass may draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchEligibility {
    #[default]
    Any,
    BenchOnly,
    BenchOrPartial,
}

impl BenchEligibility {
    pub fn admits(self, status: BenchStatus) -> bool {
        match self {
            Self::Any => true,
            Self::BenchOnly => status == BenchStatus::OnBench,
            Self::BenchOrPartial => status != BenchStatus::NotOnBench,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortlistRequest {
    pub top_n: Option<usize>,
    pub eligibility: BenchEligibility,
}

/// Facade over intake, the candidate directory and the scoring engine.
pub struct MatchingService<R, D> {
    intake: RequirementIntake,
    repository: Arc<R>,
    directory: Arc<D>,
    engine: Arc<ScoringEngine>,
    cache: Arc<dyn ScoreCache>,
    clock: fn() -> NaiveDate,
}

static REQUIREMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_requirement_id() -> RequirementId {
    let id = REQUIREMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RequirementId(format!("req-{id:06}"))
}

fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

impl<R, D> MatchingService<R, D>
where
    R: RequirementRepository + 'static,
    D: CandidateDirectory + 'static,
{
    pub fn new(repository: Arc<R>, directory: Arc<D>, config: ScoringConfig) -> Self {
        Self::with_parts(
            repository,
            directory,
            ScoringEngine::new(config),
            Arc::new(InMemoryScoreCache::new()),
        )
    }

    pub fn with_parts(
        repository: Arc<R>,
        directory: Arc<D>,
        engine: ScoringEngine,
        cache: Arc<dyn ScoreCache>,
    ) -> Self {
        Self {
            intake: RequirementIntake::new(),
            repository,
            directory,
            engine: Arc::new(engine),
            cache,
            clock: today_utc,
        }
    }

    /// Override the date stamped on new submissions.
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Validate and store a new requirement.
    pub fn submit(
        &self,
        submission: RequirementSubmission,
    ) -> Result<RequirementRecord, MatchingServiceError> {
        let mut requirement = self.intake.requirement_from_submission(submission)?;
        requirement.id = next_requirement_id();

        let record = RequirementRecord {
            requirement,
            status: RequirementStatus::Submitted,
            submitted_on: (self.clock)(),
            shortlist: None,
        };

        let stored = self.repository.insert(record)?;
        info!(
            requirement_id = %stored.requirement.id,
            skills = stored.requirement.required_skills.len(),
            "requirement submitted"
        );
        Ok(stored)
    }

    /// Rank the eligible directory against a stored requirement and keep the result.
    pub fn shortlist(
        &self,
        requirement_id: &RequirementId,
        request: ShortlistRequest,
    ) -> Result<RankedShortlist, MatchingServiceError> {
        let mut record = self
            .repository
            .fetch(requirement_id)?
            .ok_or(RepositoryError::NotFound)?;

        let (pool, mut warnings) = self.eligible_pool(request.eligibility)?;
        let mut shortlist = self
            .engine
            .rank_cached(&record.requirement, &pool, self.cache.as_ref())?;
        warnings.append(&mut shortlist.warnings);
        shortlist.warnings = warnings;
        if let Some(limit) = request.top_n {
            shortlist.truncate(limit);
        }

        record.status = RequirementStatus::Matched;
        record.shortlist = Some(shortlist.clone());
        self.repository.update(record)?;

        Ok(shortlist)
    }

    pub fn get(
        &self,
        requirement_id: &RequirementId,
    ) -> Result<RequirementRecord, MatchingServiceError> {
        let record = self
            .repository
            .fetch(requirement_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn dashboard(&self) -> Result<DashboardSnapshot, MatchingServiceError> {
        let records = self.repository.list()?;
        let headcount = self.directory.bench_headcount()?;
        Ok(DashboardSnapshot::build(&records, &headcount))
    }

    fn eligible_pool(
        &self,
        eligibility: BenchEligibility,
    ) -> Result<(Vec<Candidate>, Vec<RankingWarning>), MatchingServiceError> {
        let mut pool = Vec::new();
        let mut warnings = Vec::new();
        for candidate_id in self.directory.candidate_ids()? {
            match self.directory.fetch(&candidate_id) {
                Ok(candidate) if eligibility.admits(candidate.bench_status) => {
                    pool.push(candidate)
                }
                Ok(_) => {}
                Err(DirectoryError::ProfileUnavailable {
                    candidate_id,
                    reason,
                }) => {
                    warn!(
                        candidate_id = %candidate_id,
                        reason = %reason,
                        "skipping unavailable profile"
                    );
                    warnings.push(RankingWarning::ProfileUnavailable {
                        candidate_id,
                        reason,
                    });
                }
                Err(other) => return Err(other.into()),
            }
        }
        Ok((pool, warnings))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MatchingServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl MatchingServiceError {
    /// True when the caller sent a requirement that cannot be scored.
    pub fn is_invalid_requirement(&self) -> bool {
        matches!(
            self,
            Self::Intake(_) | Self::Scoring(ScoringError::InvalidRequirement(_))
        )
    }
}
