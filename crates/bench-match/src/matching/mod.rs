//! Requirement intake, fit scoring, ranking and the service surface around them.
//!
//! `scoring` is pure and synchronous; everything else adapts it to storage,
//! candidate sources and HTTP.

pub mod cache;
pub mod dashboard;
pub mod directory;
pub mod domain;
pub mod import;
pub mod intake;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use cache::{CacheStats, InMemoryScoreCache, ScoreCache, ScoreKey};
pub use dashboard::{
    BenchHeadcount, DashboardKpis, DashboardSnapshot, MatchHistoryItem, SkillGapItem,
};
pub use directory::{CandidateDirectory, DirectoryError, InMemoryCandidateDirectory};
pub use domain::{
    BenchStatus, Candidate, CandidateId, CertificationList, Project, Requirement, RequirementId,
    RequirementStatus, RequirementSubmission, SkillClaim,
};
pub use import::{CandidateImport, CandidateTables, CsvCandidateImport};
pub use intake::{IntakeError, RequirementIntake};
pub use repository::{
    RepositoryError, RequirementRecord, RequirementRepository, RequirementStatusView,
};
pub use router::matching_router;
pub use scoring::{
    AvailabilityPolicy, CandidateScore, CertificationGatePolicy, ExcludedCandidate,
    MatchStrength, RankedShortlist, RankingWarning, ScoreBreakdown, ScoringConfig, ScoringEngine,
    ScoringError, SkillMatchRow, SkillSimilarity, TokenOverlapSimilarity,
};
pub use service::{BenchEligibility, MatchingService, MatchingServiceError, ShortlistRequest};
