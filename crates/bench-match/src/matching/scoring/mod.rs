mod availability;
mod certifications;
mod config;
mod experience;
mod normalizer;
mod ranker;
mod rationale;
mod skills;
mod weights;

pub use certifications::CertificationRow;
pub use config::{AvailabilityPolicy, CertificationGatePolicy, ScoringConfig};
pub use experience::ExperienceDetail;
pub use normalizer::{canonical_label, canonical_tokens};
pub use ranker::{ExcludedCandidate, RankedShortlist, RankingWarning};
pub use skills::{
    MatchStrength, SkillMatchRow, SkillMatcher, SkillSimilarity, TokenOverlapSimilarity,
};
pub use weights::{Weights, FIT_WEIGHTS};

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cache::ScoreCache;
use super::domain::{BenchStatus, Candidate, CandidateId, Requirement};
use super::intake::IntakeError;
use rationale::RationaleInputs;

/// Pure per-candidate result, cached per (requirement, candidate, profile version).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub profile_version: u64,
    pub skill_match: u8,
    pub experience: u8,
    pub availability: u8,
    pub certifications: u8,
    pub overall_fit: u8,
    pub gate_failed: bool,
    pub missing_certifications: Vec<String>,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub skill_rows: Vec<SkillMatchRow>,
    pub experience_detail: ExperienceDetail,
    pub certification_rows: Vec<CertificationRow>,
    pub bench_status: BenchStatus,
    pub bench_since: Option<NaiveDate>,
}

/// Ranked, explained score for one candidate against one requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub rank: usize,
    pub overall_fit: u8,
    pub skill_match: u8,
    pub experience: u8,
    pub availability: u8,
    pub certifications: u8,
    pub gate_failed: bool,
    pub rationale: String,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub skill_rows: Vec<SkillMatchRow>,
    pub experience_detail: ExperienceDetail,
    pub certification_rows: Vec<CertificationRow>,
    pub missing_certifications: Vec<String>,
    pub bench_status: BenchStatus,
    pub bench_since: Option<NaiveDate>,
    pub profile_version: u64,
}

impl ScoreBreakdown {
    pub(crate) fn from_score(score: CandidateScore, rank: usize) -> Self {
        let rationale = rationale::compose(&score, rank);
        Self {
            candidate_id: score.candidate_id,
            candidate_name: score.candidate_name,
            rank,
            overall_fit: score.overall_fit,
            skill_match: score.skill_match,
            experience: score.experience,
            availability: score.availability,
            certifications: score.certifications,
            gate_failed: score.gate_failed,
            rationale,
            strengths: score.strengths,
            gaps: score.gaps,
            skill_rows: score.skill_rows,
            experience_detail: score.experience_detail,
            certification_rows: score.certification_rows,
            missing_certifications: score.missing_certifications,
            bench_status: score.bench_status,
            bench_since: score.bench_since,
            profile_version: score.profile_version,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    InvalidRequirement(#[from] IntakeError),
}

/// Stateless engine combining the four evaluators into a composite fit score.
#[derive(Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
    matcher: SkillMatcher,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self::with_similarity(config, Arc::new(TokenOverlapSimilarity))
    }

    pub fn with_similarity(config: ScoringConfig, similarity: Arc<dyn SkillSimilarity>) -> Self {
        let matcher = SkillMatcher::new(
            similarity,
            config.skill_threshold,
            config.sanitized_unevidenced_factor(),
        );
        Self { config, matcher }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one candidate. Pure: identical inputs give identical output.
    pub fn score(&self, requirement: &Requirement, candidate: &Candidate) -> CandidateScore {
        let skills = self
            .matcher
            .summarize(&requirement.required_skills, &candidate.skills);
        let (experience, experience_detail) =
            experience::evaluate(requirement.minimum_years, &candidate.projects);
        let certification_check = certifications::check(
            &requirement.mandatory_certifications,
            &requirement.preferred_certifications,
            &candidate.certifications,
        );
        let availability = availability::evaluate(
            candidate.bench_status,
            candidate.bench_since,
            requirement.desired_start,
            self.config.availability_policy,
        );

        let overall_fit = self.config.weights().composite(
            skills.subscore,
            experience,
            availability,
            certification_check.subscore,
        );

        let inputs = RationaleInputs {
            skills: &skills,
            experience: &experience_detail,
            certifications: &certification_check,
            bench_status: candidate.bench_status,
            bench_since: candidate.bench_since,
            desired_start: requirement.desired_start,
        };
        let strengths = rationale::strengths(&inputs);
        let gaps = rationale::gaps(&inputs);

        CandidateScore {
            candidate_id: candidate.id.clone(),
            candidate_name: candidate.name.clone(),
            profile_version: candidate.profile_version,
            skill_match: skills.subscore,
            experience,
            availability,
            certifications: certification_check.subscore,
            overall_fit,
            gate_failed: certification_check.gate_failed,
            missing_certifications: certification_check.missing,
            strengths,
            gaps,
            skill_rows: skills.rows,
            experience_detail,
            certification_rows: certification_check.rows,
            bench_status: candidate.bench_status,
            bench_since: candidate.bench_since,
        }
    }

    /// Rank every candidate in the pool against the requirement.
    pub fn rank(
        &self,
        requirement: &Requirement,
        candidates: &[Candidate],
    ) -> Result<RankedShortlist, ScoringError> {
        ranker::rank_candidates(self, requirement, candidates, None)
    }

    /// As [`ScoringEngine::rank`], reusing and filling `cache`.
    pub fn rank_cached(
        &self,
        requirement: &Requirement,
        candidates: &[Candidate],
        cache: &dyn ScoreCache,
    ) -> Result<RankedShortlist, ScoringError> {
        ranker::rank_candidates(self, requirement, candidates, Some(cache))
    }
}
