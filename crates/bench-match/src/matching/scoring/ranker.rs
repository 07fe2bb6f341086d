use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::CertificationGatePolicy;
use super::{CandidateScore, ScoreBreakdown, ScoringEngine, ScoringError};
use crate::matching::cache::{ScoreCache, ScoreKey};
use crate::matching::domain::{Candidate, CandidateId, Requirement, RequirementId};
use crate::matching::intake::IntakeError;

/// Candidate dropped by the mandatory-certification gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedCandidate {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub missing_certifications: Vec<String>,
}

/// Non-fatal notices attached to a ranking pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RankingWarning {
    EmptyCandidatePool,
    ProfileUnavailable {
        candidate_id: CandidateId,
        reason: String,
    },
    DuplicateCandidate {
        candidate_id: CandidateId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedShortlist {
    pub requirement_id: RequirementId,
    pub entries: Vec<ScoreBreakdown>,
    pub excluded: Vec<ExcludedCandidate>,
    pub warnings: Vec<RankingWarning>,
}

impl RankedShortlist {
    pub fn top(&self) -> Option<&ScoreBreakdown> {
        self.entries.first()
    }

    /// Keep the first `limit` entries; ranks are unchanged.
    pub fn truncate(&mut self, limit: usize) {
        self.entries.truncate(limit);
    }
}

pub(crate) fn rank_candidates(
    engine: &ScoringEngine,
    requirement: &Requirement,
    candidates: &[Candidate],
    cache: Option<&dyn ScoreCache>,
) -> Result<RankedShortlist, ScoringError> {
    if requirement
        .required_skills
        .iter()
        .all(|skill| skill.trim().is_empty())
    {
        return Err(ScoringError::InvalidRequirement(IntakeError::NoRequiredSkills));
    }

    let mut warnings = Vec::new();
    if candidates.is_empty() {
        info!(requirement_id = %requirement.id, "empty candidate pool; nothing to rank");
        warnings.push(RankingWarning::EmptyCandidatePool);
        return Ok(RankedShortlist {
            requirement_id: requirement.id.clone(),
            entries: Vec::new(),
            excluded: Vec::new(),
            warnings,
        });
    }

    let mut seen = HashSet::new();
    let mut pool: Vec<&Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if seen.insert(&candidate.id) {
            pool.push(candidate);
        } else {
            warn!(
                candidate_id = %candidate.id,
                "duplicate candidate in pool; keeping first profile"
            );
            warnings.push(RankingWarning::DuplicateCandidate {
                candidate_id: candidate.id.clone(),
            });
        }
    }

    let scores = score_pool(engine, requirement, &pool, cache);

    let policy = engine.config().gate_policy;
    let mut excluded = Vec::new();
    let mut ranked: Vec<CandidateScore> = Vec::with_capacity(scores.len());
    for score in scores {
        if score.gate_failed && policy == CertificationGatePolicy::Exclude {
            debug!(
                requirement_id = %requirement.id,
                candidate_id = %score.candidate_id,
                missing = ?score.missing_certifications,
                "candidate excluded by certification gate"
            );
            excluded.push(ExcludedCandidate {
                candidate_id: score.candidate_id,
                candidate_name: score.candidate_name,
                missing_certifications: score.missing_certifications,
            });
        } else {
            ranked.push(score);
        }
    }

    ranked.sort_by(|left, right| {
        right
            .overall_fit
            .cmp(&left.overall_fit)
            .then_with(|| left.candidate_id.cmp(&right.candidate_id))
    });

    let entries: Vec<ScoreBreakdown> = ranked
        .into_iter()
        .enumerate()
        .map(|(index, score)| ScoreBreakdown::from_score(score, index + 1))
        .collect();

    info!(
        requirement_id = %requirement.id,
        pool = pool.len(),
        ranked = entries.len(),
        excluded = excluded.len(),
        "ranking complete"
    );

    Ok(RankedShortlist {
        requirement_id: requirement.id.clone(),
        entries,
        excluded,
        warnings,
    })
}

fn score_pool(
    engine: &ScoringEngine,
    requirement: &Requirement,
    pool: &[&Candidate],
    cache: Option<&dyn ScoreCache>,
) -> Vec<CandidateScore> {
    let score_one = |candidate: &Candidate| -> CandidateScore {
        let Some(cache) = cache else {
            return engine.score(requirement, candidate);
        };
        let key = ScoreKey::new(&requirement.id, &candidate.id, candidate.profile_version);
        if let Some(hit) = cache.get(&key) {
            debug!(candidate_id = %candidate.id, "score cache hit");
            return hit;
        }
        debug!(candidate_id = %candidate.id, "score cache miss");
        cache.insert(key, engine.score(requirement, candidate))
    };

    let workers = engine.config().workers().min(pool.len());
    if workers <= 1 {
        return pool.iter().map(|candidate| score_one(*candidate)).collect();
    }

    let chunk_size = pool.len().div_ceil(workers);
    std::thread::scope(|scope| {
        let handles: Vec<_> = pool
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|candidate| score_one(*candidate))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    })
}
