use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use serde::Serialize;

use super::domain::{CandidateId, RequirementId};
use super::scoring::CandidateScore;

/// Composite cache key. A new profile version addresses a new entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScoreKey {
    pub requirement_id: RequirementId,
    pub candidate_id: CandidateId,
    pub profile_version: u64,
}

impl ScoreKey {
    fn pair(&self) -> (RequirementId, CandidateId) {
        (self.requirement_id.clone(), self.candidate_id.clone())
    }

    pub fn new(
        requirement_id: &RequirementId,
        candidate_id: &CandidateId,
        profile_version: u64,
    ) -> Self {
        Self {
            requirement_id: requirement_id.clone(),
            candidate_id: candidate_id.clone(),
            profile_version,
        }
    }
}

/// Concurrency-safe store of computed scores. Writes are first-writer-wins per key;
/// a newer profile version replaces the entry for the same requirement and candidate.
pub trait ScoreCache: Send + Sync {
    fn get(&self, key: &ScoreKey) -> Option<CandidateScore>;
    /// Store `score` unless the key is already present; returns the stored value.
    /// A score for an older profile version than the cached one is returned unstored.
    fn insert(&self, key: ScoreKey, score: CandidateScore) -> CandidateScore;
    fn invalidate_candidate(&self, candidate_id: &CandidateId) -> usize;
    fn invalidate_requirement(&self, requirement_id: &RequirementId) -> usize;
    fn stats(&self) -> CacheStats;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

struct Slot {
    profile_version: u64,
    score: CandidateScore,
}

/// One slot per (requirement, candidate): superseded profile versions are evicted.
#[derive(Default)]
pub struct InMemoryScoreCache {
    entries: RwLock<HashMap<(RequirementId, CandidateId), Slot>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl InMemoryScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn retain(&self, keep: impl Fn(&RequirementId, &CandidateId) -> bool) -> usize {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = guard.len();
        guard.retain(|(requirement_id, candidate_id), _| keep(requirement_id, candidate_id));
        before - guard.len()
    }
}

impl ScoreCache for InMemoryScoreCache {
    fn get(&self, key: &ScoreKey) -> Option<CandidateScore> {
        let found = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key.pair())
            .filter(|slot| slot.profile_version == key.profile_version)
            .map(|slot| slot.score.clone());
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    fn insert(&self, key: ScoreKey, score: CandidateScore) -> CandidateScore {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match guard.entry(key.pair()) {
            Entry::Vacant(vacant) => {
                vacant.insert(Slot {
                    profile_version: key.profile_version,
                    score: score.clone(),
                });
                score
            }
            Entry::Occupied(mut occupied) => {
                let slot = occupied.get_mut();
                if slot.profile_version == key.profile_version {
                    slot.score.clone()
                } else if slot.profile_version < key.profile_version {
                    *slot = Slot {
                        profile_version: key.profile_version,
                        score: score.clone(),
                    };
                    score
                } else {
                    score
                }
            }
        }
    }

    fn invalidate_candidate(&self, candidate_id: &CandidateId) -> usize {
        self.retain(|_, cached| cached != candidate_id)
    }

    fn invalidate_requirement(&self, requirement_id: &RequirementId) -> usize {
        self.retain(|cached, _| cached != requirement_id)
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
