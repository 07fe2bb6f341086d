use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use super::domain::{BenchStatus, Candidate, CandidateId};
use super::import::CandidateImport;

/// Errors raised while reading candidate profiles.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("profile {candidate_id} unavailable: {reason}")]
    ProfileUnavailable {
        candidate_id: CandidateId,
        reason: String,
    },
    #[error("candidate directory unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read candidate table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid candidate CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed row in {table}: {reason}")]
    MalformedRow { table: &'static str, reason: String },
}

/// Read-only view of the candidate profile store, refreshed out of band.
pub trait CandidateDirectory: Send + Sync {
    fn candidate_ids(&self) -> Result<Vec<CandidateId>, DirectoryError>;
    fn fetch(&self, id: &CandidateId) -> Result<Candidate, DirectoryError>;

    /// Headcount per bench status over every readable profile.
    fn bench_headcount(&self) -> Result<BTreeMap<BenchStatus, usize>, DirectoryError> {
        let mut counts: BTreeMap<BenchStatus, usize> =
            BenchStatus::ordered().into_iter().map(|status| (status, 0)).collect();
        for id in self.candidate_ids()? {
            match self.fetch(&id) {
                Ok(candidate) => *counts.entry(candidate.bench_status).or_default() += 1,
                Err(DirectoryError::ProfileUnavailable { .. }) => {}
                Err(other) => return Err(other),
            }
        }
        Ok(counts)
    }
}

#[derive(Debug, Clone)]
enum DirectoryEntry {
    Available(Candidate),
    Unavailable(String),
}

/// Directory held in memory, keyed and iterated by candidate id.
#[derive(Debug, Default)]
pub struct InMemoryCandidateDirectory {
    entries: RwLock<BTreeMap<CandidateId, DirectoryEntry>>,
}

impl InMemoryCandidateDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_candidates<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Candidate>,
    {
        let directory = Self::new();
        for candidate in candidates {
            directory.upsert(candidate);
        }
        directory
    }

    pub fn from_import(import: CandidateImport) -> Self {
        let directory = Self::from_candidates(import.candidates);
        for (id, reason) in import.unavailable {
            directory.mark_unavailable(id, reason);
        }
        directory
    }

    /// Insert or replace a profile. A changed profile gets the next version number;
    /// an identical one keeps its version. Returns the stored version.
    pub fn upsert(&self, mut candidate: Candidate) -> u64 {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(DirectoryEntry::Available(existing)) = guard.get(&candidate.id) {
            candidate.profile_version = if same_profile(existing, &candidate) {
                existing.profile_version
            } else {
                existing.profile_version.max(candidate.profile_version) + 1
            };
        }
        let version = candidate.profile_version;
        guard.insert(candidate.id.clone(), DirectoryEntry::Available(candidate));
        version
    }

    pub fn mark_unavailable(&self, id: CandidateId, reason: impl Into<String>) {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        guard.insert(id, DirectoryEntry::Unavailable(reason.into()));
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
}

fn same_profile(left: &Candidate, right: &Candidate) -> bool {
    let mut right = right.clone();
    right.profile_version = left.profile_version;
    *left == right
}

impl CandidateDirectory for InMemoryCandidateDirectory {
    fn candidate_ids(&self) -> Result<Vec<CandidateId>, DirectoryError> {
        let guard = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.keys().cloned().collect())
    }

    fn fetch(&self, id: &CandidateId) -> Result<Candidate, DirectoryError> {
        let guard = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        match guard.get(id) {
            Some(DirectoryEntry::Available(candidate)) => Ok(candidate.clone()),
            Some(DirectoryEntry::Unavailable(reason)) => Err(DirectoryError::ProfileUnavailable {
                candidate_id: id.clone(),
                reason: reason.clone(),
            }),
            None => Err(DirectoryError::ProfileUnavailable {
                candidate_id: id.clone(),
                reason: "profile not found".to_string(),
            }),
        }
    }
}
