use bench_match::error::AppError;
use bench_match::matching::intake::parse_iso_date;
use bench_match::matching::{
    CsvCandidateImport, InMemoryCandidateDirectory, RepositoryError, RequirementId,
    RequirementRecord, RequirementRepository,
};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRequirementRepository {
    records: Arc<Mutex<HashMap<RequirementId, RequirementRecord>>>,
}

impl InMemoryRequirementRepository {
    fn lock(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<RequirementId, RequirementRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("requirement store poisoned".to_string()))
    }
}

impl RequirementRepository for InMemoryRequirementRepository {
    fn insert(&self, record: RequirementRecord) -> Result<RequirementRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.requirement.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.requirement.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: RequirementRecord) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.requirement.id) {
            guard.insert(record.requirement.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &RequirementId) -> Result<Option<RequirementRecord>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<RequirementRecord>, RepositoryError> {
        let mut records: Vec<RequirementRecord> = self.lock()?.values().cloned().collect();
        records.sort_by(|left, right| left.requirement.id.cmp(&right.requirement.id));
        Ok(records)
    }
}

/// Candidate directory from CSV exports when a directory is given, else the sample bench.
pub(crate) fn load_directory(
    data_dir: Option<&Path>,
) -> Result<InMemoryCandidateDirectory, AppError> {
    match data_dir {
        Some(dir) => {
            let import = CsvCandidateImport::from_dir(dir)?;
            for (candidate_id, reason) in &import.unavailable {
                warn!(%candidate_id, %reason, "candidate held as unavailable");
            }
            Ok(InMemoryCandidateDirectory::from_import(import))
        }
        None => {
            info!("no candidate data directory configured; using the sample bench");
            Ok(InMemoryCandidateDirectory::from_candidates(crate::demo::sample_bench()))
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_iso_date(raw).map_err(|err| err.to_string())
}
