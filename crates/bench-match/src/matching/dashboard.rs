use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{BenchStatus, RequirementId, RequirementStatus};
use super::repository::RequirementRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub kpis: DashboardKpis,
    pub match_history: Vec<MatchHistoryItem>,
    pub skill_gaps: Vec<SkillGapItem>,
    pub bench: Vec<BenchHeadcount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardKpis {
    pub open_requirements: usize,
    pub matched_requirements: usize,
    pub average_top_fit_score: Option<u8>,
    pub bench_headcount: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchHistoryItem {
    pub requirement_id: RequirementId,
    pub role_title: String,
    pub submitted_on: NaiveDate,
    pub status: &'static str,
    pub top_candidate_fit_score: Option<u8>,
}

/// How many shortlisted candidates lack a required skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillGapItem {
    pub skill: String,
    pub missing_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchHeadcount {
    pub status: BenchStatus,
    pub label: &'static str,
    pub count: usize,
}

impl DashboardSnapshot {
    pub fn build(
        records: &[RequirementRecord],
        headcount: &BTreeMap<BenchStatus, usize>,
    ) -> Self {
        let matched: Vec<&RequirementRecord> = records
            .iter()
            .filter(|record| record.status == RequirementStatus::Matched)
            .collect();

        let top_scores: Vec<u32> = matched
            .iter()
            .filter_map(|record| record.top_fit_score())
            .map(u32::from)
            .collect();
        let average_top_fit_score = if top_scores.is_empty() {
            None
        } else {
            let total: u32 = top_scores.iter().sum();
            let count = top_scores.len() as u32;
            Some(((total + count / 2) / count) as u8)
        };

        let bench = BenchStatus::ordered()
            .into_iter()
            .map(|status| BenchHeadcount {
                status,
                label: status.label(),
                count: headcount.get(&status).copied().unwrap_or(0),
            })
            .collect();

        let kpis = DashboardKpis {
            open_requirements: records.len() - matched.len(),
            matched_requirements: matched.len(),
            average_top_fit_score,
            bench_headcount: headcount.get(&BenchStatus::OnBench).copied().unwrap_or(0),
        };

        Self {
            kpis,
            match_history: match_history(records),
            skill_gaps: skill_gaps(&matched),
            bench,
        }
    }
}

fn match_history(records: &[RequirementRecord]) -> Vec<MatchHistoryItem> {
    let mut history: Vec<MatchHistoryItem> = records
        .iter()
        .map(|record| MatchHistoryItem {
            requirement_id: record.requirement.id.clone(),
            role_title: record.requirement.role_title.clone(),
            submitted_on: record.submitted_on,
            status: record.status.label(),
            top_candidate_fit_score: record.top_fit_score(),
        })
        .collect();
    // newest first
    history.sort_by(|left, right| {
        right
            .submitted_on
            .cmp(&left.submitted_on)
            .then_with(|| right.requirement_id.cmp(&left.requirement_id))
    });
    history
}

fn skill_gaps(matched: &[&RequirementRecord]) -> Vec<SkillGapItem> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut display: BTreeMap<String, String> = BTreeMap::new();

    for shortlist in matched.iter().filter_map(|record| record.shortlist.as_ref()) {
        for entry in &shortlist.entries {
            for row in entry.skill_rows.iter().filter(|row| row.is_gap()) {
                let key = row.required_skill.to_lowercase();
                display
                    .entry(key.clone())
                    .or_insert_with(|| row.required_skill.clone());
                *counts.entry(key).or_default() += 1;
            }
        }
    }

    let mut gaps: Vec<SkillGapItem> = counts
        .into_iter()
        .map(|(key, missing_count)| SkillGapItem {
            skill: display.remove(&key).unwrap_or(key),
            missing_count,
        })
        .collect();
    gaps.sort_by(|left, right| {
        right
            .missing_count
            .cmp(&left.missing_count)
            .then_with(|| left.skill.to_lowercase().cmp(&right.skill.to_lowercase()))
    });
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dashboard_has_no_average_and_zeroed_bench() {
        let snapshot = DashboardSnapshot::build(&[], &BTreeMap::new());
        assert_eq!(snapshot.kpis.open_requirements, 0);
        assert_eq!(snapshot.kpis.average_top_fit_score, None);
        assert_eq!(snapshot.bench.len(), 3);
        assert!(snapshot.bench.iter().all(|row| row.count == 0));
        assert_eq!(snapshot.bench[0].label, "Bench");
    }

    #[test]
    fn bench_headcount_kpi_counts_only_full_bench() {
        let headcount = BTreeMap::from([
            (BenchStatus::OnBench, 4),
            (BenchStatus::PartiallyAllocated, 2),
        ]);
        let snapshot = DashboardSnapshot::build(&[], &headcount);
        assert_eq!(snapshot.kpis.bench_headcount, 4);
        assert_eq!(snapshot.bench[1].count, 2);
        assert_eq!(snapshot.bench[2].count, 0);
    }
}
