use chrono::NaiveDate;

use super::availability::days_late;
use super::certifications::CertificationCheck;
use super::experience::ExperienceDetail;
use super::skills::{MatchStrength, SkillMatchSummary};
use super::weights::FIT_WEIGHTS;
use super::CandidateScore;
use crate::matching::domain::BenchStatus;

const RATIONALE_CONTRIBUTORS: usize = 2;
const RATIONALE_GAPS: usize = 2;

pub(crate) struct RationaleInputs<'a> {
    pub skills: &'a SkillMatchSummary,
    pub experience: &'a ExperienceDetail,
    pub certifications: &'a CertificationCheck,
    pub bench_status: BenchStatus,
    pub bench_since: Option<NaiveDate>,
    pub desired_start: NaiveDate,
}

pub(crate) fn strengths(inputs: &RationaleInputs<'_>) -> Vec<String> {
    let mut strengths = Vec::new();

    for row in &inputs.skills.rows {
        if row.strength != MatchStrength::Strong {
            continue;
        }
        let matched = row.candidate_skill.as_deref().unwrap_or(&row.required_skill);
        strengths.push(match &row.evidence {
            Some(evidence) => format!(
                "Strong {} match via {} ({}%): {}",
                row.required_skill, matched, row.confidence, evidence
            ),
            None => format!(
                "Strong {} match via {} ({}%)",
                row.required_skill, matched, row.confidence
            ),
        });
    }

    let experience = inputs.experience;
    if experience.candidate_years > 0.0 && experience.shortfall().is_none() {
        if experience.required_years == 0 {
            strengths.push(format!(
                "{:.1} years of project experience",
                experience.candidate_years
            ));
        } else {
            strengths.push(format!(
                "{:.1} years of project experience against {} required",
                experience.candidate_years, experience.required_years
            ));
        }
    }

    let certifications = inputs.certifications;
    let mandatory_held: Vec<&str> = certifications
        .rows
        .iter()
        .filter(|row| row.required && row.held)
        .map(|row| row.name.as_str())
        .collect();
    if !certifications.gate_failed && !mandatory_held.is_empty() {
        strengths.push(format!(
            "Holds all mandatory certifications ({})",
            mandatory_held.join(", ")
        ));
    }
    for name in &certifications.preferred_held {
        strengths.push(format!("Holds preferred certification {name}"));
    }

    if inputs.bench_status == BenchStatus::OnBench {
        match inputs.bench_since {
            Some(since) if since <= inputs.desired_start => {
                strengths.push(format!("On bench since {since}"))
            }
            Some(_) => {}
            None => strengths.push("Currently on bench".to_string()),
        }
    }

    strengths
}

/// Gaps ordered by severity: hard gate first, then skills, experience, availability.
pub(crate) fn gaps(inputs: &RationaleInputs<'_>) -> Vec<String> {
    let mut gaps: Vec<String> = inputs
        .certifications
        .missing
        .iter()
        .map(|name| format!("Missing mandatory certification {name}"))
        .collect();

    for row in &inputs.skills.rows {
        match row.strength {
            MatchStrength::Gap => {
                gaps.push(format!("No evidence of required skill {}", row.required_skill))
            }
            MatchStrength::Weak => gaps.push(format!(
                "Limited {} match ({}%)",
                row.required_skill, row.confidence
            )),
            MatchStrength::Moderate | MatchStrength::Strong => {}
        }
    }

    if let Some(shortfall) = inputs.experience.shortfall() {
        gaps.push(format!(
            "{:.1} of {} required years of experience ({:.1} short)",
            inputs.experience.candidate_years, inputs.experience.required_years, shortfall
        ));
    }

    match inputs.bench_status {
        BenchStatus::OnBench => {}
        BenchStatus::PartiallyAllocated => {
            gaps.push("Partially allocated; reduced availability".to_string())
        }
        BenchStatus::NotOnBench => gaps.push("Not on bench; currently allocated".to_string()),
    }

    if let (Some(since), Some(days)) = (
        inputs.bench_since,
        days_late(inputs.bench_since, inputs.desired_start),
    ) {
        gaps.push(format!(
            "Available from {since}, {days} day(s) after the desired start {}",
            inputs.desired_start
        ));
    }

    gaps
}

/// Deterministic rationale from the sub-scores and the leading gaps.
pub(crate) fn compose(score: &CandidateScore, rank: usize) -> String {
    let mut contributions = [
        (
            "skill match",
            FIT_WEIGHTS.skill_match * f64::from(score.skill_match),
            score.skill_match,
        ),
        (
            "experience",
            FIT_WEIGHTS.experience * f64::from(score.experience),
            score.experience,
        ),
        (
            "availability",
            FIT_WEIGHTS.availability * f64::from(score.availability),
            score.availability,
        ),
        (
            "certifications",
            FIT_WEIGHTS.certifications * f64::from(score.certifications),
            score.certifications,
        ),
    ];
    contributions.sort_by(|left, right| right.1.total_cmp(&left.1));

    let leaders: Vec<String> = contributions
        .iter()
        .filter(|(_, contribution, _)| *contribution > 0.0)
        .take(RATIONALE_CONTRIBUTORS)
        .map(|(label, _, value)| format!("{label} ({value}%)"))
        .collect();

    let mut rationale = format!(
        "{} ranks #{} with an overall fit of {}%",
        score.candidate_name, rank, score.overall_fit
    );
    if !leaders.is_empty() {
        rationale.push_str(", led by ");
        rationale.push_str(&leaders.join(" and "));
    }
    rationale.push('.');

    if score.gaps.is_empty() {
        rationale.push_str(" No material gaps identified.");
    } else {
        let leading_gaps: Vec<&str> = score
            .gaps
            .iter()
            .take(RATIONALE_GAPS)
            .map(String::as_str)
            .collect();
        rationale.push_str(" Gaps: ");
        rationale.push_str(&leading_gaps.join("; "));
        rationale.push('.');
    }

    if score.gate_failed {
        rationale.push_str(" Mandatory certification gate not met.");
    }

    rationale
}
