use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strsim::normalized_damerau_levenshtein;

use super::normalizer::{canonical_label, canonical_tokens};
use super::weights::clamp_percent;
use crate::matching::domain::SkillClaim;

const FUZZY_TOKEN_SIMILARITY: f64 = 0.88;
const FUZZY_TOKEN_MIN_LEN: usize = 4;

/// Pluggable similarity between a required skill and a candidate skill label, in `[0, 1]`.
pub trait SkillSimilarity: Send + Sync {
    fn similarity(&self, required: &str, candidate: &str) -> f64;
}

/// Alias-aware token overlap, weighted towards covering the required tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenOverlapSimilarity;

impl TokenOverlapSimilarity {
    fn tokens_match(left: &str, right: &str) -> bool {
        if left == right {
            return true;
        }
        left.chars().count() >= FUZZY_TOKEN_MIN_LEN
            && right.chars().count() >= FUZZY_TOKEN_MIN_LEN
            && normalized_damerau_levenshtein(left, right) >= FUZZY_TOKEN_SIMILARITY
    }

    fn covered(source: &BTreeSet<String>, target: &BTreeSet<String>) -> usize {
        source
            .iter()
            .filter(|token| target.iter().any(|other| Self::tokens_match(token, other)))
            .count()
    }
}

impl SkillSimilarity for TokenOverlapSimilarity {
    fn similarity(&self, required: &str, candidate: &str) -> f64 {
        if canonical_label(required) == canonical_label(candidate) {
            return 1.0;
        }

        let required_tokens = canonical_tokens(required);
        let candidate_tokens = canonical_tokens(candidate);
        if required_tokens.is_empty() || candidate_tokens.is_empty() {
            return 0.0;
        }

        let recall =
            Self::covered(&required_tokens, &candidate_tokens) as f64
                / required_tokens.len() as f64;
        let precision = Self::covered(&candidate_tokens, &required_tokens) as f64
            / candidate_tokens.len() as f64;

        (2.0 * recall + precision) / 3.0
    }
}

/// Confidence band shown next to each skill row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrength {
    Strong,
    Moderate,
    Weak,
    Gap,
}

impl MatchStrength {
    pub fn from_confidence(confidence: u8) -> Self {
        match confidence {
            0 => Self::Gap,
            1..=59 => Self::Weak,
            60..=84 => Self::Moderate,
            _ => Self::Strong,
        }
    }
}

/// Best match found for one required skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMatchRow {
    pub required_skill: String,
    pub candidate_skill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    pub confidence: u8,
    pub strength: MatchStrength,
}

impl SkillMatchRow {
    fn gap(required_skill: &str) -> Self {
        Self {
            required_skill: required_skill.to_string(),
            candidate_skill: None,
            evidence: None,
            confidence: 0,
            strength: MatchStrength::Gap,
        }
    }

    pub fn is_gap(&self) -> bool {
        self.strength == MatchStrength::Gap
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillMatchSummary {
    pub rows: Vec<SkillMatchRow>,
    pub subscore: u8,
}

/// Compares required skills against a candidate's skill claims.
#[derive(Clone)]
pub struct SkillMatcher {
    similarity: Arc<dyn SkillSimilarity>,
    threshold: u8,
    unevidenced_factor: f64,
}

impl SkillMatcher {
    pub fn new(
        similarity: Arc<dyn SkillSimilarity>,
        threshold: u8,
        unevidenced_factor: f64,
    ) -> Self {
        Self {
            similarity,
            threshold,
            unevidenced_factor,
        }
    }

    fn confidence(&self, required: &str, claim: &SkillClaim) -> u8 {
        let raw = self.similarity.similarity(required, &claim.label);
        let raw = if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 0.0 };
        let factor = if claim.has_evidence() {
            1.0
        } else {
            self.unevidenced_factor
        };
        clamp_percent(raw * factor * 100.0)
    }

    /// One row per required skill, in requirement order.
    pub fn match_skills(
        &self,
        required: &[String],
        candidate: &[SkillClaim],
    ) -> Vec<SkillMatchRow> {
        required
            .iter()
            .map(|skill| self.best_row(skill, candidate))
            .collect()
    }

    /// Rows plus the aggregate sub-score (mean confidence, rounded to nearest).
    pub fn summarize(&self, required: &[String], candidate: &[SkillClaim]) -> SkillMatchSummary {
        let rows = self.match_skills(required, candidate);
        let subscore = aggregate(&rows);
        SkillMatchSummary { rows, subscore }
    }

    fn best_row(&self, required: &str, candidate: &[SkillClaim]) -> SkillMatchRow {
        let mut best: Option<(u8, &SkillClaim)> = None;
        for claim in candidate {
            let confidence = self.confidence(required, claim);
            best = match best {
                None => Some((confidence, claim)),
                Some((current, current_claim)) => {
                    if confidence > current
                        || (confidence == current && tie_key(claim) < tie_key(current_claim))
                    {
                        Some((confidence, claim))
                    } else {
                        Some((current, current_claim))
                    }
                }
            };
        }

        match best {
            Some((confidence, claim)) if confidence > self.threshold => SkillMatchRow {
                required_skill: required.to_string(),
                candidate_skill: Some(claim.label.clone()),
                evidence: claim.evidence.clone().filter(|value| !value.trim().is_empty()),
                confidence,
                strength: MatchStrength::from_confidence(confidence),
            },
            _ => SkillMatchRow::gap(required),
        }
    }
}

/// Case-insensitive label order, raw label as the last resort.
fn tie_key(claim: &SkillClaim) -> (String, &str) {
    (claim.label.to_lowercase(), claim.label.as_str())
}

/// Mean confidence. No required skills means nothing was matched.
fn aggregate(rows: &[SkillMatchRow]) -> u8 {
    if rows.is_empty() {
        return 0;
    }
    let total: u32 = rows.iter().map(|row| u32::from(row.confidence)).sum();
    clamp_percent(f64::from(total) / rows.len() as f64)
}
