use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::weights::clamp_percent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationRow {
    pub name: String,
    pub required: bool,
    pub held: bool,
}

/// Outcome of the certification gate for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificationCheck {
    pub subscore: u8,
    pub gate_failed: bool,
    /// Mandatory certifications not held, in requirement order.
    pub missing: Vec<String>,
    pub preferred_held: Vec<String>,
    pub rows: Vec<CertificationRow>,
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Names compare case-insensitively after trimming.
pub fn check(mandatory: &[String], optional: &[String], held: &[String]) -> CertificationCheck {
    let held_keys: HashSet<String> = held.iter().map(|name| key(name)).collect();
    let is_held = |name: &String| held_keys.contains(&key(name));

    let missing: Vec<String> = mandatory
        .iter()
        .filter(|name| !is_held(name))
        .cloned()
        .collect();
    let held_mandatory = mandatory.len() - missing.len();

    let subscore = if mandatory.is_empty() {
        100
    } else {
        clamp_percent(100.0 * held_mandatory as f64 / mandatory.len().max(1) as f64)
    };

    let preferred_held: Vec<String> = optional
        .iter()
        .filter(|name| is_held(name))
        .cloned()
        .collect();

    let mut listed: HashSet<String> = HashSet::new();
    let mut rows = Vec::new();
    for name in mandatory {
        if listed.insert(key(name)) {
            rows.push(CertificationRow {
                name: name.clone(),
                required: true,
                held: is_held(name),
            });
        }
    }
    for name in optional.iter().chain(held.iter()) {
        if listed.insert(key(name)) {
            rows.push(CertificationRow {
                name: name.clone(),
                required: false,
                held: is_held(name),
            });
        }
    }

    CertificationCheck {
        subscore,
        gate_failed: !missing.is_empty(),
        missing,
        preferred_held,
        rows,
    }
}
