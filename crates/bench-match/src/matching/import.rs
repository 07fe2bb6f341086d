use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

use super::directory::DirectoryError;
use super::domain::{BenchStatus, Candidate, CandidateId, Project, SkillClaim};
use super::intake::parse_iso_date;

pub const EMPLOYEES_TABLE: &str = "employees.csv";
pub const SKILLS_TABLE: &str = "skills.csv";
pub const CERTIFICATIONS_TABLE: &str = "certifications.csv";
pub const PROJECTS_TABLE: &str = "project_history.csv";
pub const BENCH_TABLE: &str = "bench_status.csv";

/// The five HR exports, one reader each.
pub struct CandidateTables<R> {
    pub employees: R,
    pub skills: R,
    pub certifications: R,
    pub projects: R,
    pub bench_status: R,
}

/// Profiles assembled from the exports. Employees that could not be turned into a
/// full profile are listed in `unavailable` with the reason.
#[derive(Debug, Default)]
pub struct CandidateImport {
    pub candidates: Vec<Candidate>,
    pub unavailable: Vec<(CandidateId, String)>,
}

#[derive(Debug, Default)]
pub struct CsvCandidateImport;

impl CsvCandidateImport {
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<CandidateImport, DirectoryError> {
        let dir = dir.as_ref();
        let tables = CandidateTables {
            employees: File::open(dir.join(EMPLOYEES_TABLE))?,
            skills: File::open(dir.join(SKILLS_TABLE))?,
            certifications: File::open(dir.join(CERTIFICATIONS_TABLE))?,
            projects: File::open(dir.join(PROJECTS_TABLE))?,
            bench_status: File::open(dir.join(BENCH_TABLE))?,
        };
        let import = Self::from_readers(tables)?;
        info!(
            dir = %dir.display(),
            candidates = import.candidates.len(),
            unavailable = import.unavailable.len(),
            "imported candidate tables"
        );
        Ok(import)
    }

    pub fn from_readers<R: Read>(
        tables: CandidateTables<R>,
    ) -> Result<CandidateImport, DirectoryError> {
        let employees: Vec<EmployeeRow> = parse_table(tables.employees)?;
        if let Some(position) = employees
            .iter()
            .position(|row| row.employee_id.is_empty())
        {
            return Err(DirectoryError::MalformedRow {
                table: EMPLOYEES_TABLE,
                reason: format!("record {} has an empty employee_id", position + 1),
            });
        }
        let employees = first_row_per_employee(employees);
        let mut skills = group_by_employee(parse_table::<SkillRow, _>(tables.skills)?);
        let mut certifications =
            group_by_employee(parse_table::<CertificationRow, _>(tables.certifications)?);
        let mut projects = group_by_employee(parse_table::<ProjectRow, _>(tables.projects)?);
        let mut bench: HashMap<String, BenchRow> = HashMap::new();
        for row in parse_table::<BenchRow, _>(tables.bench_status)? {
            match bench.entry(row.employee_id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
                Entry::Occupied(_) => warn!(
                    employee_id = %row.employee_id,
                    status = %row.status,
                    "duplicate bench status row; keeping the first"
                ),
            }
        }

        let mut import = CandidateImport::default();
        for employee in employees {
            let id = CandidateId(employee.employee_id.clone());
            let Some(bench_row) = bench.remove(&employee.employee_id) else {
                import
                    .unavailable
                    .push((id, "no bench status record".to_string()));
                continue;
            };
            let Some(bench_status) = BenchStatus::parse(&bench_row.status) else {
                import.unavailable.push((
                    id,
                    format!("unrecognised bench status '{}'", bench_row.status),
                ));
                continue;
            };

            let skill_rows = skills.remove(&employee.employee_id).unwrap_or_default();
            let cert_rows = certifications
                .remove(&employee.employee_id)
                .unwrap_or_default();
            let project_rows = projects.remove(&employee.employee_id).unwrap_or_default();

            import.candidates.push(Candidate {
                id,
                skills: skill_claims(employee.primary_skill.as_deref(), skill_rows),
                certifications: cert_rows
                    .into_iter()
                    .map(|row| row.certificate_name)
                    .filter(|name| !name.is_empty())
                    .collect(),
                projects: project_rows.into_iter().map(ProjectRow::into_project).collect(),
                bench_status,
                bench_since: bench_row.since_date(),
                name: employee.name,
                email: employee.email,
                current_role: employee.role,
                profile_version: 1,
            });
        }

        let orphans = skills.len() + certifications.len() + projects.len() + bench.len();
        if orphans > 0 {
            warn!(orphans, "ignored rows referencing unknown employees");
        }

        Ok(import)
    }
}

fn parse_table<T, R>(reader: R) -> Result<Vec<T>, DirectoryError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<T>() {
        rows.push(record?);
    }
    Ok(rows)
}

fn first_row_per_employee(rows: Vec<EmployeeRow>) -> Vec<EmployeeRow> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| {
            let first = seen.insert(row.employee_id.clone());
            if !first {
                warn!(employee_id = %row.employee_id, "duplicate employee row; keeping the first");
            }
            first
        })
        .collect()
}

trait EmployeeKeyed {
    fn employee_id(&self) -> &str;
}

fn group_by_employee<T: EmployeeKeyed>(rows: Vec<T>) -> BTreeMap<String, Vec<T>> {
    let mut grouped: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for row in rows {
        grouped
            .entry(row.employee_id().to_string())
            .or_default()
            .push(row);
    }
    grouped
}

fn skill_claims(primary: Option<&str>, rows: Vec<SkillRow>) -> Vec<SkillClaim> {
    let mut claims: Vec<SkillClaim> = rows
        .into_iter()
        .filter(|row| !row.skill_name.is_empty())
        .map(|row| match row.years_experience {
            Some(years) if years > 0.0 => {
                SkillClaim::with_evidence(row.skill_name, format!("{years} years hands-on"))
            }
            _ => SkillClaim::new(row.skill_name),
        })
        .collect();

    if let Some(primary) = primary.map(str::trim).filter(|value| !value.is_empty()) {
        let listed = claims
            .iter()
            .any(|claim| claim.label.eq_ignore_ascii_case(primary));
        if !listed {
            claims.insert(0, SkillClaim::with_evidence(primary, "primary skill"));
        }
    }
    claims
}

#[derive(Debug, Deserialize)]
struct EmployeeRow {
    employee_id: String,
    #[serde(alias = "employee_name")]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default, alias = "current_role")]
    role: String,
    #[serde(default)]
    primary_skill: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SkillRow {
    employee_id: String,
    skill_name: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    years_experience: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CertificationRow {
    employee_id: String,
    certificate_name: String,
}

#[derive(Debug, Deserialize)]
struct ProjectRow {
    employee_id: String,
    #[serde(default)]
    project_name: String,
    #[serde(default)]
    role: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    duration_years: Option<f64>,
    #[serde(default)]
    experience_summary: String,
}

impl ProjectRow {
    fn into_project(self) -> Project {
        Project {
            name: self.project_name,
            role: self.role,
            duration_years: self.duration_years.unwrap_or(0.0),
            description: self.experience_summary,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BenchRow {
    employee_id: String,
    status: String,
    #[serde(default)]
    since: Option<String>,
}

impl BenchRow {
    fn since_date(&self) -> Option<NaiveDate> {
        let raw = self.since.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
        match parse_iso_date(raw) {
            Ok(date) => Some(date),
            Err(_) => {
                warn!(employee_id = %self.employee_id, raw, "ignoring unparseable bench date");
                None
            }
        }
    }
}

impl EmployeeKeyed for SkillRow {
    fn employee_id(&self) -> &str {
        &self.employee_id
    }
}

impl EmployeeKeyed for CertificationRow {
    fn employee_id(&self) -> &str {
        &self.employee_id
    }
}

impl EmployeeKeyed for ProjectRow {
    fn employee_id(&self) -> &str {
        &self.employee_id
    }
}
