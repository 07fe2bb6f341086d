use crate::infra::{load_directory, InMemoryRequirementRepository};
use bench_match::config::AppConfig;
use bench_match::error::AppError;
use bench_match::matching::{
    BenchEligibility, BenchStatus, Candidate, CandidateId, CertificationGatePolicy,
    CertificationList, DashboardSnapshot, MatchingService, Project, RankedShortlist,
    RankingWarning, RequirementRecord, RequirementSubmission, ScoringConfig, ShortlistRequest,
    SkillClaim,
};
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Keep candidates missing a mandatory certification in the ranking instead of excluding them
    #[arg(long)]
    pub(crate) penalize_gate: bool,
    /// Limit the shortlist to the top N candidates
    #[arg(long)]
    pub(crate) top_n: Option<usize>,
}

#[derive(Args, Debug)]
pub(crate) struct ShortlistArgs {
    /// Directory with employees.csv, skills.csv, certifications.csv, project_history.csv
    /// and bench_status.csv. Falls back to BENCH_DATA_DIR, then to the sample bench.
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Required skills, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub(crate) skills: Vec<String>,
    /// Minimum years of experience
    #[arg(long)]
    pub(crate) min_years: i64,
    /// Mandatory certifications, comma separated
    #[arg(long, default_value = "")]
    pub(crate) certs: String,
    /// Preferred certifications, comma separated
    #[arg(long, default_value = "")]
    pub(crate) preferred_certs: String,
    /// Desired start date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start: NaiveDate,
    #[arg(long, default_value = "Ad-hoc search")]
    pub(crate) client: String,
    #[arg(long, default_value = "Bench search")]
    pub(crate) role: String,
    /// Limit the shortlist to the top N candidates
    #[arg(long)]
    pub(crate) top_n: Option<usize>,
    /// Only consider candidates fully on the bench
    #[arg(long)]
    pub(crate) bench_only: bool,
    /// Also admit partially allocated candidates
    #[arg(long)]
    pub(crate) allow_partial: bool,
    /// Print the shortlist as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl ShortlistArgs {
    fn submission(&self) -> RequirementSubmission {
        RequirementSubmission {
            client_name: self.client.clone(),
            role_title: self.role.clone(),
            required_skills: self.skills.clone(),
            minimum_experience: self.min_years,
            mandatory_certifications: CertificationList::Delimited(self.certs.clone()),
            preferred_certifications: CertificationList::Delimited(self.preferred_certs.clone()),
            availability_date: self.start.format("%Y-%m-%d").to_string(),
            summary: String::new(),
        }
    }

    fn request(&self) -> ShortlistRequest {
        let eligibility = if self.allow_partial {
            BenchEligibility::BenchOrPartial
        } else if self.bench_only {
            BenchEligibility::BenchOnly
        } else {
            BenchEligibility::Any
        };
        ShortlistRequest {
            top_n: self.top_n,
            eligibility,
        }
    }
}

pub(crate) fn run_shortlist(args: ShortlistArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| config.matching.bench_data_dir.clone());
    let directory = Arc::new(load_directory(data_dir.as_deref())?);
    let service = MatchingService::new(
        Arc::new(InMemoryRequirementRepository::default()),
        directory,
        config.matching.scoring,
    );

    let record = service.submit(args.submission())?;
    let shortlist = service.shortlist(&record.requirement.id, args.request())?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&shortlist).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        render_shortlist(&record, &shortlist);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        penalize_gate,
        top_n,
    } = args;

    let config = ScoringConfig {
        gate_policy: if penalize_gate {
            CertificationGatePolicy::Penalize
        } else {
            CertificationGatePolicy::Exclude
        },
        ..ScoringConfig::default()
    };
    let service = MatchingService::new(
        Arc::new(InMemoryRequirementRepository::default()),
        Arc::new(load_directory(None)?),
        config,
    );

    println!("Bench match demo");
    let submission = sample_submission();
    println!(
        "Requirement: {} for {} ({} yrs min, skills: {})",
        submission.role_title,
        submission.client_name,
        submission.minimum_experience,
        submission.required_skills.join(", ")
    );

    let record = service.submit(submission)?;
    let shortlist = service.shortlist(
        &record.requirement.id,
        ShortlistRequest {
            top_n,
            eligibility: BenchEligibility::Any,
        },
    )?;
    render_shortlist(&record, &shortlist);

    let mut follow_up = sample_submission();
    follow_up.role_title = "Data Platform Engineer".to_string();
    follow_up.required_skills = vec!["Python".to_string(), "Azure".to_string()];
    follow_up.mandatory_certifications = CertificationList::default();
    service.submit(follow_up)?;

    render_dashboard(&service.dashboard()?);
    Ok(())
}

pub(crate) fn render_shortlist(record: &RequirementRecord, shortlist: &RankedShortlist) {
    let requirement = &record.requirement;
    println!(
        "\nShortlist for {} ({}, {})",
        requirement.id, requirement.role_title, requirement.client_name
    );
    if shortlist.entries.is_empty() {
        println!("  No candidates ranked");
    }
    for entry in &shortlist.entries {
        println!(
            "  #{} {:<12} fit {:>3}%  skills {} | experience {} | availability {} \
             | certifications {}  [{}]",
            entry.rank,
            entry.candidate_name,
            entry.overall_fit,
            entry.skill_match,
            entry.experience,
            entry.availability,
            entry.certifications,
            entry.bench_status.label()
        );
        println!("     {}", entry.rationale);
        for strength in &entry.strengths {
            println!("     + {strength}");
        }
        for gap in &entry.gaps {
            println!("     - {gap}");
        }
    }

    if !shortlist.excluded.is_empty() {
        println!("  Excluded by certification gate:");
        for excluded in &shortlist.excluded {
            println!(
                "    - {}: missing {}",
                excluded.candidate_name,
                excluded.missing_certifications.join(", ")
            );
        }
    }

    if !shortlist.warnings.is_empty() {
        println!("  Warnings:");
        for warning in &shortlist.warnings {
            println!("    - {}", describe_warning(warning));
        }
    }
}

fn describe_warning(warning: &RankingWarning) -> String {
    match warning {
        RankingWarning::EmptyCandidatePool => "no eligible candidates in the pool".to_string(),
        RankingWarning::ProfileUnavailable {
            candidate_id,
            reason,
        } => format!("{candidate_id} skipped: {reason}"),
        RankingWarning::DuplicateCandidate { candidate_id } => {
            format!("{candidate_id} listed more than once; first profile used")
        }
    }
}

pub(crate) fn render_dashboard(snapshot: &DashboardSnapshot) {
    let kpis = &snapshot.kpis;
    println!("\nDashboard");
    println!(
        "  Open requirements: {} | Matched: {} | Avg top fit: {} | On bench: {}",
        kpis.open_requirements,
        kpis.matched_requirements,
        kpis.average_top_fit_score
            .map(|score| format!("{score}%"))
            .unwrap_or_else(|| "n/a".to_string()),
        kpis.bench_headcount
    );
    for row in &snapshot.bench {
        println!("  {:<10} {}", row.label, row.count);
    }
    if !snapshot.match_history.is_empty() {
        println!("  Match history:");
        for item in &snapshot.match_history {
            println!(
                "    {} {:<28} {:<12} {}",
                item.requirement_id,
                item.role_title,
                item.status,
                item.top_candidate_fit_score
                    .map(|score| format!("{score}%"))
                    .unwrap_or_else(|| "-".to_string())
            );
        }
    }
    if !snapshot.skill_gaps.is_empty() {
        println!("  Skill gaps:");
        for gap in &snapshot.skill_gaps {
            println!("    {:<16} {}", gap.skill, gap.missing_count);
        }
    }
}

pub(crate) fn sample_submission() -> RequirementSubmission {
    RequirementSubmission {
        client_name: "Global Retail Corp".to_string(),
        role_title: "Senior Full Stack Engineer".to_string(),
        required_skills: vec![
            "React".to_string(),
            "Node.js".to_string(),
            "AWS".to_string(),
            "PostgreSQL".to_string(),
        ],
        minimum_experience: 5,
        mandatory_certifications: CertificationList::Delimited(
            "AWS Solutions Architect".to_string(),
        ),
        preferred_certifications: CertificationList::Delimited("Azure DP-203".to_string()),
        availability_date: "2026-01-10".to_string(),
        summary: "Greenfield loyalty platform rebuild, high-traffic customer engagement system."
            .to_string(),
    }
}

fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn project(name: &str, role: &str, years: f64, description: &str) -> Project {
    Project {
        name: name.to_string(),
        role: role.to_string(),
        duration_years: years,
        description: description.to_string(),
    }
}

/// Sample bench used when no HR exports are configured.
pub(crate) fn sample_bench() -> Vec<Candidate> {
    vec![
        Candidate {
            id: CandidateId("c1".to_string()),
            name: "Ravi".to_string(),
            email: "ravi@insightglobal.com".to_string(),
            current_role: "Senior Full Stack Engineer".to_string(),
            skills: vec![
                SkillClaim::with_evidence("React", "Retail storefront rebuild"),
                SkillClaim::with_evidence("Node.js", "Loyalty engine APIs"),
                SkillClaim::with_evidence("AWS", "Led serverless migrations"),
                SkillClaim::new("PostgreSQL"),
                SkillClaim::with_evidence("Kafka", "Event-driven order pipeline"),
            ],
            projects: vec![
                project("Retail Platform", "Tech Lead", 4.0, "Large-scale retail storefront"),
                project("Loyalty Engine", "Senior Engineer", 3.0, "Points and rewards service"),
                project("Serverless Migration", "Senior Engineer", 2.0, "Batch jobs to AWS Lambda"),
            ],
            certifications: vec![
                "AWS Solutions Architect".to_string(),
                "Scrum Master (PSM I)".to_string(),
            ],
            bench_status: BenchStatus::OnBench,
            bench_since: date(2025, 12, 1),
            profile_version: 1,
        },
        Candidate {
            id: CandidateId("c2".to_string()),
            name: "Ram".to_string(),
            email: "ram@insightglobal.com".to_string(),
            current_role: "Senior Software Engineer".to_string(),
            skills: vec![
                SkillClaim::with_evidence("Node.js", "Payments API design"),
                SkillClaim::with_evidence("AWS", "High-volume transaction systems"),
                SkillClaim::new("React"),
                SkillClaim::with_evidence("Microservices", "Loyalty and payments"),
            ],
            projects: vec![
                project("Payments API", "Senior Engineer", 4.0, "Fintech payment rails"),
                project("Loyalty Points", "Engineer", 3.0, "E-commerce loyalty services"),
            ],
            certifications: vec![
                "AWS Solutions Architect".to_string(),
                "AWS Developer Associate".to_string(),
            ],
            bench_status: BenchStatus::PartiallyAllocated,
            bench_since: None,
            profile_version: 1,
        },
        Candidate {
            id: CandidateId("c3".to_string()),
            name: "Sreekanth".to_string(),
            email: "sreekanth@insightglobal.com".to_string(),
            current_role: "Full Stack Engineer".to_string(),
            skills: vec![
                SkillClaim::with_evidence("React", "Customer portals"),
                SkillClaim::with_evidence("TypeScript", "Analytics dashboards"),
                SkillClaim::with_evidence("PostgreSQL", "Reporting schemas"),
            ],
            projects: vec![
                project("Customer Portal", "Engineer", 3.5, "Self-service portal"),
                project("Analytics Dashboard", "Engineer", 2.5, "Operational dashboards"),
            ],
            certifications: vec!["Azure Developer Associate".to_string()],
            bench_status: BenchStatus::NotOnBench,
            bench_since: None,
            profile_version: 1,
        },
        Candidate {
            id: CandidateId("c4".to_string()),
            name: "Priya".to_string(),
            email: "priya@insightglobal.com".to_string(),
            current_role: "Data Engineer".to_string(),
            skills: vec![
                SkillClaim::with_evidence("Python", "Ingestion pipelines"),
                SkillClaim::with_evidence("Azure", "Data lake platform"),
                SkillClaim::new("PostgreSQL"),
            ],
            projects: vec![project("Data Lake", "Data Engineer", 3.0, "Azure ingestion")],
            certifications: vec!["Azure DP-203".to_string()],
            bench_status: BenchStatus::OnBench,
            bench_since: date(2025, 11, 15),
            profile_version: 1,
        },
    ]
}
