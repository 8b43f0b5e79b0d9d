use crate::infra::InMemoryAllocationStore;
use chrono::Local;
use clap::Args;
use optima::config::{AllocationSettings, AppConfig};
use optima::error::AppError;
use optima::telemetry;
use optima::workflows::allocation::{
    AllocationConfig, AllocationDriver, AllocationOutcome, AllocationService, Candidate,
    CandidateSubmission, Position, PositionId, PositionSubmission,
};
use optima::workflows::roster::RosterImporter;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AllocateArgs {
    /// Candidate CSV export (id,name,marks,skills,category,location_pref,sector_pref)
    #[arg(long)]
    pub(crate) candidates: PathBuf,
    /// Position CSV export (id,company,role,...,total_positions,quota_gen..quota_ews)
    #[arg(long)]
    pub(crate) positions: PathBuf,
    /// Minimum score a candidate's best option must exceed
    #[arg(long, value_parser = crate::infra::parse_min_score)]
    pub(crate) min_score: Option<f64>,
    /// Print the raw outcome as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Minimum score a candidate's best option must exceed
    #[arg(long, value_parser = crate::infra::parse_min_score)]
    pub(crate) min_score: Option<f64>,
}

pub(crate) fn run_allocate(args: AllocateArgs) -> Result<(), AppError> {
    let AllocateArgs {
        candidates,
        positions,
        min_score,
        json,
    } = args;

    let settings = load_settings()?;
    let roster = RosterImporter::from_paths(&candidates, &positions)?;
    let config = allocation_config(min_score, &settings);
    let outcome = AllocationDriver::new(config.clone()).run(&roster.candidates, &roster.positions)?;

    if json {
        let payload = serde_json::to_string_pretty(&outcome).map_err(std::io::Error::from)?;
        println!("{payload}");
        return Ok(());
    }

    println!(
        "Allocation report generated {}",
        Local::now().format("%Y-%m-%d %H:%M")
    );
    println!(
        "- Candidates: {} | Positions: {} | Threshold: {:.2}",
        roster.candidates.len(),
        roster.positions.len(),
        config.min_score
    );
    render_outcome(&roster.candidates, &roster.positions, &outcome);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let settings = load_settings()?;
    let store = Arc::new(InMemoryAllocationStore::default());
    let service = AllocationService::new(store, allocation_config(args.min_score, &settings));

    println!("Internship allocation demo");
    for submission in demo_candidates() {
        service.register_candidate(submission)?;
    }
    for submission in demo_positions() {
        service.register_position(submission)?;
    }

    let candidates = service.candidates()?;
    let positions = service.positions()?;
    println!(
        "- Registered {} candidates across {} positions",
        candidates.len(),
        positions.len()
    );

    let report = service.run()?;
    println!(
        "- Run {} finished at {}: {}",
        report.run_id,
        report.finished_at.format("%H:%M:%S"),
        report.message()
    );

    let outcome = AllocationOutcome {
        assignments: report.assignments,
        summary: report.summary,
    };
    render_outcome(&candidates, &positions, &outcome);
    Ok(())
}

/// Environment config and logging for the offline commands, mirroring `serve`.
fn load_settings() -> Result<AllocationSettings, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config.allocation)
}

/// `--min-score` wins over `APP_MIN_SCORE`.
fn allocation_config(min_score: Option<f64>, settings: &AllocationSettings) -> AllocationConfig {
    match min_score {
        Some(min_score) => AllocationConfig {
            min_score,
            ..settings.allocation_config()
        },
        None => settings.allocation_config(),
    }
}

fn render_outcome(candidates: &[Candidate], positions: &[Position], outcome: &AllocationOutcome) {
    let names: HashMap<_, _> = candidates
        .iter()
        .map(|candidate| (&candidate.id, candidate.name.as_str()))
        .collect();
    let by_id: HashMap<&PositionId, &Position> =
        positions.iter().map(|position| (&position.id, position)).collect();

    println!(
        "\nAssignments ({} of {} candidates placed)",
        outcome.summary.candidates_assigned, outcome.summary.candidates_processed
    );
    if outcome.assignments.is_empty() {
        println!("  none");
    }
    for assignment in &outcome.assignments {
        let name = names
            .get(&assignment.candidate_id)
            .copied()
            .unwrap_or("unknown");
        let placement = by_id
            .get(&assignment.position_id)
            .map(|position| format!("{} @ {}", position.role, position.organization))
            .unwrap_or_else(|| assignment.position_id.to_string());
        println!(
            "  - {} ({}) -> {} [score {:.2}]",
            name, assignment.candidate_id, placement, assignment.score
        );
        println!("      {}", assignment.rationale);
    }

    if !outcome.summary.unassigned.is_empty() {
        println!("\nUnplaced candidates");
        for entry in &outcome.summary.unassigned {
            let name = names.get(&entry.candidate_id).copied().unwrap_or("unknown");
            println!(
                "  - {} ({}): {}",
                name,
                entry.candidate_id,
                entry.reason.summary()
            );
        }
    }

    let mut filled: HashMap<&PositionId, usize> = HashMap::new();
    for assignment in &outcome.assignments {
        *filled.entry(&assignment.position_id).or_default() += 1;
    }
    println!("\nSeat usage");
    for position in positions {
        println!(
            "  - {} {} ({}): {} of {} seats filled",
            position.organization,
            position.role,
            position.id,
            filled.get(&position.id).copied().unwrap_or(0),
            position.total_seats
        );
    }
}

fn demo_candidates() -> Vec<CandidateSubmission> {
    let rows = [
        ("Asha Rao", 91.5, "python, sql, pandas", "GEN", "Delhi", "Technology"),
        ("Bilal Khan", 88.0, "python, django", "OBC", "Delhi", "Tech"),
        ("Chitra Iyer", 84.0, "figma, illustrator", "SC", "Mumbai", "Media"),
        ("Dev Patel", 79.5, "excel, accounting", "EWS", "Pune", "Finance"),
        ("Esha Nair", 73.0, "react, css", "ST", "Bengaluru", "Tech"),
        ("Farhan Ali", 65.0, "photoshop", "GEN", "Kolkata", "Media"),
    ];

    rows.into_iter()
        .map(
            |(name, merit, skills, category, location, sector)| CandidateSubmission {
                id: None,
                name: name.to_string(),
                merit,
                skills: skills.to_string(),
                category: category.to_string(),
                location_pref: location.to_string(),
                sector_pref: sector.to_string(),
            },
        )
        .collect()
}

fn demo_positions() -> Vec<PositionSubmission> {
    let rows: [(&str, &str, &str, &str, &str, i64, &[(&str, i64)]); 3] = [
        (
            "Acme Analytics",
            "Data Intern",
            "python, sql",
            "New Delhi",
            "Tech",
            3,
            &[("GEN", 1), ("OBC", 1), ("ST", 1)],
        ),
        (
            "Globex Studios",
            "Design Intern",
            "figma, sketch",
            "Mumbai",
            "Media",
            2,
            &[("GEN", 1), ("SC", 1)],
        ),
        (
            "Initech Capital",
            "Finance Intern",
            "excel, accounting",
            "Pune",
            "Finance",
            1,
            &[("EWS", 1)],
        ),
    ];

    rows.into_iter()
        .map(
            |(organization, role, skills, location, sector, total_seats, quotas)| {
                PositionSubmission {
                    id: None,
                    organization: organization.to_string(),
                    role: role.to_string(),
                    required_skills: skills.to_string(),
                    location: location.to_string(),
                    sector: sector.to_string(),
                    total_seats,
                    reservations: quotas
                        .iter()
                        .map(|(code, seats)| (code.to_string(), *seats))
                        .collect::<BTreeMap<_, _>>(),
                }
            },
        )
        .collect()
}
