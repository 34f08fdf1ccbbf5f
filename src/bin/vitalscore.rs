//! Vitalscore CLI - Command-line interface for the scoring engine
//!
//! Commands:
//! - score: Compute a user's health score from a dataset file
//! - validate: Check a dataset for invariant violations
//! - brackets: Print the fixed age-bracket table

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use vitalscore::store::{validate_dataset, DatasetIssue};
use vitalscore::{
    resolve_age_bracket, Dataset, MemoryRecordStore, ScoreEngine, ScoreError, AGE_BRACKETS,
    ENGINE_VERSION,
};

/// Vitalscore - score aggregation engine for daily personal-health metrics
#[derive(Parser)]
#[command(name = "vitalscore")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Compute cohort-normalized health scores", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a user's health score from a dataset file
    Score {
        /// Dataset file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// User to score
        #[arg(short, long)]
        user: String,

        /// Recency weight base
        #[arg(long, default_value = "2")]
        base: u32,

        /// Emit the full score report instead of just the score
        #[arg(long)]
        report: bool,
    },

    /// Check a dataset for invariant violations
    Validate {
        /// Dataset file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the fixed age-bracket table
    Brackets {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), VitalscoreCliError> {
    match cli.command {
        Commands::Score {
            input,
            user,
            base,
            report,
        } => cmd_score(&input, &user, base, report),
        Commands::Validate { input, json } => cmd_validate(&input, json),
        Commands::Brackets { json } => cmd_brackets(json),
    }
}

fn read_input(input: &PathBuf) -> Result<String, VitalscoreCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn cmd_score(
    input: &PathBuf,
    user: &str,
    base: u32,
    report: bool,
) -> Result<(), VitalscoreCliError> {
    let store = MemoryRecordStore::from_json(&read_input(input)?)?;
    let engine = ScoreEngine::with_weight_base(base);

    if report {
        let score_report = engine.compute_health_report(&store, user)?;
        println!("{}", serde_json::to_string_pretty(&score_report)?);
    } else {
        let score = engine.compute_health_score(&store, user)?;
        println!("{}", serde_json::json!({ "health_score": score }));
    }
    Ok(())
}

fn cmd_validate(input: &PathBuf, json: bool) -> Result<(), VitalscoreCliError> {
    let dataset = Dataset::from_json(&read_input(input)?)?;
    let issues = validate_dataset(&dataset);

    let report = ValidationReport {
        total_users: dataset.users.len(),
        issues_found: issues.len(),
        issues: &issues,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total users:  {}", report.total_users);
        println!("Issues found: {}", report.issues_found);

        if !issues.is_empty() {
            println!("\nIssues:");
            for issue in &issues {
                match issue.domain {
                    Some(domain) => {
                        println!("  - {} [{}]: {}", issue.user_id, domain, issue.message)
                    }
                    None => println!("  - {}: {}", issue.user_id, issue.message),
                }
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(VitalscoreCliError::ValidationFailed(issues.len()))
    }
}

fn cmd_brackets(json: bool) -> Result<(), VitalscoreCliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(&AGE_BRACKETS)?);
    } else {
        println!("Age Brackets");
        println!("============");
        for bracket in AGE_BRACKETS {
            println!("  [{:>3}, {:>3})", bracket.start, bracket.end);
        }
        // resolver sanity line for the unbounded senior arm
        let seniors = resolve_age_bracket(99).map_err(VitalscoreCliError::Score)?;
        println!("\nAges above 75 resolve to [{}, {})", seniors.start, seniors.end);
    }
    Ok(())
}

// Error types

#[derive(Debug)]
enum VitalscoreCliError {
    Io(io::Error),
    Score(ScoreError),
    Json(serde_json::Error),
    ValidationFailed(usize),
}

impl From<io::Error> for VitalscoreCliError {
    fn from(e: io::Error) -> Self {
        VitalscoreCliError::Io(e)
    }
}

impl From<ScoreError> for VitalscoreCliError {
    fn from(e: ScoreError) -> Self {
        VitalscoreCliError::Score(e)
    }
}

impl From<serde_json::Error> for VitalscoreCliError {
    fn from(e: serde_json::Error) -> Self {
        VitalscoreCliError::Json(e)
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport<'a> {
    total_users: usize,
    issues_found: usize,
    issues: &'a [DatasetIssue],
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<VitalscoreCliError> for CliError {
    fn from(e: VitalscoreCliError) -> Self {
        match e {
            VitalscoreCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            VitalscoreCliError::Score(e) => CliError {
                code: score_error_code(&e).to_string(),
                message: e.to_string(),
                hint: score_error_hint(&e),
            },
            VitalscoreCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check dataset JSON syntax".to_string()),
            },
            VitalscoreCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} dataset issues found", count),
                hint: Some("Fix the reported issues and retry".to_string()),
            },
        }
    }
}

fn score_error_code(e: &ScoreError) -> &'static str {
    match e {
        ScoreError::UserNotFound => "USER_NOT_FOUND",
        ScoreError::InvalidAge(_) => "INVALID_AGE",
        ScoreError::InsufficientData(_) => "INSUFFICIENT_DATA",
        ScoreError::DegenerateCohort => "DEGENERATE_COHORT",
        ScoreError::InvalidWeightBase(_) => "INVALID_WEIGHT_BASE",
        ScoreError::JsonError(_) => "JSON_ERROR",
    }
}

fn score_error_hint(e: &ScoreError) -> Option<String> {
    match e {
        ScoreError::UserNotFound => {
            Some("Check the user id against the dataset".to_string())
        }
        ScoreError::InsufficientData(_) => Some(
            "A score needs at least one record in every domain".to_string(),
        ),
        ScoreError::DegenerateCohort => {
            Some("The comparison population has no usable readings".to_string())
        }
        _ => None,
    }
}
