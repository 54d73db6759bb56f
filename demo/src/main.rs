//! verihire command-line front end
//!
//! Evaluates candidates through the keyword scorer, appends every decision to
//! the signed audit log, and inspects or verifies what has been recorded.
//!
//! Usage:
//!   cargo run -p verihire-demo -- evaluate --name "Jane Doe" --resume jane.txt --job "Python, SQL"
//!   cargo run -p verihire-demo -- compare alice.txt bob.txt --job-file jd.txt
//!   cargo run -p verihire-demo -- history --decision shortlist --ascending
//!   cargo run -p verihire-demo -- facts
//!   cargo run -p verihire-demo -- verify
//!   cargo run -p verihire-demo -- report --id 3f2a

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use verihire_audit::AuditLogStore;
use verihire_contracts::{
    config::HireConfig,
    error::{HireError, HireResult},
    evaluation::{CandidateInput, Decision, EvaluationOutcome},
};
use verihire_core::{config, HiringAgent, MAX_BATCH};
use verihire_scoring::{render_report, summarize, HistoryQuery, KeywordScorer, ScoreSummary};

// ── CLI definition ────────────────────────────────────────────────────────────

/// verihire: auditable candidate screening.
///
/// Every evaluation is appended to a Merkle-rooted, HMAC-signed audit log
/// that `verify` can check at any time.
#[derive(Parser)]
#[command(
    name = "verihire",
    about = "Auditable candidate screening with a signed, append-only decision log",
    long_about = "Scores candidates against a job description, records every decision in an\n\
                  append-only audit log, and verifies the log's Merkle root and signature."
)]
struct Cli {
    /// TOML configuration file.  Defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override `storage.data_dir` from the configuration.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate one candidate and record the decision.
    Evaluate(EvaluateArgs),
    /// Evaluate several resumes against one job and rank them.
    Compare(CompareArgs),
    /// List recorded evaluations by score, highest first.
    History {
        /// Only show evaluations with this decision.
        #[arg(long, value_enum)]
        decision: Option<DecisionFilter>,

        /// Lowest score first.
        #[arg(long)]
        ascending: bool,
    },
    /// Print the current audit snapshot as JSON.
    Facts,
    /// Recompute the Merkle root and check the signature.
    Verify,
    /// Render the text report for a recorded evaluation.
    Report {
        /// Evaluation id or a prefix of it.
        #[arg(long)]
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DecisionFilter {
    Shortlist,
    Reject,
}

impl From<DecisionFilter> for Decision {
    fn from(filter: DecisionFilter) -> Self {
        match filter {
            DecisionFilter::Shortlist => Decision::Shortlist,
            DecisionFilter::Reject => Decision::Reject,
        }
    }
}

#[derive(Args)]
struct JobArgs {
    /// Job description text.
    #[arg(long, conflicts_with = "job_file")]
    job: Option<String>,

    /// File holding the job description.
    #[arg(long)]
    job_file: Option<PathBuf>,
}

#[derive(Args)]
struct EvaluateArgs {
    #[arg(long)]
    name: String,

    /// Resume as a plain-text file.
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Comma-separated skills; replaces skills found in the resume.
    #[arg(long, default_value = "")]
    skills: String,

    /// Years of experience; replaces the figure found in the resume.
    #[arg(long)]
    years: Option<f64>,

    /// Free-text project list.
    #[arg(long, default_value = "")]
    projects: String,

    #[command(flatten)]
    job: JobArgs,

    /// Print the evaluation and snapshot as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CompareArgs {
    /// Resume files; each candidate is named after its file stem.
    #[arg(required = true)]
    resumes: Vec<PathBuf>,

    #[command(flatten)]
    job: JobArgs,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("verihire error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> HireResult<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => config::from_file(path)?,
        None => HireConfig::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }
    debug!(data_dir = %config.storage.data_dir.display(), "using data directory");

    match cli.command {
        Command::Evaluate(args) => evaluate(config, args),
        Command::Compare(args) => compare(config, args),
        Command::History { decision, ascending } => history(
            &config,
            HistoryQuery {
                decision: decision.map(Decision::from),
                ascending,
            },
        ),
        Command::Facts => facts(&config),
        Command::Verify => verify(&config),
        Command::Report { id } => report(&config, &id),
    }
}

fn agent(config: HireConfig) -> HireResult<HiringAgent> {
    let store = AuditLogStore::open(config.storage)?;
    Ok(HiringAgent::new(
        Box::new(KeywordScorer::new(config.scoring)),
        Box::new(store),
    ))
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn evaluate(config: HireConfig, args: EvaluateArgs) -> HireResult<ExitCode> {
    let input = CandidateInput {
        name: args.name,
        resume_text: args.resume.as_deref().map(read_text).transpose()?.unwrap_or_default(),
        skills_text: args.skills,
        years_experience: args.years,
        projects_text: args.projects,
        job_description: job_description(&args.job)?,
    };

    let outcome = agent(config)?.evaluate_candidate(&input)?;

    if args.json {
        println!("{}", to_pretty_json(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(ExitCode::SUCCESS)
}

fn compare(config: HireConfig, args: CompareArgs) -> HireResult<ExitCode> {
    let job_description = job_description(&args.job)?;
    let inputs = args
        .resumes
        .iter()
        .map(|path| {
            Ok(CandidateInput {
                name: file_stem(path),
                resume_text: read_text(path)?,
                job_description: job_description.clone(),
                ..CandidateInput::default()
            })
        })
        .collect::<HireResult<Vec<_>>>()?;

    if inputs.len() > MAX_BATCH {
        eprintln!(
            "note: only the first {} of {} resumes are evaluated",
            MAX_BATCH,
            inputs.len()
        );
    }

    let ranked = agent(config)?.evaluate_batch(&inputs)?;

    println!("{:<4} {:<24} {:>7}  {:<10} {}", "RANK", "CANDIDATE", "SCORE", "DECISION", "MATCHED");
    for (rank, outcome) in ranked.iter().enumerate() {
        let record = &outcome.record;
        println!(
            "{:<4} {:<24} {:>7.2}  {:<10} {}",
            rank + 1,
            record.name,
            record.total_score,
            record.decision.to_string(),
            record.matched_skills.join(", ")
        );
    }
    if let Some(summary) = summarize(ranked.iter().map(|o| &o.record)) {
        print_summary(&summary);
        println!(
            "Highest:     {:.1}   Lowest: {:.1}",
            summary.highest, summary.lowest
        );
    }
    if let Some(last) = ranked.iter().max_by_key(|o| o.snapshot.logs.len()) {
        println!();
        println!("Merkle root: {}", last.snapshot.merkle_root);
    }
    Ok(ExitCode::SUCCESS)
}

fn history(config: &HireConfig, query: HistoryQuery) -> HireResult<ExitCode> {
    let store = AuditLogStore::open(config.storage.clone())?;
    let history = store.load_history();
    let records = query.apply(&history);
    if records.is_empty() {
        println!("No matching evaluations recorded.");
        return Ok(ExitCode::SUCCESS);
    }

    println!("{:<10} {:<24} {:>7}  {}", "ID", "CANDIDATE", "SCORE", "DECISION");
    for record in &records {
        println!(
            "{:<10} {:<24} {:>7.2}  {}",
            short_id(&record.id),
            record.name,
            record.total_score,
            record.decision
        );
    }
    if let Some(summary) = summarize(records.iter().copied()) {
        print_summary(&summary);
    }
    Ok(ExitCode::SUCCESS)
}

fn facts(config: &HireConfig) -> HireResult<ExitCode> {
    let store = AuditLogStore::open(config.storage.clone())?;
    match store.load_snapshot() {
        Some(snapshot) => println!("{}", to_pretty_json(&snapshot)?),
        None => println!("No audit snapshot recorded."),
    }
    Ok(ExitCode::SUCCESS)
}

fn verify(config: &HireConfig) -> HireResult<ExitCode> {
    let store = AuditLogStore::open(config.storage.clone())?;
    let Some(report) = store.verify_current()? else {
        println!("No audit snapshot recorded; nothing to verify.");
        return Ok(ExitCode::SUCCESS);
    };

    println!("Recomputed root: {}", report.recomputed_root);
    println!("Root matches:    {}", yes_no(report.root_matches));
    println!("Signature valid: {}", yes_no(report.signature_valid));

    if report.is_trusted() {
        println!("Audit log verified.");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Audit log FAILED verification.");
        Ok(ExitCode::FAILURE)
    }
}

fn report(config: &HireConfig, id: &str) -> HireResult<ExitCode> {
    let store = AuditLogStore::open(config.storage.clone())?;
    let record = store
        .load_history()
        .into_iter()
        .rev()
        .find(|record| record.id.starts_with(id))
        .ok_or_else(|| HireError::InvalidInput {
            reason: format!("no evaluation with id starting '{}'", id),
        })?;
    let snapshot = store.load_snapshot().unwrap_or_default();
    println!("{}", render_report(&record, &snapshot));
    Ok(ExitCode::SUCCESS)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn print_outcome(outcome: &EvaluationOutcome) {
    let record = &outcome.record;
    println!();
    println!("Candidate:  {} ({})", record.name, short_id(&record.id));
    println!("Decision:   {}", record.decision);
    println!(
        "Score:      {:.2}  (skills {:.2}, experience {:.2}, projects {:.2})",
        record.total_score, record.scores.skills, record.scores.experience, record.scores.projects
    );
    println!("Match:      {:.1}% of required skills", record.skill_match_percent);
    if !record.missing_skills.is_empty() {
        println!("Missing:    {}", record.missing_skills.join(", "));
    }
    println!("Reasoning:  {}", record.reasoning);
    println!();
    for (name, status) in outcome.snapshot.policy_checks.iter() {
        println!("  [{}] {}", status.as_str(), name);
    }
    println!();
    println!("Merkle root: {}", outcome.snapshot.merkle_root);
    println!("Signature:   {}", outcome.snapshot.signature);
}

fn print_summary(summary: &ScoreSummary) {
    println!();
    println!(
        "Evaluated:   {}   Shortlisted: {}   Rejected: {}",
        summary.count, summary.shortlisted, summary.rejected
    );
    println!("Average:     {:.1}", summary.average);
}

fn job_description(args: &JobArgs) -> HireResult<String> {
    match (&args.job, &args.job_file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => read_text(path),
        (None, None) => Ok(String::new()),
    }
}

fn read_text(path: &Path) -> HireResult<String> {
    fs::read_to_string(path).map_err(|e| HireError::InvalidInput {
        reason: format!("failed to read '{}': {}", path.display(), e),
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> HireResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| HireError::Encoding {
        reason: e.to_string(),
    })
}
