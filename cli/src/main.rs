//! Clinical hub generator CLI.
//!
//! Creates the master workbook, fills both cohort sheets with synthetic
//! visits and checks the result against the hub rules.
//!
//! Usage:
//!   cargo run -p cli -- init --with-reference
//!   cargo run -p cli -- generate --seed 42
//!   cargo run -p cli -- verify --json
//!   cargo run -p cli -- run-all --config hub.toml

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hub_config::{GeneratorConfig, DEFAULT_WORKBOOK};
use hub_contracts::{
    cohort::Cohort,
    error::{HubError, HubResult},
    verify::VerificationReport,
};
use hub_core::{generate, traits::Verifier, GenerationSummary};
use hub_verify::{default_rules, SheetVerifier};
use hub_workbook::{initialize, read_sheet, XlsxHub};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Synthetic rheumatology hub generator.
#[derive(Parser)]
#[command(
    name = "hub",
    about = "Synthetic rheumatology clinical hub generator",
    long_about = "Builds the master clinical workbook, populates the ESPA and APS\n\
                  cohort sheets with synthetic visits, and verifies the result."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an empty workbook with the cohort headers.
    Init {
        /// Workbook to create. Overwrites an existing file.
        #[arg(long, default_value = DEFAULT_WORKBOOK)]
        output: PathBuf,
        /// Also write the medication catalogue and staff roster sheets.
        #[arg(long)]
        with_reference: bool,
    },
    /// Populate an initialized workbook with synthetic visits.
    Generate(GenerateArgs),
    /// Check the cohort sheets of a populated workbook.
    Verify {
        #[arg(long, default_value = DEFAULT_WORKBOOK)]
        workbook: PathBuf,
        /// Print the reports as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Initialize, generate and verify in one go.
    RunAll {
        #[command(flatten)]
        generate: GenerateArgs,
        #[arg(long)]
        with_reference: bool,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Workbook to populate. Defaults to the configured one.
    #[arg(long)]
    workbook: Option<PathBuf>,
    /// TOML generator configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the random source. Overrides the configured seed.
    #[arg(long)]
    seed: Option<u64>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // RUST_LOG=info shows per-cohort progress, debug shows every patient.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Init {
            output,
            with_reference,
        } => run_init(&output, with_reference).map(|()| true),
        Command::Generate(args) => run_generate(&args).map(|_| true),
        Command::Verify { workbook, json } => run_verify(&workbook, json),
        Command::RunAll {
            generate,
            with_reference,
        } => run_all(&generate, with_reference),
    };

    match result {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("Verification failed.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("hub error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_init(output: &Path, with_reference: bool) -> HubResult<()> {
    initialize(output, with_reference)?;
    println!("Initialized {}", output.display());
    Ok(())
}

/// Returns the workbook that was populated.
fn run_generate(args: &GenerateArgs) -> HubResult<PathBuf> {
    let config = load_config(args)?;
    let workbook = args
        .workbook
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.workbook));

    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    info!(seed, workbook = %workbook.display(), "generating hub");

    let mut hub = XlsxHub::open(&workbook)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let summary = generate(&config, &mut rng, &mut hub)?;

    print_summary(&workbook, seed, &summary);
    Ok(workbook)
}

/// Returns whether every cohort sheet passed.
fn run_verify(workbook: &Path, json: bool) -> HubResult<bool> {
    let verifier = SheetVerifier::with_hub_rules();
    let mut reports = Vec::with_capacity(Cohort::ALL.len());
    for cohort in Cohort::ALL {
        let sheet = read_sheet(workbook, cohort.sheet_name())?;
        reports.push(verifier.verify(&sheet, &default_rules(cohort))?);
    }

    if json {
        let out = serde_json::to_string_pretty(&reports).map_err(|e| HubError::Io {
            path: "<stdout>".to_string(),
            reason: e.to_string(),
        })?;
        println!("{}", out);
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    Ok(reports.iter().all(|r| r.passed))
}

fn run_all(args: &GenerateArgs, with_reference: bool) -> HubResult<bool> {
    let config = load_config(args)?;
    let workbook = args
        .workbook
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.workbook));

    run_init(&workbook, with_reference)?;
    let args = GenerateArgs {
        workbook: Some(workbook),
        config: args.config.clone(),
        seed: args.seed,
    };
    let workbook = run_generate(&args)?;
    run_verify(&workbook, false)
}

fn load_config(args: &GenerateArgs) -> HubResult<GeneratorConfig> {
    match &args.config {
        Some(path) => GeneratorConfig::from_file(path),
        None => Ok(GeneratorConfig::default()),
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_summary(workbook: &Path, seed: u64, summary: &GenerationSummary) {
    println!();
    println!("Populated {} (seed {})", workbook.display(), seed);
    for c in &summary.cohorts {
        println!(
            "  {:<5} {:>3} patients  {:>4} visits  ({} first, {} follow-up, {} switches)",
            c.cohort.sheet_name(),
            c.patients,
            c.visits(),
            c.first_visits,
            c.follow_ups,
            c.treatment_switches,
        );
        for (category, count) in &c.activity {
            println!("          {:<20} {:>4}", category.label(), count);
        }
    }
    println!("  total {} visits", summary.total_visits());
    println!();
}

fn print_report(report: &VerificationReport) {
    let status = if report.passed { "PASS" } else { "FAIL" };
    println!(
        "[{}] {}: {} rows checked, {} failures",
        status,
        report.sheet,
        report.rows_checked,
        report.failures.len()
    );
    for failure in &report.failures {
        match failure.row {
            Some(row) => println!("    row {:>4}  {}: {}", row, failure.rule_id, failure.message),
            None => println!("    sheet     {}: {}", failure.rule_id, failure.message),
        }
    }
}
