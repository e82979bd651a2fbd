//! pythia - differential test runner
//!
//! Usage:
//!   pythia list                 # show registered case names
//!   pythia run                  # run every case against the live API
//!   pythia run quadratic hash   # run selected cases only

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pythia_client::{ClientConfig, WolframClient};
use pythia_harness::{case, case_names, CaseReport};

#[derive(Parser)]
#[command(
    name = "pythia",
    version,
    about = "Differential harness checking a computational-knowledge API against a local oracle",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (debug-level tracing)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List registered case names
    List,
    /// Run cases against the live service (all cases when none named)
    Run {
        /// Case names to run
        #[arg(value_name = "CASE")]
        names: Vec<String>,

        /// API app id (overrides the environment)
        #[arg(long)]
        app_id: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Command::List => {
            for name in case_names() {
                println!("{}", name);
            }
            ExitCode::SUCCESS
        }
        Command::Run {
            names,
            app_id,
            timeout,
        } => run(names, app_id, timeout),
    }
}

fn run(names: Vec<String>, app_id: Option<String>, timeout: Option<u64>) -> ExitCode {
    let selected: Vec<String> = if names.is_empty() {
        case_names().iter().map(|s| s.to_string()).collect()
    } else {
        names
    };

    for name in &selected {
        if case(name).is_none() {
            eprintln!("unknown case '{}'; see `pythia list`", name);
            return ExitCode::FAILURE;
        }
    }

    let mut config = ClientConfig::new();
    if let Some(id) = app_id {
        config = config.with_app_id(&id);
    }
    if let Some(secs) = timeout {
        config = config.with_timeout_secs(secs);
    }
    let client = match WolframClient::new(config) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("cannot build API client: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut passed = 0usize;
    let mut failed = 0usize;
    for name in &selected {
        // Presence was checked above
        let Some(runner) = case(name) else { continue };
        match runner(&client) {
            Ok(CaseReport {
                passed: true, query, ..
            }) => {
                println!("[PASS] {} ({})", name, query);
                passed += 1;
            }
            Ok(CaseReport { query, detail, .. }) => {
                println!("[FAIL] {} ({})", name, query);
                if let Some(detail) = detail {
                    println!("  {}", detail.replace('\n', "\n  "));
                }
                failed += 1;
            }
            Err(err) => {
                println!("[FAIL] {} (case error)", name);
                println!("  {}", err);
                failed += 1;
            }
        }
    }

    println!("Summary: {} passed, {} failed", passed, failed);
    if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
