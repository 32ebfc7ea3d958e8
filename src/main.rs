//! `plan-relay` command line.
//!
//! Reads a plan (JSON file or stdin), repairs and executes it, and prints
//! the result list as JSON on stdout. Diagnostics go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

use plan_relay::utils::logging;
use plan_relay::{repair_plan, run_plan_blocking, Action, PlanDocument, RelaySettings, RunOptions};

#[derive(Parser)]
#[command(
    name = "plan-relay",
    version,
    about = "Execute planner action lists against tool providers"
)]
struct Cli {
    /// Settings file (defaults to $PLAN_RELAY_CONFIG, then ~/.plan-relay/config.json)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the plan with missing directory-creation steps inserted.
    Repair {
        /// Plan file, or `-` for stdin
        plan: PathBuf,
    },
    /// Execute a plan and print one result per action.
    Run {
        /// Plan file, or `-` for stdin
        plan: PathBuf,
        /// Re-run once if a music action failed.
        #[arg(long)]
        retry: bool,
        /// Execute the plan exactly as given.
        #[arg(long)]
        no_repair: bool,
    },
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Repair { plan } => {
            let actions = read_plan(&plan)?;
            let repaired = repair_plan(&actions).context("repair plan")?;
            print_json(&repaired)
        }
        Command::Run {
            plan,
            retry,
            no_repair,
        } => {
            let actions = read_plan(&plan)?;
            let settings = RelaySettings::load(cli.config.as_deref()).context("load settings")?;
            let options = RunOptions {
                repair: !no_repair,
                retry,
            };
            let results = run_plan_blocking(&actions, &settings, options).context("run plan")?;
            print_json(&results)
        }
    }
}

fn read_plan(path: &Path) -> Result<Vec<Action>> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read plan from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
    };
    PlanDocument::parse(&text).with_context(|| format!("parse plan {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value).context("serialize json")?;
    println!("{}", payload);
    Ok(())
}
