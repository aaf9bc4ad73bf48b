//! `spendcast` command line: run the forecast engine over a JSON request.
//!
//! Results go to stdout as pretty JSON; logs go to stderr.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use tracing::{debug, warn};

use spendcast_ai::narrative::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use spendcast_ai::{NarrativeInput, narrative_request};
use spendcast_forecast::{CategoryRegistry, ProjectionEngine, ProjectionRequest, VarianceMode};
use spendcast_infra::Settings;

#[derive(Debug, Parser)]
#[command(name = "spendcast")]
#[command(about = "Cloud spend commitment forecasting", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Project a commitment to the end of its term
    Project(ProjectArgs),
    /// Velocity analysis for a commitment
    Velocity(RequestArgs),
    /// List the spend categories and their assumptions
    Categories,
    /// Print the completion request a narrative would be generated from
    #[command(name = "narrate-prompt")]
    NarratePrompt(RequestArgs),
}

#[derive(Debug, Args)]
pub struct RequestArgs {
    /// Path to a projection request (JSON)
    pub request: PathBuf,
}

#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Path to a projection request (JSON)
    pub request: PathBuf,

    /// Include velocity analysis in the output
    #[arg(long)]
    pub velocity: bool,

    /// Seed for reproducible history noise
    #[arg(long, conflicts_with = "no_variance")]
    pub seed: Option<u64>,

    /// Disable history noise regardless of request or environment
    #[arg(long)]
    pub no_variance: bool,
}

/// Execute `cli` and return the JSON document to print.
pub fn run(cli: &Cli) -> Result<Value> {
    match &cli.command {
        Commands::Categories => categories(),
        Commands::Project(args) => {
            let mut request = read_request(&args.request)?;
            if let Some(seed) = args.seed {
                request.variance = Some(VarianceMode::Seeded { seed });
            } else if args.no_variance {
                request.variance = Some(VarianceMode::None);
            }

            let engine = engine()?;
            let projection = engine.project(&request).context("projection failed")?;
            if args.velocity {
                let velocity = engine.analyze_velocity(&projection);
                Ok(json!({ "projection": projection, "velocity": velocity }))
            } else {
                Ok(serde_json::to_value(&projection)?)
            }
        }
        Commands::Velocity(args) => {
            let request = read_request(&args.request)?;
            let engine = engine()?;
            let projection = engine.project(&request).context("projection failed")?;
            Ok(serde_json::to_value(engine.analyze_velocity(&projection))?)
        }
        Commands::NarratePrompt(args) => {
            let request = read_request(&args.request)?;
            let projection = engine()?.project(&request).context("projection failed")?;
            let prompt = narrative_request(
                &NarrativeInput::from_projection(&projection),
                DEFAULT_TEMPERATURE,
                DEFAULT_MAX_TOKENS,
            );
            Ok(serde_json::to_value(prompt)?)
        }
    }
}

fn engine() -> Result<ProjectionEngine> {
    let settings = Settings::from_env().context("invalid SPENDCAST_* configuration")?;
    debug!(config = ?settings.engine, "engine configured");
    Ok(ProjectionEngine::new(settings.engine))
}

fn read_request(path: &Path) -> Result<ProjectionRequest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read request {}", path.display()))?;
    let request: ProjectionRequest = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse request {}", path.display()))?;
    if request.as_of < request.commitment.start_date() {
        warn!(as_of = %request.as_of, "as-of date precedes commitment start; nothing has elapsed");
    }
    Ok(request)
}

fn categories() -> Result<Value> {
    let profiles: Vec<_> = CategoryRegistry::standard().iter().collect();
    Ok(serde_json::to_value(profiles)?)
}
