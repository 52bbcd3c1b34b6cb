#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ftsystem::agents::AgentRegistry;
use ftsystem::config::Config;
use ftsystem::orchestrator::{MasterCoordinator, SessionPolicy, SessionRequest};
use ftsystem::security::{RedactionLevel, Redactor};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "ftsystem", about = "ftSystem — round-based multi-agent orchestration", version)]
struct Cli {
    /// Verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an orchestration session.
    Run {
        /// Path to a TOML config file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Comma-separated helper agent names (overrides config).
        #[arg(short, long, value_delimiter = ',')]
        subagents: Vec<String>,

        /// Number of rounds (overrides config).
        #[arg(short, long)]
        rounds: Option<u32>,

        /// Per-worker deadline in seconds (overrides config).
        #[arg(short, long)]
        timeout_seconds: Option<f64>,

        /// User input to seed the forum with.
        #[arg(short, long)]
        input: Option<String>,

        /// Redaction level: normal or strict (overrides config).
        #[arg(long)]
        redaction: Option<RedactionLevel>,

        /// Write the outcome JSON here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write Prometheus exposition metrics here (overrides config).
        #[arg(long)]
        metrics_out: Option<PathBuf>,
    },
    /// List the registered agents.
    ListAgents,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    match cli.command {
        Commands::Run {
            config,
            subagents,
            rounds,
            timeout_seconds,
            input,
            redaction,
            output,
            metrics_out,
        } => {
            run_session(RunArgs {
                config,
                subagents,
                rounds,
                timeout_seconds,
                input,
                redaction,
                output,
                metrics_out,
            })
            .await
        }
        Commands::ListAgents => {
            let registry = AgentRegistry::builtin();
            for name in registry.names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

struct RunArgs {
    config: Option<PathBuf>,
    subagents: Vec<String>,
    rounds: Option<u32>,
    timeout_seconds: Option<f64>,
    input: Option<String>,
    redaction: Option<RedactionLevel>,
    output: Option<PathBuf>,
    metrics_out: Option<PathBuf>,
}

async fn run_session(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };
    config.apply_env_overrides();

    let subagents = if args.subagents.is_empty() {
        config.orchestration.subagents.clone()
    } else {
        args.subagents
    };
    let rounds = args.rounds.unwrap_or(config.orchestration.rounds);
    let timeout_seconds = args
        .timeout_seconds
        .unwrap_or(config.orchestration.timeout_seconds);
    anyhow::ensure!(
        timeout_seconds > 0.0,
        "timeout_seconds must be positive, got {timeout_seconds}"
    );
    let timeout = Duration::from_secs_f64(timeout_seconds);
    let level = args.redaction.unwrap_or(config.security.redaction_level);

    let registry = Arc::new(AgentRegistry::builtin());
    let policy = SessionPolicy::from_config(&config.security);
    let coordinator = MasterCoordinator::new(registry, policy, Redactor::new(level));

    let mut request = SessionRequest::new(subagents, rounds, timeout);
    if let Some(input) = args.input {
        request = request.with_input(input);
    }

    let started = Instant::now();
    let outcome = coordinator.run_session(request).await?;
    let duration = started.elapsed();

    let rendered = serde_json::to_string_pretty(&outcome)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("writing outcome to {}", path.display()))?;
            tracing::info!(path = %path.display(), "outcome written");
        }
        None => println!("{rendered}"),
    }

    let metrics_path = args
        .metrics_out
        .or_else(|| config.observability.metrics_path.clone());
    if let Some(path) = metrics_path {
        let exposition = ftsystem::observability::render("MasterAgent", duration, &outcome);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, exposition)
            .with_context(|| format!("writing metrics to {}", path.display()))?;
        tracing::info!(path = %path.display(), "metrics written");
    }

    Ok(())
}
