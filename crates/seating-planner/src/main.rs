//! Seating planner command-line entry point.
//!
//! Loads a plan, replays a script of UI commands against it, and prints the
//! command results and the final render state as JSON on stdout.  Logs go to
//! stderr so stdout stays machine-readable.
//!
//! ```text
//! main()
//!  ├─ load config            (--config, or the platform config file)
//!  ├─ save config            (only with --save-config)
//!  ├─ load plan              (--plan, or [storage].plan_file; JSON snapshot)
//!  ├─ SyncQueue::spawn       (only with --write; JsonFileStore worker task)
//!  ├─ PlannerSession::dispatch for each scripted LayoutCommand
//!  └─ close the queue and wait for the worker to flush
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use seating_core::{PlanSnapshot, SeatingPlan};
use seating_planner::application::interaction::{CommandOutcome, LayoutCommand};
use seating_planner::infrastructure::{
    persistence::{sync::SyncQueue, JsonFileStore, PlanStore},
    storage::config::{
        load_config, load_config_from, save_config, save_config_to, AppConfig, ConfigError,
    },
    ui_bridge::{CommandResult, PlannerSession, PlannerStateDto},
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Wedding table planner.
///
/// Replays a JSON script of layout commands (add tables, drag guests onto
/// seats, ...) against a seating plan and prints the resulting layout.
#[derive(Debug, Parser)]
#[command(
    name = "seating-planner",
    about = "Lay out tables and seat guests from a scripted command list",
    version
)]
struct Cli {
    /// Path to the TOML config file.  Defaults to the platform config dir.
    #[arg(long, env = "SEATING_CONFIG")]
    config: Option<PathBuf>,

    /// JSON plan snapshot to start from.  Overrides `[storage].plan_file`.
    /// A missing file starts an empty plan.
    #[arg(long, env = "SEATING_PLAN")]
    plan: Option<PathBuf>,

    /// JSON array of layout commands to apply in order.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Persist every change back to the plan file.
    #[arg(long, default_value_t = false)]
    write: bool,

    /// Write the effective config (defaults filled in) back to the config
    /// file before running.
    #[arg(long, default_value_t = false)]
    save_config: bool,
}

/// Everything printed on stdout.
#[derive(Debug, Serialize)]
struct RunReport {
    results: Vec<CommandResult<CommandOutcome>>,
    state: PlannerStateDto,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => match load_config() {
            Err(ConfigError::NoPlatformConfigDir) => AppConfig::default(),
            other => other.context("failed to load config")?,
        },
    };

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.planner.log_level)),
        )
        .init();

    if cli.save_config {
        write_config(&config, cli.config.as_deref())?;
        info!("config saved");
    }

    let plan_path = cli.plan.clone().or_else(|| config.storage.plan_file.clone());
    if cli.write && plan_path.is_none() {
        anyhow::bail!("--write needs a plan file (--plan or [storage].plan_file)");
    }

    let store = plan_path.as_ref().map(|p| Arc::new(JsonFileStore::new(p)));
    let snapshot = match &store {
        Some(store) => store
            .load()
            .await
            .with_context(|| format!("failed to read plan {}", store.path().display()))?,
        None => PlanSnapshot::default(),
    };
    let plan = SeatingPlan::from_snapshot(snapshot).context("plan file is inconsistent")?;
    info!(
        tables = plan.table_count(),
        guests = plan.guest_count(),
        seated = plan.seated_count(),
        "plan loaded"
    );

    let (sync, worker) = match (&store, cli.write) {
        (Some(store), true) => {
            let store: Arc<dyn PlanStore> = store.clone();
            let (queue, worker) = SyncQueue::spawn(store);
            (Some(queue), Some(worker))
        }
        _ => (None, None),
    };

    let mut session = PlannerSession::new(plan, &config, sync);

    let commands = match &cli.script {
        Some(path) => read_script(path)?,
        None => Vec::new(),
    };
    let mut results = Vec::with_capacity(commands.len());
    for (n, command) in commands.into_iter().enumerate() {
        let result = session.dispatch(command);
        if let Some(error) = &result.error {
            warn!(command = n, %error, "command failed");
        }
        results.push(result);
    }

    let report = RunReport {
        results,
        state: session.state(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to encode report")?
    );

    // Closing the queue lets the worker drain and exit.
    drop(session.into_sync());
    if let Some(worker) = worker {
        let stats = worker.await.context("sync worker panicked")?;
        info!(applied = stats.applied, failed = stats.failed, "plan saved");
        if stats.failed > 0 {
            anyhow::bail!("{} change(s) could not be saved", stats.failed);
        }
    }
    Ok(())
}

/// Saves `config` to `path`, or to the platform config file when no path
/// was given.
fn write_config(config: &AppConfig, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => save_config_to(config, path)
            .with_context(|| format!("failed to save config to {}", path.display())),
        None => save_config(config).context("failed to save config"),
    }
}

fn read_script(path: &Path) -> anyhow::Result<Vec<LayoutCommand>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("script {} is not a JSON array of commands", path.display()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
