use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use powerwatch::config::Settings;
use powerwatch::sink::RecordingSink;
use powerwatch::Agent;

#[derive(Parser, Debug)]
#[command(name = "powerwatch")]
#[command(about = "Forward HWiNFO power and load metrics to a home automation state store")]
struct Args {
    /// Path to the INI config file (created with defaults if missing)
    #[arg(short, long, default_value = "config.ini")]
    config: PathBuf,

    /// Poll interval in seconds, overriding the config file
    #[arg(short, long)]
    interval: Option<u64>,

    /// Run a single cycle and exit
    #[arg(long, conflicts_with = "export")]
    once: bool,

    /// Log state updates instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Run one cycle, write the updates to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut settings = Settings::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if let Some(secs) = args.interval {
        settings.hwinfo.interval_secs = secs.max(1);
    }

    // A single cycle at a time never needs more than one thread
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    if let Some(export_path) = args.export {
        return rt.block_on(export_to_file(&settings, &export_path));
    }

    let agent = Agent::from_settings(&settings, args.dry_run)?;

    rt.block_on(async {
        if args.once {
            let summary = agent.run_cycle().await;
            if !summary.report.is_success() {
                anyhow::bail!(
                    "{} of {} updates failed",
                    summary.report.failed(),
                    summary.report.outcomes.len()
                );
            }
            return Ok(());
        }

        agent.run(settings.hwinfo.interval(), shutdown_signal()).await
    })
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "powerwatch=debug" } else { "powerwatch=info" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Run one cycle against an in-memory sink and write what would have been
/// sent to a JSON file
async fn export_to_file(settings: &Settings, export_path: &Path) -> Result<()> {
    let sink = RecordingSink::new();
    let agent = Agent::from_settings(settings, true)?;
    let summary = agent.run_cycle_with(&sink).await;

    let updates: Vec<serde_json::Value> = sink
        .drain()
        .into_iter()
        .map(|u| {
            let state = u.state();
            serde_json::json!({
                "entity_id": u.entity_id,
                "state": state,
                "attributes": {
                    "friendly_name": u.friendly_name,
                    "unit_of_measurement": u.unit,
                }
            })
        })
        .collect();

    let mut export = serde_json::Map::new();
    export.insert(
        "platform".to_string(),
        serde_json::json!({
            "id": settings.platform.id,
            "name": settings.platform.name,
        }),
    );
    export.insert("online".to_string(), serde_json::json!(summary.online));
    export.insert("updates".to_string(), serde_json::Value::Array(updates));

    let json = serde_json::to_string_pretty(&serde_json::Value::Object(export))?;
    std::fs::write(export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;

    info!(path = %export_path.display(), "Exported state updates");
    Ok(())
}
