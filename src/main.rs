//! Daybreak - Simulated Momentum Trading Core
//!
//! The small-account teaching loop:
//! - Scan for gappers, trade the momentum, get flat fast
//! - Hard per-trader-type limits instead of discretion
//! - Every entry is simulated; no order ever leaves the process

use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use daybreak::broker::{SharedBroker, SimBroker};
use daybreak::config::{Config, RunMode};
use daybreak::core::{CoreOrchestrator, MarketSession};
use daybreak::registry::ActiveTradeRegistry;

const SEP: &str = "===========================================================";

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let cfg = Config::load_or_default("config.toml").unwrap_or_else(|e| {
        eprintln!("Failed to load config.toml: {}. Exiting.", e);
        std::process::exit(1);
    });

    // Setup logging
    let log_level = cfg.system.log_level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("{}", SEP);
    info!("  {} - Simulated Momentum Trading Core", cfg.system.name);
    info!("  Philosophy: Scan the gappers. Trade the momentum. Get flat fast.");
    info!("{}", SEP);

    if !std::path::Path::new("config.toml").exists() {
        warn!("config.toml not found; running on built-in teaching defaults");
    }

    match cfg.system.mode {
        RunMode::Sim => info!("Mode: SIM | every fill is in-memory"),
        RunMode::Paper | RunMode::Live => warn!(
            "Mode: {} requested, but execution stays simulated; no orders leave this process",
            cfg.system.mode
        ),
    }

    info!("Watchlist: {} symbols loaded", cfg.watchlist.len());
    info!("Strategies: {}", cfg.strategies.enabled.join(", "));

    let mut limit_parts: Vec<String> = cfg
        .risk
        .limits
        .iter()
        .map(|(trader_type, max)| format!("{}={}", trader_type, max))
        .collect();
    limit_parts.sort();
    info!("Risk: max concurrent per trader type: {}", limit_parts.join(" "));
    info!(
        "Cycle: every {}s | auto-close after {}s",
        cfg.orchestrator.cycle_interval_secs, cfg.orchestrator.auto_close_after_secs
    );
    info!("Market Session: {}", MarketSession::at(Utc::now()));

    // Connect the simulation broker
    let broker: SharedBroker = Arc::new(tokio::sync::Mutex::new(SimBroker::new()));
    broker.lock().await.connect().await?;

    // Wire the pipeline
    let registry = Arc::new(Mutex::new(ActiveTradeRegistry::new()));
    let mut orchestrator =
        CoreOrchestrator::from_config(&cfg, Arc::clone(&registry), Some(Arc::clone(&broker)));

    info!("Entering cycle loop; Ctrl-C to stop");

    // Main cycle loop
    let mut interval = tokio::time::interval(cfg.orchestrator.cycle_interval());
    loop {
        tokio::select! {
            _ = interval.tick() => {
                orchestrator.run_once();
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested");
                break;
            }
        }
    }

    // Shutdown summary
    broker.lock().await.disconnect().await?;

    let stats = orchestrator.stats();
    info!("{}", SEP);
    info!(
        "  Session complete: {} cycles | {} candidates | {} patterns | {} intents",
        stats.cycles, stats.candidates, stats.patterns, stats.intents
    );
    info!(
        "  Executions: {} simulated | {} blocked | {} swept",
        stats.simulated, stats.blocked, stats.swept
    );
    info!(
        "  Records stored: {} | Open trades left: {}",
        orchestrator.stored_records(),
        registry.lock().unwrap().active_count()
    );
    info!("{}", SEP);

    Ok(())
}
