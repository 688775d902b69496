//! Core orchestrator
//!
//! Drives one full cycle: sweep aged trades, then scan, evaluate patterns,
//! run strategies, gate risk, execute, and hand the cycle's record to
//! storage. Every stage tolerates an empty upstream result, and a cycle
//! always runs to completion before the next one starts: `run_once`
//! borrows the orchestrator mutably, so cycles cannot overlap.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::broker::SharedBroker;
use crate::config::Config;
use crate::core::execution::ExecutionEngine;
use crate::core::patterns::PatternEngine;
use crate::core::risk::{RiskEngine, RiskLimits};
use crate::core::scanner::Scanner;
use crate::core::types::{ExecutionStatus, MarketSession, TradeRecord};
use crate::registry::ActiveTradeRegistry;
use crate::storage::StorageEngine;
use crate::strategy::StrategyRunner;

/// Close reason stamped by the age sweep
pub const SIM_TIME_EXIT: &str = "SIM_TIME_EXIT";

/// Stage the orchestrator is in; back to IDLE between cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Scanning,
    PatternEval,
    StrategyEval,
    RiskEval,
    Execution,
    Storage,
}

impl CyclePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CyclePhase::Idle => "IDLE",
            CyclePhase::Scanning => "SCANNING",
            CyclePhase::PatternEval => "PATTERN_EVAL",
            CyclePhase::StrategyEval => "STRATEGY_EVAL",
            CyclePhase::RiskEval => "RISK_EVAL",
            CyclePhase::Execution => "EXECUTION",
            CyclePhase::Storage => "STORAGE",
        }
    }
}

impl std::fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Running totals since startup
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleStats {
    pub cycles: u64,
    pub candidates: u64,
    pub patterns: u64,
    pub intents: u64,
    pub simulated: u64,
    pub blocked: u64,
    pub swept: u64,
}

/// What one cycle did
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle: u64,
    pub session: MarketSession,
    pub swept: usize,
    pub candidates: usize,
    pub patterns: usize,
    pub intents: usize,
    pub simulated: usize,
    pub blocked: usize,
    /// OPEN trades in the registry after the cycle finished
    pub open_trades: usize,
}

/// The cycle's stage engines, in pipeline order
///
/// Built by [`CoreOrchestrator::from_config`] for the normal path; wire one
/// by hand to swap a stage out.
pub struct PipelineStages {
    pub scanner: Scanner,
    pub patterns: PatternEngine,
    pub strategies: StrategyRunner,
    pub risk: RiskEngine,
    pub execution: ExecutionEngine,
    pub storage: StorageEngine,
}

/// Sequences the pipeline around the shared trade registry
pub struct CoreOrchestrator {
    registry: Arc<Mutex<ActiveTradeRegistry>>,
    scanner: Scanner,
    patterns: PatternEngine,
    strategies: StrategyRunner,
    risk: RiskEngine,
    execution: ExecutionEngine,
    storage: StorageEngine,
    /// OPEN trades strictly older than this get swept
    auto_close_after: Duration,
    phase: CyclePhase,
    stats: CycleStats,
}

impl CoreOrchestrator {
    /// Wire the orchestrator from explicitly built stages
    pub fn new(
        registry: Arc<Mutex<ActiveTradeRegistry>>,
        stages: PipelineStages,
        auto_close_after: Duration,
    ) -> Self {
        let PipelineStages { scanner, patterns, strategies, risk, execution, storage } = stages;
        Self {
            registry,
            scanner,
            patterns,
            strategies,
            risk,
            execution,
            storage,
            auto_close_after,
            phase: CyclePhase::Idle,
            stats: CycleStats::default(),
        }
    }

    /// Build the whole pipeline from configuration around a shared registry
    pub fn from_config(
        config: &Config,
        registry: Arc<Mutex<ActiveTradeRegistry>>,
        broker: Option<SharedBroker>,
    ) -> Self {
        let stages = PipelineStages {
            scanner: Scanner::new(config.watchlist.clone()),
            patterns: PatternEngine::new(
                config.patterns.min_gap_percent_decimal(),
                config.patterns.min_relative_volume_decimal(),
            ),
            strategies: StrategyRunner::with_default_strategies(&config.strategies.enabled),
            risk: RiskEngine::new(
                RiskLimits::from_config(&config.risk.limits),
                Arc::clone(&registry),
            ),
            execution: ExecutionEngine::new(Arc::clone(&registry), broker),
            storage: StorageEngine::new(),
        };

        Self::new(registry, stages, config.orchestrator.auto_close_after())
    }

    /// Current phase; IDLE whenever no cycle is in flight
    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Totals since startup
    pub fn stats(&self) -> CycleStats {
        self.stats
    }

    /// Cycle records handed to storage so far
    pub fn stored_records(&self) -> u64 {
        self.storage.stored_count()
    }

    /// Run one cycle against the wall clock
    pub fn run_once(&mut self) -> CycleReport {
        self.run_once_at(Utc::now())
    }

    /// Run one cycle with every timestamp derived from the one instant
    pub fn run_once_at(&mut self, now: DateTime<Utc>) -> CycleReport {
        self.stats.cycles += 1;
        let cycle = self.stats.cycles;
        let session = MarketSession::at(now);
        info!("Cycle {} starting session={}", cycle, session);

        // the only autonomous state mutation, and it runs before the pipeline
        let swept_trade_ids = self.sweep_expired_at(now);

        self.set_phase(CyclePhase::Scanning);
        let scanner_results = self.scanner.scan(now);

        self.set_phase(CyclePhase::PatternEval);
        let pattern_results = self.patterns.evaluate(&scanner_results);

        self.set_phase(CyclePhase::StrategyEval);
        let intents = self.strategies.generate(&pattern_results);

        self.set_phase(CyclePhase::RiskEval);
        let decisions = self.risk.evaluate_all(&intents);

        self.set_phase(CyclePhase::Execution);
        let executions = self.execution.execute_all_at(&decisions, now);

        self.set_phase(CyclePhase::Storage);
        let record = TradeRecord {
            cycle,
            recorded_at: now,
            session,
            swept_trade_ids,
            scanner_results,
            pattern_results,
            intents,
            decisions,
            executions,
        };
        if let Err(err) = self.storage.store(&record) {
            warn!("Cycle record not stored cycle={}: {}", cycle, err);
        }

        self.set_phase(CyclePhase::Idle);

        let simulated = record
            .executions
            .iter()
            .filter(|e| e.status == ExecutionStatus::Simulated)
            .count();
        let blocked = record
            .executions
            .iter()
            .filter(|e| e.status == ExecutionStatus::Blocked)
            .count();

        self.stats.candidates += record.scanner_results.len() as u64;
        self.stats.patterns += record.pattern_results.len() as u64;
        self.stats.intents += record.intents.len() as u64;
        self.stats.simulated += simulated as u64;
        self.stats.blocked += blocked as u64;

        let open_trades = self.registry.lock().unwrap().active_count();
        let report = CycleReport {
            cycle,
            session,
            swept: record.swept_trade_ids.len(),
            candidates: record.scanner_results.len(),
            patterns: record.pattern_results.len(),
            intents: record.intents.len(),
            simulated,
            blocked,
            open_trades,
        };
        info!(
            "Cycle {} complete candidates={} patterns={} intents={} simulated={} blocked={} swept={} open_trades={}",
            cycle,
            report.candidates,
            report.patterns,
            report.intents,
            report.simulated,
            report.blocked,
            report.swept,
            report.open_trades
        );
        report
    }

    /// Close every OPEN trade strictly older than the configured threshold
    ///
    /// Returns the ids closed, oldest-registered first.
    pub fn sweep_expired_at(&mut self, now: DateTime<Utc>) -> Vec<String> {
        let mut registry = self.registry.lock().unwrap();
        let expired = registry.open_trades_older_than(self.auto_close_after, now);
        for trade_id in &expired {
            registry.close_trade_at(trade_id, SIM_TIME_EXIT, now);
        }
        drop(registry);

        if !expired.is_empty() {
            info!(
                "Age sweep closed {} trade(s) reason={}",
                expired.len(),
                SIM_TIME_EXIT
            );
        }
        self.stats.swept += expired.len() as u64;
        expired
    }

    fn set_phase(&mut self, phase: CyclePhase) {
        debug!("Phase transition {}→{}", self.phase, phase);
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WatchlistEntry;
    use chrono::TimeZone;

    fn watch(symbol: &str, price: f64, gap: f64, rvol: f64) -> WatchlistEntry {
        WatchlistEntry {
            symbol: symbol.to_string(),
            price,
            gap_percent: gap,
            relative_volume: rvol,
        }
    }

    /// PLTR trips both rules; limits stay at the defaults (2 scalper, 1 momentum)
    fn hot_config() -> Config {
        let mut config = Config::default();
        config.watchlist = vec![watch("PLTR", 24.85, 6.4, 3.2)];
        config
    }

    fn orchestrator(config: &Config) -> (CoreOrchestrator, Arc<Mutex<ActiveTradeRegistry>>) {
        let registry = Arc::new(Mutex::new(ActiveTradeRegistry::new()));
        let orchestrator = CoreOrchestrator::from_config(config, Arc::clone(&registry), None);
        (orchestrator, registry)
    }

    fn t0() -> DateTime<Utc> {
        // mid regular session
        Utc.with_ymd_and_hms(2024, 6, 3, 15, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_watchlist_cycle_is_quiet_but_stored() {
        let (mut orchestrator, registry) = orchestrator(&Config::default());

        let report = orchestrator.run_once_at(t0());
        assert_eq!(report.cycle, 1);
        assert_eq!(report.candidates, 0);
        assert_eq!(report.patterns, 0);
        assert_eq!(report.intents, 0);
        assert_eq!(report.simulated, 0);
        assert_eq!(report.blocked, 0);
        assert_eq!(report.open_trades, 0);

        // the empty record still reaches storage
        assert_eq!(orchestrator.stored_records(), 1);
        assert!(registry.lock().unwrap().is_empty());
        assert_eq!(orchestrator.phase(), CyclePhase::Idle);
    }

    #[test]
    fn test_hot_candidate_flows_through_to_registry() {
        let (mut orchestrator, registry) = orchestrator(&hot_config());

        let report = orchestrator.run_once_at(t0());
        assert_eq!(report.candidates, 1);
        // gap rule and volume rule both fire
        assert_eq!(report.patterns, 2);
        // one intent per claiming strategy
        assert_eq!(report.intents, 2);
        assert_eq!(report.simulated, 2);
        assert_eq!(report.blocked, 0);
        assert_eq!(report.open_trades, 2);
        assert_eq!(report.session, MarketSession::Regular);

        let registry = registry.lock().unwrap();
        assert_eq!(registry.count_active_by_strategy("GapAndGoStrategy"), 1);
        assert_eq!(registry.count_active_by_strategy("MomentumContinuationStrategy"), 1);
    }

    #[test]
    fn test_limits_bite_on_later_cycles() {
        let (mut orchestrator, _registry) = orchestrator(&hot_config());
        orchestrator.run_once_at(t0());

        // second cycle: scalper book has room (1/2), momentum book is full (1/1)
        let second = orchestrator.run_once_at(t0() + Duration::seconds(3));
        assert_eq!(second.simulated, 1);
        assert_eq!(second.blocked, 1);
        assert_eq!(second.open_trades, 3);

        // third cycle: both books full
        let third = orchestrator.run_once_at(t0() + Duration::seconds(6));
        assert_eq!(third.simulated, 0);
        assert_eq!(third.blocked, 2);
        assert_eq!(third.open_trades, 3);
    }

    #[test]
    fn test_sweep_closes_aged_trades_and_frees_slots() {
        let (mut orchestrator, registry) = orchestrator(&hot_config());
        orchestrator.run_once_at(t0());

        // 11s later both trades are past the 10s threshold: swept first,
        // then the freed books fill again within the same cycle
        let report = orchestrator.run_once_at(t0() + Duration::seconds(11));
        assert_eq!(report.swept, 2);
        assert_eq!(report.simulated, 2);
        assert_eq!(report.open_trades, 2);

        let registry = registry.lock().unwrap();
        assert_eq!(registry.len(), 4);
        let closed: Vec<_> = registry
            .all_trades()
            .iter()
            .filter(|t| !t.is_open())
            .collect();
        assert_eq!(closed.len(), 2);
        assert!(closed
            .iter()
            .all(|t| t.close_reason.as_deref() == Some(SIM_TIME_EXIT)));
    }

    #[test]
    fn test_sweep_threshold_is_strict() {
        let (mut orchestrator, _registry) = orchestrator(&hot_config());
        orchestrator.run_once_at(t0());

        // exactly 10s old is not "older than 10s"
        let at_threshold = orchestrator.sweep_expired_at(t0() + Duration::seconds(10));
        assert!(at_threshold.is_empty());

        let past_threshold = orchestrator.sweep_expired_at(t0() + Duration::seconds(11));
        assert_eq!(past_threshold.len(), 2);
    }

    #[test]
    fn test_stats_accumulate_across_cycles() {
        let (mut orchestrator, _registry) = orchestrator(&hot_config());
        orchestrator.run_once_at(t0());
        orchestrator.run_once_at(t0() + Duration::seconds(3));

        let stats = orchestrator.stats();
        assert_eq!(stats.cycles, 2);
        assert_eq!(stats.candidates, 2);
        assert_eq!(stats.patterns, 4);
        assert_eq!(stats.intents, 4);
        assert_eq!(stats.simulated, 3);
        assert_eq!(stats.blocked, 1);
        assert_eq!(orchestrator.stored_records(), 2);
    }

    #[test]
    fn test_hand_wired_stages_run_the_same_pipeline() {
        let config = hot_config();
        let registry = Arc::new(Mutex::new(ActiveTradeRegistry::new()));
        let stages = PipelineStages {
            scanner: Scanner::new(config.watchlist.clone()),
            patterns: PatternEngine::new(
                config.patterns.min_gap_percent_decimal(),
                config.patterns.min_relative_volume_decimal(),
            ),
            strategies: StrategyRunner::with_default_strategies(&config.strategies.enabled),
            risk: RiskEngine::new(
                RiskLimits::from_config(&config.risk.limits),
                Arc::clone(&registry),
            ),
            execution: ExecutionEngine::new(Arc::clone(&registry), None),
            storage: StorageEngine::new(),
        };
        let mut orchestrator = CoreOrchestrator::new(
            Arc::clone(&registry),
            stages,
            config.orchestrator.auto_close_after(),
        );

        let report = orchestrator.run_once_at(t0());
        assert_eq!(report.simulated, 2);
        assert_eq!(report.open_trades, 2);
        assert_eq!(registry.lock().unwrap().active_count(), 2);
    }
}
