//! Execution engine
//!
//! The simulation boundary. An allowed decision becomes a registered
//! [`ActiveTrade`] and a SIMULATED result; a blocked decision comes back
//! BLOCKED without touching the registry; an absent decision comes back
//! SKIPPED. A broker handle is held for wiring shape but never called:
//! stopping in front of the broker is the point of this system.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::broker::SharedBroker;
use crate::core::types::{ExecutionResult, RiskDecision};
use crate::registry::{ActiveTrade, ActiveTradeRegistry};

/// Turns approved risk decisions into registered simulated trades
pub struct ExecutionEngine {
    registry: Arc<Mutex<ActiveTradeRegistry>>,
    /// Future order-routing seam; held but never called in simulation
    _broker: Option<SharedBroker>,
    /// Distinguishes trades registered within the same millisecond
    sequence: u64,
}

impl ExecutionEngine {
    pub fn new(registry: Arc<Mutex<ActiveTradeRegistry>>, broker: Option<SharedBroker>) -> Self {
        info!(
            "Execution engine ready broker_attached={} (simulation only, broker is never called)",
            broker.is_some()
        );
        Self { registry, _broker: broker, sequence: 0 }
    }

    /// Process one decision using the wall clock
    pub fn execute(&mut self, decision: Option<&RiskDecision>) -> ExecutionResult {
        self.execute_at(decision, Utc::now())
    }

    /// Process one decision, stamping any registered trade with `now`
    pub fn execute_at(&mut self, decision: Option<&RiskDecision>, now: DateTime<Utc>) -> ExecutionResult {
        let decision = match decision {
            Some(d) => d,
            None => {
                info!("No risk decision to execute; skipping");
                return ExecutionResult::skipped(
                    "No risk decision reached execution".to_string(),
                );
            }
        };

        let intent = &decision.intent;
        if !decision.allowed {
            info!(
                "Decision blocked upstream symbol={} trader_type={}; registry untouched",
                intent.symbol, intent.trader_type
            );
            return ExecutionResult::blocked(
                intent.symbol.clone(),
                intent.trader_type,
                decision.rationale.clone(),
            );
        }

        self.sequence += 1;
        let trade_id = format!("{}-{}-{}", intent.symbol, now.timestamp_millis(), self.sequence);
        let trade = ActiveTrade::new(
            trade_id.clone(),
            intent.symbol.clone(),
            intent.strategy_name.clone(),
            intent.trader_type,
            intent.direction,
            decision.max_position_size,
            now,
        );

        match self.registry.lock().unwrap().register_trade(trade) {
            Ok(()) => {
                info!(
                    "Simulated entry trade_id={} symbol={} strategy={} trader_type={} direction={} (no broker call in SIM)",
                    trade_id, intent.symbol, intent.strategy_name, intent.trader_type, intent.direction
                );
                ExecutionResult::simulated(
                    intent.symbol.clone(),
                    intent.trader_type,
                    trade_id,
                    "Simulated entry registered; broker untouched".to_string(),
                )
            }
            Err(err) => {
                warn!(
                    "Registration rejected trade_id={} symbol={}: {}",
                    trade_id, intent.symbol, err
                );
                ExecutionResult::blocked(
                    intent.symbol.clone(),
                    intent.trader_type,
                    format!("Registration rejected: {}", err),
                )
            }
        }
    }

    /// Process each decision independently, in order
    ///
    /// Zero decisions produce zero results; the SKIPPED status is for an
    /// explicitly absent decision, not for an empty cycle.
    pub fn execute_all_at(&mut self, decisions: &[RiskDecision], now: DateTime<Utc>) -> Vec<ExecutionResult> {
        if decisions.is_empty() {
            info!("No risk decisions this cycle; nothing to execute");
            return Vec::new();
        }
        decisions
            .iter()
            .map(|decision| self.execute_at(Some(decision), now))
            .collect()
    }
}
