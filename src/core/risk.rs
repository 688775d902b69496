//! Risk engine
//!
//! The gate between intent and execution. The enforced limit is
//! per-trader-type concurrent exposure, read from the registry at call
//! time; confidence only grades approved intents, it never blocks them,
//! and direction is not considered at all.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{info, warn};

use crate::core::types::{RiskDecision, RiskLevel, TradeIntent, TraderType};
use crate::registry::ActiveTradeRegistry;

/// Units the execution stage may register per approved intent
pub const APPROVED_POSITION_SIZE: u32 = 1;

/// Confidence at or above which an approved intent grades LOW
const LOW_RISK_CONFIDENCE: Decimal = dec!(0.75);

/// Confidence at or above which an approved intent grades MEDIUM
const MEDIUM_RISK_CONFIDENCE: Decimal = dec!(0.50);

/// Per-trader-type concurrent trade limits
///
/// Trader types without an entry are unlimited on this check.
#[derive(Debug, Clone)]
pub struct RiskLimits {
    limits: HashMap<TraderType, usize>,
}

impl Default for RiskLimits {
    fn default() -> Self {
        let mut limits = HashMap::new();
        limits.insert(TraderType::Scalper, 2);
        limits.insert(TraderType::Momentum, 1);
        Self { limits }
    }
}

impl RiskLimits {
    /// Build from configuration keys; unknown trader types are logged and
    /// skipped rather than failing the whole config
    pub fn from_config(configured: &HashMap<String, usize>) -> Self {
        let mut limits = HashMap::new();
        for (key, max_trades) in configured {
            match TraderType::from_str(key) {
                Some(trader_type) => {
                    limits.insert(trader_type, *max_trades);
                }
                None => {
                    warn!("Unknown trader type in risk limits key={}; entry ignored", key);
                }
            }
        }
        Self { limits }
    }

    /// Configured limit for a trader type, if any
    pub fn limit_for(&self, trader_type: TraderType) -> Option<usize> {
        self.limits.get(&trader_type).copied()
    }
}

/// Limit gate over the shared trade registry
pub struct RiskEngine {
    limits: RiskLimits,
    registry: Arc<Mutex<ActiveTradeRegistry>>,
}

impl RiskEngine {
    pub fn new(limits: RiskLimits, registry: Arc<Mutex<ActiveTradeRegistry>>) -> Self {
        Self { limits, registry }
    }

    /// Decide on a single intent against the registry's counts right now
    pub fn evaluate(&self, intent: &TradeIntent) -> RiskDecision {
        let open = self
            .registry
            .lock()
            .unwrap()
            .count_active_by_trader_type(intent.trader_type);

        if let Some(max_trades) = self.limits.limit_for(intent.trader_type) {
            if open >= max_trades {
                let rationale = format!(
                    "Max concurrent trades reached for {} ({}/{})",
                    intent.trader_type, open, max_trades
                );
                warn!(
                    "Intent blocked symbol={} trader_type={} open={} max={}",
                    intent.symbol, intent.trader_type, open, max_trades
                );
                return RiskDecision::block(intent.clone(), rationale);
            }
        }

        let risk_level = classify(intent.confidence);
        let rationale = format!(
            "Approved at {} risk: confidence={}, {} open {} trades",
            risk_level, intent.confidence, open, intent.trader_type
        );
        info!(
            "Intent approved symbol={} trader_type={} risk_level={} size={}",
            intent.symbol, intent.trader_type, risk_level, APPROVED_POSITION_SIZE
        );
        RiskDecision::allow(intent.clone(), risk_level, APPROVED_POSITION_SIZE, rationale)
    }

    /// Decide on each intent independently, in order
    pub fn evaluate_all(&self, intents: &[TradeIntent]) -> Vec<RiskDecision> {
        if intents.is_empty() {
            info!("No intents to evaluate; no risk decisions this cycle");
            return Vec::new();
        }
        intents.iter().map(|intent| self.evaluate(intent)).collect()
    }
}

/// Grade confidence into a risk level for an approved intent
fn classify(confidence: Decimal) -> RiskLevel {
    if confidence >= LOW_RISK_CONFIDENCE {
        RiskLevel::Low
    } else if confidence >= MEDIUM_RISK_CONFIDENCE {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Direction;
    use crate::registry::ActiveTrade;
    use chrono::Utc;

    fn intent(trader_type: TraderType, confidence: Decimal) -> TradeIntent {
        TradeIntent {
            symbol: "PLTR".to_string(),
            direction: Direction::Long,
            trader_type,
            strategy_name: "GapAndGoStrategy".to_string(),
            confidence,
            rationale: "gap continuation".to_string(),
        }
    }

    fn engine_with_registry() -> (RiskEngine, Arc<Mutex<ActiveTradeRegistry>>) {
        let registry = Arc::new(Mutex::new(ActiveTradeRegistry::new()));
        let engine = RiskEngine::new(RiskLimits::default(), Arc::clone(&registry));
        (engine, registry)
    }

    fn register_open_trade(registry: &Arc<Mutex<ActiveTradeRegistry>>, id: &str, trader_type: TraderType) {
        registry
            .lock()
            .unwrap()
            .register_trade(ActiveTrade::new(
                id.to_string(),
                "PLTR".to_string(),
                "GapAndGoStrategy".to_string(),
                trader_type,
                Direction::Long,
                1,
                Utc::now(),
            ))
            .unwrap();
    }

    #[test]
    fn test_confidence_classification_bands() {
        let (engine, _registry) = engine_with_registry();

        let low = engine.evaluate(&intent(TraderType::Scalper, dec!(0.82)));
        assert!(low.allowed);
        assert_eq!(low.risk_level, RiskLevel::Low);
        assert_eq!(low.max_position_size, 1);

        let boundary_low = engine.evaluate(&intent(TraderType::Scalper, dec!(0.75)));
        assert_eq!(boundary_low.risk_level, RiskLevel::Low);

        let medium = engine.evaluate(&intent(TraderType::Momentum, dec!(0.6)));
        assert!(medium.allowed);
        assert_eq!(medium.risk_level, RiskLevel::Medium);

        let boundary_medium = engine.evaluate(&intent(TraderType::Momentum, dec!(0.5)));
        assert_eq!(boundary_medium.risk_level, RiskLevel::Medium);

        let high = engine.evaluate(&intent(TraderType::Momentum, dec!(0.3)));
        assert!(high.allowed);
        assert_eq!(high.risk_level, RiskLevel::High);
        assert_eq!(high.max_position_size, 1);
    }

    #[test]
    fn test_limit_blocks_when_book_is_full() {
        let (engine, registry) = engine_with_registry();

        // scalper limit is 2: fill the book one trade at a time
        let first = engine.evaluate(&intent(TraderType::Scalper, dec!(0.82)));
        assert!(first.allowed);
        register_open_trade(&registry, "PLTR-1", TraderType::Scalper);

        let second = engine.evaluate(&intent(TraderType::Scalper, dec!(0.82)));
        assert!(second.allowed);
        register_open_trade(&registry, "PLTR-2", TraderType::Scalper);

        let third = engine.evaluate(&intent(TraderType::Scalper, dec!(0.82)));
        assert!(!third.allowed);
        assert_eq!(third.risk_level, RiskLevel::Blocked);
        assert_eq!(third.max_position_size, 0);
        assert!(third.rationale.contains("2/2"));
    }

    #[test]
    fn test_closing_a_trade_frees_the_slot() {
        let (engine, registry) = engine_with_registry();
        register_open_trade(&registry, "TSLA-1", TraderType::Momentum);

        let blocked = engine.evaluate(&intent(TraderType::Momentum, dec!(0.72)));
        assert!(!blocked.allowed);

        registry.lock().unwrap().close_trade("TSLA-1", "SIM_TIME_EXIT");
        let allowed = engine.evaluate(&intent(TraderType::Momentum, dec!(0.72)));
        assert!(allowed.allowed);
    }

    #[test]
    fn test_unconfigured_trader_type_is_unlimited() {
        let (engine, registry) = engine_with_registry();
        for i in 0..5 {
            register_open_trade(&registry, &format!("SW-{}", i), TraderType::Swing);
        }

        let decision = engine.evaluate(&intent(TraderType::Swing, dec!(0.9)));
        assert!(decision.allowed);
        assert_eq!(decision.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_identical_state_yields_identical_decision() {
        let (engine, registry) = engine_with_registry();
        register_open_trade(&registry, "PLTR-1", TraderType::Scalper);

        let the_intent = intent(TraderType::Scalper, dec!(0.68));
        let first = engine.evaluate(&the_intent);
        let second = engine.evaluate(&the_intent);

        assert_eq!(first.allowed, second.allowed);
        assert_eq!(first.risk_level, second.risk_level);
        assert_eq!(first.max_position_size, second.max_position_size);
        assert_eq!(first.rationale, second.rationale);
    }

    #[test]
    fn test_limits_from_config_normalize_and_filter() {
        let mut configured = HashMap::new();
        configured.insert("scalper".to_string(), 3);
        configured.insert("Momentum".to_string(), 2);
        configured.insert("ARBITRAGE".to_string(), 9);
        let limits = RiskLimits::from_config(&configured);

        assert_eq!(limits.limit_for(TraderType::Scalper), Some(3));
        assert_eq!(limits.limit_for(TraderType::Momentum), Some(2));
        assert_eq!(limits.limit_for(TraderType::Swing), None);
    }

    #[test]
    fn test_evaluate_all_orders_decisions_like_intents() {
        let (engine, _registry) = engine_with_registry();
        let intents = vec![
            intent(TraderType::Scalper, dec!(0.82)),
            intent(TraderType::Momentum, dec!(0.72)),
        ];

        let decisions = engine.evaluate_all(&intents);
        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].intent.trader_type, TraderType::Scalper);
        assert_eq!(decisions[1].intent.trader_type, TraderType::Momentum);
        assert!(engine.evaluate_all(&[]).is_empty());
    }
}
