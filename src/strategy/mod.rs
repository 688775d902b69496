//! Strategy layer
//!
//! Strategies are small plugins behind the [`Strategy`] trait: each one
//! looks at a detected pattern and either claims it by emitting a trade
//! intent or passes. The [`StrategyRunner`] keeps them in a by-name lookup
//! table and only consults the ones enabled in configuration.

pub mod gap_and_go;
pub mod momentum_continuation;

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::core::types::{PatternResult, TradeIntent, TraderType};

pub use gap_and_go::GapAndGoStrategy;
pub use momentum_continuation::MomentumContinuationStrategy;

/// A trading strategy plugin
pub trait Strategy: Send + Sync {
    /// Lookup key, and the `strategy_name` stamped on every intent
    fn name(&self) -> &'static str;

    /// Trader archetype this strategy's intents are routed to
    fn trader_type(&self) -> TraderType;

    /// Claim a pattern by producing an intent, or pass with `None`
    fn evaluate(&self, pattern: &PatternResult) -> Option<TradeIntent>;
}

/// Runs every enabled strategy over the cycle's patterns
pub struct StrategyRunner {
    /// Lookup table keyed by strategy name
    strategies: HashMap<String, Box<dyn Strategy>>,
    /// Registration order, so generation stays deterministic
    order: Vec<String>,
    /// Names enabled via configuration
    enabled: HashSet<String>,
}

impl StrategyRunner {
    /// Create an empty runner; only the named strategies will run
    pub fn new(enabled_names: &[String]) -> Self {
        Self {
            strategies: HashMap::new(),
            order: Vec::new(),
            enabled: enabled_names.iter().cloned().collect(),
        }
    }

    /// Create a runner with the built-in strategies registered
    pub fn with_default_strategies(enabled_names: &[String]) -> Self {
        let mut runner = Self::new(enabled_names);
        runner.register(Box::new(GapAndGoStrategy));
        runner.register(Box::new(MomentumContinuationStrategy));
        runner
    }

    /// Add a strategy under its own name
    pub fn register(&mut self, strategy: Box<dyn Strategy>) {
        let name = strategy.name().to_string();
        if self.strategies.insert(name.clone(), strategy).is_some() {
            warn!("Strategy re-registered name={}; previous entry replaced", name);
        } else {
            self.order.push(name.clone());
        }
        info!(
            "Strategy registered name={} enabled={}",
            name,
            self.enabled.contains(&name)
        );
    }

    /// Look up a strategy by name
    pub fn get(&self, name: &str) -> Option<&dyn Strategy> {
        self.strategies.get(name).map(|s| s.as_ref())
    }

    /// Whether configuration enables the named strategy
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }

    /// Registered names in registration order
    pub fn strategy_names(&self) -> Vec<&str> {
        self.order.iter().map(|n| n.as_str()).collect()
    }

    /// Run every enabled strategy over every pattern, in registration order
    pub fn generate(&self, patterns: &[PatternResult]) -> Vec<TradeIntent> {
        if patterns.is_empty() {
            info!("No patterns to evaluate; no intents this cycle");
            return Vec::new();
        }

        let mut intents = Vec::new();
        for name in &self.order {
            if !self.enabled.contains(name) {
                debug!("Strategy disabled name={}; skipping", name);
                continue;
            }
            // names in `order` are always present in the table
            let strategy = match self.strategies.get(name) {
                Some(s) => s,
                None => continue,
            };
            for pattern in patterns {
                if let Some(intent) = strategy.evaluate(pattern) {
                    info!(
                        "Intent generated strategy={} symbol={} direction={} trader_type={}",
                        intent.strategy_name, intent.symbol, intent.direction, intent.trader_type
                    );
                    intents.push(intent);
                }
            }
        }

        info!(
            "Strategy pass complete patterns={} intents={}",
            patterns.len(),
            intents.len()
        );
        intents
    }
}
