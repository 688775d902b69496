//! Gap and Go strategy
//!
//! Claims gap patterns and routes them to the scalper book: a stock that
//! gapped up hard tends to keep running through the first pullback, and
//! the scalper takes the quick continuation.

use tracing::debug;

use crate::core::types::{Direction, PatternResult, TradeIntent, TraderType};
use crate::strategy::Strategy;

/// Long-only gap continuation play
pub struct GapAndGoStrategy;

impl Strategy for GapAndGoStrategy {
    fn name(&self) -> &'static str {
        "GapAndGoStrategy"
    }

    fn trader_type(&self) -> TraderType {
        TraderType::Scalper
    }

    fn evaluate(&self, pattern: &PatternResult) -> Option<TradeIntent> {
        if !pattern.pattern_name.contains("Gap and Go") {
            return None;
        }

        debug!(
            "Gap and Go claims symbol={} confidence={}",
            pattern.symbol, pattern.confidence
        );
        Some(TradeIntent {
            symbol: pattern.symbol.clone(),
            direction: Direction::Long,
            trader_type: self.trader_type(),
            strategy_name: self.name().to_string(),
            confidence: pattern.confidence,
            rationale: format!(
                "Gap continuation long at confidence {}",
                pattern.confidence
            ),
        })
    }
}
