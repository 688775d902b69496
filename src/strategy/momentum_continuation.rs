//! Momentum continuation strategy
//!
//! Claims relative-volume patterns and routes them to the momentum book:
//! sustained volume behind a move is the tell that the move has more room.

use tracing::debug;

use crate::core::types::{Direction, PatternResult, TradeIntent, TraderType};
use crate::strategy::Strategy;

/// Long-only volume-backed continuation play
pub struct MomentumContinuationStrategy;

impl Strategy for MomentumContinuationStrategy {
    fn name(&self) -> &'static str {
        "MomentumContinuationStrategy"
    }

    fn trader_type(&self) -> TraderType {
        TraderType::Momentum
    }

    fn evaluate(&self, pattern: &PatternResult) -> Option<TradeIntent> {
        if !pattern.pattern_name.contains("Momentum Continuation") {
            return None;
        }

        debug!(
            "Momentum continuation claims symbol={} confidence={}",
            pattern.symbol, pattern.confidence
        );
        Some(TradeIntent {
            symbol: pattern.symbol.clone(),
            direction: Direction::Long,
            trader_type: self.trader_type(),
            strategy_name: self.name().to_string(),
            confidence: pattern.confidence,
            rationale: format!(
                "Volume-backed continuation at confidence {}",
                pattern.confidence
            ),
        })
    }
}
