//! Pattern engine
//!
//! Deterministic threshold rules over scanner candidates. Two rules run on
//! every candidate: a gap rule and a relative-volume rule, and one symbol
//! can light up both. Confidence is a clamped linear score of the figure
//! that triggered the rule, so identical inputs always grade identically.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use crate::core::types::{Direction, PatternResult, ScannerResult};

/// Pattern label produced by the gap rule
pub const GAP_AND_GO_PATTERN: &str = "Gap and Go (Teaching)";

/// Pattern label produced by the relative-volume rule
pub const MOMENTUM_CONTINUATION_PATTERN: &str = "Momentum Continuation (Teaching)";

/// Upper bound for any rule's confidence score
const MAX_CONFIDENCE: Decimal = dec!(0.95);

/// Threshold-rule pattern detector
pub struct PatternEngine {
    /// Minimum gap (percent) for the gap rule to fire
    min_gap_percent: Decimal,
    /// Minimum relative volume for the volume rule to fire
    min_relative_volume: Decimal,
}

impl PatternEngine {
    pub fn new(min_gap_percent: Decimal, min_relative_volume: Decimal) -> Self {
        Self { min_gap_percent, min_relative_volume }
    }

    /// Run both rules over every candidate, in candidate order
    pub fn evaluate(&self, candidates: &[ScannerResult]) -> Vec<PatternResult> {
        if candidates.is_empty() {
            info!("No candidates to evaluate; no patterns this cycle");
            return Vec::new();
        }

        let mut detections = Vec::new();
        for candidate in candidates {
            if candidate.gap_percent >= self.min_gap_percent {
                let confidence = gap_confidence(candidate.gap_percent);
                info!(
                    "Pattern detected symbol={} pattern={} confidence={}",
                    candidate.symbol, GAP_AND_GO_PATTERN, confidence
                );
                detections.push(PatternResult {
                    symbol: candidate.symbol.clone(),
                    pattern_name: GAP_AND_GO_PATTERN.to_string(),
                    direction: Direction::Long,
                    confidence,
                    price: candidate.price,
                });
            }

            if candidate.relative_volume >= self.min_relative_volume {
                let confidence = volume_confidence(candidate.relative_volume);
                info!(
                    "Pattern detected symbol={} pattern={} confidence={}",
                    candidate.symbol, MOMENTUM_CONTINUATION_PATTERN, confidence
                );
                detections.push(PatternResult {
                    symbol: candidate.symbol.clone(),
                    pattern_name: MOMENTUM_CONTINUATION_PATTERN.to_string(),
                    direction: Direction::Long,
                    confidence,
                    price: candidate.price,
                });
            }
        }

        info!(
            "Pattern evaluation complete candidates={} detections={}",
            candidates.len(),
            detections.len()
        );
        detections
    }
}

/// Grade a gap: 0.5 base plus 0.05 per gap point, capped
fn gap_confidence(gap_percent: Decimal) -> Decimal {
    (dec!(0.5) + gap_percent / dec!(20)).clamp(Decimal::ZERO, MAX_CONFIDENCE)
}

/// Grade relative volume: 0.4 base plus 0.1 per volume multiple, capped
fn volume_confidence(relative_volume: Decimal) -> Decimal {
    (dec!(0.4) + relative_volume / dec!(10)).clamp(Decimal::ZERO, MAX_CONFIDENCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MarketSession;
    use chrono::Utc;

    fn candidate(symbol: &str, gap: Decimal, rvol: Decimal) -> ScannerResult {
        ScannerResult {
            symbol: symbol.to_string(),
            price: dec!(25),
            gap_percent: gap,
            relative_volume: rvol,
            session: MarketSession::Regular,
            scanned_at: Utc::now(),
        }
    }

    fn engine() -> PatternEngine {
        PatternEngine::new(dec!(4.0), dec!(2.0))
    }

    #[test]
    fn test_no_candidates_no_patterns() {
        assert!(engine().evaluate(&[]).is_empty());
    }

    #[test]
    fn test_quiet_candidate_produces_nothing() {
        let detections = engine().evaluate(&[candidate("AAPL", dec!(1.2), dec!(1.1))]);
        assert!(detections.is_empty());
    }

    #[test]
    fn test_gap_rule_confidence() {
        // 6.4% gap grades to 0.5 + 6.4/20 = 0.82
        let detections = engine().evaluate(&[candidate("PLTR", dec!(6.4), dec!(1.0))]);

        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].pattern_name, GAP_AND_GO_PATTERN);
        assert_eq!(detections[0].direction, Direction::Long);
        assert_eq!(detections[0].confidence, dec!(0.82));
    }

    #[test]
    fn test_volume_rule_confidence() {
        // 3.2x relative volume grades to 0.4 + 3.2/10 = 0.72
        let detections = engine().evaluate(&[candidate("TSLA", dec!(0.5), dec!(3.2))]);

        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].pattern_name, MOMENTUM_CONTINUATION_PATTERN);
        assert_eq!(detections[0].confidence, dec!(0.72));
    }

    #[test]
    fn test_one_symbol_can_fire_both_rules() {
        let detections = engine().evaluate(&[candidate("PLTR", dec!(6.4), dec!(3.2))]);

        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].pattern_name, GAP_AND_GO_PATTERN);
        assert_eq!(detections[1].pattern_name, MOMENTUM_CONTINUATION_PATTERN);
        assert!(detections.iter().all(|d| d.symbol == "PLTR"));
    }

    #[test]
    fn test_confidence_is_capped() {
        let detections = engine().evaluate(&[candidate("GME", dec!(40), dec!(9.9))]);

        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].confidence, dec!(0.95));
        assert_eq!(detections[1].confidence, dec!(0.95));
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let detections = engine().evaluate(&[candidate("AMC", dec!(4.0), dec!(2.0))]);
        assert_eq!(detections.len(), 2);
    }
}
