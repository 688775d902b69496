//! Core type definitions for the trading pipeline
//!
//! Everything that flows between stages during a single cycle lives here:
//! scanner candidates, pattern matches, trade intents, risk decisions,
//! execution outcomes and the per-cycle record handed to storage.

use chrono::{DateTime, Duration, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trader archetype an intent is routed to
///
/// Concurrent-exposure limits are enforced per archetype, not per strategy,
/// so two strategies feeding the same archetype share one budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraderType {
    Scalper,
    Momentum,
    Swing,
}

impl TraderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraderType::Scalper => "SCALPER",
            TraderType::Momentum => "MOMENTUM",
            TraderType::Swing => "SWING",
        }
    }

    /// Parse a configuration key, case-insensitively
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SCALPER" => Some(TraderType::Scalper),
            "MOMENTUM" => Some(TraderType::Momentum),
            "SWING" => Some(TraderType::Swing),
            _ => None,
        }
    }
}

impl std::fmt::Display for TraderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Risk classification attached to an approved or rejected intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Blocked,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Blocked => "BLOCKED",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome class of one execution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Trade was registered in the simulated book
    Simulated,
    /// Risk said no; nothing was registered
    Blocked,
    /// Nothing reached the execution stage
    Skipped,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Simulated => "SIMULATED",
            ExecutionStatus::Blocked => "BLOCKED",
            ExecutionStatus::Skipped => "SKIPPED",
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// US equities trading session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketSession {
    Pre,
    Regular,
    After,
    Closed,
}

impl MarketSession {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketSession::Pre => "PRE",
            MarketSession::Regular => "REGULAR",
            MarketSession::After => "AFTER",
            MarketSession::Closed => "CLOSED",
        }
    }

    /// Session for the given instant
    ///
    /// Exchange-local time is approximated as a fixed UTC-4 offset.
    /// Windows: 04:00-09:30 pre-market, 09:30-16:00 regular, 16:00-20:00
    /// after-hours, otherwise closed.
    pub fn at(now: DateTime<Utc>) -> Self {
        let local = now - Duration::hours(4);
        let minutes = local.hour() * 60 + local.minute();
        match minutes {
            240..=569 => MarketSession::Pre,
            570..=959 => MarketSession::Regular,
            960..=1199 => MarketSession::After,
            _ => MarketSession::Closed,
        }
    }
}

impl std::fmt::Display for MarketSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One symbol's snapshot produced by the scanner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerResult {
    pub symbol: String,
    /// Last traded price
    pub price: Decimal,
    /// Gap from prior close, in percent (4.0 = gapped up 4%)
    pub gap_percent: Decimal,
    /// Volume relative to the symbol's recent average (2.0 = twice normal)
    pub relative_volume: Decimal,
    pub session: MarketSession,
    pub scanned_at: DateTime<Utc>,
}

/// One pattern detected on one symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternResult {
    pub symbol: String,
    pub pattern_name: String,
    pub direction: Direction,
    /// Detection confidence in [0, 1]
    pub confidence: Decimal,
    pub price: Decimal,
}

/// A strategy's deliberate request to attempt a trade, pending risk approval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeIntent {
    pub symbol: String,
    pub direction: Direction,
    pub trader_type: TraderType,
    pub strategy_name: String,
    /// Confidence inherited from the triggering pattern
    pub confidence: Decimal,
    /// The strategy's stated reason for wanting the trade
    pub rationale: String,
}

/// Permission or denial to execute a [`TradeIntent`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskDecision {
    /// The intent this decision covers
    pub intent: TradeIntent,
    pub allowed: bool,
    pub risk_level: RiskLevel,
    /// Units the execution stage may register (0 when blocked)
    pub max_position_size: u32,
    pub rationale: String,
}

impl RiskDecision {
    /// Approve an intent at the given risk level
    pub fn allow(intent: TradeIntent, risk_level: RiskLevel, max_position_size: u32, rationale: String) -> Self {
        Self { intent, allowed: true, risk_level, max_position_size, rationale }
    }

    /// Reject an intent outright
    pub fn block(intent: TradeIntent, rationale: String) -> Self {
        Self {
            intent,
            allowed: false,
            risk_level: RiskLevel::Blocked,
            max_position_size: 0,
            rationale,
        }
    }
}

/// Outcome of routing one risk decision through the execution stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub symbol: Option<String>,
    pub trader_type: Option<TraderType>,
    /// Registry id of the simulated trade, when one was registered
    pub trade_id: Option<String>,
    pub status: ExecutionStatus,
    /// Whether the stage attempted a (simulated) entry at all
    pub attempted: bool,
    pub rationale: String,
}

impl ExecutionResult {
    /// Nothing reached execution
    pub fn skipped(rationale: String) -> Self {
        Self {
            symbol: None,
            trader_type: None,
            trade_id: None,
            status: ExecutionStatus::Skipped,
            attempted: false,
            rationale,
        }
    }

    /// Risk rejected the intent; no registry mutation happened
    pub fn blocked(symbol: String, trader_type: TraderType, rationale: String) -> Self {
        Self {
            symbol: Some(symbol),
            trader_type: Some(trader_type),
            trade_id: None,
            status: ExecutionStatus::Blocked,
            attempted: false,
            rationale,
        }
    }

    /// A simulated trade was registered under the given id
    pub fn simulated(symbol: String, trader_type: TraderType, trade_id: String, rationale: String) -> Self {
        Self {
            symbol: Some(symbol),
            trader_type: Some(trader_type),
            trade_id: Some(trade_id),
            status: ExecutionStatus::Simulated,
            attempted: true,
            rationale,
        }
    }
}

/// Full trace of one cycle, handed to storage at the end of the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Cycle counter, starting at 1
    pub cycle: u64,
    pub recorded_at: DateTime<Utc>,
    pub session: MarketSession,
    /// Trades the age sweep closed at the start of this cycle
    pub swept_trade_ids: Vec<String>,
    pub scanner_results: Vec<ScannerResult>,
    pub pattern_results: Vec<PatternResult>,
    pub intents: Vec<TradeIntent>,
    pub decisions: Vec<RiskDecision>,
    pub executions: Vec<ExecutionResult>,
}
