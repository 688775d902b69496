//! Active trade registry - lifecycle truth for the whole system
//!
//! Every simulated entry becomes an [`ActiveTrade`] here, and every close,
//! whether strategy-driven or swept by age, goes back through here.
//! The registry is the only state that survives across cycles.
//!
//! Counts and filtered views are computed from live status on each call,
//! never cached, so they cannot drift from the trades themselves.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::types::{Direction, TraderType};

/// Lifecycle state of a registered trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeStatus {
    Open,
    Closed,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Open => "OPEN",
            TradeStatus::Closed => "CLOSED",
        }
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error raised when a trade cannot be registered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// An OPEN trade with the same id already exists
    DuplicateTradeId(String),
}

impl std::fmt::Display for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisterError::DuplicateTradeId(id) => {
                write!(f, "Trade id already open: {}", id)
            }
        }
    }
}

/// A live or completed simulated trade
///
/// Created OPEN; the registry is the only path to CLOSED, which keeps the
/// transition one-way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveTrade {
    pub trade_id: String,
    pub symbol: String,
    pub strategy_name: String,
    pub trader_type: TraderType,
    pub direction: Direction,
    pub quantity: u32,
    pub entry_timestamp: DateTime<Utc>,
    pub status: TradeStatus,
    /// Why the trade ended (set on close)
    pub close_reason: Option<String>,
    pub close_timestamp: Option<DateTime<Utc>>,
}

impl ActiveTrade {
    /// Create a new trade in OPEN status
    pub fn new(
        trade_id: String,
        symbol: String,
        strategy_name: String,
        trader_type: TraderType,
        direction: Direction,
        quantity: u32,
        entry_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            trade_id,
            symbol,
            strategy_name,
            trader_type,
            direction,
            quantity,
            entry_timestamp,
            status: TradeStatus::Open,
            close_reason: None,
            close_timestamp: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    /// Time elapsed since entry at the given instant
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.entry_timestamp
    }

    /// Transition to CLOSED, stamping reason and close time
    fn close(&mut self, reason: &str, now: DateTime<Utc>) {
        self.status = TradeStatus::Closed;
        self.close_reason = Some(reason.to_string());
        self.close_timestamp = Some(now);
    }
}

/// In-memory registry of all trades, open and closed, in insertion order
///
/// Closed trades stay in the record so a cycle's history remains
/// inspectable; every "active" view filters on OPEN status at call time.
#[derive(Debug, Default)]
pub struct ActiveTradeRegistry {
    trades: Vec<ActiveTrade>,
}

impl ActiveTradeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self { trades: Vec::new() }
    }

    /// Register a newly created trade
    ///
    /// Rejects the trade when another OPEN trade already carries the same
    /// id; an id may be reused once its previous holder has closed.
    pub fn register_trade(&mut self, trade: ActiveTrade) -> Result<(), RegisterError> {
        if self.trades.iter().any(|t| t.is_open() && t.trade_id == trade.trade_id) {
            warn!(
                "Rejected duplicate registration trade_id={} symbol={}",
                trade.trade_id, trade.symbol
            );
            return Err(RegisterError::DuplicateTradeId(trade.trade_id));
        }

        info!(
            "Registered trade trade_id={} symbol={} strategy={} trader_type={} (CREATED→OPEN)",
            trade.trade_id, trade.symbol, trade.strategy_name, trade.trader_type
        );
        self.trades.push(trade);
        Ok(())
    }

    /// Close the OPEN trade with the given id, using the wall clock
    pub fn close_trade(&mut self, trade_id: &str, reason: &str) -> Option<&ActiveTrade> {
        self.close_trade_at(trade_id, reason, Utc::now())
    }

    /// Close the OPEN trade with the given id at an explicit instant
    ///
    /// Returns the closed trade, or `None` when no OPEN trade matches
    /// (unknown id, or already closed). A miss changes nothing.
    pub fn close_trade_at(
        &mut self,
        trade_id: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Option<&ActiveTrade> {
        match self
            .trades
            .iter_mut()
            .find(|t| t.is_open() && t.trade_id == trade_id)
        {
            Some(trade) => {
                trade.close(reason, now);
                info!(
                    "Closed trade trade_id={} symbol={} reason={} (OPEN→CLOSED)",
                    trade.trade_id, trade.symbol, reason
                );
                Some(&*trade)
            }
            None => {
                warn!("No OPEN trade found for trade_id={}; nothing closed", trade_id);
                None
            }
        }
    }

    /// All OPEN trades, in insertion order
    pub fn active_trades(&self) -> Vec<&ActiveTrade> {
        self.trades.iter().filter(|t| t.is_open()).collect()
    }

    /// OPEN trades created by the named strategy (exact match)
    pub fn active_trades_by_strategy(&self, strategy_name: &str) -> Vec<&ActiveTrade> {
        self.trades
            .iter()
            .filter(|t| t.is_open() && t.strategy_name == strategy_name)
            .collect()
    }

    /// OPEN trades routed to the given trader type
    pub fn active_trades_by_trader_type(&self, trader_type: TraderType) -> Vec<&ActiveTrade> {
        self.trades
            .iter()
            .filter(|t| t.is_open() && t.trader_type == trader_type)
            .collect()
    }

    /// Number of OPEN trades for the named strategy, computed now
    ///
    /// Counts through [`Self::active_trades_by_strategy`], so count and view
    /// always agree.
    pub fn count_active_by_strategy(&self, strategy_name: &str) -> usize {
        let count = self.active_trades_by_strategy(strategy_name).len();
        debug!("Active count strategy={} count={}", strategy_name, count);
        count
    }

    /// Number of OPEN trades for the given trader type, computed now
    pub fn count_active_by_trader_type(&self, trader_type: TraderType) -> usize {
        let count = self.active_trades_by_trader_type(trader_type).len();
        debug!("Active count trader_type={} count={}", trader_type, count);
        count
    }

    /// Number of OPEN trades across all strategies and trader types
    pub fn active_count(&self) -> usize {
        self.trades.iter().filter(|t| t.is_open()).count()
    }

    /// OPEN trades strictly older than `max_age` at the given instant
    pub fn open_trades_older_than(&self, max_age: Duration, now: DateTime<Utc>) -> Vec<String> {
        self.trades
            .iter()
            .filter(|t| t.is_open() && t.age(now) > max_age)
            .map(|t| t.trade_id.clone())
            .collect()
    }

    /// Look up any trade (open or closed) by id
    pub fn get(&self, trade_id: &str) -> Option<&ActiveTrade> {
        self.trades.iter().find(|t| t.trade_id == trade_id)
    }

    /// Total records held, open and closed
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// All records, open and closed, in insertion order
    pub fn all_trades(&self) -> &[ActiveTrade] {
        &self.trades
    }
}
