//! Core pipeline stages
//!
//! The per-cycle pipeline, in teaching form:
//!
//! - Scan the configured watchlist for candidates
//! - Evaluate gap and relative-volume pattern rules
//! - Route pattern hits through the registered strategies
//! - Gate intents against per-trader-type concurrency limits
//! - Simulate approved entries and register them as OPEN trades
//!
//! Each stage takes the previous stage's full output and returns its
//! own. An empty input is a quiet cycle, never an error.

pub mod types;
pub mod scanner;
pub mod patterns;
pub mod risk;
pub mod execution;
pub mod orchestrator;

// Re-export commonly used types
pub use types::{
    Direction, ExecutionResult, ExecutionStatus, MarketSession, PatternResult, RiskDecision,
    RiskLevel, ScannerResult, TradeIntent, TradeRecord, TraderType,
};
pub use scanner::Scanner;
pub use patterns::{PatternEngine, GAP_AND_GO_PATTERN, MOMENTUM_CONTINUATION_PATTERN};
pub use risk::{RiskEngine, RiskLimits, APPROVED_POSITION_SIZE};
pub use execution::ExecutionEngine;
pub use orchestrator::{
    CoreOrchestrator, CyclePhase, CycleReport, CycleStats, PipelineStages, SIM_TIME_EXIT,
};
