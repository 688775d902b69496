//! Storage engine
//!
//! Persistence stub. Accepts each cycle's record, narrates it, counts it
//! and reports success; nothing is written anywhere and a restart loses
//! everything. The fallible signature is the seam a real backend would
//! fill in.

use anyhow::Result;
use tracing::info;

use crate::core::types::TradeRecord;

/// No-op sink for cycle records
#[derive(Debug, Default)]
pub struct StorageEngine {
    stored: u64,
}

impl StorageEngine {
    pub fn new() -> Self {
        Self { stored: 0 }
    }

    /// Accept one cycle record; always succeeds
    pub fn store(&mut self, record: &TradeRecord) -> Result<()> {
        self.stored += 1;
        info!(
            "Stored cycle record cycle={} candidates={} patterns={} intents={} decisions={} executions={} swept={} (no-op persistence)",
            record.cycle,
            record.scanner_results.len(),
            record.pattern_results.len(),
            record.intents.len(),
            record.decisions.len(),
            record.executions.len(),
            record.swept_trade_ids.len()
        );
        Ok(())
    }

    /// Records accepted since construction
    pub fn stored_count(&self) -> u64 {
        self.stored
    }
}
