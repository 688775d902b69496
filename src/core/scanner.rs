//! Market scanner
//!
//! Produces the cycle's candidate list from the configured watchlist.
//! There is no live data feed behind this: each watchlist entry carries its
//! own snapshot figures, so a given config and instant always scan to the
//! same candidates. An empty watchlist is a normal, quiet market.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::WatchlistEntry;
use crate::core::types::{MarketSession, ScannerResult};

/// Watchlist-driven candidate source
pub struct Scanner {
    watchlist: Vec<WatchlistEntry>,
}

impl Scanner {
    /// Create a scanner over the configured watchlist
    pub fn new(watchlist: Vec<WatchlistEntry>) -> Self {
        Self { watchlist }
    }

    /// Produce one candidate per watchlist entry, stamped with the cycle
    /// instant and its market session
    pub fn scan(&self, now: DateTime<Utc>) -> Vec<ScannerResult> {
        let session = MarketSession::at(now);

        if self.watchlist.is_empty() {
            info!("Watchlist is empty; no candidates this cycle");
            return Vec::new();
        }

        let results: Vec<ScannerResult> = self
            .watchlist
            .iter()
            .map(|entry| ScannerResult {
                symbol: entry.symbol.clone(),
                price: entry.price_decimal(),
                gap_percent: entry.gap_percent_decimal(),
                relative_volume: entry.relative_volume_decimal(),
                session,
                scanned_at: now,
            })
            .collect();

        info!(
            "Scan complete session={} candidates={}",
            session,
            results.len()
        );
        results
    }
}
