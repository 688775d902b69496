//! Configuration loader
//!
//! Everything tunable lives here: run mode, cycle timing, risk limits,
//! pattern thresholds, strategy governance and the scan watchlist.
//! Thresholds are configuration inputs rather than literals scattered
//! through the stages, and every section has working defaults so the
//! system runs without a config file at all.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use chrono::Duration;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Run mode; only SIM has behavior behind it, the other two merely
/// change what startup says
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunMode {
    Sim,
    Paper,
    Live,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Sim => "SIM",
            RunMode::Paper => "PAPER",
            RunMode::Live => "LIVE",
        }
    }
}

impl Default for RunMode {
    fn default() -> Self {
        RunMode::Sim
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub patterns: PatternConfig,
    #[serde(default)]
    pub strategies: StrategyConfig,
    #[serde(default)]
    pub watchlist: Vec<WatchlistEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system: SystemConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            risk: RiskConfig::default(),
            patterns: PatternConfig::default(),
            strategies: StrategyConfig::default(),
            watchlist: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_system_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub mode: RunMode,
}

fn default_system_name() -> String {
    "Daybreak".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            name: default_system_name(),
            log_level: default_log_level(),
            mode: RunMode::Sim,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OrchestratorConfig {
    /// Seconds between cycle starts
    #[serde(default = "default_cycle_interval_secs")]
    pub cycle_interval_secs: u64,
    /// Seconds an OPEN trade may age before the sweep closes it
    #[serde(default = "default_auto_close_after_secs")]
    pub auto_close_after_secs: u64,
}

fn default_cycle_interval_secs() -> u64 {
    3
}

fn default_auto_close_after_secs() -> u64 {
    10
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            cycle_interval_secs: default_cycle_interval_secs(),
            auto_close_after_secs: default_auto_close_after_secs(),
        }
    }
}

impl OrchestratorConfig {
    pub fn cycle_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cycle_interval_secs)
    }

    pub fn auto_close_after(&self) -> Duration {
        Duration::seconds(self.auto_close_after_secs as i64)
    }
}

#[derive(Debug, Deserialize)]
pub struct RiskConfig {
    /// Max concurrent OPEN trades per trader type; types not listed
    /// here are unlimited
    #[serde(default = "default_risk_limits")]
    pub limits: HashMap<String, usize>,
}

fn default_risk_limits() -> HashMap<String, usize> {
    let mut limits = HashMap::new();
    limits.insert("SCALPER".to_string(), 2);
    limits.insert("MOMENTUM".to_string(), 1);
    limits
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            limits: default_risk_limits(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PatternConfig {
    /// Minimum gap (percent) for the gap rule
    #[serde(default = "default_min_gap_percent")]
    pub min_gap_percent: f64,
    /// Minimum relative volume for the volume rule
    #[serde(default = "default_min_relative_volume")]
    pub min_relative_volume: f64,
}

fn default_min_gap_percent() -> f64 {
    4.0
}

fn default_min_relative_volume() -> f64 {
    2.0
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            min_gap_percent: default_min_gap_percent(),
            min_relative_volume: default_min_relative_volume(),
        }
    }
}

impl PatternConfig {
    pub fn min_gap_percent_decimal(&self) -> Decimal {
        to_decimal(self.min_gap_percent)
    }

    pub fn min_relative_volume_decimal(&self) -> Decimal {
        to_decimal(self.min_relative_volume)
    }
}

#[derive(Debug, Deserialize)]
pub struct StrategyConfig {
    /// Strategy names allowed to produce intents; anything not listed
    /// stays registered but silent
    #[serde(default = "default_enabled_strategies")]
    pub enabled: Vec<String>,
}

fn default_enabled_strategies() -> Vec<String> {
    vec![
        "GapAndGoStrategy".to_string(),
        "MomentumContinuationStrategy".to_string(),
    ]
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_strategies(),
        }
    }
}

/// One symbol under watch, with its snapshot figures
#[derive(Debug, Deserialize, Clone)]
pub struct WatchlistEntry {
    pub symbol: String,
    pub price: f64,
    pub gap_percent: f64,
    pub relative_volume: f64,
}

impl WatchlistEntry {
    pub fn price_decimal(&self) -> Decimal {
        to_decimal(self.price)
    }

    pub fn gap_percent_decimal(&self) -> Decimal {
        to_decimal(self.gap_percent)
    }

    pub fn relative_volume_decimal(&self) -> Decimal {
        to_decimal(self.relative_volume)
    }
}

/// Exact decimal from an f64's shortest printed form
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_str(&value.to_string()).unwrap_or(Decimal::ZERO)
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from `path`, or fall back to built-in defaults when the file
    /// does not exist; a present but malformed file is still an error
    pub fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_match_teaching_setup() {
        let cfg = Config::default();

        assert_eq!(cfg.system.mode, RunMode::Sim);
        assert_eq!(cfg.system.log_level, "info");
        assert_eq!(cfg.orchestrator.cycle_interval_secs, 3);
        assert_eq!(cfg.orchestrator.auto_close_after_secs, 10);
        assert_eq!(cfg.risk.limits.get("SCALPER"), Some(&2));
        assert_eq!(cfg.risk.limits.get("MOMENTUM"), Some(&1));
        assert_eq!(cfg.patterns.min_gap_percent, 4.0);
        assert_eq!(cfg.patterns.min_relative_volume, 2.0);
        assert_eq!(cfg.strategies.enabled.len(), 2);
        assert!(cfg.watchlist.is_empty());
    }

    #[test]
    fn test_parse_full_document() {
        let toml_str = r#"
            [system]
            name = "Daybreak"
            log_level = "debug"
            mode = "PAPER"

            [orchestrator]
            cycle_interval_secs = 1
            auto_close_after_secs = 5

            [risk.limits]
            SCALPER = 3
            momentum = 2

            [patterns]
            min_gap_percent = 5.0
            min_relative_volume = 2.5

            [strategies]
            enabled = ["GapAndGoStrategy"]

            [[watchlist]]
            symbol = "PLTR"
            price = 24.85
            gap_percent = 6.4
            relative_volume = 3.2
        "#;

        let cfg: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.system.mode, RunMode::Paper);
        assert_eq!(cfg.orchestrator.auto_close_after(), Duration::seconds(5));
        assert_eq!(cfg.risk.limits.get("momentum"), Some(&2));
        assert_eq!(cfg.patterns.min_gap_percent_decimal(), dec!(5.0));
        assert_eq!(cfg.strategies.enabled, vec!["GapAndGoStrategy".to_string()]);
        assert_eq!(cfg.watchlist.len(), 1);
        assert_eq!(cfg.watchlist[0].gap_percent_decimal(), dec!(6.4));
        assert_eq!(cfg.watchlist[0].price_decimal(), dec!(24.85));
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let cfg: Config = toml::from_str("[system]\nname = \"Test\"\n").unwrap();

        assert_eq!(cfg.system.name, "Test");
        assert_eq!(cfg.system.mode, RunMode::Sim);
        assert_eq!(cfg.orchestrator.cycle_interval_secs, 3);
        assert_eq!(cfg.risk.limits.len(), 2);
        assert!(cfg.watchlist.is_empty());
    }
}
