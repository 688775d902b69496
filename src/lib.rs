//! Daybreak Library
//!
//! A simulated momentum day-trading core in the small-account teaching style.
//!
//! # Philosophy
//!
//! - Scan for gappers, trade the momentum, get flat fast
//! - Hard per-trader-type limits instead of discretion
//! - Every entry is simulated; no order ever leaves the process

pub mod core;
pub mod registry;
pub mod strategy;
pub mod broker;
pub mod storage;
pub mod config;
