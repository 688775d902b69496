//! Broker Module
//!
//! Abstractions for broker connections.
//! Currently supports: simulation placeholder only
//! Future: real connectivity behind the same trait

pub mod sim;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::core::types::Direction;

pub use sim::SimBroker;

/// Broker handle shared between the entry point and the execution engine
pub type SharedBroker = Arc<Mutex<dyn Broker>>;

/// Broker trait - all broker implementations must implement this
#[async_trait]
pub trait Broker: Send + Sync {
    /// Connect to the broker
    async fn connect(&mut self) -> Result<()>;

    /// Disconnect from the broker
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Submit an order
    async fn submit_order(&mut self, order: OrderRequest) -> Result<OrderStatus>;

    /// Look up a previously submitted order
    async fn get_order_status(&self, order_id: &str) -> Result<OrderStatus>;
}

/// Order request
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub symbol: String,
    pub direction: Direction,
    pub quantity: u32,
    pub comment: String,
}

/// Broker-side view of an order
#[derive(Debug, Clone)]
pub struct OrderStatus {
    pub order_id: String,
    pub state: OrderState,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderState {
    Accepted,
    Rejected,
    Unknown,
}
