//! Simulation broker placeholder
//!
//! Carries the connection lifecycle so the wiring stays honest, and
//! refuses every order: entries are simulated upstream in the execution
//! engine, and nothing in this system may route an order out.

use anyhow::{bail, Result};
use async_trait::async_trait;
use tracing::{info, warn};

use crate::broker::{Broker, OrderRequest, OrderState, OrderStatus};

/// Inert broker used in SIM mode
#[derive(Debug, Default)]
pub struct SimBroker {
    connected: bool,
}

impl SimBroker {
    pub fn new() -> Self {
        Self { connected: false }
    }
}

#[async_trait]
impl Broker for SimBroker {
    async fn connect(&mut self) -> Result<()> {
        self.connected = true;
        info!("Sim broker connected (no external session exists)");
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.connected = false;
        info!("Sim broker disconnected");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn submit_order(&mut self, order: OrderRequest) -> Result<OrderStatus> {
        warn!(
            "Order refused symbol={} direction={} quantity={} comment={:?}: simulation never routes orders",
            order.symbol, order.direction, order.quantity, order.comment
        );
        bail!("simulation broker never routes orders");
    }

    async fn get_order_status(&self, order_id: &str) -> Result<OrderStatus> {
        Ok(OrderStatus {
            order_id: order_id.to_string(),
            state: OrderState::Unknown,
            detail: Some("no orders are ever routed in simulation".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Direction;

    #[tokio::test]
    async fn test_connection_lifecycle() {
        let mut broker = SimBroker::new();
        assert!(!broker.is_connected());

        broker.connect().await.unwrap();
        assert!(broker.is_connected());

        broker.disconnect().await.unwrap();
        assert!(!broker.is_connected());
    }

    #[tokio::test]
    async fn test_orders_are_always_refused() {
        let mut broker = SimBroker::new();
        broker.connect().await.unwrap();

        let order = OrderRequest {
            symbol: "PLTR".to_string(),
            direction: Direction::Long,
            quantity: 1,
            comment: "should never route".to_string(),
        };
        assert!(broker.submit_order(order).await.is_err());
    }

    #[tokio::test]
    async fn test_order_status_is_unknown() {
        let broker = SimBroker::new();
        let status = broker.get_order_status("PLTR-1-1").await.unwrap();

        assert_eq!(status.state, OrderState::Unknown);
        assert_eq!(status.order_id, "PLTR-1-1");
    }
}
