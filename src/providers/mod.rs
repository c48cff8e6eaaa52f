mod delivio;
#[cfg(test)]
pub(crate) mod mock_api;
mod session;

use crate::core::error::DeliveryError;
use crate::core::models::OrderStatus;
use async_trait::async_trait;

pub use delivio::DelivioGateway;
pub use session::SessionClient;

/// Source of order status for the poll loop.
///
/// Takes `&mut self`: a tracker owns its session, so only one refresh can be
/// in flight at a time.
#[async_trait]
pub trait OrderTracker: Send {
    async fn refresh_order_status(&mut self) -> Result<OrderStatus, DeliveryError>;
}
