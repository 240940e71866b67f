// 11.0.2: result types and errors for session operations.

use crate::client::{ClientError, OrderStatus};
use crate::config::ConfigError;
use crate::order::OrderError;
use crate::types::{Digest, ProductId, Side, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A successfully submitted order, as reported back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub digest: Digest,
    pub product_id: ProductId,
    pub side: Side,
    pub price: Decimal,
    pub size: Decimal,
    pub status: OrderStatus,
    pub submitted_at: Timestamp,
}

/// Outcome of a bulk cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOutcome {
    /// Pending-cache entries evicted alongside the venue-side cancel.
    pub pending_evicted: usize,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TraderError {
    #[error("not connected to the exchange")]
    NotConnected,

    #[error("unknown product id {0}")]
    UnknownProduct(ProductId),

    #[error("invalid order: {0}")]
    Order(#[from] OrderError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),
}
