// 9.0: exchange client boundary. everything that actually talks to the venue
// (transport, signing, retries) lives behind this trait; the core only sees
// typed requests and responses. adapters are responsible for resolving the
// venue's optional fields into the defaults declared here, once, at this seam.

use crate::pending::OrderRecord;
use crate::order::WireOrder;
use crate::product::ProductListing;
use crate::types::{Digest, ProductId, Subaccount};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The venue (or the transport to it) reported a failure. The message is
    /// preserved verbatim; the core never retries and never assumes the
    /// request did not take effect.
    #[error("exchange request failed: {0}")]
    Exchange(String),

    /// The venue answered with something the adapter could not interpret.
    #[error("malformed exchange response: {0}")]
    Malformed(String),
}

/// Submission status as reported by the venue. Adapters default to
/// `Submitted` when the venue omits the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Submitted,
    Open,
    Filled,
    Cancelled,
}

/// Acknowledgement for an accepted order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAck {
    pub digest: Digest,
    pub status: OrderStatus,
}

/// One aggregated price level of the order book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthLevel {
    pub price: Decimal,
    /// Total absolute size resting at this price.
    pub size: Decimal,
}

/// Order book snapshot, best level first on both sides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketDepth {
    /// Descending by price.
    pub bids: Vec<DepthLevel>,
    /// Ascending by price.
    pub asks: Vec<DepthLevel>,
}

impl MarketDepth {
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|l| l.price)
    }

    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|l| l.price)
    }

    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()? - self.best_bid()?)
    }
}

/// Raw balance row for one product. `virtual_quote_balance` is only
/// meaningful for perpetual products; adapters default it to zero when the
/// venue omits it (spot rows).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub product_id: ProductId,
    /// Signed: positive = long/held, negative = short.
    pub amount: Decimal,
    #[serde(default)]
    pub virtual_quote_balance: Decimal,
}

/// The network/signing collaborator. One implementation per venue transport;
/// `SimExchange` provides the in-memory test double.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Wallet address of the signing key, 0x-prefixed.
    fn wallet_address(&self) -> String;

    async fn list_products(&self) -> Result<ProductListing, ClientError>;

    async fn submit_order(&self, order: &WireOrder) -> Result<SubmitAck, ClientError>;

    async fn cancel_orders(
        &self,
        sender: &Subaccount,
        product_ids: &[ProductId],
        digests: &[Digest],
        nonce: u64,
    ) -> Result<(), ClientError>;

    async fn cancel_product_orders(
        &self,
        sender: &Subaccount,
        product_ids: &[ProductId],
        nonce: u64,
    ) -> Result<(), ClientError>;

    /// Open orders from the indexer. Already filtered to open status and,
    /// when `product_id` is given, to that product. Records carry
    /// `pending = false`.
    async fn open_orders(
        &self,
        sender: &Subaccount,
        product_id: Option<ProductId>,
    ) -> Result<Vec<OrderRecord>, ClientError>;

    /// Aggregated book levels, at most `depth` per side, best level first.
    async fn market_depth(
        &self,
        product_id: ProductId,
        depth: usize,
    ) -> Result<MarketDepth, ClientError>;

    async fn balances(&self, sender: &Subaccount) -> Result<Vec<Balance>, ClientError>;

    /// Current oracle price, None when the venue has not published one.
    async fn oracle_price(&self, product_id: ProductId) -> Result<Option<Decimal>, ClientError>;
}
