//! Order placement, cancellation, and the merged open-orders view.

use super::core::TraderSession;
use super::results::{CancelOutcome, PlacedOrder, TraderError};
use crate::client::MarketDepth;
use crate::order::{build_wire_order, OrderParams};
use crate::pending::OrderRecord;
use crate::types::{Digest, ProductId, Side, Timestamp};
use rust_decimal::Decimal;
use tracing::{info, warn};

impl TraderSession {
    /// Submit a limit order. Parameters are validated and encoded locally
    /// before anything leaves the process; the pending cache is only written
    /// after the venue confirms acceptance, never optimistically.
    pub async fn place_limit_order(&self, params: OrderParams) -> Result<PlacedOrder, TraderError> {
        let catalog = self.catalog()?;
        if !catalog.is_perp(params.product_id) {
            return Err(TraderError::UnknownProduct(params.product_id));
        }

        let nonce = self.nonces.next();
        let submitted_at = Timestamp::now();
        let wire = build_wire_order(&params, self.subaccount.clone(), submitted_at, nonce)?;

        let ack = match self.client.submit_order(&wire).await {
            Ok(ack) => ack,
            Err(e) => {
                // the order may or may not exist on the venue; the next
                // open-orders query resolves it from the authoritative side
                warn!(product = %params.product_id, side = %params.side, error = %e, "order submission failed");
                return Err(e.into());
            }
        };

        let size = params.size.abs();
        let record = OrderRecord {
            digest: ack.digest.clone(),
            product_id: params.product_id,
            price: params.price,
            amount: params.side.sign() * size,
            side: params.side,
            created_at: submitted_at,
            pending: true,
        };
        self.pending.lock().await.add(record);

        info!(
            digest = %ack.digest,
            product = %params.product_id,
            side = %params.side,
            price = %params.price,
            size = %size,
            "order accepted"
        );

        Ok(PlacedOrder {
            digest: ack.digest,
            product_id: params.product_id,
            side: params.side,
            price: params.price,
            size,
            status: ack.status,
            submitted_at,
        })
    }

    /// Buy limit order using the configured defaults for post-only,
    /// reduce-only, and time in force.
    pub async fn buy_limit(
        &self,
        product_id: ProductId,
        price: Decimal,
        size: Decimal,
    ) -> Result<PlacedOrder, TraderError> {
        self.place_limit_order(self.default_params(Side::Buy, product_id, price, size))
            .await
    }

    /// Sell limit order using the configured defaults.
    pub async fn sell_limit(
        &self,
        product_id: ProductId,
        price: Decimal,
        size: Decimal,
    ) -> Result<PlacedOrder, TraderError> {
        self.place_limit_order(self.default_params(Side::Sell, product_id, price, size))
            .await
    }

    fn default_params(
        &self,
        side: Side,
        product_id: ProductId,
        price: Decimal,
        size: Decimal,
    ) -> OrderParams {
        OrderParams {
            product_id,
            side,
            price,
            size,
            reduce_only: self.config.reduce_only,
            post_only: self.config.post_only,
            time_in_force: self.config.time_in_force,
        }
    }

    /// Cancel one order by digest, then evict it from the pending cache.
    /// An absent digest is a no-op eviction: the cancel may have raced an
    /// unconfirmed submission.
    pub async fn cancel_order(
        &self,
        product_id: ProductId,
        digest: Digest,
    ) -> Result<(), TraderError> {
        self.catalog()?;

        let nonce = self.nonces.next();
        self.client
            .cancel_orders(
                &self.subaccount,
                &[product_id],
                std::slice::from_ref(&digest),
                nonce,
            )
            .await?;

        self.pending.lock().await.remove(&digest);
        info!(digest = %digest, product = %product_id, "order canceled");
        Ok(())
    }

    /// Cancel every open order for one product, or for all perpetual
    /// products when `product_id` is None.
    pub async fn cancel_all(
        &self,
        product_id: Option<ProductId>,
    ) -> Result<CancelOutcome, TraderError> {
        let catalog = self.catalog()?;
        let nonce = self.nonces.next();

        let pending_evicted = match product_id {
            Some(product) => {
                if !catalog.is_perp(product) {
                    return Err(TraderError::UnknownProduct(product));
                }
                self.client
                    .cancel_product_orders(&self.subaccount, &[product], nonce)
                    .await?;
                self.pending.lock().await.remove_by_product(product)
            }
            None => {
                let products = catalog.perp_ids();
                self.client
                    .cancel_product_orders(&self.subaccount, &products, nonce)
                    .await?;
                self.pending.lock().await.clear()
            }
        };

        info!(product = ?product_id, pending_evicted, "cancel-all completed");
        Ok(CancelOutcome { pending_evicted })
    }

    /// Open orders: the authoritative indexer result overlaid with local
    /// records the indexer has not caught up to yet.
    pub async fn open_orders(
        &self,
        product_id: Option<ProductId>,
    ) -> Result<Vec<OrderRecord>, TraderError> {
        self.catalog()?;

        let authoritative = self.client.open_orders(&self.subaccount, product_id).await?;
        let cache = self.pending.lock().await;
        Ok(match product_id {
            Some(product) => cache.merge_view_for(product, &authoritative),
            None => cache.merge_view(&authoritative),
        })
    }

    /// Order book snapshot for one product, at most `depth` levels per side.
    pub async fn market_depth(
        &self,
        product_id: ProductId,
        depth: usize,
    ) -> Result<MarketDepth, TraderError> {
        let catalog = self.catalog()?;
        if !catalog.is_perp(product_id) {
            return Err(TraderError::UnknownProduct(product_id));
        }
        Ok(self.client.market_depth(product_id, depth).await?)
    }

    /// Suggested limit price: the configured offset inside the touch, quoting
    /// below the best bid for buys and above the best ask for sells. Falls
    /// back to the oracle price when that side of the book is empty; None
    /// when neither reference exists.
    pub async fn suggest_limit_price(
        &self,
        product_id: ProductId,
        side: Side,
    ) -> Result<Option<Decimal>, TraderError> {
        let catalog = self.catalog()?;
        let product = catalog
            .get(product_id)
            .ok_or(TraderError::UnknownProduct(product_id))?;
        let oracle = product.oracle_price;

        let depth = self.client.market_depth(product_id, 1).await?;
        let reference = match side {
            Side::Buy => depth.best_bid().or(oracle),
            Side::Sell => depth.best_ask().or(oracle),
        };

        Ok(reference.map(|price| match side {
            Side::Buy => price - self.config.price_offset,
            Side::Sell => price + self.config.price_offset,
        }))
    }

    /// Raw pending-cache contents, for inspection.
    pub async fn pending_orders(&self) -> Vec<OrderRecord> {
        self.pending.lock().await.snapshot()
    }

    /// Manually drain the pending cache without touching the venue.
    pub async fn clear_pending(&self) -> usize {
        self.pending.lock().await.clear()
    }
}
