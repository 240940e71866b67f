// 12.0: in-memory exchange. implements the client boundary against local
// state so the session can be exercised end to end without a network. the
// order book is split into an accepted store and an indexed store: submissions
// land in accepted, and only index_all() promotes them into what open_orders
// reports. that gap reproduces the indexer lag the pending cache exists for.

use crate::client::{
    Balance, ClientError, DepthLevel, ExchangeClient, MarketDepth, OrderStatus, SubmitAck,
};
use crate::fixed_point::from_x18;
use crate::order::WireOrder;
use crate::pending::OrderRecord;
use crate::product::{PerpProduct, ProductListing, SpotProduct};
use crate::types::{Digest, ProductId, Side, Subaccount, Timestamp};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

pub const SIM_WALLET: &str = "0x00000000000000000000000000000000deadbeef";

#[derive(Debug, Default)]
struct SimState {
    /// Accepted by the matching engine, not yet visible to the indexer.
    accepted: Vec<OrderRecord>,
    /// Visible to open-orders queries.
    indexed: Vec<OrderRecord>,
    balances: Vec<Balance>,
    oracle_prices: HashMap<ProductId, Decimal>,
    fail_next_submit: bool,
    submit_calls: u64,
    next_seq: u64,
}

/// Local stand-in for the venue. Deterministic, seeded with a small listing.
pub struct SimExchange {
    products: ProductListing,
    state: Mutex<SimState>,
}

impl Default for SimExchange {
    fn default() -> Self {
        Self::new()
    }
}

impl SimExchange {
    pub fn new() -> Self {
        let products = ProductListing {
            perp: vec![
                perp(2, "BTC-PERP", dec!(50000), dec!(0.95)),
                perp(4, "ETH-PERP", dec!(3000), dec!(0.9)),
                perp(8, "SOL-PERP", dec!(150), dec!(0.8)),
            ],
            spot: vec![SpotProduct {
                product_id: ProductId(0),
                symbol: "USDC".to_string(),
            }],
        };
        let oracle_prices = products
            .perp
            .iter()
            .filter_map(|p| p.oracle_price.map(|price| (p.product_id, price)))
            .collect();
        Self {
            products,
            state: Mutex::new(SimState {
                oracle_prices,
                ..SimState::default()
            }),
        }
    }

    /// Promote everything accepted so far into the indexed store.
    pub async fn index_all(&self) -> usize {
        let mut state = self.state.lock().await;
        let promoted = state.accepted.len();
        let mut batch = std::mem::take(&mut state.accepted);
        state.indexed.append(&mut batch);
        promoted
    }

    /// Fail the next submit_order call with an ambiguous transport error.
    pub async fn fail_next_submit(&self) {
        self.state.lock().await.fail_next_submit = true;
    }

    pub async fn submit_calls(&self) -> u64 {
        self.state.lock().await.submit_calls
    }

    pub async fn set_balance(
        &self,
        product_id: ProductId,
        amount: Decimal,
        virtual_quote_balance: Decimal,
    ) {
        let mut state = self.state.lock().await;
        state.balances.retain(|b| b.product_id != product_id);
        state.balances.push(Balance {
            product_id,
            amount,
            virtual_quote_balance,
        });
    }

    pub async fn set_oracle_price(&self, product_id: ProductId, price: Option<Decimal>) {
        let mut state = self.state.lock().await;
        match price {
            Some(p) => {
                state.oracle_prices.insert(product_id, p);
            }
            None => {
                state.oracle_prices.remove(&product_id);
            }
        }
    }
}

fn perp(id: u32, symbol: &str, price: Decimal, weight: Decimal) -> PerpProduct {
    PerpProduct {
        product_id: ProductId(id),
        symbol: symbol.to_string(),
        oracle_price: Some(price),
        long_weight_initial: Some(weight),
        short_weight_initial: Some(Decimal::TWO - weight),
    }
}

#[async_trait]
impl ExchangeClient for SimExchange {
    fn wallet_address(&self) -> String {
        SIM_WALLET.to_string()
    }

    async fn list_products(&self) -> Result<ProductListing, ClientError> {
        Ok(self.products.clone())
    }

    async fn submit_order(&self, order: &WireOrder) -> Result<SubmitAck, ClientError> {
        let mut state = self.state.lock().await;
        state.submit_calls += 1;

        if state.fail_next_submit {
            state.fail_next_submit = false;
            return Err(ClientError::Exchange("simulated transport failure".to_string()));
        }

        let price = from_x18(order.price_x18)
            .map_err(|e| ClientError::Malformed(format!("price: {e}")))?;
        let amount = from_x18(order.amount_x18)
            .map_err(|e| ClientError::Malformed(format!("amount: {e}")))?;
        let side = Side::from_amount(amount)
            .ok_or_else(|| ClientError::Malformed("zero amount".to_string()))?;

        state.next_seq += 1;
        let digest = Digest(format!("0x{:016x}", state.next_seq));
        state.accepted.push(OrderRecord {
            digest: digest.clone(),
            product_id: order.product_id,
            price,
            amount,
            side,
            created_at: Timestamp::now(),
            pending: false,
        });

        Ok(SubmitAck {
            digest,
            status: OrderStatus::Submitted,
        })
    }

    async fn cancel_orders(
        &self,
        _sender: &Subaccount,
        _product_ids: &[ProductId],
        digests: &[Digest],
        _nonce: u64,
    ) -> Result<(), ClientError> {
        let mut state = self.state.lock().await;
        state.accepted.retain(|r| !digests.contains(&r.digest));
        state.indexed.retain(|r| !digests.contains(&r.digest));
        Ok(())
    }

    async fn cancel_product_orders(
        &self,
        _sender: &Subaccount,
        product_ids: &[ProductId],
        _nonce: u64,
    ) -> Result<(), ClientError> {
        let mut state = self.state.lock().await;
        state.accepted.retain(|r| !product_ids.contains(&r.product_id));
        state.indexed.retain(|r| !product_ids.contains(&r.product_id));
        Ok(())
    }

    async fn open_orders(
        &self,
        _sender: &Subaccount,
        product_id: Option<ProductId>,
    ) -> Result<Vec<OrderRecord>, ClientError> {
        let state = self.state.lock().await;
        Ok(state
            .indexed
            .iter()
            .filter(|r| product_id.map_or(true, |p| r.product_id == p))
            .cloned()
            .collect())
    }

    async fn market_depth(
        &self,
        product_id: ProductId,
        depth: usize,
    ) -> Result<MarketDepth, ClientError> {
        let state = self.state.lock().await;

        // the matching engine sees accepted orders before the indexer does,
        // so the book covers both stores
        let mut bids: BTreeMap<Decimal, Decimal> = BTreeMap::new();
        let mut asks: BTreeMap<Decimal, Decimal> = BTreeMap::new();
        for record in state
            .accepted
            .iter()
            .chain(state.indexed.iter())
            .filter(|r| r.product_id == product_id)
        {
            let book = match record.side {
                Side::Buy => &mut bids,
                Side::Sell => &mut asks,
            };
            *book.entry(record.price).or_default() += record.amount.abs();
        }

        Ok(MarketDepth {
            bids: bids
                .into_iter()
                .rev()
                .take(depth)
                .map(|(price, size)| DepthLevel { price, size })
                .collect(),
            asks: asks
                .into_iter()
                .take(depth)
                .map(|(price, size)| DepthLevel { price, size })
                .collect(),
        })
    }

    async fn balances(&self, _sender: &Subaccount) -> Result<Vec<Balance>, ClientError> {
        Ok(self.state.lock().await.balances.clone())
    }

    async fn oracle_price(&self, product_id: ProductId) -> Result<Option<Decimal>, ClientError> {
        Ok(self.state.lock().await.oracle_prices.get(&product_id).copied())
    }
}
