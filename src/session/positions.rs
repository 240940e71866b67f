//! Position queries: balances plus fresh oracle prices, valued on the spot.

use super::core::TraderSession;
use super::results::TraderError;
use crate::valuation::{derive_positions, Position};
use rust_decimal::Decimal;
use std::collections::HashMap;

impl TraderSession {
    /// Current positions with unrealized pnl. Prices are fetched only for
    /// products with a non-flat perp balance; a product with no published
    /// price still appears, with zero pnl.
    pub async fn positions(&self) -> Result<Vec<Position>, TraderError> {
        let catalog = self.catalog()?;
        let balances = self.client.balances(&self.subaccount).await?;

        let mut oracle_prices: HashMap<_, Decimal> = HashMap::new();
        for balance in &balances {
            if balance.amount.is_zero() || !catalog.is_perp(balance.product_id) {
                continue;
            }
            if oracle_prices.contains_key(&balance.product_id) {
                continue;
            }
            if let Some(price) = self.client.oracle_price(balance.product_id).await? {
                oracle_prices.insert(balance.product_id, price);
            }
        }

        Ok(derive_positions(&balances, catalog, &oracle_prices))
    }
}
