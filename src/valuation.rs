// 7.0: position valuation. pnl = amount * price + virtual quote balance.
// the virtual quote balance is the venue's accumulated quote-side accounting
// for a perp balance, so no entry price is needed: the product of the current
// oracle price and the signed size plus that balance is the paper pnl.
// positions are derived fresh on every query, never stored.

use crate::client::Balance;
use crate::product::ProductCatalog;
use crate::types::{PositionSide, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A derived position. Exists only in query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub product_id: ProductId,
    /// Signed size: positive = long, negative = short.
    pub size: Decimal,
    pub side: PositionSide,
    pub unrealized_pnl: Decimal,
}

/// The pnl formula. Zero when the position is flat or no price is known.
pub fn unrealized_pnl(
    amount: Decimal,
    virtual_quote_balance: Decimal,
    oracle_price: Option<Decimal>,
) -> Decimal {
    match oracle_price {
        Some(price) if !amount.is_zero() => amount * price + virtual_quote_balance,
        _ => Decimal::ZERO,
    }
}

/// Derive positions from raw balances. Only perpetual products count; spot
/// balances and flat perp balances are excluded.
pub fn derive_positions(
    balances: &[Balance],
    catalog: &ProductCatalog,
    oracle_prices: &HashMap<ProductId, Decimal>,
) -> Vec<Position> {
    let mut positions: Vec<Position> = balances
        .iter()
        .filter(|b| catalog.is_perp(b.product_id))
        .filter_map(|b| {
            let side = PositionSide::from_amount(b.amount)?;
            Some(Position {
                product_id: b.product_id,
                size: b.amount,
                side,
                unrealized_pnl: unrealized_pnl(
                    b.amount,
                    b.virtual_quote_balance,
                    oracle_prices.get(&b.product_id).copied(),
                ),
            })
        })
        .collect();
    positions.sort_by_key(|p| p.product_id);
    positions
}
