// 8.0: product catalog. loaded once at connect time from the venue's listing
// and consulted for perp/spot classification, display metadata, and the
// leverage estimate. optional venue fields are resolved into typed Options
// here, at the boundary, not probed downstream.

use crate::types::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One perpetual product as listed by the venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerpProduct {
    pub product_id: ProductId,
    pub symbol: String,
    pub oracle_price: Option<Decimal>,
    /// Initial margin weight applied to long exposure, if published.
    pub long_weight_initial: Option<Decimal>,
    /// Initial margin weight applied to short exposure, if published.
    pub short_weight_initial: Option<Decimal>,
}

impl PerpProduct {
    /// Rough max leverage from the initial margin weight: 1 / |1 - w|,
    /// preferring the long weight and falling back to the short weight.
    /// Display heuristic only; never used on the order path.
    pub fn max_leverage(&self) -> Option<Decimal> {
        let weight = self.long_weight_initial.or(self.short_weight_initial)?;
        let margin = (Decimal::ONE - weight).abs();
        if margin.is_zero() {
            None
        } else {
            Some(Decimal::ONE / margin)
        }
    }
}

/// A spot product. Tracked only so spot balances can be told apart from perps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotProduct {
    pub product_id: ProductId,
    pub symbol: String,
}

/// The venue's full product listing, as returned by the client boundary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductListing {
    pub perp: Vec<PerpProduct>,
    pub spot: Vec<SpotProduct>,
}

/// Session-lifetime product index.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    perps: BTreeMap<ProductId, PerpProduct>,
}

impl ProductCatalog {
    pub fn from_listing(listing: ProductListing) -> Self {
        Self {
            perps: listing
                .perp
                .into_iter()
                .map(|p| (p.product_id, p))
                .collect(),
        }
    }

    pub fn is_perp(&self, product_id: ProductId) -> bool {
        self.perps.contains_key(&product_id)
    }

    pub fn get(&self, product_id: ProductId) -> Option<&PerpProduct> {
        self.perps.get(&product_id)
    }

    /// Perp product ids in ascending order.
    pub fn perp_ids(&self) -> Vec<ProductId> {
        self.perps.keys().copied().collect()
    }

    pub fn perps(&self) -> impl Iterator<Item = &PerpProduct> {
        self.perps.values()
    }

    pub fn len(&self) -> usize {
        self.perps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perps.is_empty()
    }
}
