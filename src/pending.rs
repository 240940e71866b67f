// 6.0: pending order cache. the indexer lags the matching engine, so an order
// accepted moments ago may be missing from the authoritative open-orders
// query. this cache holds locally confirmed submissions until they are
// explicitly canceled or cleared; merge_view overlays them on the
// authoritative result, with the authoritative record always winning.
//
// no time-based eviction: entries persist until an explicit remove/clear.

use crate::types::{Digest, ProductId, Side, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One open order as seen by a caller. Records sourced from the local cache
/// carry `pending = true`; indexer-confirmed records carry `pending = false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub digest: Digest,
    pub product_id: ProductId,
    pub price: Decimal,
    /// Signed amount: positive = buy, negative = sell.
    pub amount: Decimal,
    pub side: Side,
    pub created_at: Timestamp,
    pub pending: bool,
}

#[derive(Debug, Default)]
pub struct PendingOrderCache {
    records: HashMap<Digest, OrderRecord>,
}

impl PendingOrderCache {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Insert or overwrite by digest. The stored copy is always marked pending.
    pub fn add(&mut self, mut record: OrderRecord) {
        record.pending = true;
        self.records.insert(record.digest.clone(), record);
    }

    /// Remove by digest. Absent digests are a no-op, not an error: a cancel
    /// racing an unconfirmed submission must be tolerated.
    pub fn remove(&mut self, digest: &Digest) -> Option<OrderRecord> {
        self.records.remove(digest)
    }

    /// Bulk removal after cancel-all-for-product. Returns the eviction count.
    pub fn remove_by_product(&mut self, product_id: ProductId) -> usize {
        let before = self.records.len();
        self.records.retain(|_, r| r.product_id != product_id);
        before - self.records.len()
    }

    /// Drop everything. Used after cancel-all.
    pub fn clear(&mut self) -> usize {
        let evicted = self.records.len();
        self.records.clear();
        evicted
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, digest: &Digest) -> bool {
        self.records.contains_key(digest)
    }

    /// Snapshot of the raw cache contents, oldest first.
    pub fn snapshot(&self) -> Vec<OrderRecord> {
        let mut records: Vec<OrderRecord> = self.records.values().cloned().collect();
        records.sort_by_key(|r| (r.created_at, r.digest.0.clone()));
        records
    }

    /// Open-orders view: authoritative records first and verbatim, then any
    /// local record whose digest the indexer has not reported yet.
    pub fn merge_view(&self, authoritative: &[OrderRecord]) -> Vec<OrderRecord> {
        self.merge_filtered(authoritative, None)
    }

    /// Same merge restricted to one product. Authoritative input is assumed
    /// already product-filtered by the caller; local records are filtered here.
    pub fn merge_view_for(
        &self,
        product_id: ProductId,
        authoritative: &[OrderRecord],
    ) -> Vec<OrderRecord> {
        self.merge_filtered(authoritative, Some(product_id))
    }

    fn merge_filtered(
        &self,
        authoritative: &[OrderRecord],
        product_id: Option<ProductId>,
    ) -> Vec<OrderRecord> {
        let known: HashSet<&Digest> = authoritative.iter().map(|r| &r.digest).collect();

        let mut view: Vec<OrderRecord> = authoritative.to_vec();
        let mut unindexed: Vec<OrderRecord> = self
            .records
            .values()
            .filter(|r| !known.contains(&r.digest))
            .filter(|r| product_id.map_or(true, |p| r.product_id == p))
            .cloned()
            .collect();
        unindexed.sort_by_key(|r| (r.created_at, r.digest.0.clone()));
        view.extend(unindexed);
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(digest: &str, product: u32, amount: Decimal, ts: i64) -> OrderRecord {
        OrderRecord {
            digest: Digest::from(digest),
            product_id: ProductId(product),
            price: dec!(100),
            amount,
            side: Side::from_amount(amount).unwrap(),
            created_at: Timestamp::from_secs(ts),
            pending: true,
        }
    }

    #[test]
    fn add_then_remove_excludes_from_view() {
        let mut cache = PendingOrderCache::new();
        let r = record("0xa", 1, dec!(1), 10);
        cache.add(r.clone());
        assert!(cache.contains(&r.digest));

        cache.remove(&r.digest);
        assert!(cache.merge_view(&[]).is_empty());
    }

    #[test]
    fn remove_absent_digest_is_noop() {
        let mut cache = PendingOrderCache::new();
        assert!(cache.remove(&Digest::from("0xmissing")).is_none());
    }

    #[test]
    fn authoritative_record_wins_over_pending_duplicate() {
        let mut cache = PendingOrderCache::new();
        cache.add(record("0xa", 1, dec!(1), 10));

        let mut confirmed = record("0xa", 1, dec!(1), 10);
        confirmed.pending = false;
        let view = cache.merge_view(&[confirmed.clone()]);

        assert_eq!(view.len(), 1);
        assert_eq!(view[0], confirmed);
        assert!(!view[0].pending);
    }

    #[test]
    fn unindexed_local_records_still_shown() {
        let mut cache = PendingOrderCache::new();
        cache.add(record("0xa", 1, dec!(1), 10));
        cache.add(record("0xb", 1, dec!(-2), 20));

        let mut confirmed = record("0xa", 1, dec!(1), 10);
        confirmed.pending = false;
        let view = cache.merge_view(&[confirmed]);

        assert_eq!(view.len(), 2);
        assert!(!view[0].pending);
        assert_eq!(view[1].digest, Digest::from("0xb"));
        assert!(view[1].pending);
    }

    #[test]
    fn remove_by_product_leaves_other_products() {
        let mut cache = PendingOrderCache::new();
        cache.add(record("0xa", 1, dec!(1), 10));
        cache.add(record("0xb", 2, dec!(1), 20));
        cache.add(record("0xc", 1, dec!(-1), 30));

        let evicted = cache.remove_by_product(ProductId(1));
        assert_eq!(evicted, 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&Digest::from("0xb")));
    }

    #[test]
    fn clear_reports_eviction_count() {
        let mut cache = PendingOrderCache::new();
        cache.add(record("0xa", 1, dec!(1), 10));
        cache.add(record("0xb", 2, dec!(1), 20));
        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn merge_view_for_filters_local_by_product() {
        let mut cache = PendingOrderCache::new();
        cache.add(record("0xa", 1, dec!(1), 10));
        cache.add(record("0xb", 2, dec!(1), 20));

        let view = cache.merge_view_for(ProductId(2), &[]);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].digest, Digest::from("0xb"));
    }

    #[test]
    fn add_overwrites_same_digest() {
        let mut cache = PendingOrderCache::new();
        cache.add(record("0xa", 1, dec!(1), 10));
        cache.add(record("0xa", 1, dec!(3), 15));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.snapshot()[0].amount, dec!(3));
    }

    #[test]
    fn unindexed_records_ordered_by_submission_time() {
        let mut cache = PendingOrderCache::new();
        cache.add(record("0xb", 1, dec!(1), 30));
        cache.add(record("0xa", 1, dec!(1), 10));

        let view = cache.merge_view(&[]);
        assert_eq!(view[0].digest, Digest::from("0xa"));
        assert_eq!(view[1].digest, Digest::from("0xb"));
    }
}
