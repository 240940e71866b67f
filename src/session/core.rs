// 11.1: session state. the pending cache sits behind a tokio mutex so that
// concurrent cancels cannot lose updates (single-writer discipline); all
// other state is set once at construction or connect and read-only after.

use super::results::TraderError;
use crate::client::ExchangeClient;
use crate::config::TraderConfig;
use crate::nonce::NonceGenerator;
use crate::pending::PendingOrderCache;
use crate::product::{PerpProduct, ProductCatalog};
use crate::types::Subaccount;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

pub struct TraderSession {
    pub(super) config: TraderConfig,
    pub(super) client: Arc<dyn ExchangeClient>,
    pub(super) subaccount: Subaccount,
    pub(super) catalog: Option<ProductCatalog>,
    pub(super) pending: Mutex<PendingOrderCache>,
    pub(super) nonces: NonceGenerator,
}

impl TraderSession {
    /// Build a session over a client. Validates the config up front; the
    /// session starts disconnected.
    pub fn new(config: TraderConfig, client: Arc<dyn ExchangeClient>) -> Result<Self, TraderError> {
        config.validate()?;
        let subaccount = Subaccount::new(client.wallet_address(), config.subaccount_name.clone());
        Ok(Self {
            config,
            client,
            subaccount,
            catalog: None,
            pending: Mutex::new(PendingOrderCache::new()),
            nonces: NonceGenerator::new(),
        })
    }

    /// Load the product catalog. Must succeed before any trading operation.
    pub async fn connect(&mut self) -> Result<(), TraderError> {
        let listing = self.client.list_products().await?;
        let catalog = ProductCatalog::from_listing(listing);
        info!(
            network = ?self.config.network,
            subaccount = %self.subaccount,
            perp_products = catalog.len(),
            "connected"
        );
        self.catalog = Some(catalog);
        Ok(())
    }

    /// Drop the catalog. Pending records survive a reconnect.
    pub fn disconnect(&mut self) {
        self.catalog = None;
    }

    pub fn is_connected(&self) -> bool {
        self.catalog.is_some()
    }

    pub fn subaccount(&self) -> &Subaccount {
        &self.subaccount
    }

    pub fn config(&self) -> &TraderConfig {
        &self.config
    }

    /// Catalog listing for display layers, in product-id order.
    pub fn products(&self) -> Result<Vec<PerpProduct>, TraderError> {
        Ok(self.catalog()?.perps().cloned().collect())
    }

    pub(super) fn catalog(&self) -> Result<&ProductCatalog, TraderError> {
        self.catalog.as_ref().ok_or(TraderError::NotConnected)
    }
}
