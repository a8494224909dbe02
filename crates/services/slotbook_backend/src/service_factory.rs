// --- File: crates/services/slotbook_backend/src/service_factory.rs ---
//! Builds the external services the routes depend on.

use slotbook_airtable::AirtableStore;
use slotbook_common::{create_client, log_result, BookingStore, SlotbookError, StoreError};
use slotbook_config::AppConfig;
use std::sync::Arc;
use tracing::info;

/// Owns the record store handed to every route.
pub struct SlotbookServiceFactory {
    store: Arc<dyn BookingStore>,
}

impl SlotbookServiceFactory {
    /// Creates the Airtable-backed store from the configuration.
    ///
    /// Fails when the base id or token is missing, so a misconfigured server
    /// never starts.
    pub fn new(config: &AppConfig) -> Result<Self, SlotbookError> {
        let airtable = &config.airtable;
        let client = create_client(airtable.timeout_secs, true).map_err(StoreError::from)?;
        let store = log_result(
            AirtableStore::new(client, airtable),
            "Airtable store ready",
            "Airtable store setup failed",
        )?;
        info!("store requests time out after {}s", airtable.timeout_secs);
        Ok(Self::with_store(Arc::new(store)))
    }

    /// Wraps an already built store.
    pub fn with_store(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    pub fn booking_store(&self) -> Arc<dyn BookingStore> {
        self.store.clone()
    }
}
