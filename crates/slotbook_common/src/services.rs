// --- File: crates/slotbook_common/src/services.rs ---
//! Service abstractions for the external record store.
//!
//! Handlers and the blocker workflow only see [`BookingStore`], so tests can
//! swap the HTTP client for an in-memory implementation.

use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;

use crate::error::StoreError;
use crate::models::StoreRecord;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Operations against the bookings table.
pub trait BookingStore: Send + Sync {
    /// Fetch one record by id.
    fn get_record(&self, record_id: &str) -> BoxFuture<'_, StoreRecord, StoreError>;

    /// Insert one record with the given field map and return it as stored.
    fn create_record(&self, fields: Map<String, Value>) -> BoxFuture<'_, StoreRecord, StoreError>;

    /// Every record whose `Status` equals `status` exactly, across all pages,
    /// in the order the store returned them.
    fn list_by_status(&self, status: &str) -> BoxFuture<'_, Vec<StoreRecord>, StoreError>;
}
