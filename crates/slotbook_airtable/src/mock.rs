//! In-memory [`BookingStore`] for tests.

use serde_json::{Map, Value};
use slotbook_common::models::FIELD_STATUS;
use slotbook_common::{BookingStore, BoxFuture, StoreError, StoreRecord};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    records: Vec<StoreRecord>,
    next_id: usize,
    creates_left: Option<usize>,
    fail_lists: bool,
    page_requests: usize,
}

/// Bookings table kept in a `Vec`, in insertion order.
///
/// Listing is split into pages of `page_size` records so callers can check
/// how many round trips a real store would have needed.
#[derive(Debug)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
    page_size: usize,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Airtable returns at most 100 records per page.
    pub const DEFAULT_PAGE_SIZE: usize = 100;

    pub fn new() -> Self {
        Self::with_page_size(Self::DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            page_size: page_size.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Adds a row with a fixed id, as if created by the intake process.
    pub fn insert(&self, id: &str, fields: Map<String, Value>) {
        self.lock().records.push(StoreRecord {
            id: id.to_string(),
            created_time: None,
            fields,
        });
    }

    /// Lets `n` more creates succeed, then rejects every further create.
    pub fn fail_creates_after(&self, n: usize) {
        self.lock().creates_left = Some(n);
    }

    pub fn fail_lists(&self, fail: bool) {
        self.lock().fail_lists = fail;
    }

    pub fn records(&self) -> Vec<StoreRecord> {
        self.lock().records.clone()
    }

    /// Number of list pages served so far.
    pub fn page_requests(&self) -> usize {
        self.lock().page_requests
    }
}

impl BookingStore for InMemoryStore {
    fn get_record(&self, record_id: &str) -> BoxFuture<'_, StoreRecord, StoreError> {
        let record_id = record_id.to_string();
        Box::pin(async move {
            self.lock()
                .records
                .iter()
                .find(|r| r.id == record_id)
                .cloned()
                .ok_or(StoreError::NotFound(record_id))
        })
    }

    fn create_record(&self, fields: Map<String, Value>) -> BoxFuture<'_, StoreRecord, StoreError> {
        Box::pin(async move {
            let mut inner = self.lock();
            if let Some(left) = inner.creates_left.as_mut() {
                if *left == 0 {
                    return Err(StoreError::Remote {
                        status: 422,
                        body: r#"{"error":{"type":"INVALID_REQUEST_UNKNOWN"}}"#.to_string(),
                    });
                }
                *left -= 1;
            }

            inner.next_id += 1;
            let record = StoreRecord {
                id: format!("recMock{:04}", inner.next_id),
                created_time: None,
                fields,
            };
            inner.records.push(record.clone());
            Ok(record)
        })
    }

    fn list_by_status(&self, status: &str) -> BoxFuture<'_, Vec<StoreRecord>, StoreError> {
        let status = status.to_string();
        Box::pin(async move {
            let mut inner = self.lock();
            if inner.fail_lists {
                return Err(StoreError::Remote {
                    status: 503,
                    body: "Service Unavailable".to_string(),
                });
            }

            let matching: Vec<StoreRecord> = inner
                .records
                .iter()
                .filter(|r| {
                    r.fields.get(FIELD_STATUS).and_then(Value::as_str) == Some(status.as_str())
                })
                .cloned()
                .collect();

            // An empty result is still one page.
            let mut collected = Vec::with_capacity(matching.len());
            let mut pages = matching.chunks(self.page_size).peekable();
            if pages.peek().is_none() {
                inner.page_requests += 1;
            }
            for page in pages {
                inner.page_requests += 1;
                collected.extend_from_slice(page);
            }
            Ok(collected)
        })
    }
}
