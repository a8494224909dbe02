// --- File: crates/slotbook_common/src/lib.rs ---

pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod models; // Booking rows
pub mod services; // Store abstraction

pub use error::{
    config_error, internal_error, validation_error, Context, HttpStatusCode, SlotbookError,
    StoreError,
};

pub use http::{client::create_client, method_not_allowed, IntoHttpResponse};

pub use logging::{init, init_with_level, log_error, log_result};

pub use models::{BookingFields, BookingStatus, StoreRecord};
pub use services::{BookingStore, BoxFuture};
