// --- File: crates/slotbook_bookings/src/routes.rs ---

use crate::handlers::{
    approve_handler, bookings_method_not_allowed, calendar_page_handler, get_bookings_handler,
    options_handler, submit_booking_handler, BookingsState, CALENDAR_PATH,
};
use axum::{
    routing::{get, post},
    Router,
};
use slotbook_common::{method_not_allowed, BookingStore, SlotbookError};
use slotbook_config::AppConfig;
use std::sync::Arc;

/// Shared state for one store and one configuration.
pub fn build_state(
    config: Arc<AppConfig>,
    store: Arc<dyn BookingStore>,
) -> Result<Arc<BookingsState>, SlotbookError> {
    Ok(Arc::new(BookingsState::new(config, store)?))
}

/// JSON endpoints, meant to be nested under `/api`.
pub fn api_routes(state: Arc<BookingsState>) -> Router {
    Router::new()
        .route(
            "/bookings",
            get(get_bookings_handler)
                .options(options_handler)
                .fallback(bookings_method_not_allowed),
        )
        .route(
            "/approve",
            post(approve_handler).fallback(method_not_allowed),
        )
        .with_state(state)
}

/// Server-rendered calendar page and its booking form.
pub fn page_routes(state: Arc<BookingsState>) -> Router {
    Router::new()
        .route("/", get(calendar_page_handler))
        .route(
            CALENDAR_PATH,
            get(calendar_page_handler).post(submit_booking_handler),
        )
        .with_state(state)
}
