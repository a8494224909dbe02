// --- File: crates/slotbook_bookings/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{ApproveRequest, ApproveResponse, BookingsQuery, BookingsResponse};

#[utoipa::path(
    post,
    path = "/approve",
    request_body(content = ApproveRequest, example = json!({
        "recordId": "recA1b2C3d4E5f6G7"
    })),
    responses(
        (status = 200, description = "Blocker records created", body = ApproveResponse,
         example = json!({
             "message": "Created 2 blocker records",
             "slotsCreated": 2,
             "recordIds": ["recBlk0000000001", "recBlk0000000002"]
         })
        ),
        (status = 400, description = "Start time matches no slot",
         example = json!({
             "error": "Could not find slot matching: 5:00 PM",
             "confirmedDateTime": "2025-06-02T17:00:00.000Z",
             "clockTime": "5:00 PM"
         })
        ),
        (status = 405, description = "Method not allowed",
         example = json!({ "error": "Method not allowed" })
        ),
        (status = 500, description = "Creation stopped part-way",
         example = json!({
             "error": "Failed to create blocker record: Store returned 422: {}",
             "slotsCreated": 1,
             "recordIds": ["recBlk0000000001"]
         })
        )
    )
)]
fn doc_approve_handler() {}

#[utoipa::path(
    get,
    path = "/bookings",
    params(BookingsQuery),
    responses(
        (status = 200, description = "Field maps of matching bookings", body = BookingsResponse,
         example = json!({
             "records": [
                 {
                     "Name": "Ana Cruz",
                     "Preferred Date": "2025-06-02",
                     "Preferred Time": "9:00 AM - 9:30 AM",
                     "Schedule Set": "Schedule A",
                     "Status": "Approved"
                 }
             ]
         })
        ),
        (status = 400, description = "Missing status",
         example = json!({ "error": "Missing status parameter" })
        ),
        (status = 500, description = "Record store failure",
         example = json!({ "error": "Store returned 503: Service Unavailable" })
        )
    )
)]
fn doc_get_bookings_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_approve_handler, doc_get_bookings_handler),
    components(schemas(ApproveRequest, ApproveResponse, BookingsResponse)),
    tags(
        (name = "bookings", description = "Booking approval and availability API")
    ),
    servers(
        (url = "/api", description = "Slotbook API server")
    )
)]
pub struct BookingsApiDoc;
