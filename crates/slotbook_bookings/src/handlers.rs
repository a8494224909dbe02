// --- File: crates/slotbook_bookings/src/handlers.rs ---
use crate::logic::{
    create_blockers, load_occupancy, submit_booking_request, ApproveRequest, ApproveResponse,
    BookingRequestForm, BookingsQuery, BookingsResponse, RequestError, WorkflowError,
};
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection, QueryRejection},
        Form, Query, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde_json::{json, Map, Value};
use slotbook_calendar::availability::{parse_preferred_date, Occupancy};
use slotbook_calendar::expansion::{ExpansionError, TimestampPolicy};
use slotbook_calendar::render::{
    calendar_href, render_error_page, render_notice_page, render_page, NoticeKind, PageContext,
};
use slotbook_calendar::view::{CalendarQuery, CalendarView};
use slotbook_common::{
    config_error, internal_error, validation_error, BookingStore, SlotbookError,
};
use slotbook_config::AppConfig;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Path the calendar page links back to.
pub const CALENDAR_PATH: &str = "/calendar";

// Shared state for the bookings routes
#[derive(Clone)]
pub struct BookingsState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn BookingStore>,
    pub policy: TimestampPolicy,
    /// Business time zone; decides what "today" is on the calendar.
    pub time_zone: Tz,
}

impl BookingsState {
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn BookingStore>) -> Result<Self, SlotbookError> {
        let schedule = &config.schedule;
        let time_zone = Tz::from_str(&schedule.time_zone)
            .map_err(|_| config_error(format!("Unknown time zone: {}", schedule.time_zone)))?;
        let policy = TimestampPolicy::from_config(schedule).map_err(config_error)?;
        if schedule.schedules.is_empty() {
            warn!("no schedules configured; every day will show as available");
        }
        Ok(Self {
            config,
            store,
            policy,
            time_zone,
        })
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.time_zone).date_naive()
    }

    pub fn schedules(&self) -> &[String] {
        &self.config.schedule.schedules
    }
}

// --- Approval ---

fn workflow_error_response(record_id: &str, err: WorkflowError) -> Response {
    match err {
        WorkflowError::MissingFields(_) => validation_error(err).into_response(),
        WorkflowError::Expansion(ExpansionError::StartSlotNotFound { confirmed, clock }) => {
            info!("booking {}: no slot starts at {}", record_id, clock);
            let message = format!("Could not find slot matching: {}", clock);
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": message,
                    "confirmedDateTime": confirmed,
                    "clockTime": clock,
                })),
            )
                .into_response()
        }
        WorkflowError::Expansion(ExpansionError::InvalidTimestamp(raw)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("Invalid confirmed date and time: {}", raw),
                "confirmedDateTime": raw,
            })),
        )
            .into_response(),
        WorkflowError::Expansion(e @ ExpansionError::UnknownTimeZone(_)) => {
            config_error(e).into_response()
        }
        WorkflowError::Creation { created, source } => {
            error!(
                "booking {}: blocker creation stopped after {}: {}",
                record_id,
                created.len(),
                source
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Failed to create blocker record: {}", source),
                    "slotsCreated": created.len(),
                    "recordIds": created,
                })),
            )
                .into_response()
        }
        WorkflowError::Store(e) => SlotbookError::from(e).into_response(),
        WorkflowError::Malformed(e) => SlotbookError::Remote(format!(
            "Booking {} has malformed fields: {}",
            record_id, e
        ))
        .into_response(),
    }
}

/// Handler that expands an approved booking into blocker records.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/approve",
    request_body = ApproveRequest,
    responses(
        (status = 200, description = "Blockers created (possibly none)", body = ApproveResponse),
        (status = 400, description = "Missing recordId, missing fields or unmatched start time"),
        (status = 405, description = "Method not allowed"),
        (status = 500, description = "Record store failure")
    ),
    tag = "Bookings"
))]
pub async fn approve_handler(
    State(state): State<Arc<BookingsState>>,
    payload: Result<Json<ApproveRequest>, JsonRejection>,
) -> Response {
    let record_id = match payload {
        Ok(Json(ApproveRequest {
            record_id: Some(id),
        })) if !id.trim().is_empty() => id.trim().to_string(),
        Ok(_) => return validation_error("Missing recordId").into_response(),
        Err(rejection) => {
            info!("approve body rejected: {}", rejection);
            return validation_error("Missing recordId").into_response();
        }
    };

    match create_blockers(state.store.as_ref(), state.policy, &record_id).await {
        Ok(outcome) => Json(ApproveResponse::from(outcome)).into_response(),
        Err(err) => workflow_error_response(&record_id, err),
    }
}

// --- Availability ---

fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

/// Handler that lists bookings with one exact status.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/bookings",
    params(BookingsQuery),
    responses(
        (status = 200, description = "Field maps of every matching booking", body = BookingsResponse),
        (status = 400, description = "Missing status parameter"),
        (status = 500, description = "Record store failure")
    ),
    tag = "Bookings"
))]
pub async fn get_bookings_handler(
    State(state): State<Arc<BookingsState>>,
    query: Result<Query<BookingsQuery>, QueryRejection>,
) -> Response {
    let status = match query {
        Ok(Query(BookingsQuery {
            status: Some(status),
        })) if !status.trim().is_empty() => status,
        _ => return with_cors(validation_error("Missing status parameter").into_response()),
    };

    let response = match state.store.list_by_status(&status).await {
        Ok(records) => {
            let records: Vec<Map<String, Value>> =
                records.into_iter().map(|record| record.fields).collect();
            info!("returning {} '{}' bookings", records.len(), status);
            Json(BookingsResponse { records }).into_response()
        }
        Err(e) => SlotbookError::from(e).into_response(),
    };
    with_cors(response)
}

/// Handler for OPTIONS requests to support CORS preflight
pub async fn options_handler() -> Response {
    with_cors(StatusCode::OK.into_response())
}

/// 405 for the bookings route, still carrying the CORS headers.
pub async fn bookings_method_not_allowed() -> Response {
    with_cors(SlotbookError::MethodNotAllowed.into_response())
}

// --- Calendar page ---

fn html_response(status: StatusCode, page: askama::Result<String>) -> Response {
    match page {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!("failed to render calendar page: {}", e);
            internal_error(format!("Failed to render page: {}", e)).into_response()
        }
    }
}

/// Handler that renders the booking calendar.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Calendar page", content_type = "text/html", body = String),
        (status = 500, description = "Page could not be rendered")
    ),
    tag = "Calendar"
))]
pub async fn calendar_page_handler(
    State(state): State<Arc<BookingsState>>,
    query: Result<Query<CalendarQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            info!("ignoring calendar query: {}", rejection);
            CalendarQuery::default()
        }
    };
    let today = state.today();
    let schedules = state.schedules();

    let page = match load_occupancy(state.store.as_ref()).await {
        Ok(occupancy) => {
            let view = CalendarView::from_query(&query, today, &occupancy, schedules);
            render_page(&PageContext {
                view: &view,
                occupancy: &occupancy,
                today,
                schedules,
                base_path: CALENDAR_PATH,
            })
        }
        Err(e) => {
            error!("failed to load availability: {}", e);
            let occupancy = Occupancy::default();
            let view = CalendarView::from_query(
                &CalendarQuery {
                    year: query.year,
                    month: query.month,
                    ..Default::default()
                },
                today,
                &occupancy,
                schedules,
            );
            render_error_page(&PageContext {
                view: &view,
                occupancy: &occupancy,
                today,
                schedules,
                base_path: CALENDAR_PATH,
            })
        }
    };
    html_response(StatusCode::OK, page)
}

/// Calendar link back to the month of a submitted date.
fn month_href(date_raw: &str) -> String {
    let query = match parse_preferred_date(date_raw) {
        Some(date) => CalendarQuery {
            year: Some(date.year()),
            month: Some(date.month0()),
            ..Default::default()
        },
        None => CalendarQuery::default(),
    };
    calendar_href(CALENDAR_PATH, &query)
}

/// Handler for the calendar's booking form; stores a `Pending` request.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/calendar",
    responses(
        (status = 200, description = "Request stored", content_type = "text/html", body = String),
        (status = 400, description = "Missing or invalid fields", content_type = "text/html", body = String),
        (status = 409, description = "Day or slot no longer available", content_type = "text/html", body = String),
        (status = 500, description = "Record store failure", content_type = "text/html", body = String)
    ),
    tag = "Calendar"
))]
pub async fn submit_booking_handler(
    State(state): State<Arc<BookingsState>>,
    form: Result<Form<BookingRequestForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            info!("booking form rejected: {}", rejection);
            BookingRequestForm::default()
        }
    };
    let back_href = month_href(&form.preferred_date);

    let result = submit_booking_request(
        state.store.as_ref(),
        &form,
        state.today(),
        state.schedules(),
    )
    .await;

    let (status, kind, title, message) = match result {
        Ok(_) => (
            StatusCode::OK,
            NoticeKind::Success,
            "Request received",
            format!(
                "Thank you, {}. We will confirm {} on {} ({}) by email.",
                form.name.trim(),
                form.preferred_time.trim(),
                form.preferred_date.trim(),
                form.schedule_set.trim()
            ),
        ),
        Err(err @ (RequestError::MissingFields(_)
        | RequestError::InvalidDate(_)
        | RequestError::UnknownSlot(_))) => (
            StatusCode::BAD_REQUEST,
            NoticeKind::Error,
            "Request incomplete",
            err.to_string(),
        ),
        Err(RequestError::Unavailable(e)) => {
            info!("booking request refused: {}", e);
            (
                StatusCode::CONFLICT,
                NoticeKind::Error,
                "Time no longer available",
                "That time can no longer be booked. Please choose another slot.".to_string(),
            )
        }
        Err(RequestError::Store(e)) => {
            error!("failed to store booking request: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                NoticeKind::Error,
                "Request not sent",
                "Unable to save your request. Please try again or contact us directly."
                    .to_string(),
            )
        }
    };
    html_response(
        status,
        render_notice_page(kind, title, &message, &back_href),
    )
}
