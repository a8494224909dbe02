// --- File: crates/slotbook_bookings/src/logic.rs ---
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use chrono::NaiveDate;
use slotbook_calendar::availability::{parse_preferred_date, Occupancy};
use slotbook_calendar::expansion::{plan_expansion, ExpansionError, TimestampPolicy};
use slotbook_calendar::slots::Slot;
use slotbook_calendar::view::{CalendarView, ViewError};
use slotbook_common::models::{
    BookingFields, BookingStatus, StoreRecord, FIELD_CALCULATED_DURATION,
    FIELD_CONFIRMED_DATE_TIME, FIELD_EMAIL, FIELD_NAME, FIELD_PREFERRED_DATE,
    FIELD_PREFERRED_TIME, FIELD_SCHEDULE_SET,
};
use slotbook_common::{BookingStore, StoreError};
use tracing::{debug, error, info, warn};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

// --- Error Handling ---
use thiserror::Error;
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error(transparent)]
    Expansion(#[from] ExpansionError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("Booking record has malformed fields: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A create failed part-way; `created` holds the blockers already written.
    #[error("Failed to create blocker record: {source}")]
    Creation {
        created: Vec<String>,
        source: StoreError,
    },
}

/// Why a booking request from the calendar form was not stored.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid preferred date: {0}")]
    InvalidDate(String),
    #[error("Unknown time slot: {0}")]
    UnknownSlot(String),
    /// The day or slot is no longer bookable.
    #[error(transparent)]
    Unavailable(#[from] ViewError),
    #[error("{0}")]
    Store(#[from] StoreError),
}

// --- Data Structures ---
#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    /// Id of the booking that was just approved
    #[cfg_attr(feature = "openapi", schema(example = "recA1b2C3d4E5f6G7"))]
    #[serde(default)]
    pub record_id: Option<String>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ApproveResponse {
    #[cfg_attr(feature = "openapi", schema(example = "Created 2 blocker records"))]
    pub message: String,
    pub slots_created: usize,
    pub record_ids: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct BookingsQuery {
    /// Exact `Status` value to match, e.g. `Approved` or `Pending`
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingsResponse {
    /// Field maps of the matching rows, without record ids
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
    pub records: Vec<Map<String, Value>>,
}

/// Fields posted by the calendar's booking form.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct BookingRequestForm {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "Preferred Date", default)]
    pub preferred_date: String,
    #[serde(rename = "Preferred Time", default)]
    pub preferred_time: String,
    #[serde(rename = "Schedule Set", default)]
    pub schedule_set: String,
}

/// What one run of the blocker workflow did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockerOutcome {
    pub start_slot: Slot,
    pub slots_needed: usize,
    /// Ids of the created blockers, in slot order.
    pub record_ids: Vec<String>,
}

impl BlockerOutcome {
    pub fn message(&self) -> String {
        if self.record_ids.is_empty() {
            "No successive slots needed".to_string()
        } else {
            format!("Created {} blocker records", self.record_ids.len())
        }
    }
}

impl From<BlockerOutcome> for ApproveResponse {
    fn from(outcome: BlockerOutcome) -> Self {
        ApproveResponse {
            message: outcome.message(),
            slots_created: outcome.record_ids.len(),
            record_ids: outcome.record_ids,
        }
    }
}

pub fn admin_note(source_id: &str) -> String {
    format!("Auto-blocked: successive slot for booking {}", source_id)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn duration_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

// --- Availability ---

async fn fetch_status(
    store: &dyn BookingStore,
    status: BookingStatus,
) -> Result<Vec<BookingFields>, StoreError> {
    let records = store.list_by_status(status.as_str()).await?;
    Ok(records
        .iter()
        .filter_map(|record| match record.booking() {
            Ok(fields) => Some(fields),
            Err(e) => {
                warn!("skipping malformed booking {}: {}", record.id, e);
                None
            }
        })
        .collect())
}

/// Approved then Pending bookings, indexed by day, schedule and slot.
pub async fn load_occupancy(store: &dyn BookingStore) -> Result<Occupancy, StoreError> {
    let approved = fetch_status(store, BookingStatus::Approved).await?;
    let pending = fetch_status(store, BookingStatus::Pending).await?;
    Ok(Occupancy::new(&approved, &pending))
}

// --- Booking requests ---

/// Stores a calendar form submission as one `Pending` booking.
///
/// The day and slot are checked against current availability the same way
/// the calendar checks a click, so a slot approved since the page was
/// rendered is refused. A slot that is only pending can be requested again.
pub async fn submit_booking_request(
    store: &dyn BookingStore,
    form: &BookingRequestForm,
    today: NaiveDate,
    schedules: &[String],
) -> Result<StoreRecord, RequestError> {
    let name = form.name.trim();
    let email = form.email.trim();
    let date_raw = form.preferred_date.trim();
    let time_raw = form.preferred_time.trim();
    let schedule = form.schedule_set.trim();

    let missing: Vec<&'static str> = [
        (FIELD_NAME, name),
        (FIELD_EMAIL, email),
        (FIELD_PREFERRED_DATE, date_raw),
        (FIELD_PREFERRED_TIME, time_raw),
        (FIELD_SCHEDULE_SET, schedule),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(field, _)| field)
    .collect();
    if !missing.is_empty() {
        return Err(RequestError::MissingFields(missing));
    }

    let date = parse_preferred_date(date_raw)
        .ok_or_else(|| RequestError::InvalidDate(date_raw.to_string()))?;
    let slot =
        Slot::from_label(time_raw).ok_or_else(|| RequestError::UnknownSlot(time_raw.to_string()))?;

    let occupancy = load_occupancy(store).await?;
    let mut view = CalendarView::new(today);
    view.select_date(date, today, &occupancy, schedules)?;
    view.select_slot(schedule, slot, &occupancy, schedules)?;

    let fields = BookingFields {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        preferred_date: Some(date.format("%Y-%m-%d").to_string()),
        preferred_time: Some(slot.label().to_string()),
        schedule_set: Some(schedule.to_string()),
        status: Some(BookingStatus::Pending.to_string()),
        ..Default::default()
    };
    let record = store.create_record(fields.into_map()).await?;
    info!(
        "booking request {} stored for {} {} ({})",
        record.id, date, slot, schedule
    );
    Ok(record)
}

// --- Workflow ---

/// Expands an approved booking into one Approved blocker row per extra slot.
///
/// Blockers are created one at a time in slot order. The first failed create
/// stops the run; nothing already written is undone. Calling this twice for
/// the same booking creates the blockers twice.
pub async fn create_blockers(
    store: &dyn BookingStore,
    policy: TimestampPolicy,
    record_id: &str,
) -> Result<BlockerOutcome, WorkflowError> {
    let record = store.get_record(record_id).await?;
    let source = record.booking()?;

    let confirmed = non_blank(source.confirmed_date_time.as_deref());
    let schedule = non_blank(source.schedule_set.as_deref());
    let has_duration = duration_present(source.calculated_duration.as_ref());

    let (confirmed, schedule) = match (confirmed, schedule, has_duration) {
        (Some(confirmed), Some(schedule), true) => (confirmed, schedule),
        _ => {
            let mut missing = Vec::new();
            if confirmed.is_none() {
                missing.push(FIELD_CONFIRMED_DATE_TIME);
            }
            if !has_duration {
                missing.push(FIELD_CALCULATED_DURATION);
            }
            if schedule.is_none() {
                missing.push(FIELD_SCHEDULE_SET);
            }
            return Err(WorkflowError::MissingFields(missing));
        }
    };

    let plan = plan_expansion(confirmed, source.calculated_duration.as_ref(), policy)?;
    if plan.is_noop() {
        info!(
            "booking {} fits in {}; no blockers needed",
            record_id, plan.start_slot
        );
        return Ok(BlockerOutcome {
            start_slot: plan.start_slot,
            slots_needed: plan.slots_needed,
            record_ids: Vec::new(),
        });
    }

    let mut created = Vec::with_capacity(plan.blockers.len());
    for slot in &plan.blockers {
        let fields = blocker_fields(&record, &source, confirmed, schedule, *slot);
        match store.create_record(fields).await {
            Ok(blocker) => {
                debug!("blocker {} created for {} ({})", blocker.id, record_id, slot);
                created.push(blocker.id);
            }
            Err(err) => {
                error!(
                    "blocker for {} ({}) failed after {} created: {}",
                    record_id,
                    slot,
                    created.len(),
                    err
                );
                return Err(WorkflowError::Creation {
                    created,
                    source: err,
                });
            }
        }
    }

    info!(
        "created {} blocker records for booking {}",
        created.len(),
        record_id
    );
    Ok(BlockerOutcome {
        start_slot: plan.start_slot,
        slots_needed: plan.slots_needed,
        record_ids: created,
    })
}

fn blocker_fields(
    record: &StoreRecord,
    source: &BookingFields,
    confirmed: &str,
    schedule: &str,
    slot: Slot,
) -> Map<String, Value> {
    BookingFields {
        name: source.name.clone(),
        email: source.email.clone(),
        preferred_date: source.preferred_date.clone(),
        preferred_time: Some(slot.label().to_string()),
        confirmed_date_time: Some(confirmed.to_string()),
        calculated_duration: None,
        schedule_set: Some(schedule.to_string()),
        status: Some(BookingStatus::Approved.to_string()),
        admin_notes: Some(admin_note(&record.id)),
    }
    .into_map()
}
