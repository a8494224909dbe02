// --- File: crates/slotbook_common/src/models.rs ---

//! Booking rows as the record store sees them.
//!
//! The store speaks in loosely typed field maps keyed by human-readable
//! column names. [`StoreRecord`] keeps that raw map; [`BookingFields`] is the
//! typed view the workflow and the calendar read from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const FIELD_NAME: &str = "Name";
pub const FIELD_EMAIL: &str = "Email";
pub const FIELD_PREFERRED_DATE: &str = "Preferred Date";
pub const FIELD_PREFERRED_TIME: &str = "Preferred Time";
pub const FIELD_CONFIRMED_DATE_TIME: &str = "Confirmed Date and Time";
pub const FIELD_CALCULATED_DURATION: &str = "Calculated Duration";
pub const FIELD_SCHEDULE_SET: &str = "Schedule Set";
pub const FIELD_STATUS: &str = "Status";
pub const FIELD_ADMIN_NOTES: &str = "Admin Notes";

/// Booking lifecycle state as stored in the `Status` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Pending,
    Approved,
    Other(String),
}

impl BookingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Approved => "Approved",
            BookingStatus::Other(s) => s,
        }
    }
}

impl From<&str> for BookingStatus {
    fn from(value: &str) -> Self {
        match value {
            "Pending" => BookingStatus::Pending,
            "Approved" => BookingStatus::Approved,
            other => BookingStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the bookings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StoreRecord {
    pub id: String,
    #[serde(rename = "createdTime", default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub fields: Map<String, Value>,
}

impl StoreRecord {
    /// Typed view of this row's fields.
    pub fn booking(&self) -> Result<BookingFields, serde_json::Error> {
        BookingFields::from_map(&self.fields)
    }
}

/// Typed view of a booking row. Every column is optional because the store
/// omits empty cells entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingFields {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    #[serde(rename = "Preferred Date", default)]
    pub preferred_date: Option<String>,
    #[serde(rename = "Preferred Time", default)]
    pub preferred_time: Option<String>,
    #[serde(rename = "Confirmed Date and Time", default)]
    pub confirmed_date_time: Option<String>,
    /// Minutes; the store may hand back a number or a string like `"90 min"`.
    #[serde(rename = "Calculated Duration", default)]
    pub calculated_duration: Option<Value>,
    #[serde(rename = "Schedule Set", default)]
    pub schedule_set: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
    #[serde(rename = "Admin Notes", default)]
    pub admin_notes: Option<String>,
}

impl BookingFields {
    pub fn from_map(fields: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(fields.clone()))
    }

    /// Field map with only the populated columns, ready for a create call.
    pub fn into_map(self) -> Map<String, Value> {
        let mut map = Map::new();
        let columns = [
            (FIELD_NAME, self.name.map(Value::String)),
            (FIELD_EMAIL, self.email.map(Value::String)),
            (FIELD_PREFERRED_DATE, self.preferred_date.map(Value::String)),
            (FIELD_PREFERRED_TIME, self.preferred_time.map(Value::String)),
            (
                FIELD_CONFIRMED_DATE_TIME,
                self.confirmed_date_time.map(Value::String),
            ),
            (FIELD_CALCULATED_DURATION, self.calculated_duration),
            (FIELD_SCHEDULE_SET, self.schedule_set.map(Value::String)),
            (FIELD_STATUS, self.status.map(Value::String)),
            (FIELD_ADMIN_NOTES, self.admin_notes.map(Value::String)),
        ];
        for (key, value) in columns {
            if let Some(value) = value {
                map.insert(key.to_string(), value);
            }
        }
        map
    }

    pub fn booking_status(&self) -> Option<BookingStatus> {
        self.status.as_deref().map(BookingStatus::from)
    }
}
