// --- File: crates/slotbook_calendar/src/expansion.rs ---

//! Slot expansion: which extra slots a confirmed booking consumes.
//!
//! A booking that starts in slot `i` and needs `n` slots occupies
//! `i..i+n`. The booking row itself covers slot `i`; every later slot
//! (clipped to the end of the day) needs a blocker row.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde_json::Value;
use slotbook_config::{ScheduleConfig, TimestampMode};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::slots::{display_time, Slot, SLOT_COUNT, SLOT_MINUTES};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpansionError {
    #[error("Invalid confirmed date and time: {0}")]
    InvalidTimestamp(String),
    /// The confirmed clock time is not the start of any slot.
    #[error("Could not find slot matching: {clock}")]
    StartSlotNotFound { confirmed: String, clock: String },
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
}

/// How a confirmed timestamp is turned into a local date and clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPolicy {
    /// Read the literal `YYYY-MM-DD` and `HH:MM` fields, ignoring any offset.
    #[default]
    Naive,
    /// Convert into the given zone first. A timestamp without an offset is
    /// already local time in that zone.
    Zoned(Tz),
}

impl TimestampPolicy {
    pub fn from_config(config: &ScheduleConfig) -> Result<Self, ExpansionError> {
        match config.timestamp_policy {
            TimestampMode::Naive => Ok(TimestampPolicy::Naive),
            TimestampMode::Zoned => Tz::from_str(&config.time_zone)
                .map(TimestampPolicy::Zoned)
                .map_err(|_| ExpansionError::UnknownTimeZone(config.time_zone.clone())),
        }
    }

    /// Local date and minute-precision clock time of `raw`.
    pub fn local_date_time(&self, raw: &str) -> Result<NaiveDateTime, ExpansionError> {
        let raw = raw.trim();
        match self {
            TimestampPolicy::Naive => parse_naive(raw),
            TimestampPolicy::Zoned(tz) => match DateTime::parse_from_rfc3339(raw) {
                Ok(dt) => Ok(dt.with_timezone(tz).naive_local()),
                Err(_) if !has_offset(raw) => {
                    let naive = parse_naive(raw)?;
                    // Clock times skipped by a DST jump do not exist locally.
                    tz.from_local_datetime(&naive)
                        .earliest()
                        .map(|dt| dt.naive_local())
                        .ok_or_else(|| ExpansionError::InvalidTimestamp(raw.to_string()))
                }
                Err(_) => Err(ExpansionError::InvalidTimestamp(raw.to_string())),
            },
        }
    }
}

/// True when the part after the date carries `Z` or a `±hh:mm` offset.
fn has_offset(raw: &str) -> bool {
    raw.split_once(['T', ' '])
        .map(|(_, time)| time.contains(['Z', 'z', '+', '-']))
        .unwrap_or(false)
}

fn parse_naive(raw: &str) -> Result<NaiveDateTime, ExpansionError> {
    let invalid = || ExpansionError::InvalidTimestamp(raw.to_string());
    let (date_part, time_part) = raw.split_once(['T', ' ']).ok_or_else(invalid)?;
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| invalid())?;
    let clock = time_part.get(..5).ok_or_else(invalid)?;
    let time = NaiveTime::parse_from_str(clock, "%H:%M").map_err(|_| invalid())?;
    Ok(date.and_time(time))
}

/// Whole minutes from a duration cell.
///
/// Accepts a JSON number (fractions round up), or a string whose leading
/// digits are the minutes (`"90"`, `"90 min"`). Anything else, and any
/// non-positive amount, means "no duration".
pub fn parse_duration_minutes(value: Option<&Value>) -> Option<u32> {
    let minutes = match value? {
        Value::Number(n) => {
            let f = n.as_f64()?;
            if !f.is_finite() || f <= 0.0 {
                return None;
            }
            f.ceil().min(u32::MAX as f64) as u32
        }
        Value::String(s) => {
            let digits: String = s
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse::<u32>().ok()?
        }
        _ => return None,
    };
    (minutes > 0).then_some(minutes)
}

/// `ceil(minutes / 30)`, never less than one.
pub fn slots_needed(duration_minutes: Option<u32>) -> usize {
    match duration_minutes {
        Some(m) if m > 0 => m.div_ceil(SLOT_MINUTES) as usize,
        _ => 1,
    }
}

/// Slots strictly after `start`, up to `slots_needed` slots in total,
/// clipped to the end of the slot table.
pub fn blocker_slots(start: Slot, slots_needed: usize) -> Vec<Slot> {
    let first = start.index() + 1;
    let end = start.index().saturating_add(slots_needed).min(SLOT_COUNT);
    (first..end).filter_map(Slot::from_index).collect()
}

/// Everything the blocker workflow needs to know about one booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionPlan {
    pub confirmed_date: NaiveDate,
    pub clock_time: NaiveTime,
    pub start_slot: Slot,
    pub duration_minutes: Option<u32>,
    pub slots_needed: usize,
    pub blockers: Vec<Slot>,
}

impl ExpansionPlan {
    /// True when the booking fits in its own slot.
    pub fn is_noop(&self) -> bool {
        self.blockers.is_empty()
    }
}

/// Work out the start slot and blocker slots for a confirmed booking.
///
/// The start slot is resolved before the duration is looked at, so an
/// unmatched start time is reported even for single-slot bookings.
pub fn plan_expansion(
    confirmed_date_time: &str,
    duration: Option<&Value>,
    policy: TimestampPolicy,
) -> Result<ExpansionPlan, ExpansionError> {
    let local = policy.local_date_time(confirmed_date_time)?;
    let clock_time = local.time();
    let start_slot =
        Slot::starting_at(clock_time).ok_or_else(|| ExpansionError::StartSlotNotFound {
            confirmed: confirmed_date_time.to_string(),
            clock: display_time(clock_time),
        })?;

    let duration_minutes = parse_duration_minutes(duration);
    let needed = slots_needed(duration_minutes);
    let blockers = if duration_minutes.is_some() {
        blocker_slots(start_slot, needed)
    } else {
        Vec::new()
    };

    debug!(
        "expansion for {}: start={} duration={:?} needed={} blockers={}",
        confirmed_date_time,
        start_slot,
        duration_minutes,
        needed,
        blockers.len()
    );

    Ok(ExpansionPlan {
        confirmed_date: local.date(),
        clock_time,
        start_slot,
        duration_minutes,
        slots_needed: needed,
        blockers,
    })
}
