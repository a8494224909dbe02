// --- File: crates/slotbook_calendar/src/availability.rs ---

//! Slot and day classification from the Approved and Pending booking lists.

use chrono::{Datelike, NaiveDate, Weekday};
use slotbook_common::models::BookingFields;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::slots::{Slot, SLOT_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    /// An Approved booking (or blocker) holds the slot.
    Taken,
    /// Only Pending requests mention the slot; still selectable.
    Pending,
    Free,
}

impl SlotStatus {
    pub fn css_class(self) -> &'static str {
        match self {
            SlotStatus::Taken => "taken",
            SlotStatus::Pending => "pending",
            SlotStatus::Free => "free",
        }
    }

    pub fn is_selectable(self) -> bool {
        !matches!(self, SlotStatus::Taken)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    Past,
    Weekend,
    FullyBooked,
    Available,
}

impl DayStatus {
    pub fn css_class(self) -> &'static str {
        match self {
            DayStatus::Past => "past",
            DayStatus::Weekend => "weekend",
            DayStatus::FullyBooked => "full",
            DayStatus::Available => "available",
        }
    }

    pub fn is_selectable(self) -> bool {
        matches!(self, DayStatus::Available)
    }
}

type DayKey = (NaiveDate, String);

/// Which slots are held on each (date, schedule) pair.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    approved: HashMap<DayKey, BTreeSet<Slot>>,
    pending: HashMap<DayKey, BTreeSet<Slot>>,
}

impl Occupancy {
    pub fn new(approved: &[BookingFields], pending: &[BookingFields]) -> Self {
        Occupancy {
            approved: index_rows(approved),
            pending: index_rows(pending),
        }
    }

    pub fn slot_status(&self, date: NaiveDate, schedule: &str, slot: Slot) -> SlotStatus {
        let key = (date, schedule.to_string());
        let holds = |map: &HashMap<DayKey, BTreeSet<Slot>>| {
            map.get(&key).is_some_and(|slots| slots.contains(&slot))
        };
        if holds(&self.approved) {
            SlotStatus::Taken
        } else if holds(&self.pending) {
            SlotStatus::Pending
        } else {
            SlotStatus::Free
        }
    }

    /// Distinct Approved slots for one schedule on one date.
    pub fn approved_count(&self, date: NaiveDate, schedule: &str) -> usize {
        self.approved
            .get(&(date, schedule.to_string()))
            .map_or(0, BTreeSet::len)
    }

    /// Every listed schedule has all slots Approved. An empty schedule list
    /// is never fully booked.
    pub fn is_fully_booked<S: AsRef<str>>(&self, date: NaiveDate, schedules: &[S]) -> bool {
        !schedules.is_empty()
            && schedules
                .iter()
                .all(|s| self.approved_count(date, s.as_ref()) == SLOT_COUNT)
    }

    /// Past, then weekend, then fully booked; anything else is available.
    pub fn classify_day<S: AsRef<str>>(
        &self,
        date: NaiveDate,
        today: NaiveDate,
        schedules: &[S],
    ) -> DayStatus {
        if date < today {
            DayStatus::Past
        } else if is_weekend(date) {
            DayStatus::Weekend
        } else if self.is_fully_booked(date, schedules) {
            DayStatus::FullyBooked
        } else {
            DayStatus::Available
        }
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// `YYYY-MM-DD`, tolerating a trailing time part.
pub fn parse_preferred_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn index_rows(rows: &[BookingFields]) -> HashMap<DayKey, BTreeSet<Slot>> {
    let mut index: HashMap<DayKey, BTreeSet<Slot>> = HashMap::new();
    for row in rows {
        let located = (
            row.preferred_date.as_deref().and_then(parse_preferred_date),
            row.schedule_set.as_deref(),
            row.preferred_time.as_deref().and_then(Slot::from_label),
        );
        match located {
            (Some(date), Some(schedule), Some(slot)) => {
                index
                    .entry((date, schedule.to_string()))
                    .or_default()
                    .insert(slot);
            }
            _ => debug!("skipping booking row without date, schedule or slot: {:?}", row),
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULES: [&str; 2] = ["Schedule A", "Schedule B"];

    fn row(date: &str, schedule: &str, slot: &str) -> BookingFields {
        BookingFields {
            preferred_date: Some(date.to_string()),
            schedule_set: Some(schedule.to_string()),
            preferred_time: Some(slot.to_string()),
            ..Default::default()
        }
    }

    fn full_day(date: &str, schedule: &str) -> Vec<BookingFields> {
        Slot::all().map(|s| row(date, schedule, s.label())).collect()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn approved_wins_over_pending() {
        let approved = vec![row("2025-06-02", "Schedule A", "9:00 AM - 9:30 AM")];
        let pending = vec![
            row("2025-06-02", "Schedule A", "9:00 AM - 9:30 AM"),
            row("2025-06-02", "Schedule A", "9:30 AM - 10:00 AM"),
        ];
        let occ = Occupancy::new(&approved, &pending);
        let slot = |l| Slot::from_label(l).unwrap();

        assert_eq!(
            occ.slot_status(d(2025, 6, 2), "Schedule A", slot("9:00 AM - 9:30 AM")),
            SlotStatus::Taken
        );
        assert_eq!(
            occ.slot_status(d(2025, 6, 2), "Schedule A", slot("9:30 AM - 10:00 AM")),
            SlotStatus::Pending
        );
        assert_eq!(
            occ.slot_status(d(2025, 6, 2), "Schedule B", slot("9:00 AM - 9:30 AM")),
            SlotStatus::Free
        );
        assert_eq!(
            occ.slot_status(d(2025, 6, 3), "Schedule A", slot("9:00 AM - 9:30 AM")),
            SlotStatus::Free
        );
    }

    #[test]
    fn fully_booked_needs_every_schedule() {
        let mut approved = full_day("2025-06-02", "Schedule A");
        let occ = Occupancy::new(&approved, &[]);
        assert!(!occ.is_fully_booked(d(2025, 6, 2), &SCHEDULES));

        approved.extend(full_day("2025-06-02", "Schedule B"));
        let occ = Occupancy::new(&approved, &[]);
        assert!(occ.is_fully_booked(d(2025, 6, 2), &SCHEDULES));
        assert!(!occ.is_fully_booked(d(2025, 6, 2), &[] as &[&str]));
    }

    #[test]
    fn pending_rows_never_fill_a_day() {
        let mut pending = full_day("2025-06-02", "Schedule A");
        pending.extend(full_day("2025-06-02", "Schedule B"));
        let occ = Occupancy::new(&[], &pending);
        assert!(!occ.is_fully_booked(d(2025, 6, 2), &SCHEDULES));
    }

    #[test]
    fn duplicate_rows_count_once() {
        let mut approved = full_day("2025-06-02", "Schedule A");
        approved.pop();
        approved.push(row("2025-06-02", "Schedule A", "8:00 AM - 8:30 AM"));
        let occ = Occupancy::new(&approved, &[]);
        assert_eq!(occ.approved_count(d(2025, 6, 2), "Schedule A"), SLOT_COUNT - 1);
    }

    #[test]
    fn classification_priority() {
        let mut approved = full_day("2025-06-07", "Schedule A");
        approved.extend(full_day("2025-06-07", "Schedule B"));
        approved.extend(full_day("2025-06-02", "Schedule A"));
        approved.extend(full_day("2025-06-02", "Schedule B"));
        approved.extend(full_day("2025-06-04", "Schedule A"));
        approved.extend(full_day("2025-06-04", "Schedule B"));
        let occ = Occupancy::new(&approved, &[]);
        let today = d(2025, 6, 3);

        // Past beats fully booked
        assert_eq!(occ.classify_day(d(2025, 6, 2), today, &SCHEDULES), DayStatus::Past);
        // Saturday, fully booked, still reported as weekend
        assert_eq!(
            occ.classify_day(d(2025, 6, 7), today, &SCHEDULES),
            DayStatus::Weekend
        );
        assert_eq!(
            occ.classify_day(d(2025, 6, 4), today, &SCHEDULES),
            DayStatus::FullyBooked
        );
        assert_eq!(
            occ.classify_day(today, today, &SCHEDULES),
            DayStatus::Available
        );
    }

    #[test]
    fn malformed_rows_are_ignored() {
        let approved = vec![
            row("not a date", "Schedule A", "9:00 AM - 9:30 AM"),
            row("2025-06-02", "Schedule A", "9:00 AM"),
            BookingFields {
                preferred_date: Some("2025-06-02".into()),
                preferred_time: Some("9:00 AM - 9:30 AM".into()),
                ..Default::default()
            },
        ];
        let occ = Occupancy::new(&approved, &[]);
        assert_eq!(occ.approved_count(d(2025, 6, 2), "Schedule A"), 0);
    }

    #[test]
    fn preferred_date_tolerates_time_suffix() {
        assert_eq!(parse_preferred_date("2025-06-02"), Some(d(2025, 6, 2)));
        assert_eq!(
            parse_preferred_date("2025-06-02T00:00:00.000Z"),
            Some(d(2025, 6, 2))
        );
        assert_eq!(parse_preferred_date("06/02/2025"), None);
    }
}
