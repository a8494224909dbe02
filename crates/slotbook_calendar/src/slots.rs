// --- File: crates/slotbook_calendar/src/slots.rs ---

//! The fixed table of bookable half-hour slots.

use chrono::{NaiveTime, Timelike};
use std::fmt;

/// Number of bookable slots in a day.
pub const SLOT_COUNT: usize = 18;

/// Length of one slot in minutes.
pub const SLOT_MINUTES: u32 = 30;

/// First slot start, minutes after midnight (8:00 AM).
pub const DAY_START_MINUTES: u32 = 8 * 60;

/// Slot labels in booking order. These strings are stored verbatim in the
/// `Preferred Time` column.
pub const ALL_SLOTS: [&str; SLOT_COUNT] = [
    "8:00 AM - 8:30 AM",
    "8:30 AM - 9:00 AM",
    "9:00 AM - 9:30 AM",
    "9:30 AM - 10:00 AM",
    "10:00 AM - 10:30 AM",
    "10:30 AM - 11:00 AM",
    "11:00 AM - 11:30 AM",
    "11:30 AM - 12:00 PM",
    "12:00 PM - 12:30 PM",
    "12:30 PM - 1:00 PM",
    "1:00 PM - 1:30 PM",
    "1:30 PM - 2:00 PM",
    "2:00 PM - 2:30 PM",
    "2:30 PM - 3:00 PM",
    "3:00 PM - 3:30 PM",
    "3:30 PM - 4:00 PM",
    "4:00 PM - 4:30 PM",
    "4:30 PM - 5:00 PM",
];

/// A position in [`ALL_SLOTS`]. Always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(usize);

impl Slot {
    pub fn from_index(index: usize) -> Option<Slot> {
        (index < SLOT_COUNT).then_some(Slot(index))
    }

    pub fn from_label(label: &str) -> Option<Slot> {
        let label = label.trim();
        ALL_SLOTS.iter().position(|s| *s == label).map(Slot)
    }

    /// The slot whose displayed start equals `time` to the minute.
    pub fn starting_at(time: NaiveTime) -> Option<Slot> {
        let minutes = time.hour() * 60 + time.minute();
        if minutes < DAY_START_MINUTES {
            return None;
        }
        let offset = minutes - DAY_START_MINUTES;
        if offset % SLOT_MINUTES != 0 {
            return None;
        }
        Slot::from_index((offset / SLOT_MINUTES) as usize)
    }

    pub fn first() -> Slot {
        Slot(0)
    }

    pub fn last() -> Slot {
        Slot(SLOT_COUNT - 1)
    }

    pub fn all() -> impl Iterator<Item = Slot> {
        (0..SLOT_COUNT).map(Slot)
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn label(self) -> &'static str {
        ALL_SLOTS[self.0]
    }

    pub fn start(self) -> NaiveTime {
        clock(DAY_START_MINUTES + self.0 as u32 * SLOT_MINUTES)
    }

    pub fn end(self) -> NaiveTime {
        clock(DAY_START_MINUTES + (self.0 as u32 + 1) * SLOT_MINUTES)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 12-hour display form used in slot labels, e.g. `"9:00 AM"`.
pub fn display_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

fn clock(minutes: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or_default()
}
