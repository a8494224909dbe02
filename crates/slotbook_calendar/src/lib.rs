// --- File: crates/slotbook_calendar/src/lib.rs ---
pub mod availability;
pub mod expansion;
#[cfg(test)]
mod expansion_proptest;
#[cfg(test)]
mod expansion_test;
pub mod render;
pub mod slots;
pub mod view;

pub use availability::{DayStatus, Occupancy, SlotStatus};
pub use expansion::{plan_expansion, ExpansionError, ExpansionPlan, TimestampPolicy};
pub use slots::{Slot, ALL_SLOTS, SLOT_COUNT};
pub use view::{CalendarQuery, CalendarView, Step, ViewError};
