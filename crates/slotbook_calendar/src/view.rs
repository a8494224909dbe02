// --- File: crates/slotbook_calendar/src/view.rs ---

//! Transient calendar page state: shown month, selection and step indicators.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::availability::{DayStatus, Occupancy, SlotStatus};
use crate::slots::Slot;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Month must be between 0 and 11, got {0}")]
    InvalidMonth(u32),
    #[error("Date {date} cannot be selected ({status:?})")]
    DateNotSelectable { date: NaiveDate, status: DayStatus },
    #[error("Select a date first")]
    NoDateSelected,
    #[error("Unknown schedule: {0}")]
    UnknownSchedule(String),
    #[error("{slot} on {schedule} is already taken")]
    SlotTaken { schedule: String, slot: Slot },
}

/// Progress marker shown above the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Step {
    pub active: bool,
    pub done: bool,
}

impl Step {
    pub fn css_class(self) -> &'static str {
        match (self.active, self.done) {
            (_, true) => "step done",
            (true, false) => "step active",
            (false, false) => "step",
        }
    }
}

/// Query string carried by every calendar link. `month` is zero-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct CalendarQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    /// `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    /// Position in the slot table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView {
    pub current_year: i32,
    /// Zero-based, January is 0.
    pub current_month: u32,
    pub selected_date: Option<NaiveDate>,
    pub selected_slot: Option<Slot>,
    pub selected_schedule: Option<String>,
    /// "Choose a date and time"
    pub choose_step: Step,
    /// "Fill in your details"
    pub form_step: Step,
}

impl CalendarView {
    /// Month containing `today`, nothing selected.
    pub fn new(today: NaiveDate) -> Self {
        CalendarView {
            current_year: today.year(),
            current_month: today.month0(),
            selected_date: None,
            selected_slot: None,
            selected_schedule: None,
            choose_step: Step {
                active: true,
                done: false,
            },
            form_step: Step::default(),
        }
    }

    pub fn for_month(year: i32, month0: u32) -> Result<Self, ViewError> {
        let first = month0
            .checked_add(1)
            .and_then(|month| NaiveDate::from_ymd_opt(year, month, 1))
            .ok_or(ViewError::InvalidMonth(month0))?;
        Ok(CalendarView::new(first))
    }

    /// Builds the view a calendar link describes. Selections that are not
    /// allowed are dropped, the shown month is kept.
    pub fn from_query<S: AsRef<str>>(
        query: &CalendarQuery,
        today: NaiveDate,
        occupancy: &Occupancy,
        schedules: &[S],
    ) -> Self {
        let selected_date = query
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        let mut view = match (query.year, query.month, selected_date) {
            (Some(year), Some(month), _) => {
                CalendarView::for_month(year, month).unwrap_or_else(|e| {
                    debug!("ignoring month in query: {}", e);
                    CalendarView::new(today)
                })
            }
            (_, _, Some(date)) => CalendarView::new(date),
            _ => CalendarView::new(today),
        };

        if let Some(date) = selected_date {
            if let Err(e) = view.select_date(date, today, occupancy, schedules) {
                debug!("ignoring date in query: {}", e);
                return view;
            }
        }

        if let (Some(schedule), Some(slot)) = (
            query.schedule.as_deref(),
            query.slot.and_then(Slot::from_index),
        ) {
            if let Err(e) = view.select_slot(schedule, slot, occupancy, schedules) {
                debug!("ignoring slot in query: {}", e);
            }
        }
        view
    }

    pub fn first_of_month(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.current_year, self.current_month + 1, 1).unwrap_or_default()
    }

    pub fn days_in_month(&self) -> u32 {
        let first = self.first_of_month();
        let next = first
            .checked_add_months(chrono::Months::new(1))
            .unwrap_or(first);
        next.signed_duration_since(first).num_days() as u32
    }

    /// Empty cells before day 1 in a Sunday-first grid.
    pub fn leading_blanks(&self) -> u32 {
        self.first_of_month().weekday().num_days_from_sunday()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first_of_month();
        first.iter_days().take(self.days_in_month() as usize)
    }

    pub fn month_title(&self) -> String {
        format!(
            "{} {}",
            MONTH_NAMES[self.current_month as usize % 12],
            self.current_year
        )
    }

    pub fn next_month(&mut self) {
        if self.current_month == 11 {
            self.current_month = 0;
            self.current_year += 1;
        } else {
            self.current_month += 1;
        }
    }

    pub fn prev_month(&mut self) {
        if self.current_month == 0 {
            self.current_month = 11;
            self.current_year -= 1;
        } else {
            self.current_month -= 1;
        }
    }

    /// Year and month of the neighbouring months, for navigation links.
    pub fn adjacent_months(&self) -> ((i32, u32), (i32, u32)) {
        let mut prev = self.clone();
        prev.prev_month();
        let mut next = self.clone();
        next.next_month();
        (
            (prev.current_year, prev.current_month),
            (next.current_year, next.current_month),
        )
    }

    /// Selects an available day and drops any chosen slot.
    pub fn select_date<S: AsRef<str>>(
        &mut self,
        date: NaiveDate,
        today: NaiveDate,
        occupancy: &Occupancy,
        schedules: &[S],
    ) -> Result<(), ViewError> {
        let status = occupancy.classify_day(date, today, schedules);
        if !status.is_selectable() {
            return Err(ViewError::DateNotSelectable { date, status });
        }
        self.current_year = date.year();
        self.current_month = date.month0();
        self.selected_date = Some(date);
        self.clear_selection();
        Ok(())
    }

    /// Chooses a free or pending slot on the selected date and moves on to
    /// the booking form.
    pub fn select_slot<S: AsRef<str>>(
        &mut self,
        schedule: &str,
        slot: Slot,
        occupancy: &Occupancy,
        schedules: &[S],
    ) -> Result<SlotStatus, ViewError> {
        let date = self.selected_date.ok_or(ViewError::NoDateSelected)?;
        if !schedules.iter().any(|s| s.as_ref() == schedule) {
            return Err(ViewError::UnknownSchedule(schedule.to_string()));
        }
        let status = occupancy.slot_status(date, schedule, slot);
        if !status.is_selectable() {
            return Err(ViewError::SlotTaken {
                schedule: schedule.to_string(),
                slot,
            });
        }

        self.selected_slot = Some(slot);
        self.selected_schedule = Some(schedule.to_string());
        self.choose_step = Step {
            active: false,
            done: true,
        };
        self.form_step = Step {
            active: true,
            done: false,
        };
        Ok(status)
    }

    /// Forgets the chosen slot. The selected date stays.
    pub fn clear_selection(&mut self) {
        self.selected_slot = None;
        self.selected_schedule = None;
        self.choose_step = Step {
            active: true,
            done: false,
        };
        self.form_step = Step::default();
    }

    pub fn form_visible(&self) -> bool {
        self.selected_slot.is_some() && self.selected_schedule.is_some()
    }

    /// Link query for this exact state.
    pub fn to_query(&self) -> CalendarQuery {
        CalendarQuery {
            year: Some(self.current_year),
            month: Some(self.current_month),
            date: self.selected_date.map(|d| d.format("%Y-%m-%d").to_string()),
            schedule: self.selected_schedule.clone(),
            slot: self.selected_slot.map(Slot::index),
        }
    }
}
