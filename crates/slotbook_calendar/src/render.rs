// --- File: crates/slotbook_calendar/src/render.rs ---

//! Server-side HTML for the booking calendar.
//!
//! Every fragment is an `askama` template fed from a [`CalendarView`] and an
//! [`Occupancy`]; values are HTML-escaped by the templates. Interaction
//! happens through plain links that carry the next view state in the query
//! string, and the booking form posts back to the calendar path.

use askama::Template;
use chrono::NaiveDate;
use tracing::warn;

use crate::availability::{Occupancy, SlotStatus};
use crate::slots::Slot;
use crate::view::{CalendarQuery, CalendarView};

/// Shown in place of the grid when the booking lists cannot be fetched.
pub const LOAD_ERROR_MESSAGE: &str =
    "Unable to load availability. Please try refreshing or contact us directly.";

const WEEKDAY_HEADER: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Inputs shared by every part of the page.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub view: &'a CalendarView,
    pub occupancy: &'a Occupancy,
    pub today: NaiveDate,
    pub schedules: &'a [String],
    /// Path the calendar links and the booking form point at, e.g. `/calendar`.
    pub base_path: &'a str,
}

// --- Templates ---

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate {
    body: String,
}

struct StepItem {
    id: &'static str,
    class: &'static str,
    label: &'static str,
}

#[derive(Template)]
#[template(path = "steps.html")]
struct StepsTemplate {
    steps: [StepItem; 2],
}

#[derive(Template)]
#[template(path = "month_header.html")]
struct MonthHeaderTemplate {
    prev_href: String,
    title: String,
    next_href: String,
}

struct DayCell {
    blank: bool,
    link: bool,
    class: &'static str,
    href: String,
    date: String,
    day: String,
}

#[derive(Template)]
#[template(path = "month_grid.html")]
struct MonthGridTemplate {
    weekdays: [&'static str; 7],
    cells: Vec<DayCell>,
}

#[derive(Template)]
#[template(path = "load_error.html")]
struct LoadErrorTemplate {
    message: &'static str,
}

struct SlotCell {
    class: String,
    label: &'static str,
    start: String,
    end: String,
    href: String,
    taken: bool,
    pending: bool,
}

struct ScheduleColumn {
    name: String,
    slots: Vec<SlotCell>,
}

#[derive(Template)]
#[template(path = "slot_panel.html")]
struct SlotPanelTemplate {
    heading: String,
    columns: Vec<ScheduleColumn>,
}

#[derive(Template)]
#[template(path = "booking_form.html")]
struct BookingFormTemplate<'a> {
    action: &'a str,
    hidden: bool,
    date: String,
    slot: &'a str,
    schedule: &'a str,
}

#[derive(Template)]
#[template(path = "notice.html")]
struct NoticeTemplate<'a> {
    kind: &'a str,
    title: &'a str,
    message: &'a str,
    back_href: &'a str,
}

// --- Fragments ---

/// `base?query` for a calendar link. Escaping is left to the templates.
pub fn calendar_href(base_path: &str, query: &CalendarQuery) -> String {
    match serde_urlencoded::to_string(query) {
        Ok(qs) if qs.is_empty() => base_path.to_string(),
        Ok(qs) => format!("{}?{}", base_path, qs),
        Err(e) => {
            warn!("failed to encode calendar link: {}", e);
            base_path.to_string()
        }
    }
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn render_steps(view: &CalendarView) -> askama::Result<String> {
    StepsTemplate {
        steps: [
            StepItem {
                id: "step-choose",
                class: view.choose_step.css_class(),
                label: "1. Choose a date and time",
            },
            StepItem {
                id: "step-form",
                class: view.form_step.css_class(),
                label: "2. Fill in your details",
            },
        ],
    }
    .render()
}

fn render_month_header(ctx: &PageContext<'_>) -> askama::Result<String> {
    let ((prev_year, prev_month), (next_year, next_month)) = ctx.view.adjacent_months();
    let link = |year, month| {
        calendar_href(
            ctx.base_path,
            &CalendarQuery {
                year: Some(year),
                month: Some(month),
                ..Default::default()
            },
        )
    };
    MonthHeaderTemplate {
        prev_href: link(prev_year, prev_month),
        title: ctx.view.month_title(),
        next_href: link(next_year, next_month),
    }
    .render()
}

/// Weekday header, leading blanks and one cell per day of the shown month.
pub fn render_month_grid(ctx: &PageContext<'_>) -> askama::Result<String> {
    let view = ctx.view;
    let blanks = (0..view.leading_blanks()).map(|_| DayCell {
        blank: true,
        link: false,
        class: "blank",
        href: String::new(),
        date: String::new(),
        day: String::new(),
    });
    let days = view.days().map(|date| {
        let status = ctx.occupancy.classify_day(date, ctx.today, ctx.schedules);
        let link = status.is_selectable();
        let href = if link {
            calendar_href(
                ctx.base_path,
                &CalendarQuery {
                    year: Some(view.current_year),
                    month: Some(view.current_month),
                    date: Some(iso_date(date)),
                    ..Default::default()
                },
            )
        } else {
            String::new()
        };
        DayCell {
            blank: false,
            link,
            class: if view.selected_date == Some(date) {
                "selected"
            } else {
                status.css_class()
            },
            href,
            date: iso_date(date),
            day: date.format("%-d").to_string(),
        }
    });

    MonthGridTemplate {
        weekdays: WEEKDAY_HEADER,
        cells: blanks.chain(days).collect(),
    }
    .render()
}

/// Grid replacement shown when availability could not be fetched.
pub fn render_load_error() -> askama::Result<String> {
    LoadErrorTemplate {
        message: LOAD_ERROR_MESSAGE,
    }
    .render()
}

fn slot_cell(ctx: &PageContext<'_>, date: NaiveDate, schedule: &str, slot: Slot) -> SlotCell {
    let status = ctx.occupancy.slot_status(date, schedule, slot);
    let selected = ctx.view.selected_slot == Some(slot)
        && ctx.view.selected_schedule.as_deref() == Some(schedule);
    let class = if selected {
        format!("slot {} selected", status.css_class())
    } else {
        format!("slot {}", status.css_class())
    };
    let href = if status.is_selectable() {
        calendar_href(
            ctx.base_path,
            &CalendarQuery {
                year: Some(ctx.view.current_year),
                month: Some(ctx.view.current_month),
                date: Some(iso_date(date)),
                schedule: Some(schedule.to_string()),
                slot: Some(slot.index()),
            },
        )
    } else {
        String::new()
    };

    SlotCell {
        class,
        label: slot.label(),
        start: slot.start().format("%H:%M").to_string(),
        end: slot.end().format("%H:%M").to_string(),
        href,
        taken: status == SlotStatus::Taken,
        pending: status == SlotStatus::Pending,
    }
}

/// One column of slots per schedule for the selected date. Empty until a
/// date is chosen.
pub fn render_slot_panel(ctx: &PageContext<'_>) -> askama::Result<String> {
    let Some(date) = ctx.view.selected_date else {
        return Ok(String::new());
    };
    let columns = ctx
        .schedules
        .iter()
        .map(|schedule| ScheduleColumn {
            name: schedule.clone(),
            slots: Slot::all()
                .map(|slot| slot_cell(ctx, date, schedule, slot))
                .collect(),
        })
        .collect();

    SlotPanelTemplate {
        heading: date.format("%A, %B %-d, %Y").to_string(),
        columns,
    }
    .render()
}

/// Booking request form, pre-filled with the chosen date, slot and schedule
/// and posting to `action`.
pub fn render_booking_form(view: &CalendarView, action: &str) -> askama::Result<String> {
    BookingFormTemplate {
        action,
        hidden: !view.form_visible(),
        date: view.selected_date.map(iso_date).unwrap_or_default(),
        slot: view.selected_slot.map(Slot::label).unwrap_or_default(),
        schedule: view.selected_schedule.as_deref().unwrap_or_default(),
    }
    .render()
}

fn render_shell(body: String) -> askama::Result<String> {
    PageTemplate { body }.render()
}

pub fn render_page(ctx: &PageContext<'_>) -> askama::Result<String> {
    let body = [
        render_steps(ctx.view)?,
        render_month_header(ctx)?,
        render_month_grid(ctx)?,
        render_slot_panel(ctx)?,
        render_booking_form(ctx.view, ctx.base_path)?,
    ]
    .concat();
    render_shell(body)
}

/// Page with the grid replaced by [`LOAD_ERROR_MESSAGE`].
pub fn render_error_page(ctx: &PageContext<'_>) -> askama::Result<String> {
    let body = [
        render_steps(ctx.view)?,
        render_month_header(ctx)?,
        render_load_error()?,
    ]
    .concat();
    render_shell(body)
}

/// Kind of outcome a notice page reports; doubles as its CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    fn css_class(self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

/// Stand-alone page with one message and a link back to the calendar.
pub fn render_notice_page(
    kind: NoticeKind,
    title: &str,
    message: &str,
    back_href: &str,
) -> askama::Result<String> {
    let body = NoticeTemplate {
        kind: kind.css_class(),
        title,
        message,
        back_href,
    }
    .render()?;
    render_shell(body)
}
