// --- File: crates/slotbook_airtable/src/lib.rs ---
pub mod client;
pub mod mock;

pub use client::{status_formula, AirtableStore};
