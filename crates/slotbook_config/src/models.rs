// --- File: crates/slotbook_config/src/models.rs ---

use serde::{Deserialize, Serialize};

use crate::env_vars::{resolve_secret, SECRET_MARKER};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// --- Airtable Config ---
// base_id and token normally hold the "secret_from_env" marker in config files.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AirtableConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_marker")]
    pub base_id: String,
    #[serde(default = "default_table_name")]
    pub table_name: String,
    #[serde(default = "default_marker", skip_serializing)]
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AirtableConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            base_id: default_marker(),
            table_name: default_table_name(),
            token: default_marker(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AirtableConfig {
    /// Replaces marker values with their environment counterparts.
    pub fn resolve_secrets(&mut self) {
        resolve_secret(&mut self.base_id, "airtable.base_id");
        resolve_secret(&mut self.token, "airtable.token");
    }

    /// True once both the base id and the token hold real values.
    pub fn has_credentials(&self) -> bool {
        let usable = |v: &str| !v.trim().is_empty() && v != SECRET_MARKER;
        usable(&self.base_id) && usable(&self.token)
    }
}

/// How confirmed timestamps are turned into a calendar date and clock time.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimestampMode {
    /// Read the literal date and clock fields, ignoring any offset.
    #[default]
    Naive,
    /// Convert into `time_zone` before reading date and clock fields.
    Zoned,
}

// --- Schedule / calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScheduleConfig {
    /// The parallel booking tracks, in display order.
    #[serde(default = "default_schedules")]
    pub schedules: Vec<String>,
    /// IANA zone used for "today" and for zoned timestamp conversion.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default)]
    pub timestamp_policy: TimestampMode,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            schedules: default_schedules(),
            time_zone: default_time_zone(),
            timestamp_policy: TimestampMode::default(),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub airtable: AirtableConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_api_url() -> String {
    "https://api.airtable.com/v0".to_string()
}

fn default_table_name() -> String {
    "Bookings".to_string()
}

fn default_marker() -> String {
    SECRET_MARKER.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_schedules() -> Vec<String> {
    vec!["Schedule A".to_string(), "Schedule B".to_string()]
}

fn default_time_zone() -> String {
    "Asia/Manila".to_string()
}
