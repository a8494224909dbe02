//! Environment variable naming for slotbook configuration.
//!
//! Plain settings are overridden with `SLOTBOOK__SECTION__KEY`. Secrets are
//! written as `"secret_from_env"` in config files and resolved from
//! `SLOTBOOK_SECRET_SECTION_KEY`, falling back to the legacy `SECTION_KEY`
//! form (`AIRTABLE_TOKEN`, `AIRTABLE_BASE_ID`).

use std::env;
use tracing::warn;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "SLOTBOOK";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "SLOTBOOK_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Placeholder value meaning "read this from the environment".
pub const SECRET_MARKER: &str = "secret_from_env";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// `"server.port"` becomes `"SLOTBOOK__SERVER__PORT"`.
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to an environment variable name
///
/// `"airtable.token"` becomes `"SLOTBOOK_SECRET_AIRTABLE_TOKEN"`.
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to its legacy environment variable name
///
/// `"airtable.base_id"` becomes `"AIRTABLE_BASE_ID"`.
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let service = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", service, key).to_uppercase()
}

/// Get an environment variable for a secret path
///
/// Tries the prefixed name first, then the legacy one. Empty values count as unset.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    let lookup = |name: String| env::var(name).ok().filter(|v| !v.trim().is_empty());
    lookup(secret_path_to_env_var(path)).or_else(|| lookup(legacy_secret_path_to_env_var(path)))
}

/// Replace a marker (or empty) value with the secret from the environment.
///
/// Returns `true` if the value was replaced.
pub fn resolve_secret(value: &mut String, path: &str) -> bool {
    if value != SECRET_MARKER && !value.trim().is_empty() {
        return false;
    }
    match get_secret_env_var(path) {
        Some(secret) => {
            *value = secret;
            true
        }
        None => {
            warn!(
                "env var {} (or {}) not set for {}",
                secret_path_to_env_var(path),
                legacy_secret_path_to_env_var(path),
                path
            );
            false
        }
    }
}
