use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use tracing::{debug, warn};

pub mod env_vars;
pub mod models;
pub use models::*;

/// Loads the application configuration.
///
/// Sources, later ones winning:
/// 1. `<CONFIG_DIR>/default.{toml,yaml,json}` (optional, `CONFIG_DIR` defaults to `config`)
/// 2. `<CONFIG_DIR>/<RUN_ENV>` (optional, `RUN_ENV` defaults to `debug`)
/// 3. `SLOTBOOK__SECTION__KEY` environment variables
///
/// Afterwards `"secret_from_env"` markers in the Airtable section are resolved.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let prefix = env_vars::get_config_prefix();

    let default_path = format!("{}/default", config_dir);
    let env_path = format!("{}/{}", config_dir, run_env);
    debug!("loading config from {} and {}", default_path, env_path);

    let builder = Config::builder()
        .add_source(File::with_name(&default_path).required(false))
        .add_source(File::with_name(&env_path).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .prefix_separator(env_vars::CONFIG_SEPARATOR)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let mut config: AppConfig = builder.build()?.try_deserialize()?;
    config.airtable.resolve_secrets();
    if !config.airtable.has_credentials() {
        warn!("Airtable base id or token is not configured");
    }
    Ok(config)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file is `DOTENV_OVERRIDE` if set, else the first command line argument
/// when it starts with `.env`, else `.env`. Loading happens at most once per
/// process; a missing file is not an error. Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
