use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use tracing::debug;

pub mod models;
pub use models::*;

/// Prefix for environment overrides, e.g. `AUDIENCELAB__BASE_URL`.
pub const ENV_PREFIX: &str = "AUDIENCELAB";

/// Loads the SDK configuration.
///
/// Sources, lowest precedence first: built-in defaults, `config/default`,
/// `config/{RUN_ENV}` (both optional, any format the `config` crate knows) and
/// `AUDIENCELAB__*` environment variables.
pub fn load_config() -> Result<SdkConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = env::var("AUDIENCELAB_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    let default_path = format!("{}/default", config_dir);
    let env_path = format!("{}/{}", config_dir, run_env);
    debug!("Loading config from {} and {}", default_path, env_path);

    let builder = Config::builder()
        .add_source(File::with_name(&default_path).required(false))
        .add_source(File::with_name(&env_path).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let config: SdkConfig = builder.build()?.try_deserialize()?;
    Ok(config)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment, at most once.
///
/// The file is `DOTENV_OVERRIDE` when set, `.env` otherwise. A missing file is
/// not an error. Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
