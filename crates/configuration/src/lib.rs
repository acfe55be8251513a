use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{AnalyticsParams, Config, ServerSettings};

/// Prefix of the environment variables that override file settings,
/// e.g. `STOCKPYMES__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "STOCKPYMES";

/// Loads the application configuration from `config.toml` in the working directory.
///
/// The file is optional: every setting has a default.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new("config.toml"))
}

/// Loads the configuration from the given TOML file, overlaid with `STOCKPYMES__*`
/// environment variables, and validates it.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(?config, "Configuration loaded.");
    Ok(config)
}
