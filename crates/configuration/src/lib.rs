use crate::error::ConfigError;
use crate::settings::Settings;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{AuthSettings, Credential, GradingSettings, ServerSettings};

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, overlays any `EXAMINER_`-prefixed environment
/// variables, deserializes the result into our strongly-typed `Settings`
/// struct, validates it, and returns it.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`
        .add_source(config::File::with_name("config.toml"))
        // Environment variables override file values, e.g.
        // EXAMINER_GRADING__WEBHOOK_URL=... overrides [grading].webhook_url.
        .add_source(config::Environment::with_prefix("EXAMINER").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    validate(&settings)?;

    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.grading.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "grading.timeout_secs must be greater than zero".to_string(),
        ));
    }
    if settings.auth.users.is_empty() {
        return Err(ConfigError::Invalid(
            "auth.users must list at least one credential".to_string(),
        ));
    }
    Ok(())
}
