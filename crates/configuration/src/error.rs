use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read or parse the configuration sources: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Configuration is invalid: {0}")]
    Invalid(String),
}
