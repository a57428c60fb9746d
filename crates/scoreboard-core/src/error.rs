use thiserror::Error;

/// Top-level error type for the Scoreboard core crate.
#[derive(Error, Debug)]
pub enum ScoreboardError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Invalid {kind} id: {value}")]
    InvalidId { kind: &'static str, value: String },
}
