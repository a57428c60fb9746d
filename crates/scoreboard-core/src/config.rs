//! Configuration management for Scoreboard services.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`SCOREBOARD__` prefix, `__` separator)
//! 2. Config file (`scoreboard.toml` by default)
//! 3. Defaults

use serde::de::DeserializeOwned;

use crate::error::ScoreboardError;

/// Default config file prefix, resolved with any supported extension.
pub const DEFAULT_FILE_PREFIX: &str = "scoreboard";

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "SCOREBOARD";

/// Load one table (e.g. `[neo4j]`) from the layered config sources.
///
/// A missing file or a missing section yields `T::default()`; a section
/// that is present but malformed is an error.
pub fn load_section<T>(
    file_prefix: &str,
    env_prefix: &str,
    section: &str,
) -> Result<T, ScoreboardError>
where
    T: DeserializeOwned + Default,
{
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix(env_prefix)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    match cfg.get::<T>(section) {
        Ok(value) => Ok(value),
        Err(config::ConfigError::NotFound(_)) => {
            tracing::debug!(section, "Config section absent, using defaults");
            Ok(T::default())
        }
        Err(e) => Err(e.into()),
    }
}
