use std::path::PathBuf;

use crate::constants::DEFAULT_LOG_LEVEL;
use crate::logging::LogLevel;

/// Process configuration read from the environment (after `dotenvy`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: Option<String>,
    pub snapshot_path: Option<PathBuf>,
    pub log_level: LogLevel,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let log_level = non_empty("LOG_LEVEL")
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.into())
            .parse()
            .unwrap_or(LogLevel::Info);

        Self {
            database_url: non_empty("DATABASE_URL"),
            snapshot_path: non_empty("GETFIT_SNAPSHOT").map(PathBuf::from),
            log_level,
        }
    }
}
