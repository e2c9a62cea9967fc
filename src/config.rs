//! Environment-driven configuration.
//!
//! | variable | required | meaning |
//! |---|---|---|
//! | `BASIC_AUTH_USERNAME` | yes | expected username |
//! | `BASIC_AUTH_PASSWORD` | yes | expected password |
//! | `LOG_LEVEL` | no | `DEBUG` (default), `INFO`, `WARNING`, `ERROR`, `CRITICAL` |
//!
//! An unset `LOG_LEVEL` means `DEBUG`; a value outside the five names means
//! `INFO`.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use tracing::Level;

use crate::error::AuthorizerError;
use crate::types::Credential;

pub const USERNAME_VAR: &str = "BASIC_AUTH_USERNAME";
pub const PASSWORD_VAR: &str = "BASIC_AUTH_PASSWORD";
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

/// Log verbosity, named the way operators set it in `LOG_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogLevel {
    #[default]
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl FromStr for LogLevel {
    type Err = AuthorizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARNING" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(AuthorizerError::Config(format!(
                "unknown log level '{s}' in {LOG_LEVEL_VAR}"
            ))),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        };
        write!(f, "{name}")
    }
}

impl From<LogLevel> for Level {
    /// `tracing` has no critical level; it maps to `ERROR`.
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warning => Level::WARN,
            LogLevel::Error | LogLevel::Critical => Level::ERROR,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthorizerConfig {
    pub expected: Credential,
    pub log_level: LogLevel,
}

impl AuthorizerConfig {
    pub fn from_env() -> Result<Self, AuthorizerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. An unrecognized `LOG_LEVEL` falls
    /// back to [`LogLevel::Info`] rather than failing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuthorizerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| {
                AuthorizerError::Config(format!("missing required environment variable {key}"))
            })
        };

        let username = required(USERNAME_VAR)?;
        let password = required(PASSWORD_VAR)?;
        let log_level = match lookup(LOG_LEVEL_VAR) {
            Some(value) => LogLevel::from_str(&value).unwrap_or(LogLevel::Info),
            None => LogLevel::default(),
        };

        Ok(Self {
            expected: Credential::new(username, password),
            log_level,
        })
    }
}
