// ABOUTME: Executor configuration types loaded from environment variables
// ABOUTME: Controls statement logging, slow statement threshold, and SQL truncation in logs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::{env_vars, executor};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// Statement executor configuration
///
/// None of these settings change what an operation returns; they only shape
/// the log events emitted around each call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Include SQL text in per-statement debug events
    pub log_statements: bool,
    /// Calls taking at least this many milliseconds are logged as slow
    pub slow_statement_ms: u64,
    /// Maximum SQL characters included in a log event
    pub log_sql_max_len: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            log_statements: false,
            slow_statement_ms: executor::DEFAULT_SLOW_STATEMENT_MS,
            log_sql_max_len: executor::DEFAULT_LOG_SQL_MAX_LEN,
        }
    }
}

impl ExecutorConfig {
    /// Load executor configuration from environment
    ///
    /// Unset variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            log_statements: parse_env_or(env_vars::LOG_STATEMENTS, defaults.log_statements)?,
            slow_statement_ms: parse_env_or(
                env_vars::SLOW_STATEMENT_MS,
                defaults.slow_statement_ms,
            )?,
            log_sql_max_len: parse_env_or(env_vars::LOG_SQL_MAX_LEN, defaults.log_sql_max_len)?,
        })
    }

    /// Slow statement threshold as a duration
    #[must_use]
    pub const fn slow_statement_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_statement_ms)
    }

    /// Shorten SQL text for a log event, respecting char boundaries
    #[must_use]
    pub fn truncate_for_log<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        match sql.char_indices().nth(self.log_sql_max_len) {
            None => sql.into(),
            Some((cut, _)) => format!("{}{}", &sql[..cut], executor::TRUNCATION_MARKER).into(),
        }
    }
}

/// Parse an environment variable, using `default` when it is unset
fn parse_env_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::invalid_value(key, raw.as_str(), e)),
        Err(_) => Ok(default),
    }
}
