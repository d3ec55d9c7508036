// ABOUTME: Error types for statement execution and executor configuration
// ABOUTME: SqlError wraps every driver, binder, and mapper failure with operation and SQL context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Error Handling
//!
//! Every failure raised while preparing, binding, executing, or consuming a
//! statement surfaces as a single [`SqlError`]. The error always carries the
//! [`Operation`] that failed and the full SQL text; the original driver-level
//! cause is available through [`std::error::Error::source`].

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error;

/// The executor operation a failure originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Single-row query
    FetchOne,
    /// Multi-row query
    FetchList,
    /// Data-modifying statement returning the affected row count
    Update,
    /// Data-modifying statement returning the generated key
    Insert,
}

impl Operation {
    /// Stable name used in error messages and log events
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FetchOne => "fetch_one",
            Self::FetchList => "fetch_list",
            Self::Update => "update",
            Self::Insert => "insert",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Database operation failed
///
/// The only error an executor operation returns. Callers that need to tell
/// causes apart (constraint violation, syntax error, decode failure) inspect
/// [`SqlError::cause`].
#[derive(Debug, Error)]
#[error("Database operation failed in {operation}(): {sql}")]
pub struct SqlError {
    /// Operation that failed
    pub operation: Operation,
    /// Full SQL text of the failed statement
    pub sql: String,
    /// Underlying driver, binder, or mapper failure
    #[source]
    pub source: sqlx::Error,
}

impl SqlError {
    /// Wrap a driver-level failure with operation and SQL context
    #[must_use]
    pub fn new(operation: Operation, sql: impl Into<String>, source: sqlx::Error) -> Self {
        Self {
            operation,
            sql: sql.into(),
            source,
        }
    }

    /// The wrapped driver-level cause
    #[must_use]
    pub const fn cause(&self) -> &sqlx::Error {
        &self.source
    }

    /// Whether this failure is an insert that generated no key
    ///
    /// The executor reports an insert that affected zero rows, or that left
    /// the connection's last rowid unchanged, with a `RowNotFound` cause
    /// instead of returning a stale key.
    #[must_use]
    pub fn is_no_generated_key(&self) -> bool {
        self.operation == Operation::Insert && matches!(self.source, sqlx::Error::RowNotFound)
    }

    /// Whether the database itself rejected the statement (constraint, syntax, locking)
    #[must_use]
    pub fn is_database_error(&self) -> bool {
        matches!(self.source, sqlx::Error::Database(_))
    }

    /// Unwrap into the underlying driver-level cause
    #[must_use]
    pub fn into_cause(self) -> sqlx::Error {
        self.source
    }
}

/// Result type for executor operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed
    #[error("Invalid {key} value '{value}': {reason}")]
    InvalidValue {
        /// Environment variable name
        key: &'static str,
        /// Rejected raw value
        value: String,
        /// Parser message
        reason: String,
    },
}

impl ConfigError {
    /// Build an invalid-value error from a parse failure
    #[must_use]
    pub fn invalid_value(key: &'static str, value: impl Into<String>, reason: impl Display) -> Self {
        Self::InvalidValue {
            key,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}
