// ABOUTME: Application-wide constants for the SQL statement executor
// ABOUTME: Default thresholds, environment variable names, and service identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Executor defaults
pub mod executor {
    /// Calls taking at least this long are reported as slow statements
    pub const DEFAULT_SLOW_STATEMENT_MS: u64 = 500;
    /// Maximum number of SQL characters included in a log event
    pub const DEFAULT_LOG_SQL_MAX_LEN: usize = 256;
    /// Suffix appended to SQL text cut short for logging
    pub const TRUNCATION_MARKER: &str = "...";
}

/// Environment variable names read by the configuration loaders
pub mod env_vars {
    /// Include SQL text in per-statement debug events
    pub const LOG_STATEMENTS: &str = "SQL_EXECUTOR_LOG_STATEMENTS";
    /// Slow statement threshold in milliseconds
    pub const SLOW_STATEMENT_MS: &str = "SQL_EXECUTOR_SLOW_MS";
    /// Maximum SQL length in log events
    pub const LOG_SQL_MAX_LEN: &str = "SQL_EXECUTOR_LOG_SQL_MAX";
    /// Log filter directive
    pub const RUST_LOG: &str = "RUST_LOG";
    /// Log output format (json, pretty, compact)
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    /// Include source file and line numbers in log events
    pub const LOG_INCLUDE_LOCATION: &str = "LOG_INCLUDE_LOCATION";
    /// Service name reported in the startup event
    pub const SERVICE_NAME: &str = "SERVICE_NAME";
}

/// Service identifiers
pub mod service_names {
    /// Default service name for structured logging
    pub const SQL_EXECUTOR: &str = "sql-executor";
}
