// ABOUTME: Main library entry point for the SQL statement executor
// ABOUTME: Exposes fetch-one, fetch-list, update, and insert over a borrowed SQLite connection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # SQL Executor
//!
//! A thin helper over sqlx prepared statements. Each operation takes a
//! borrowed connection, literal SQL text with positional `?` placeholders,
//! an optional binder, and (for queries) a row mapper, then runs the
//! prepare/bind/execute/consume/release sequence and returns a typed result.
//!
//! ## Operations
//!
//! - **`fetch_one`**: first row mapped, or `None`
//! - **`fetch_list`**: every row mapped in cursor order
//! - **`update`**: affected row count
//! - **`insert`**: generated key of the inserted row
//!
//! Every failure comes back as one [`SqlError`] carrying the operation and
//! the SQL text, with the driver error as its source.
//!
//! Connection pooling, transactions, migrations, query building, and retries
//! are left to the caller.

/// Environment-driven executor configuration
pub mod config;

/// Defaults and environment variable names
pub mod constants;

/// `SqlError`, `Operation`, and configuration errors
pub mod errors;

/// Statement executor and its statistics
pub mod executor;

/// Structured logging setup
pub mod logging;

/// Parameter binding surface for binders
pub mod statement;

pub use config::ExecutorConfig;
pub use errors::{ConfigError, Operation, SqlError, SqlResult};
pub use executor::{ExecutorStats, Sql};
pub use statement::{binder, NoBinder, Statement, NO_BINDER};
