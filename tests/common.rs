// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging setup, in-memory SQLite connections, and seed helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `sql_executor`

use anyhow::Result;
use sql_executor::Sql;
use sqlx::sqlite::SqliteRow;
use sqlx::{Connection, Row, SqliteConnection};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Schema used by the executor tests
pub const USERS_SCHEMA: &str = r"
    CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN, // Default to WARN for quiet tests
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Open an isolated in-memory database with the users table created
pub async fn create_test_connection() -> Result<SqliteConnection> {
    init_test_logging();
    let mut conn = SqliteConnection::connect("sqlite::memory:").await?;
    sqlx::query(USERS_SCHEMA).execute(&mut conn).await?;
    Ok(conn)
}

/// Insert a user with an explicit id, bypassing the executor
pub async fn seed_user(conn: &mut SqliteConnection, id: i64, name: &str) -> Result<()> {
    sqlx::query("INSERT INTO users (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Count users, bypassing the executor
pub async fn count_users(conn: &mut SqliteConnection) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

/// Row mapper reading the `id` column
pub fn row_to_id(row: &SqliteRow) -> Result<i64, sqlx::Error> {
    row.try_get("id")
}

/// Row mapper reading `(id, name)`
pub fn row_to_user(row: &SqliteRow) -> Result<(i64, String), sqlx::Error> {
    Ok((row.try_get("id")?, row.try_get("name")?))
}

/// Executor with default configuration
pub fn create_test_executor() -> Sql {
    init_test_logging();
    Sql::default()
}
