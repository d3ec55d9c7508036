// ABOUTME: Statement executor running fetch-one, fetch-list, update, and insert over SQLite
// ABOUTME: Each call prepares, binds, executes, maps rows, and releases inside one call scope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Statement Executor
//!
//! [`Sql`] runs caller-supplied SQL text on a caller-supplied connection.
//! The connection is only borrowed: it is never opened, closed, pooled, or
//! wrapped in a transaction here. Pool connections and open transactions
//! deref to `SqliteConnection`, so `&mut *pooled` and `&mut *tx` both work.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sql_executor::{binder, Sql, NO_BINDER};
//! use sqlx::{Connection, Row, SqliteConnection};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let mut conn = SqliteConnection::connect("sqlite::memory:").await?;
//! let sql = Sql::default();
//!
//! sql.update(
//!     &mut conn,
//!     "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL)",
//!     NO_BINDER,
//! )
//! .await?;
//!
//! let id = sql
//!     .insert(&mut conn, "INSERT INTO users(name) VALUES (?)", binder(|s| s.bind("ada")))
//!     .await?;
//!
//! let name = sql
//!     .fetch_one(
//!         &mut conn,
//!         "SELECT name FROM users WHERE id = ?",
//!         binder(|s| s.bind(id)),
//!         |row| row.try_get::<String, _>("name"),
//!     )
//!     .await?;
//! assert_eq!(name.as_deref(), Some("ada"));
//! # Ok(())
//! # }
//! ```

mod scope;
mod stats;

pub use stats::ExecutorStats;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::TryStreamExt;
use sqlx::sqlite::{SqliteOperation, SqliteRow};
use sqlx::SqliteConnection;

use crate::config::ExecutorConfig;
use crate::errors::{ConfigError, Operation, SqlResult};
use crate::statement::Statement;
use scope::CallScope;
use stats::StatsCounters;

/// Executes prepared statements and maps their results
///
/// Cheap to clone; clones share configuration and statistics.
#[derive(Debug, Clone, Default)]
pub struct Sql {
    config: Arc<ExecutorConfig>,
    counters: Arc<StatsCounters>,
}

impl Sql {
    /// Create an executor with the given configuration
    #[must_use]
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            config: Arc::new(config),
            counters: Arc::new(StatsCounters::default()),
        }
    }

    /// Create an executor configured from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if an executor environment variable holds an invalid value
    pub fn from_env() -> Result<Self, ConfigError> {
        ExecutorConfig::from_env().map(Self::new)
    }

    /// Executor configuration
    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Snapshot of statement activity across this executor and its clones
    #[must_use]
    pub fn stats(&self) -> ExecutorStats {
        self.counters.snapshot()
    }

    fn scope<'a>(&'a self, operation: Operation, sql: &'a str) -> CallScope<'a> {
        CallScope::open(operation, sql, &self.config, &self.counters)
    }

    /// Run a query and map its first row, if any
    ///
    /// At most one row is consumed; further rows the query could produce are
    /// discarded without error. The mapper runs only when a row exists.
    ///
    /// # Errors
    ///
    /// Returns `SqlError` naming `fetch_one` if binding, execution, or mapping fails
    pub async fn fetch_one<'q, T, B, M>(
        &self,
        conn: &mut SqliteConnection,
        sql: &'q str,
        binder: Option<B>,
        mapper: M,
    ) -> SqlResult<Option<T>>
    where
        B: FnOnce(&mut Statement<'q>) -> Result<(), sqlx::Error>,
        M: FnOnce(&SqliteRow) -> Result<T, sqlx::Error>,
    {
        let scope = self.scope(Operation::FetchOne, sql);
        let outcome = run_fetch_one(&scope, conn, sql, binder, mapper).await;
        scope.finish(outcome)
    }

    /// Run a query and map every row in cursor order
    ///
    /// Zero rows yields an empty vector. Iteration stops at the first mapper
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns `SqlError` naming `fetch_list` if binding, execution, row
    /// streaming, or mapping fails
    pub async fn fetch_list<'q, T, B, M>(
        &self,
        conn: &mut SqliteConnection,
        sql: &'q str,
        binder: Option<B>,
        mapper: M,
    ) -> SqlResult<Vec<T>>
    where
        B: FnOnce(&mut Statement<'q>) -> Result<(), sqlx::Error>,
        M: FnMut(&SqliteRow) -> Result<T, sqlx::Error>,
    {
        let scope = self.scope(Operation::FetchList, sql);
        let outcome = run_fetch_list(&scope, conn, sql, binder, mapper).await;
        scope.finish(outcome)
    }

    /// Execute a data-modifying statement and return the affected row count
    ///
    /// # Errors
    ///
    /// Returns `SqlError` naming `update` if binding or execution fails
    pub async fn update<'q, B>(
        &self,
        conn: &mut SqliteConnection,
        sql: &'q str,
        binder: Option<B>,
    ) -> SqlResult<u64>
    where
        B: FnOnce(&mut Statement<'q>) -> Result<(), sqlx::Error>,
    {
        let scope = self.scope(Operation::Update, sql);
        let outcome = run_update(conn, sql, binder).await;
        scope.finish(outcome)
    }

    /// Execute an insert and return the key generated for the new row
    ///
    /// The connection's last rowid is read before the statement runs. A
    /// statement that leaves it unchanged generated no key for this call:
    /// an ignored conflict, an upsert that updated in place, or an insert
    /// into a `WITHOUT ROWID` table. A new row that reuses the previous rowid
    /// is told apart through an update hook registered for the duration of
    /// the call, which replaces any update hook already set on `conn`.
    ///
    /// # Errors
    ///
    /// Returns `SqlError` naming `insert` if binding or execution fails, or if
    /// the statement inserted no row (see [`crate::SqlError::is_no_generated_key`])
    pub async fn insert<'q, B>(
        &self,
        conn: &mut SqliteConnection,
        sql: &'q str,
        binder: Option<B>,
    ) -> SqlResult<i64>
    where
        B: FnOnce(&mut Statement<'q>) -> Result<(), sqlx::Error>,
    {
        let scope = self.scope(Operation::Insert, sql);
        let outcome = run_insert(conn, sql, binder).await;
        scope.finish(outcome)
    }
}

async fn run_fetch_one<'q, T, B, M>(
    scope: &CallScope<'_>,
    conn: &mut SqliteConnection,
    sql: &'q str,
    binder: Option<B>,
    mapper: M,
) -> Result<Option<T>, sqlx::Error>
where
    B: FnOnce(&mut Statement<'q>) -> Result<(), sqlx::Error>,
    M: FnOnce(&SqliteRow) -> Result<T, sqlx::Error>,
{
    let query = Statement::prepare(sql, binder)?.into_query();
    let Some(row) = query.fetch_optional(&mut *conn).await? else {
        return Ok(None);
    };
    let value = mapper(&row)?;
    scope.record_row_mapped();
    Ok(Some(value))
}

async fn run_fetch_list<'q, T, B, M>(
    scope: &CallScope<'_>,
    conn: &mut SqliteConnection,
    sql: &'q str,
    binder: Option<B>,
    mut mapper: M,
) -> Result<Vec<T>, sqlx::Error>
where
    B: FnOnce(&mut Statement<'q>) -> Result<(), sqlx::Error>,
    M: FnMut(&SqliteRow) -> Result<T, sqlx::Error>,
{
    let query = Statement::prepare(sql, binder)?.into_query();
    // Dropping the stream on an early return resets the statement
    let mut rows = query.fetch(&mut *conn);
    let mut mapped = Vec::new();
    while let Some(row) = rows.try_next().await? {
        mapped.push(mapper(&row)?);
        scope.record_row_mapped();
    }
    Ok(mapped)
}

async fn run_update<'q, B>(
    conn: &mut SqliteConnection,
    sql: &'q str,
    binder: Option<B>,
) -> Result<u64, sqlx::Error>
where
    B: FnOnce(&mut Statement<'q>) -> Result<(), sqlx::Error>,
{
    let query = Statement::prepare(sql, binder)?.into_query();
    let done = query.execute(&mut *conn).await?;
    Ok(done.rows_affected())
}

async fn run_insert<'q, B>(
    conn: &mut SqliteConnection,
    sql: &'q str,
    binder: Option<B>,
) -> Result<i64, sqlx::Error>
where
    B: FnOnce(&mut Statement<'q>) -> Result<(), sqlx::Error>,
{
    let query = Statement::prepare(sql, binder)?.into_query();
    let previous_key = last_insert_rowid(conn).await?;
    let reinserted = Arc::new(AtomicBool::new(false));
    watch_insert_of(conn, previous_key, Arc::clone(&reinserted)).await?;

    let outcome = query.execute(&mut *conn).await;
    let unhooked = conn
        .lock_handle()
        .await
        .map(|mut handle| handle.remove_update_hook());
    let done = outcome?;
    unhooked?;

    // last_insert_rowid is connection-wide; an unchanged value is the key of
    // an earlier insert unless this statement inserted a row under that rowid
    let key = done.last_insert_rowid();
    let generated = done.rows_affected() > 0
        && (key != previous_key || reinserted.load(Ordering::Relaxed));
    if !generated {
        return Err(sqlx::Error::RowNotFound);
    }
    Ok(key)
}

async fn watch_insert_of(
    conn: &mut SqliteConnection,
    rowid: i64,
    seen: Arc<AtomicBool>,
) -> Result<(), sqlx::Error> {
    let mut handle = conn.lock_handle().await?;
    handle.set_update_hook(move |change| {
        if change.operation == SqliteOperation::Insert && change.rowid == rowid {
            seen.store(true, Ordering::Relaxed);
        }
    });
    Ok(())
}

async fn last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT last_insert_rowid()")
        .persistent(false)
        .fetch_one(&mut *conn)
        .await
}
