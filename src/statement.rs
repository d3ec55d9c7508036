// ABOUTME: Parameter binding surface handed to caller-supplied binders
// ABOUTME: Wraps the sqlx query under construction and appends positional parameters in order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Statement binding
//!
//! A binder receives a [`Statement`] and binds zero or more positional
//! parameters. Parameters are applied in call order: the first `bind` fills
//! the first `?` placeholder, the second fills the second, and so on.
//!
//! Build binders with [`binder`] so the closure's argument type is inferred:
//!
//! ```text
//! sql.update(&mut conn, "UPDATE users SET name = ? WHERE id = ?", binder(|s| {
//!     s.bind(name)?;
//!     s.bind(id)
//! }))
//! .await?;
//! ```

use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Encode, Execute, Sqlite, Type};

/// Sqlx query type the executor runs
pub(crate) type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Signature of a binder that binds nothing
pub type NoBinder = fn(&mut Statement<'_>) -> Result<(), sqlx::Error>;

/// Typed "no parameters" binder for statements without placeholders
pub const NO_BINDER: Option<NoBinder> = None;

/// Wrap a binder closure for an executor call
///
/// The bound sits on the closure itself, which lets `|s| s.bind(..)` infer
/// its argument type; a bare `Some(|s| ..)` does not.
#[must_use]
pub const fn binder<'q, F>(bind: F) -> Option<F>
where
    F: FnOnce(&mut Statement<'q>) -> Result<(), sqlx::Error>,
{
    Some(bind)
}

/// A statement being prepared for execution
///
/// Statements are not persistent: each one belongs to a single call and is
/// never added to the connection's statement cache.
pub struct Statement<'q> {
    query: SqliteQuery<'q>,
    parameter_count: usize,
}

impl<'q> Statement<'q> {
    pub(crate) fn new(sql: &'q str) -> Self {
        Self {
            query: sqlx::query(sql).persistent(false),
            parameter_count: 0,
        }
    }

    /// Prepare a statement and run the binder against it, if one was supplied
    pub(crate) fn prepare<B>(sql: &'q str, binder: Option<B>) -> Result<Self, sqlx::Error>
    where
        B: FnOnce(&mut Self) -> Result<(), sqlx::Error>,
    {
        let mut statement = Self::new(sql);
        if let Some(bind) = binder {
            bind(&mut statement)?;
        }
        Ok(statement)
    }

    /// Bind the next positional parameter
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error::Encode` if the value cannot be encoded for `SQLite`
    pub fn bind<T>(&mut self, value: T) -> Result<(), sqlx::Error>
    where
        T: 'q + Encode<'q, Sqlite> + Type<Sqlite>,
    {
        self.query.try_bind(value).map_err(sqlx::Error::Encode)?;
        self.parameter_count += 1;
        Ok(())
    }

    /// Number of parameters bound so far
    #[must_use]
    pub const fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    /// SQL text of this statement
    #[must_use]
    pub fn sql(&self) -> &'q str {
        self.query.sql()
    }

    pub(crate) fn into_query(self) -> SqliteQuery<'q> {
        self.query
    }
}
