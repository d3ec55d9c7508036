// ABOUTME: RAII call scope wrapping a single executor operation
// ABOUTME: Records acquisition and release, logs the outcome, and wraps failures in SqlError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Call scope
//!
//! Every operation opens exactly one [`CallScope`] before its statement is
//! created. The scope is the only place a driver failure becomes a
//! [`SqlError`], and its `Drop` marks the statement released on every exit
//! path: success, failure, or a future dropped mid-call.

use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use super::stats::StatsCounters;
use crate::config::ExecutorConfig;
use crate::errors::{Operation, SqlError, SqlResult};

/// Guard for one prepare/bind/execute/release cycle
pub(crate) struct CallScope<'a> {
    operation: Operation,
    sql: &'a str,
    config: &'a ExecutorConfig,
    counters: &'a StatsCounters,
    started: Instant,
}

impl<'a> CallScope<'a> {
    pub(crate) fn open(
        operation: Operation,
        sql: &'a str,
        config: &'a ExecutorConfig,
        counters: &'a StatsCounters,
    ) -> Self {
        counters.record_prepared();
        trace!(operation = %operation, "statement acquired");
        Self {
            operation,
            sql,
            config,
            counters,
            started: Instant::now(),
        }
    }

    pub(crate) fn record_row_mapped(&self) {
        self.counters.record_row_mapped();
    }

    /// Log the outcome and wrap a failure with operation and SQL context
    pub(crate) fn finish<T>(self, outcome: Result<T, sqlx::Error>) -> SqlResult<T> {
        let elapsed = self.started.elapsed();
        self.check_slow(elapsed);
        let elapsed_ms = millis(elapsed);

        match outcome {
            Ok(value) => {
                if self.config.log_statements {
                    debug!(
                        operation = %self.operation,
                        elapsed_ms,
                        sql = %self.config.truncate_for_log(self.sql),
                        "SQL statement completed"
                    );
                } else {
                    debug!(
                        operation = %self.operation,
                        elapsed_ms,
                        "SQL statement completed"
                    );
                }
                Ok(value)
            }
            Err(e) => {
                self.counters.record_failure();
                warn!(
                    operation = %self.operation,
                    elapsed_ms,
                    sql = %self.config.truncate_for_log(self.sql),
                    error = %e,
                    "SQL statement failed"
                );
                Err(SqlError::new(self.operation, self.sql, e))
            }
        }
    }

    fn check_slow(&self, elapsed: Duration) {
        if elapsed >= self.config.slow_statement_threshold() {
            self.counters.record_slow();
            warn!(
                operation = %self.operation,
                elapsed_ms = millis(elapsed),
                threshold_ms = self.config.slow_statement_ms,
                sql = %self.config.truncate_for_log(self.sql),
                "Slow SQL statement"
            );
        }
    }
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

impl Drop for CallScope<'_> {
    fn drop(&mut self) {
        self.counters.record_released();
        trace!(operation = %self.operation, "statement released");
    }
}
