// ABOUTME: Lock-free counters tracking statement acquisition, release, and failures
// ABOUTME: Shared by executor clones and exposed as a serializable snapshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters updated by call scopes
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    prepared: AtomicU64,
    released: AtomicU64,
    rows_mapped: AtomicU64,
    failures: AtomicU64,
    slow: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn record_prepared(&self) {
        self.prepared.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_released(&self) {
        self.released.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_row_mapped(&self) {
        self.rows_mapped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_slow(&self) {
        self.slow.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ExecutorStats {
        ExecutorStats {
            statements_prepared: self.prepared.load(Ordering::Relaxed),
            statements_released: self.released.load(Ordering::Relaxed),
            rows_mapped: self.rows_mapped.load(Ordering::Relaxed),
            failed_operations: self.failures.load(Ordering::Relaxed),
            slow_statements: self.slow.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of executor activity
///
/// Counters only grow. With no call in flight, `statements_prepared`
/// equals `statements_released`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorStats {
    /// Statements acquired by a call
    pub statements_prepared: u64,
    /// Statements released at the end of a call
    pub statements_released: u64,
    /// Rows handed to a row mapper
    pub rows_mapped: u64,
    /// Calls that returned an error
    pub failed_operations: u64,
    /// Calls that met or exceeded the slow statement threshold
    pub slow_statements: u64,
}

impl ExecutorStats {
    /// Statements acquired but not yet released
    #[must_use]
    pub const fn in_flight(&self) -> u64 {
        self.statements_prepared
            .saturating_sub(self.statements_released)
    }
}
