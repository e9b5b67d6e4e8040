//! Per-operation benchmark results.

use crate::operations::{Operation, OperationFamily};
use crate::{BenchError, BenchResult};
use serde::Serialize;
use std::time::Duration;

/// Outcome of benchmarking one operation over every trial of a run.
///
/// Built once after the last trial and never modified. The average is
/// computed at construction; the seconds projection divides the total itself
/// so that `avg_time_taken == time_taken / trials_run` holds in `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    operation_performed: String,
    family: OperationFamily,
    trials_run: u32,
    time_taken: Duration,
    avg_time_taken: Duration,
}

impl ResultRecord {
    pub fn new(operation: &Operation, trials_run: u32, time_taken: Duration) -> BenchResult<Self> {
        Self::from_parts(operation.name(), operation.family(), trials_run, time_taken)
    }

    /// Fails with [`BenchError::InvalidTrialCount`] when `trials_run` is zero.
    pub fn from_parts(
        operation_performed: &str,
        family: OperationFamily,
        trials_run: u32,
        time_taken: Duration,
    ) -> BenchResult<Self> {
        let avg_time_taken = time_taken
            .checked_div(trials_run)
            .ok_or(BenchError::InvalidTrialCount(trials_run))?;
        Ok(Self {
            operation_performed: operation_performed.to_string(),
            family,
            trials_run,
            time_taken,
            avg_time_taken,
        })
    }

    pub fn operation_performed(&self) -> &str {
        &self.operation_performed
    }

    pub fn family(&self) -> OperationFamily {
        self.family
    }

    pub fn trials_run(&self) -> u32 {
        self.trials_run
    }

    /// Total across all trials.
    pub fn time_taken(&self) -> Duration {
        self.time_taken
    }

    /// Average per trial, truncated to whole nanoseconds.
    pub fn avg_time_taken(&self) -> Duration {
        self.avg_time_taken
    }

    /// Average per trial in seconds, without nanosecond truncation.
    pub fn avg_secs(&self) -> f64 {
        self.time_taken.as_secs_f64() / f64::from(self.trials_run)
    }

    /// Key-ordered projection used for tables and exports.
    pub fn as_row(&self) -> ResultRow {
        ResultRow {
            operation_performed: self.operation_performed.clone(),
            family: self.family,
            trials_run: self.trials_run,
            time_taken: self.time_taken.as_secs_f64(),
            avg_time_taken: self.avg_secs(),
        }
    }
}

/// Flat, serializable view of a [`ResultRecord`]. Times are in seconds.
///
/// Field order is the presentation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub operation_performed: String,
    pub family: OperationFamily,
    pub trials_run: u32,
    pub time_taken: f64,
    pub avg_time_taken: f64,
}

impl ResultRow {
    pub const HEADERS: [&'static str; 5] = [
        "operation_performed",
        "family",
        "trials_run",
        "time_taken",
        "avg_time_taken",
    ];
}
