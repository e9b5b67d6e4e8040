//! Shared types, clocks, data generators and the error type for frameperf-bench.
//!
//! The engine is split the same way a run flows through it:
//! [`operations`] declares what can be benchmarked, [`dispatch`] prepares the
//! representation each operation consumes, [`tester`] times repeated trials and
//! [`record`] holds the immutable per-operation results.

pub mod config;
pub mod dispatch;
pub mod operations;
pub mod record;
pub mod report;
pub mod tester;

pub use dispatch::{prepare, PreparedFrame};
pub use operations::{
    EagerOperation, LazyOperation, Operation, OperationFamily, OperationOutput,
    OperationRegistry, RowFrame, RowOperation,
};
pub use record::{ResultRecord, ResultRow};
pub use tester::{OperationSet, PerfTester};

use polars::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Trial count used when the caller does not pick one.
pub const DEFAULT_TEST_TRIALS: u32 = 10;

// ────────────────────────────────────────────────────────────────────────────────
// Error type
// ────────────────────────────────────────────────────────────────────────────────

pub type BenchResult<T> = std::result::Result<T, BenchError>;

#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The operation could not be classified into a known representation family.
    #[error("Unsupported operation: {type_name}")]
    UnsupportedOperation { type_name: String },

    #[error("trial count must be a positive integer, got {0}")]
    InvalidTrialCount(u32),

    #[error("at least one operation is required")]
    NoOperations,

    #[error("operation {operation} consumes {expected} frames, got {found}")]
    RepresentationMismatch {
        operation: String,
        expected: OperationFamily,
        found: OperationFamily,
    },
}

impl From<toml::de::Error> for BenchError {
    fn from(e: toml::de::Error) -> Self {
        BenchError::Config(e.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────────
// Clocks
// ────────────────────────────────────────────────────────────────────────────────

/// Source of monotonic timestamps, measured from an arbitrary fixed origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Monotonic high-resolution wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline(always)]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that replays a fixed queue of timestamps, for deterministic runs.
///
/// Once the queue is drained the last timestamp is repeated, so any further
/// measurement reads as zero elapsed time.
#[derive(Debug, Default)]
pub struct ScriptedClock {
    ticks: RefCell<VecDeque<Duration>>,
    last: Cell<Duration>,
}

impl ScriptedClock {
    pub fn new(ticks: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            ticks: RefCell::new(ticks.into_iter().collect()),
            last: Cell::new(Duration::ZERO),
        }
    }

    /// Script `trials` passes over `op_times`, yielding `t` then `2t` for each
    /// operation so that every measurement comes out as exactly `t`.
    pub fn uniform(op_times: &[Duration], trials: u32) -> Self {
        let ticks = (0..trials).flat_map(move |_| op_times.iter().flat_map(|&t| [t, t * 2]));
        Self::new(ticks)
    }

    /// Timestamps not yet handed out.
    pub fn remaining(&self) -> usize {
        self.ticks.borrow().len()
    }
}

impl Clock for ScriptedClock {
    fn now(&self) -> Duration {
        match self.ticks.borrow_mut().pop_front() {
            Some(tick) => {
                self.last.set(tick);
                tick
            }
            None => self.last.get(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────────
// Data generator (deterministic via ChaCha8Rng)
// ────────────────────────────────────────────────────────────────────────────────

const CATEGORIES: [&str; 8] = [
    "electronics",
    "clothing",
    "food",
    "books",
    "toys",
    "tools",
    "sports",
    "music",
];

pub struct DataGen {
    rng: ChaCha8Rng,
}

impl DataGen {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Build a base frame with `id`, `timestamp`, `amount` and `category` columns.
    pub fn sample_frame(&mut self, rows: usize) -> BenchResult<DataFrame> {
        let ts_base = 1_700_000_000i64;
        let normal = Normal::new(500.0f64, 150.0)
            .map_err(|e| BenchError::Config(format!("amount distribution: {}", e)))?;

        let ids: Vec<i64> = (0..rows as i64).collect();
        let timestamps: Vec<i64> = (0..rows)
            .map(|_| ts_base + self.rng.gen_range(0..86_400 * 365))
            .collect();
        let amounts: Vec<f64> = (0..rows)
            .map(|_| self.rng.sample(normal).max(0.0))
            .collect();
        let categories: Vec<&str> = (0..rows)
            .map(|_| CATEGORIES[self.rng.gen_range(0..CATEGORIES.len())])
            .collect();

        let df = polars::df!(
            "id" => ids,
            "timestamp" => timestamps,
            "amount" => amounts,
            "category" => categories
        )?;
        Ok(df)
    }

    /// Single `i64` column holding `0..n`.
    pub fn sequence(name: &str, n: usize) -> BenchResult<DataFrame> {
        let values: Vec<i64> = (0..n as i64).collect();
        Ok(polars::df!(name => values)?)
    }
}

// ────────────────────────────────────────────────────────────────────────────────
// Benchmark output types
// ────────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BenchSuite {
    pub system_info: SystemInfo,
    pub dataset_rows: usize,
    pub results: Vec<ResultRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub cpus: usize,
    pub timestamp: String,
}

impl SystemInfo {
    pub fn collect() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            cpus: std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1),
            timestamp: epoch_timestamp(),
        }
    }
}

fn epoch_timestamp() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{}s-since-epoch", secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_clock_replays_then_holds() {
        let clock = ScriptedClock::new([Duration::from_secs(1), Duration::from_secs(3)]);
        assert_eq!(clock.remaining(), 2);
        assert_eq!(clock.now(), Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(3));
        assert_eq!(clock.now(), Duration::from_secs(3));
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn test_uniform_clock_measures_each_op_time() {
        let times = [Duration::from_secs(1), Duration::from_secs(2)];
        let clock = ScriptedClock::uniform(&times, 3);
        assert_eq!(clock.remaining(), 12);
        for _ in 0..3 {
            for t in times {
                let start = clock.now();
                let end = clock.now();
                assert_eq!(end - start, t);
            }
        }
    }

    #[test]
    fn test_monotonic_clock_never_goes_backwards() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_sample_frame_is_deterministic() {
        let a = DataGen::new(7).sample_frame(100).unwrap();
        let b = DataGen::new(7).sample_frame(100).unwrap();
        assert_eq!(a.shape(), (100, 4));
        assert!(a.equals(&b));
    }

    #[test]
    fn test_sequence_frame() {
        let df = DataGen::sequence("test_col", 10).unwrap();
        assert_eq!(df.shape(), (10, 1));
        assert!(df.column("test_col").is_ok());
    }

    #[test]
    fn test_unsupported_operation_message_names_type() {
        let err = BenchError::UnsupportedOperation {
            type_name: "my_crate::MysteryOp".into(),
        };
        assert_eq!(err.to_string(), "Unsupported operation: my_crate::MysteryOp");
    }
}
