//! Trial runner: repeated, timed execution of operations against one
//! canonical dataset.
//!
//! A trial times every operation once, in input order, one after another.
//! `test` runs a fixed number of trials and sums each operation's times.
//! Operations and totals are correlated purely by position: two entries that
//! are the same operation still accumulate separately.

use crate::dispatch::{self, PreparedFrame};
use crate::operations::Operation;
use crate::record::ResultRecord;
use crate::{BenchError, BenchResult, Clock, MonotonicClock, DEFAULT_TEST_TRIALS};
use polars::prelude::DataFrame;
use std::time::Duration;
use tracing::{debug, info};

// ────────────────────────────────────────────────────────────────────────────────
// OperationSet: one operation or an ordered collection of them
// ────────────────────────────────────────────────────────────────────────────────

/// Ordered operations handed to [`PerfTester::test`].
///
/// Converts from a single `&Operation` as well as from slices and vectors, so
/// a bare operation and a one-element collection are interchangeable.
#[derive(Debug, Clone, Default)]
pub struct OperationSet<'o> {
    ops: Vec<&'o Operation>,
}

impl<'o> OperationSet<'o> {
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn as_slice(&self) -> &[&'o Operation] {
        &self.ops
    }

    pub fn iter(&self) -> impl Iterator<Item = &'o Operation> + '_ {
        self.ops.iter().copied()
    }
}

impl<'o> From<&'o Operation> for OperationSet<'o> {
    fn from(op: &'o Operation) -> Self {
        Self { ops: vec![op] }
    }
}

impl<'o> From<&'o [Operation]> for OperationSet<'o> {
    fn from(ops: &'o [Operation]) -> Self {
        Self {
            ops: ops.iter().collect(),
        }
    }
}

impl<'o, const N: usize> From<&'o [Operation; N]> for OperationSet<'o> {
    fn from(ops: &'o [Operation; N]) -> Self {
        Self::from(ops.as_slice())
    }
}

impl<'o> From<&'o Vec<Operation>> for OperationSet<'o> {
    fn from(ops: &'o Vec<Operation>) -> Self {
        Self::from(ops.as_slice())
    }
}

impl<'o> From<Vec<&'o Operation>> for OperationSet<'o> {
    fn from(ops: Vec<&'o Operation>) -> Self {
        Self { ops }
    }
}

// ────────────────────────────────────────────────────────────────────────────────
// PerfTester
// ────────────────────────────────────────────────────────────────────────────────

/// Times operations against a canonical eager dataset.
///
/// The dataset is owned and only ever read, so it cannot change while a test
/// is running. Every run is sequential on the calling thread.
pub struct PerfTester<C: Clock = MonotonicClock> {
    base_df: DataFrame,
    num_trials: u32,
    clock: C,
}

impl PerfTester<MonotonicClock> {
    /// Tester timed by the monotonic wall clock. Rejects a zero trial count.
    pub fn new(base_df: DataFrame, num_trials: u32) -> BenchResult<Self> {
        Self::with_clock(base_df, num_trials, MonotonicClock::new())
    }

    /// Tester running [`DEFAULT_TEST_TRIALS`] trials.
    pub fn with_default_trials(base_df: DataFrame) -> Self {
        Self {
            base_df,
            num_trials: DEFAULT_TEST_TRIALS,
            clock: MonotonicClock::new(),
        }
    }
}

impl<C: Clock> PerfTester<C> {
    pub fn with_clock(base_df: DataFrame, num_trials: u32, clock: C) -> BenchResult<Self> {
        if num_trials == 0 {
            return Err(BenchError::InvalidTrialCount(num_trials));
        }
        Ok(Self {
            base_df,
            num_trials,
            clock,
        })
    }

    pub fn base_df(&self) -> &DataFrame {
        &self.base_df
    }

    pub fn num_trials(&self) -> u32 {
        self.num_trials
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Prepare the base dataset in the representation `operation` consumes.
    pub fn setup_df_for_operation(&self, operation: &Operation) -> BenchResult<PreparedFrame<'_>> {
        dispatch::prepare(&self.base_df, operation)
    }

    /// Time a single execution of `operation`.
    ///
    /// Preparing the input happens before the start timestamp; dropping the
    /// output happens after the end timestamp.
    pub fn time_operation(&self, operation: &Operation) -> BenchResult<Duration> {
        let input = self.setup_df_for_operation(operation)?;

        let start = self.clock.now();
        let output = operation.execute_on(input)?;
        let end = self.clock.now();
        drop(output);

        let elapsed = end.saturating_sub(start);
        debug!(
            operation = operation.name(),
            family = %operation.family(),
            elapsed = ?elapsed,
            "timed operation"
        );
        Ok(elapsed)
    }

    /// Time each operation once, in order. The result is aligned with `operations`.
    pub fn run_trial(&self, operations: &[&Operation]) -> BenchResult<Vec<Duration>> {
        operations
            .iter()
            .map(|op| self.time_operation(op))
            .collect()
    }

    /// Run every trial over `operations` and summarize each operation.
    ///
    /// Any failure aborts the whole run; no partial results are returned.
    pub fn test<'o>(&self, operations: impl Into<OperationSet<'o>>) -> BenchResult<Vec<ResultRecord>> {
        let operations = operations.into();
        if operations.is_empty() {
            return Err(BenchError::NoOperations);
        }

        info!(
            operations = operations.len(),
            trials = self.num_trials,
            rows = self.base_df.height(),
            "starting performance test"
        );

        let mut total_exe_times = vec![Duration::ZERO; operations.len()];
        for trial in 0..self.num_trials {
            let times = self.run_trial(operations.as_slice())?;
            for (total, time) in total_exe_times.iter_mut().zip(times) {
                *total += time;
            }
            debug!(trial, "trial complete");
        }

        let results = operations
            .iter()
            .zip(total_exe_times)
            .map(|(op, total)| ResultRecord::new(op, self.num_trials, total))
            .collect::<BenchResult<Vec<_>>>()?;

        info!(operations = results.len(), "performance test complete");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::builtin::{EagerPassthrough, LazyCollect, RowPassthrough};
    use crate::operations::{EagerOperation, OperationFamily, RowFrame};
    use crate::{DataGen, ScriptedClock};
    use std::cell::Cell;
    use std::rc::Rc;

    fn base_df() -> DataFrame {
        DataGen::sequence("test_col", 10).unwrap()
    }

    struct CountingOp {
        calls: Rc<Cell<usize>>,
    }

    impl EagerOperation for CountingOp {
        fn execute_on(&self, df: &DataFrame) -> BenchResult<DataFrame> {
            self.calls.set(self.calls.get() + 1);
            Ok(df.clone())
        }
    }

    #[test]
    fn test_init_no_num_trials_results_in_default() {
        let base = base_df();
        let tester = PerfTester::with_default_trials(base.clone());

        assert!(tester.base_df().equals(&base));
        assert_eq!(tester.num_trials(), DEFAULT_TEST_TRIALS);
    }

    #[test]
    fn test_init_num_trials_provided() {
        let base = base_df();
        let tester = PerfTester::new(base.clone(), 30).unwrap();

        assert!(tester.base_df().equals(&base));
        assert_eq!(tester.num_trials(), 30);
    }

    #[test]
    fn test_init_zero_trials_rejected() {
        let err = PerfTester::new(base_df(), 0).err().unwrap();
        assert!(matches!(err, BenchError::InvalidTrialCount(0)));
    }

    #[test]
    fn test_setup_df_for_rows_op_returns_row_frame() {
        let tester = PerfTester::with_default_trials(base_df());
        let expected = RowFrame::from_dataframe(tester.base_df()).unwrap();

        match tester.setup_df_for_operation(&Operation::rows(RowPassthrough)).unwrap() {
            PreparedFrame::Rows(frame) => assert_eq!(frame, expected),
            other => panic!("expected rows, got {}", other.family()),
        }
    }

    #[test]
    fn test_setup_df_for_eager_op_returns_base_df() {
        let tester = PerfTester::with_default_trials(base_df());

        match tester.setup_df_for_operation(&Operation::eager(EagerPassthrough)).unwrap() {
            PreparedFrame::Eager(df) => assert!(std::ptr::eq(df, tester.base_df())),
            other => panic!("expected eager, got {}", other.family()),
        }
    }

    #[test]
    fn test_setup_df_for_lazy_op_returns_lazy_frame() {
        let tester = PerfTester::with_default_trials(base_df());

        match tester.setup_df_for_operation(&Operation::lazy(LazyCollect)).unwrap() {
            PreparedFrame::Lazy(lf) => assert!(lf.collect().unwrap().equals(tester.base_df())),
            other => panic!("expected lazy, got {}", other.family()),
        }
    }

    #[test]
    fn test_time_operation_returns_time_elapsed() {
        let clock = ScriptedClock::new([
            Duration::from_secs_f64(10.5),
            Duration::from_secs_f64(12.5),
        ]);
        let calls = Rc::new(Cell::new(0));
        let op = Operation::eager(CountingOp {
            calls: Rc::clone(&calls),
        });
        let tester = PerfTester::with_clock(base_df(), DEFAULT_TEST_TRIALS, clock).unwrap();

        let elapsed = tester.time_operation(&op).unwrap();

        assert_eq!(elapsed, Duration::from_secs(2));
        assert_eq!(calls.get(), 1);
        assert_eq!(tester.clock().remaining(), 0);
    }

    #[test]
    fn test_run_trial_is_order_aligned() {
        let times = [Duration::from_secs(3), Duration::from_secs(1), Duration::from_secs(2)];
        let clock = ScriptedClock::uniform(&times, 1);
        let ops = [
            Operation::lazy(LazyCollect),
            Operation::rows(RowPassthrough),
            Operation::eager(EagerPassthrough),
        ];
        let tester = PerfTester::with_clock(base_df(), 1, clock).unwrap();

        let refs: Vec<&Operation> = ops.iter().collect();
        assert_eq!(tester.run_trial(&refs).unwrap(), times.to_vec());
    }

    #[test]
    fn test_test_runs_every_trial() {
        let calls = Rc::new(Cell::new(0));
        let op = Operation::eager(CountingOp {
            calls: Rc::clone(&calls),
        });
        let tester = PerfTester::new(base_df(), 7).unwrap();

        let results = tester.test(&op).unwrap();

        assert_eq!(calls.get(), 7);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].trials_run(), 7);
        assert_eq!(results[0].family(), OperationFamily::Eager);
    }

    #[test]
    fn test_same_operation_twice_accumulates_per_position() {
        let times = [Duration::from_secs(1), Duration::from_secs(4)];
        let clock = ScriptedClock::uniform(&times, 2);
        let op = Operation::eager(EagerPassthrough);
        let tester = PerfTester::with_clock(base_df(), 2, clock).unwrap();

        let results = tester.test(vec![&op, &op]).unwrap();

        assert_eq!(results[0].time_taken(), Duration::from_secs(2));
        assert_eq!(results[1].time_taken(), Duration::from_secs(8));
    }

    #[test]
    fn test_empty_operations_rejected() {
        let tester = PerfTester::with_default_trials(base_df());
        let ops: Vec<Operation> = Vec::new();

        assert!(matches!(tester.test(&ops), Err(BenchError::NoOperations)));
    }
}
