//! Passthrough operations shipped with the harness.
//!
//! None of these transform data. Timing them measures the cost of handing each
//! representation to an operation.

use super::{EagerOperation, LazyOperation, RowFrame, RowOperation};
use crate::BenchResult;
use polars::prelude::{DataFrame, LazyFrame};

/// Returns its row-major input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowPassthrough;

impl RowOperation for RowPassthrough {
    fn name(&self) -> &str {
        "rows.identity"
    }

    fn execute_on(&self, frame: RowFrame) -> BenchResult<RowFrame> {
        Ok(frame)
    }
}

/// Returns a handle to its eager input; column buffers are shared, not copied.
#[derive(Debug, Clone, Copy, Default)]
pub struct EagerPassthrough;

impl EagerOperation for EagerPassthrough {
    fn name(&self) -> &str {
        "eager.identity"
    }

    fn execute_on(&self, df: &DataFrame) -> BenchResult<DataFrame> {
        Ok(df.clone())
    }
}

/// Forces the lazy plan without adding any step to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LazyCollect;

impl LazyOperation for LazyCollect {
    fn name(&self) -> &str {
        "lazy.collect"
    }

    fn execute_on(&self, lf: LazyFrame) -> BenchResult<DataFrame> {
        Ok(lf.collect()?)
    }
}
