//! Representation dispatch: derive the frame an operation consumes from the
//! canonical eager dataset.

use crate::operations::{Operation, OperationFamily, RowFrame};
use crate::BenchResult;
use polars::prelude::{DataFrame, IntoLazy, LazyFrame};

/// Input prepared for a single timed execution.
///
/// Built right before the operation runs and consumed by it; nothing keeps a
/// handle across executions.
pub enum PreparedFrame<'a> {
    /// Fresh row-major copy of the canonical dataset.
    Rows(RowFrame),
    /// The canonical dataset itself.
    Eager(&'a DataFrame),
    /// Unevaluated plan over the canonical dataset's column buffers.
    Lazy(LazyFrame),
}

impl PreparedFrame<'_> {
    pub fn family(&self) -> OperationFamily {
        match self {
            Self::Rows(_) => OperationFamily::Rows,
            Self::Eager(_) => OperationFamily::Eager,
            Self::Lazy(_) => OperationFamily::Lazy,
        }
    }
}

/// Produce the representation `operation` requires from `base`.
///
/// Row-major operations get a full copy, eager operations get `base` itself
/// (polars frames are immutable, so aliasing is safe), lazy operations get a
/// lazy view that performs no work until collected.
pub fn prepare<'a>(base: &'a DataFrame, operation: &Operation) -> BenchResult<PreparedFrame<'a>> {
    let frame = match operation {
        Operation::Rows(_) => PreparedFrame::Rows(RowFrame::from_dataframe(base)?),
        Operation::Eager(_) => PreparedFrame::Eager(base),
        Operation::Lazy(_) => PreparedFrame::Lazy(base.clone().lazy()),
    };
    Ok(frame)
}
