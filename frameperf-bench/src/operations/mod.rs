//! Benchmarkable dataframe operations.
//!
//! Every operation belongs to exactly one representation family. The family
//! is fixed by which trait the operation implements and which [`Operation`]
//! variant boxes it, so dispatch is an exhaustive match rather than a runtime
//! type probe.

pub mod builtin;
pub mod registry;
pub mod rows;

pub use registry::OperationRegistry;
pub use rows::RowFrame;

use crate::dispatch::PreparedFrame;
use crate::{BenchError, BenchResult};
use polars::prelude::{DataFrame, LazyFrame};
use serde::Serialize;
use std::fmt;

// ────────────────────────────────────────────────────────────────────────────────
// Family traits, each concrete operation implements exactly one
// ────────────────────────────────────────────────────────────────────────────────

/// Operation over an eager row-major table.
pub trait RowOperation {
    /// Identity reported in results. Defaults to the concrete type name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn execute_on(&self, frame: RowFrame) -> BenchResult<RowFrame>;
}

/// Operation over an eager columnar table.
///
/// Receives the caller's frame by reference: polars frames are immutable, so
/// the canonical dataset is handed over without a copy.
pub trait EagerOperation {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn execute_on(&self, df: &DataFrame) -> BenchResult<DataFrame>;
}

/// Operation over a lazy columnar plan, materialized into an eager frame.
pub trait LazyOperation {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn execute_on(&self, lf: LazyFrame) -> BenchResult<DataFrame>;
}

// ────────────────────────────────────────────────────────────────────────────────
// Families
// ────────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationFamily {
    /// Eager row-major table ([`RowFrame`]).
    Rows,
    /// Eager columnar table ([`DataFrame`]).
    Eager,
    /// Lazy columnar plan ([`LazyFrame`]).
    Lazy,
}

impl OperationFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rows => "rows",
            Self::Eager => "eager",
            Self::Lazy => "lazy",
        }
    }
}

impl fmt::Display for OperationFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────────
// Operation: closed union over the three families
// ────────────────────────────────────────────────────────────────────────────────

pub enum Operation {
    Rows(Box<dyn RowOperation>),
    Eager(Box<dyn EagerOperation>),
    Lazy(Box<dyn LazyOperation>),
}

impl Operation {
    pub fn rows(op: impl RowOperation + 'static) -> Self {
        Self::Rows(Box::new(op))
    }

    pub fn eager(op: impl EagerOperation + 'static) -> Self {
        Self::Eager(Box::new(op))
    }

    pub fn lazy(op: impl LazyOperation + 'static) -> Self {
        Self::Lazy(Box::new(op))
    }

    pub fn family(&self) -> OperationFamily {
        match self {
            Self::Rows(_) => OperationFamily::Rows,
            Self::Eager(_) => OperationFamily::Eager,
            Self::Lazy(_) => OperationFamily::Lazy,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Rows(op) => op.name(),
            Self::Eager(op) => op.name(),
            Self::Lazy(op) => op.name(),
        }
    }

    /// Run the operation on a frame prepared for its family.
    pub fn execute_on(&self, input: PreparedFrame<'_>) -> BenchResult<OperationOutput> {
        match (self, input) {
            (Self::Rows(op), PreparedFrame::Rows(frame)) => {
                op.execute_on(frame).map(OperationOutput::Rows)
            }
            (Self::Eager(op), PreparedFrame::Eager(df)) => {
                op.execute_on(df).map(OperationOutput::Eager)
            }
            (Self::Lazy(op), PreparedFrame::Lazy(lf)) => {
                op.execute_on(lf).map(OperationOutput::Eager)
            }
            (op, input) => Err(BenchError::RepresentationMismatch {
                operation: op.name().to_string(),
                expected: op.family(),
                found: input.family(),
            }),
        }
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name())
            .field("family", &self.family())
            .finish()
    }
}

/// Result of executing an operation. Only kept long enough to be dropped
/// outside the timed region.
#[derive(Debug)]
pub enum OperationOutput {
    Rows(RowFrame),
    Eager(DataFrame),
}

impl OperationOutput {
    pub fn height(&self) -> usize {
        match self {
            Self::Rows(frame) => frame.height(),
            Self::Eager(df) => df.height(),
        }
    }
}
