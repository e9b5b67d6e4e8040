//! Eager row-major table.
//!
//! Polars only stores columns, so the row-major family gets its own owned
//! representation: one `Vec` of cells per row, converted from (and back to) a
//! [`DataFrame`].

use crate::BenchResult;
use polars::prelude::{AnyValue, Column, DataFrame, DataType, Series};

#[derive(Debug, Clone, PartialEq)]
pub struct RowFrame {
    columns: Vec<String>,
    dtypes: Vec<DataType>,
    rows: Vec<Vec<AnyValue<'static>>>,
}

impl RowFrame {
    /// Materialize a full row-major copy of `df`.
    pub fn from_dataframe(df: &DataFrame) -> BenchResult<Self> {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let dtypes = df.dtypes();
        let height = df.height();

        let mut rows = Vec::with_capacity(height);
        for idx in 0..height {
            let mut row = Vec::with_capacity(columns.len());
            for column in df.get_columns() {
                row.push(column.get(idx)?.into_static());
            }
            rows.push(row);
        }

        Ok(Self {
            columns,
            dtypes,
            rows,
        })
    }

    /// Convert back into a columnar frame with the original column types.
    pub fn to_dataframe(&self) -> BenchResult<DataFrame> {
        let mut columns = Vec::with_capacity(self.columns.len());
        for (idx, (name, dtype)) in self.columns.iter().zip(&self.dtypes).enumerate() {
            let values: Vec<AnyValue<'static>> =
                self.rows.iter().map(|row| row[idx].clone()).collect();
            let series =
                Series::from_any_values_and_dtype(name.as_str().into(), &values, dtype, true)?;
            columns.push(Column::from(series));
        }
        Ok(DataFrame::new(columns)?)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn dtypes(&self) -> &[DataType] {
        &self.dtypes
    }

    pub fn row(&self, idx: usize) -> Option<&[AnyValue<'static>]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[AnyValue<'static>]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Cell at `idx` in the named column.
    pub fn value(&self, idx: usize, column: &str) -> Option<&AnyValue<'static>> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(idx)?.get(col)
    }
}
