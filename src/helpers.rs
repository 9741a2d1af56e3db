//! Helper utilities for testing and development.

use async_trait::async_trait;

use crate::column_map::FieldDescription;
use crate::error::RowMapError;
use crate::source::{RowSink, RowSource};
use crate::types::RowValues;

/// An in-memory [`RowSource`] that replays fixed field descriptions and rows.
///
/// Useful for exercising code built on the mapper without a database, and for shapes a real
/// driver never produces (ragged rows, malformed positions). Query text and parameters are
/// ignored.
#[derive(Debug, Clone, Default)]
pub struct StaticRowSource {
    fields: Vec<FieldDescription>,
    rows: Vec<Vec<RowValues>>,
    delivered: usize,
}

impl StaticRowSource {
    #[must_use]
    pub fn new(fields: Vec<FieldDescription>, rows: Vec<Vec<RowValues>>) -> Self {
        Self {
            fields,
            rows,
            delivered: 0,
        }
    }

    /// Build from column names in order, numbering positions from 1.
    #[must_use]
    pub fn from_names(names: &[&str], rows: Vec<Vec<RowValues>>) -> Self {
        let fields = names
            .iter()
            .enumerate()
            .map(|(i, name)| FieldDescription::new(*name, i + 1))
            .collect();
        Self::new(fields, rows)
    }

    /// Rows handed to a sink across every call so far.
    #[must_use]
    pub fn rows_delivered(&self) -> usize {
        self.delivered
    }
}

#[async_trait]
impl RowSource for StaticRowSource {
    async fn stream_rows(
        &mut self,
        _query: &str,
        _params: &[RowValues],
        sink: &mut (dyn RowSink + Send),
    ) -> Result<(), RowMapError> {
        sink.columns(&self.fields)?;
        for values in &self.rows {
            self.delivered += 1;
            sink.row(values.clone())?;
        }
        Ok(())
    }
}
