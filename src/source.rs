//! The seam between the mapper and a database driver.
//!
//! A [`RowSource`] runs one query and pushes what it gets back into a [`RowSink`]: first the
//! field descriptions, then each decoded row in driver order. The sink decides what to keep and
//! can stop the iteration early by returning an error.

use async_trait::async_trait;

use crate::column_map::FieldDescription;
use crate::error::RowMapError;
use crate::types::RowValues;

/// Receives the output of one query execution.
pub trait RowSink: Send {
    /// Called exactly once, after the query executed and before any row.
    ///
    /// # Errors
    /// An error aborts the query; the source returns it unchanged.
    fn columns(&mut self, fields: &[FieldDescription]) -> Result<(), RowMapError>;

    /// Called once per row with the row's decoded values.
    ///
    /// # Errors
    /// An error stops iteration immediately; the source returns it unchanged.
    fn row(&mut self, values: Vec<RowValues>) -> Result<(), RowMapError>;
}

/// An open connection that can execute a query and stream decoded rows.
///
/// The connection stays owned by the caller; implementations never open, close or pool it.
#[async_trait]
pub trait RowSource: Send {
    /// Execute `query` with `params` bound positionally and feed the results to `sink`.
    ///
    /// # Errors
    /// Returns the driver's error if execution or decoding fails, or the sink's error if it
    /// rejected the columns or a row.
    async fn stream_rows(
        &mut self,
        query: &str,
        params: &[RowValues],
        sink: &mut (dyn RowSink + Send),
    ) -> Result<(), RowMapError>;
}
