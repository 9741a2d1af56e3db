use async_trait::async_trait;
use rusqlite::{Connection, params_from_iter};

use super::params::Params;
use super::query::{describe_columns, sqlite_extract_value_sync};
use crate::error::RowMapError;
use crate::source::{RowSink, RowSource};
use crate::types::RowValues;

/// Prepare and run `query` on `conn`, feeding columns and rows to `sink`.
///
/// Runs synchronously on the calling thread.
///
/// # Errors
/// Returns `RowMapError::SqliteError` for preparation or stepping failures, and any sink error.
pub fn stream_from_connection(
    conn: &Connection,
    query: &str,
    params: &[RowValues],
    sink: &mut (dyn RowSink + Send),
) -> Result<(), RowMapError> {
    let mut stmt = conn.prepare(query)?;
    let (fields, declared) = describe_columns(&stmt);
    sink.columns(&fields)?;

    let converted = Params::convert(params)?;
    let mut rows = stmt.query(params_from_iter(converted.as_values()))?;

    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(declared.len());
        for (idx, decl) in declared.iter().enumerate() {
            values.push(sqlite_extract_value_sync(row, idx, *decl)?);
        }
        sink.row(values)?;
    }

    Ok(())
}

#[async_trait]
impl RowSource for Connection {
    async fn stream_rows(
        &mut self,
        query: &str,
        params: &[RowValues],
        sink: &mut (dyn RowSink + Send),
    ) -> Result<(), RowMapError> {
        stream_from_connection(self, query, params, sink)
    }
}
