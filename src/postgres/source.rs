use async_trait::async_trait;
use futures_util::{TryStreamExt, pin_mut};
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, GenericClient, Transaction};

use super::params::Params;
use super::query::{field_descriptions, postgres_extract_row};
use crate::error::RowMapError;
use crate::source::{RowSink, RowSource};
use crate::types::RowValues;

/// Prepare `query`, report its columns, then stream rows until exhausted or the sink refuses one.
///
/// Preparing first means column descriptions are known even when no row comes back.
///
/// # Errors
/// Returns driver errors from preparation, binding, or row fetching, and any sink error.
pub async fn stream_from_client<C>(
    client: &C,
    query: &str,
    params: &[RowValues],
    sink: &mut (dyn RowSink + Send),
) -> Result<(), RowMapError>
where
    C: GenericClient + Sync,
{
    let stmt = client.prepare(query).await?;
    sink.columns(&field_descriptions(stmt.columns()))?;

    let converted = Params::convert(params)?;
    let rows = client
        .query_raw(&stmt, converted.as_refs().iter().map(|p| *p as &dyn ToSql))
        .await?;
    pin_mut!(rows);

    while let Some(row) = rows.try_next().await? {
        sink.row(postgres_extract_row(&row)?)?;
    }

    Ok(())
}

#[async_trait]
impl RowSource for Client {
    async fn stream_rows(
        &mut self,
        query: &str,
        params: &[RowValues],
        sink: &mut (dyn RowSink + Send),
    ) -> Result<(), RowMapError> {
        stream_from_client(&*self, query, params, sink).await
    }
}

#[async_trait]
impl<'a> RowSource for Transaction<'a> {
    async fn stream_rows(
        &mut self,
        query: &str,
        params: &[RowValues],
        sink: &mut (dyn RowSink + Send),
    ) -> Result<(), RowMapError> {
        stream_from_client(&*self, query, params, sink).await
    }
}
