use std::sync::Arc;

use crate::cache::QueryCache;
use crate::column_map::{ColumnMap, FieldDescription};
use crate::config::MapperOptions;
use crate::error::RowMapError;
use crate::source::{RowSink, RowSource};
use crate::types::{RowRecord, RowValues};

/// Turns query results into column-name keyed records.
///
/// A mapper pairs a [`QueryCache`] with [`MapperOptions`]. Mappers built with
/// [`RowMapper::with_cache`] over the same `Arc` share resolved column maps:
/// ```rust,no_run
/// # async fn demo(conn: &mut rusqlite::Connection) -> Result<(), sql_rowmap::RowMapError> {
/// use sql_rowmap::prelude::*;
///
/// let mapper = RowMapper::with_cache(QueryCache::global());
/// let rows = mapper
///     .query_rows(conn, "SELECT id, name FROM t WHERE id > ?1", &[RowValues::Int64(0)])
///     .await?;
/// for row in &rows {
///     println!("{:?}", row.get("name"));
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RowMapper {
    cache: Arc<QueryCache>,
    options: MapperOptions,
}

impl Default for RowMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl RowMapper {
    /// A mapper with its own empty cache and default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cache(Arc::new(QueryCache::new()))
    }

    #[must_use]
    pub fn with_cache(cache: Arc<QueryCache>) -> Self {
        Self {
            cache,
            options: MapperOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: MapperOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    #[must_use]
    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    /// Run `query` and return every row as a record.
    ///
    /// An empty result is `Ok(vec![])`. Any failure discards the rows collected so far.
    ///
    /// # Errors
    /// Returns the driver's error when execution or decoding fails, a column-map error for
    /// malformed field descriptions, or `RowMapError::ShapeMismatch` when a row's width differs
    /// from the column map.
    pub async fn query_rows<S>(
        &self,
        conn: &mut S,
        query: &str,
        params: &[RowValues],
    ) -> Result<Vec<RowRecord>, RowMapError>
    where
        S: RowSource + ?Sized,
    {
        let mut sink = Materializer::new(self, query, RowLimit::Unbounded);
        conn.stream_rows(query, params, &mut sink).await?;
        tracing::trace!(rows = sink.records.len(), "rows materialized");
        Ok(sink.records)
    }

    /// Run `query` and return its only row as a record.
    ///
    /// # Errors
    /// Same as [`RowMapper::query_rows`], plus `RowMapError::NoRows` when the query matched
    /// nothing and `RowMapError::MoreThanOneRow` as soon as a second row arrives.
    pub async fn query_row<S>(
        &self,
        conn: &mut S,
        query: &str,
        params: &[RowValues],
    ) -> Result<RowRecord, RowMapError>
    where
        S: RowSource + ?Sized,
    {
        let mut sink = Materializer::new(self, query, RowLimit::One);
        conn.stream_rows(query, params, &mut sink).await?;
        sink.records.pop().ok_or(RowMapError::NoRows)
    }
}

/// Run `query` against `conn` using the process-wide cache and default options.
///
/// # Errors
/// See [`RowMapper::query_rows`].
pub async fn rows_map<S>(
    conn: &mut S,
    query: &str,
    params: &[RowValues],
) -> Result<Vec<RowRecord>, RowMapError>
where
    S: RowSource + ?Sized,
{
    RowMapper::with_cache(QueryCache::global())
        .query_rows(conn, query, params)
        .await
}

/// Single-row counterpart of [`rows_map`].
///
/// # Errors
/// See [`RowMapper::query_row`].
pub async fn row_map<S>(
    conn: &mut S,
    query: &str,
    params: &[RowValues],
) -> Result<RowRecord, RowMapError>
where
    S: RowSource + ?Sized,
{
    RowMapper::with_cache(QueryCache::global())
        .query_row(conn, query, params)
        .await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowLimit {
    Unbounded,
    One,
}

struct Materializer<'a> {
    mapper: &'a RowMapper,
    query: &'a str,
    limit: RowLimit,
    columns: Option<ColumnMap>,
    records: Vec<RowRecord>,
}

impl<'a> Materializer<'a> {
    fn new(mapper: &'a RowMapper, query: &'a str, limit: RowLimit) -> Self {
        Self {
            mapper,
            query,
            limit,
            columns: None,
            records: Vec::new(),
        }
    }
}

impl RowSink for Materializer<'_> {
    fn columns(&mut self, fields: &[FieldDescription]) -> Result<(), RowMapError> {
        let map = self
            .mapper
            .cache
            .resolve(self.query, fields, &self.mapper.options)?;
        self.columns = Some(map);
        Ok(())
    }

    fn row(&mut self, values: Vec<RowValues>) -> Result<(), RowMapError> {
        let columns = self.columns.as_ref().ok_or_else(|| {
            RowMapError::ExecutionError("row received before column descriptions".to_string())
        })?;

        if self.limit == RowLimit::One && !self.records.is_empty() {
            return Err(RowMapError::MoreThanOneRow);
        }

        if columns.len() != values.len() {
            return Err(RowMapError::ShapeMismatch {
                columns: columns.len(),
                values: values.len(),
            });
        }

        let record: RowRecord = columns.iter().cloned().zip(values).collect();
        self.records.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::StaticRowSource;

    fn block_on<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(fut)
    }

    fn id_name_source(rows: Vec<Vec<RowValues>>) -> StaticRowSource {
        StaticRowSource::from_names(&["id", "name"], rows)
    }

    fn row(id: i64, name: &str) -> Vec<RowValues> {
        vec![RowValues::Int64(id), RowValues::Text(name.to_string())]
    }

    #[test]
    fn rows_are_keyed_by_column_name() {
        let mut src = id_name_source(vec![row(1, "a"), row(2, "b")]);
        let mapper = RowMapper::new();
        let rows = block_on(mapper.query_rows(&mut src, "SELECT id, name FROM t", &[])).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], RowValues::Int64(1));
        assert_eq!(rows[0]["name"], RowValues::Text("a".into()));
        assert_eq!(rows[1]["id"], RowValues::Int64(2));
        assert_eq!(rows[1]["name"], RowValues::Text("b".into()));
    }

    #[test]
    fn shape_mismatch_discards_collected_rows() {
        let mut src = id_name_source(vec![row(1, "a"), vec![RowValues::Int64(2)]]);
        let err = block_on(RowMapper::new().query_rows(&mut src, "q", &[])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "query had 2 column definitions but row returned 1 values"
        );
    }

    #[test]
    fn single_row_returns_its_values() {
        let mut src = id_name_source(vec![row(7, "only")]);
        let record = block_on(RowMapper::new().query_row(&mut src, "q", &[])).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record["id"], RowValues::Int64(7));
        assert_eq!(record["name"], RowValues::Text("only".into()));
    }

    #[test]
    fn single_row_stops_at_second_row() {
        let mut src = id_name_source(vec![row(1, "a"), row(2, "b"), row(3, "c")]);
        let err = block_on(RowMapper::new().query_row(&mut src, "q", &[])).unwrap_err();
        assert!(matches!(err, RowMapError::MoreThanOneRow));
        assert_eq!(src.rows_delivered(), 2);
    }

    #[test]
    fn cardinality_checked_before_shape() {
        let mut src = id_name_source(vec![row(1, "a"), vec![RowValues::Null]]);
        let err = block_on(RowMapper::new().query_row(&mut src, "q", &[])).unwrap_err();
        assert!(matches!(err, RowMapError::MoreThanOneRow));
    }

    #[test]
    fn single_row_on_empty_result_is_no_rows() {
        let mut src = id_name_source(vec![]);
        let err = block_on(RowMapper::new().query_row(&mut src, "q", &[])).unwrap_err();
        assert!(err.is_no_rows());
    }

    #[test]
    fn bad_positions_fail_before_any_row() {
        let mut src = StaticRowSource::new(
            vec![FieldDescription::new("id", 1), FieldDescription::new("name", 1)],
            vec![row(1, "a")],
        );
        let mapper = RowMapper::new();
        let err = block_on(mapper.query_rows(&mut src, "q", &[])).unwrap_err();
        assert!(matches!(err, RowMapError::DuplicateColumnPosition { position: 1, .. }));
        assert_eq!(src.rows_delivered(), 0);
        assert!(mapper.cache().is_empty());
    }

    #[test]
    fn mappers_sharing_a_cache_share_maps() {
        let cache = Arc::new(QueryCache::new());
        let a = RowMapper::with_cache(Arc::clone(&cache));
        let b = RowMapper::with_cache(Arc::clone(&cache));
        let mut src = id_name_source(vec![row(1, "a")]);
        block_on(a.query_rows(&mut src, "SELECT id, name FROM t", &[])).unwrap();
        let mut src = id_name_source(vec![row(1, "a")]);
        block_on(b.query_rows(&mut src, "SELECT id, name FROM t", &[])).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn stale_map_surfaces_as_shape_mismatch() {
        let mapper = RowMapper::new();
        let mut before = id_name_source(vec![row(1, "a")]);
        block_on(mapper.query_rows(&mut before, "SELECT * FROM t", &[])).unwrap();

        let mut after = StaticRowSource::new(
            vec![
                FieldDescription::new("id", 1),
                FieldDescription::new("name", 2),
                FieldDescription::new("added", 3),
            ],
            vec![vec![RowValues::Int64(1), RowValues::Text("a".into()), RowValues::Null]],
        );
        let err = block_on(mapper.query_rows(&mut after, "SELECT * FROM t", &[])).unwrap_err();
        assert!(matches!(err, RowMapError::ShapeMismatch { columns: 2, values: 3 }));
    }
}
