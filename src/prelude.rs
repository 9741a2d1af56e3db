//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::cache::QueryCache;
pub use crate::column_map::{ColumnMap, FieldDescription};
pub use crate::config::{CacheKeyMode, MapperOptions, MapperOptionsBuilder, PositionSource};
pub use crate::error::RowMapError;
pub use crate::mapper::{RowMapper, row_map, rows_map};
pub use crate::source::{RowSink, RowSource};
pub use crate::types::{Inet, RowRecord, RowValues, record_to_json};

#[cfg(feature = "postgres")]
pub use crate::exports::PostgresParams;
#[cfg(feature = "postgres")]
pub use crate::exports::postgres_stream_rows;

#[cfg(feature = "sqlite")]
pub use crate::exports::SqliteParams;
#[cfg(feature = "sqlite")]
pub use crate::exports::sqlite_stream_rows;
