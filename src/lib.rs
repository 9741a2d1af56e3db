//! Map relational query results into column-name keyed records.
//!
//! Each distinct query text resolves its column names once; later executions reuse the cached
//! [`ColumnMap`] and only zip names with freshly decoded values.
//!
//! ```rust,no_run
//! use sql_rowmap::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rt = tokio::runtime::Runtime::new()?;
//! rt.block_on(async {
//!     let mut conn = rusqlite::Connection::open_in_memory()?;
//!     conn.execute_batch("CREATE TABLE t (id INTEGER, name TEXT); INSERT INTO t VALUES (1, 'a');")?;
//!
//!     let mapper = RowMapper::new();
//!     let row = mapper.query_row(&mut conn, "SELECT id, name FROM t", &[]).await?;
//!     assert_eq!(row["name"].as_text(), Some("a"));
//!     Ok::<(), RowMapError>(())
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod column_map;
pub mod config;
pub mod error;
pub mod exports;
pub mod helpers;
pub mod mapper;
pub mod prelude;
pub mod source;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "test-utils-postgres")]
pub mod test_utils;

pub use cache::QueryCache;
pub use column_map::{ColumnMap, FieldDescription};
pub use config::{CacheKeyMode, MapperOptions, MapperOptionsBuilder, PositionSource};
pub use error::RowMapError;
pub use mapper::{RowMapper, row_map, rows_map};
pub use source::{RowSink, RowSource};
pub use types::{Inet, RowRecord, RowValues, record_to_json};
