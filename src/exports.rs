//! Database-specific type exports.
//!
//! This module contains all the conditional feature exports for different
//! database backends, keeping them organized in one place.

// PostgreSQL exports
#[cfg(feature = "postgres")]
pub use crate::postgres::Params as PostgresParams;
#[cfg(feature = "postgres")]
pub use crate::postgres::stream_from_client as postgres_stream_rows;

// SQLite exports
#[cfg(feature = "sqlite")]
pub use crate::sqlite::Params as SqliteParams;
#[cfg(feature = "sqlite")]
pub use crate::sqlite::stream_from_connection as sqlite_stream_rows;
