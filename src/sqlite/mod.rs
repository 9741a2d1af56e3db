// SQLite module - row source over rusqlite
//
// - params: bind arguments from `RowValues`
// - query: column metadata and value decoding
// - source: `RowSource` for `rusqlite::Connection`

pub mod params;
pub mod query;
pub mod source;

pub use params::Params;
pub use query::{DeclaredType, describe_columns, sqlite_extract_value_sync};
pub use source::stream_from_connection;
