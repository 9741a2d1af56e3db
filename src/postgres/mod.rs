// PostgreSQL module - row sources over tokio-postgres
//
// - params: bind arguments from `RowValues`
// - query: field descriptions and value decoding
// - source: `RowSource` for `Client` and `Transaction`

pub mod params;
pub mod query;
pub mod source;

pub use params::Params;
pub use query::{field_descriptions, postgres_extract_row, postgres_extract_value};
pub use source::stream_from_client;
