use rusqlite::types::Value;

use crate::column_map::FieldDescription;
use crate::error::RowMapError;
use crate::types::RowValues;

/// What a column's declared type adds on top of SQLite's storage class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredType {
    Bool,
    Json,
    Plain,
}

impl DeclaredType {
    #[must_use]
    pub fn from_decl(decl: Option<&str>) -> Self {
        match decl.map(str::to_ascii_uppercase).as_deref() {
            Some("BOOL" | "BOOLEAN") => DeclaredType::Bool,
            Some("JSON" | "JSONB") => DeclaredType::Json,
            _ => DeclaredType::Plain,
        }
    }
}

/// Column metadata of a prepared statement: field descriptions plus declared types.
#[must_use]
pub fn describe_columns(stmt: &rusqlite::Statement<'_>) -> (Vec<FieldDescription>, Vec<DeclaredType>) {
    stmt.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| {
            (
                FieldDescription::new(col.name(), i + 1),
                DeclaredType::from_decl(col.decl_type()),
            )
        })
        .unzip()
}

/// Extract a `RowValues` from a `SQLite` row.
///
/// A `BOOLEAN` column holding 0 or 1 becomes `Bool`; a `JSON` column holding text that parses
/// becomes `JSON`. Anything else maps straight from the storage class.
///
/// # Errors
///
/// Returns `RowMapError` if the value cannot be read.
pub fn sqlite_extract_value_sync(
    row: &rusqlite::Row,
    idx: usize,
    declared: DeclaredType,
) -> Result<RowValues, RowMapError> {
    let value: Value = row.get(idx).map_err(RowMapError::SqliteError)?;
    match (value, declared) {
        (Value::Null, _) => Ok(RowValues::Null),
        (Value::Integer(i @ (0 | 1)), DeclaredType::Bool) => Ok(RowValues::Bool(i == 1)),
        (Value::Integer(i), _) => Ok(RowValues::Int64(i)),
        (Value::Real(f), _) => Ok(RowValues::Float64(f)),
        (Value::Text(s), DeclaredType::Json) => Ok(serde_json::from_str(&s)
            .map_or(RowValues::Text(s), RowValues::JSON)),
        (Value::Text(s), _) => Ok(RowValues::Text(s)),
        (Value::Blob(b), _) => Ok(RowValues::Blob(b)),
    }
}
