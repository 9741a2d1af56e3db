use thiserror::Error;

#[derive(Debug, Error)]
pub enum RowMapError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    /// A row's width disagrees with the column map resolved for its query.
    #[error("query had {columns} column definitions but row returned {values} values")]
    ShapeMismatch { columns: usize, values: usize },

    #[error("query returned more than 1 row")]
    MoreThanOneRow,

    /// The query ran but matched nothing. Same text as the drivers' own no-rows errors.
    #[error("no rows in result set")]
    NoRows,

    #[error("column {name} has position {position} but the result has {columns} columns")]
    InvalidColumnPosition {
        name: String,
        position: usize,
        columns: usize,
    },

    #[error("columns {first} and {second} both claim position {position}")]
    DuplicateColumnPosition {
        position: usize,
        first: String,
        second: String,
    },

    /// Two result columns share a name, so a record keyed by name would lose one of them.
    #[error("column name {name} appears more than once in the result; alias it")]
    DuplicateColumnName { name: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}

impl RowMapError {
    /// True when the single-row form found nothing, as opposed to a failed query.
    #[must_use]
    pub fn is_no_rows(&self) -> bool {
        match self {
            RowMapError::NoRows => true,
            #[cfg(feature = "sqlite")]
            RowMapError::SqliteError(rusqlite::Error::QueryReturnedNoRows) => true,
            _ => false,
        }
    }
}
