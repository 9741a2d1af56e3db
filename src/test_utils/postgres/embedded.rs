use postgresql_embedded::PostgreSQL;
use tokio_postgres::{Client, NoTls};

use super::super::SHARED_RUNTIME;
use crate::error::RowMapError;

/// Represents a running embedded `PostgreSQL` instance.
pub struct EmbeddedPostgres {
    pub postgresql: PostgreSQL,
    pub port: u16,
    pub database_url: String,
}

/// Set up an embedded `PostgreSQL` instance with a fresh database named `db_name`.
///
/// # Errors
/// Returns an error if the embedded server cannot be set up or started, or if the database
/// cannot be created.
pub fn setup_postgres_embedded(
    db_name: &str,
) -> Result<EmbeddedPostgres, Box<dyn std::error::Error>> {
    SHARED_RUNTIME.block_on(async {
        let mut postgresql = PostgreSQL::default();

        // Setup PostgreSQL binaries (bundled, so no download conflicts)
        postgresql.setup().await?;
        postgresql.start().await?;
        postgresql.create_database(db_name).await?;

        let settings = postgresql.settings();
        let port = settings.port;
        let database_url = format!(
            "postgres://{}:{}@{}:{}/{db_name}",
            settings.username, settings.password, settings.host, port
        );

        Ok(EmbeddedPostgres {
            postgresql,
            port,
            database_url,
        })
    })
}

/// Stop a previously started embedded `PostgreSQL` instance.
pub fn stop_postgres_embedded(postgres: EmbeddedPostgres) {
    let EmbeddedPostgres { postgresql, .. } = postgres;
    SHARED_RUNTIME.block_on(async move {
        let _ = postgresql.stop().await;
    });
}

/// Open a client to `database_url`, driving its connection on the current runtime.
///
/// # Errors
/// Returns `RowMapError::PostgresError` if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<Client, RowMapError> {
    let (client, connection) = tokio_postgres::connect(database_url, NoTls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::warn!("embedded postgres connection closed: {e}");
        }
    });
    Ok(client)
}
