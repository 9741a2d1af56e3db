#![cfg(feature = "sqlite")]

use std::sync::Arc;

use rusqlite::Connection;
use sql_rowmap::prelude::*;
use tokio::runtime::Runtime;

#[test]
fn test2_global_functions_share_one_cache() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async move {
        let mut conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "CREATE TABLE g (id INTEGER, label TEXT);
             INSERT INTO g VALUES (10, 'ten');",
        )?;
        // Query text unique to this test; the global cache lives for the whole test binary.
        let sql = "SELECT id, label FROM g /* test2_global */";

        let rows = rows_map(&mut conn, sql, &[]).await?;
        assert_eq!(rows.len(), 1);
        assert!(QueryCache::global().get(sql, &MapperOptions::default()).is_some());

        let row = row_map(&mut conn, sql, &[]).await?;
        assert_eq!(row["label"].as_text(), Some("ten"));

        let err = row_map(&mut conn, "SELECT id FROM g WHERE id < 0 /* test2_global */", &[])
            .await
            .unwrap_err();
        assert!(err.is_no_rows());
        Ok::<(), RowMapError>(())
    })?;
    Ok(())
}

#[test]
fn test2_collapsed_keys_share_entries() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async move {
        let mut conn = Connection::open_in_memory()?;
        conn.execute_batch("CREATE TABLE w (id INTEGER); INSERT INTO w VALUES (1);")?;

        let options = MapperOptionsBuilder::new()
            .cache_key(CacheKeyMode::CollapseWhitespace)
            .finish();
        let mapper = RowMapper::new().with_options(options);

        mapper.query_rows(&mut conn, "SELECT id\n  FROM w", &[]).await?;
        mapper.query_rows(&mut conn, "  SELECT id FROM w  ", &[]).await?;
        assert_eq!(mapper.cache().len(), 1);

        let literal = RowMapper::new();
        literal.query_rows(&mut conn, "SELECT id\n  FROM w", &[]).await?;
        literal.query_rows(&mut conn, "  SELECT id FROM w  ", &[]).await?;
        assert_eq!(literal.cache().len(), 2);
        Ok::<(), RowMapError>(())
    })?;
    Ok(())
}

#[test]
fn test2_collapsed_keys_keep_quoted_aliases_apart() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async move {
        let mut conn = Connection::open_in_memory()?;
        let mapper = RowMapper::new()
            .with_options(MapperOptions::new().with_cache_key(CacheKeyMode::CollapseWhitespace));

        let first = mapper.query_row(&mut conn, r#"SELECT 1 AS "a  b""#, &[]).await?;
        let second = mapper.query_row(&mut conn, r#"SELECT  1 AS "a b""#, &[]).await?;
        assert!(first.contains_key("a  b"));
        assert!(second.contains_key("a b"));
        assert!(!second.contains_key("a  b"));

        let first = mapper.query_row(&mut conn, "SELECT 'x  y' AS v", &[]).await?;
        let second = mapper.query_row(&mut conn, "SELECT 'x y' AS  v", &[]).await?;
        assert_eq!(first["v"].as_text(), Some("x  y"));
        assert_eq!(second["v"].as_text(), Some("x y"));

        assert_eq!(mapper.cache().len(), 4);
        Ok::<(), RowMapError>(())
    })?;
    Ok(())
}

#[test]
fn test2_options_from_json_drive_the_mapper() -> Result<(), Box<dyn std::error::Error>> {
    let options = MapperOptions::from_json_str(
        r#"{"cache_key": "collapse_whitespace", "positions": "table_attribute"}"#,
    )?;
    let rt = Runtime::new()?;
    rt.block_on(async move {
        let mut conn = Connection::open_in_memory()?;
        conn.execute_batch("CREATE TABLE p (a INTEGER, b INTEGER); INSERT INTO p VALUES (1, 2);")?;

        // SQLite reports no table attribute numbers, so result ordinals apply.
        let row = RowMapper::new()
            .with_options(options)
            .query_row(&mut conn, "SELECT b, a FROM p", &[])
            .await?;
        assert_eq!(row["a"].as_int(), Some(1));
        assert_eq!(row["b"].as_int(), Some(2));
        Ok::<(), RowMapError>(())
    })?;
    Ok(())
}

#[test]
fn test2_mapper_shared_across_tasks() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async move {
        let mapper = Arc::new(RowMapper::new());
        let mut handles = Vec::new();
        for i in 0..4_i64 {
            let mapper = Arc::clone(&mapper);
            handles.push(tokio::spawn(async move {
                let mut conn = Connection::open_in_memory()?;
                conn.execute_batch("CREATE TABLE s (n INTEGER);")?;
                conn.execute("INSERT INTO s VALUES (?1)", [i])?;
                let row = mapper.query_row(&mut conn, "SELECT n FROM s", &[]).await?;
                Ok::<i64, RowMapError>(row["n"].as_int().unwrap_or(-1))
            }));
        }
        let mut seen = Vec::new();
        for handle in handles {
            seen.push(handle.await.expect("task panicked")?);
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert_eq!(mapper.cache().len(), 1);
        Ok::<(), RowMapError>(())
    })?;
    Ok(())
}
