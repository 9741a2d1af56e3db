use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use crate::column_map::{ColumnMap, FieldDescription};
use crate::config::MapperOptions;
use crate::error::RowMapError;

static GLOBAL_CACHE: LazyLock<Arc<QueryCache>> = LazyLock::new(|| Arc::new(QueryCache::new()));

/// Column maps keyed by query text.
///
/// The cache only grows: there is no eviction, expiry or invalidation. Once a query text has
/// been resolved, later calls get that first map back even if the statement now returns a
/// different shape; the mapper then reports the drift as a
/// [`RowMapError::ShapeMismatch`] instead of mis-keying values.
#[derive(Debug, Default)]
pub struct QueryCache {
    maps: Mutex<HashMap<String, ColumnMap>>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by [`crate::rows_map`] and [`crate::row_map`].
    #[must_use]
    pub fn global() -> Arc<QueryCache> {
        Arc::clone(&GLOBAL_CACHE)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ColumnMap>> {
        // Inserts are a single call, so a poisoned map is still consistent.
        match self.maps.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Return the column map for `query`, building it from `fields` on first use.
    ///
    /// On a hit `fields` is not looked at. Nothing is cached when building fails.
    ///
    /// # Errors
    /// Returns the position errors of [`ColumnMap::from_fields`].
    pub fn resolve(
        &self,
        query: &str,
        fields: &[FieldDescription],
        options: &MapperOptions,
    ) -> Result<ColumnMap, RowMapError> {
        let key = options.cache_key.key(query);

        if let Some(map) = self.lock().get(key.as_ref()) {
            tracing::trace!(query = %key, "column map cache hit");
            return Ok(map.clone());
        }

        // Built outside the lock; a racing caller may build the same map, first insert wins.
        let built = ColumnMap::from_fields(fields, options.positions)?;
        let key = key.into_owned();
        let mut maps = self.lock();
        let map = maps.entry(key.clone()).or_insert_with(|| {
            tracing::debug!(query = %key, columns = built.len(), "column map cached");
            built
        });
        Ok(map.clone())
    }

    /// Cached map for `query` under `options`' key mode, without building one.
    #[must_use]
    pub fn get(&self, query: &str, options: &MapperOptions) -> Option<ColumnMap> {
        let key = options.cache_key.key(query);
        self.lock().get(key.as_ref()).cloned()
    }

    /// Number of distinct query keys cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
