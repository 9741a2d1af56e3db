use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

use crate::config::PositionSource;
use crate::error::RowMapError;

/// Metadata a driver reports for one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescription {
    /// Column name as reported by the driver
    pub name: String,
    /// 1-based ordinal of the column within the result set
    pub position: usize,
    /// 1-based attribute number in the source table, if the column comes straight from one
    pub table_attribute: Option<i16>,
}

impl FieldDescription {
    #[must_use]
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
            table_attribute: None,
        }
    }

    #[must_use]
    pub fn with_table_attribute(mut self, attribute: i16) -> Self {
        self.table_attribute = Some(attribute);
        self
    }

    /// The 1-based slot this field occupies under `source`.
    ///
    /// Non-positive attribute numbers (system columns) are reported as position 0, which the
    /// column map rejects.
    #[must_use]
    pub fn slot(&self, source: PositionSource) -> usize {
        match (source, self.table_attribute) {
            (PositionSource::TableAttribute, Some(attr)) => usize::try_from(attr).unwrap_or(0),
            _ => self.position,
        }
    }
}

/// Column names of one query, ordered by declared position.
///
/// Cloning shares the underlying storage, so every row of every call for the same query text
/// points at one allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    names: Arc<[String]>,
}

impl ColumnMap {
    /// Build a column map, placing each field's name at `slot - 1`.
    ///
    /// # Errors
    /// Returns `RowMapError::InvalidColumnPosition` for a slot outside `1..=fields.len()` and
    /// `RowMapError::DuplicateColumnPosition` when two fields claim the same slot and
    /// `RowMapError::DuplicateColumnName` when two fields share a name.
    pub fn from_fields(
        fields: &[FieldDescription],
        source: PositionSource,
    ) -> Result<Self, RowMapError> {
        let mut slots: Vec<Option<String>> = vec![None; fields.len()];

        for field in fields {
            let position = field.slot(source);
            if position == 0 || position > fields.len() {
                return Err(RowMapError::InvalidColumnPosition {
                    name: field.name.clone(),
                    position,
                    columns: fields.len(),
                });
            }
            let slot = &mut slots[position - 1];
            if let Some(first) = slot {
                return Err(RowMapError::DuplicateColumnPosition {
                    position,
                    first: first.clone(),
                    second: field.name.clone(),
                });
            }
            *slot = Some(field.name.clone());
        }

        let mut seen = HashSet::with_capacity(fields.len());
        if let Some(dup) = fields.iter().find(|f| !seen.insert(f.name.as_str())) {
            return Err(RowMapError::DuplicateColumnName {
                name: dup.name.clone(),
            });
        }

        // Every slot is filled: n fields, n distinct positions in 1..=n.
        let names: Vec<String> = slots.into_iter().flatten().collect();
        Ok(Self {
            names: names.into(),
        })
    }

    /// Column names in position order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position (0-based) of `column_name`, if present.
    #[must_use]
    pub fn index_of(&self, column_name: &str) -> Option<usize> {
        self.names.iter().position(|col| col == column_name)
    }

    /// True when both maps share one allocation, i.e. one came from the other via the cache.
    #[must_use]
    pub fn ptr_eq(&self, other: &ColumnMap) -> bool {
        Arc::ptr_eq(&self.names, &other.names)
    }
}

impl Deref for ColumnMap {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(described: &[(&str, usize)]) -> Vec<FieldDescription> {
        described.iter()
            .map(|(name, pos)| FieldDescription::new(*name, *pos))
            .collect()
    }

    #[test]
    fn names_land_at_their_positions() {
        let map =
            ColumnMap::from_fields(&fields(&[("b", 2), ("c", 3), ("a", 1)]), PositionSource::ResultOrdinal)
                .unwrap();
        assert_eq!(map.names(), ["a", "b", "c"]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.index_of("c"), Some(2));
        assert_eq!(map.index_of("missing"), None);
    }

    #[test]
    fn empty_field_list_gives_empty_map() {
        let map = ColumnMap::from_fields(&[], PositionSource::ResultOrdinal).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn out_of_range_position_fails() {
        let err = ColumnMap::from_fields(&fields(&[("a", 1), ("b", 3)]), PositionSource::ResultOrdinal)
            .unwrap_err();
        assert!(matches!(
            err,
            RowMapError::InvalidColumnPosition { ref name, position: 3, columns: 2 } if name == "b"
        ));

        let err = ColumnMap::from_fields(&fields(&[("a", 0)]), PositionSource::ResultOrdinal)
            .unwrap_err();
        assert!(matches!(err, RowMapError::InvalidColumnPosition { position: 0, .. }));
    }

    #[test]
    fn duplicate_position_fails() {
        let err = ColumnMap::from_fields(&fields(&[("a", 1), ("b", 1)]), PositionSource::ResultOrdinal)
            .unwrap_err();
        assert_eq!(err.to_string(), "columns a and b both claim position 1");
    }

    #[test]
    fn duplicate_name_fails() {
        let err = ColumnMap::from_fields(&fields(&[("id", 1), ("id", 2)]), PositionSource::ResultOrdinal)
            .unwrap_err();
        assert!(matches!(err, RowMapError::DuplicateColumnName { ref name } if name == "id"));
    }

    #[test]
    fn table_attribute_reorders_and_falls_back() {
        // SELECT * over (id, name) reported as name-first with attribute numbers.
        let described = vec![
            FieldDescription::new("name", 1).with_table_attribute(2),
            FieldDescription::new("id", 2).with_table_attribute(1),
        ];
        let by_attr = ColumnMap::from_fields(&described, PositionSource::TableAttribute).unwrap();
        assert_eq!(by_attr.names(), ["id", "name"]);
        let by_ordinal = ColumnMap::from_fields(&described, PositionSource::ResultOrdinal).unwrap();
        assert_eq!(by_ordinal.names(), ["name", "id"]);

        let computed = vec![
            FieldDescription::new("id", 1).with_table_attribute(1),
            FieldDescription::new("total", 2),
        ];
        let map = ColumnMap::from_fields(&computed, PositionSource::TableAttribute).unwrap();
        assert_eq!(map.names(), ["id", "total"]);
    }

    #[test]
    fn system_column_attribute_is_rejected() {
        let described = vec![FieldDescription::new("ctid", 1).with_table_attribute(-1)];
        let err = ColumnMap::from_fields(&described, PositionSource::TableAttribute).unwrap_err();
        assert!(matches!(err, RowMapError::InvalidColumnPosition { position: 0, .. }));
    }

    #[test]
    fn table_attribute_rejects_projections() {
        // SELECT test_text FROM a table where it is the third column.
        let projected = vec![FieldDescription::new("test_text", 1).with_table_attribute(3)];
        let err = ColumnMap::from_fields(&projected, PositionSource::TableAttribute).unwrap_err();
        assert!(matches!(
            err,
            RowMapError::InvalidColumnPosition { ref name, position: 3, columns: 1 } if name == "test_text"
        ));
        assert!(ColumnMap::from_fields(&projected, PositionSource::ResultOrdinal).is_ok());

        // SELECT 1 AS one, id: the computed ordinal 1 collides with id's attribute 1.
        let collided = vec![
            FieldDescription::new("one", 1),
            FieldDescription::new("id", 2).with_table_attribute(1),
        ];
        let err = ColumnMap::from_fields(&collided, PositionSource::TableAttribute).unwrap_err();
        assert!(matches!(err, RowMapError::DuplicateColumnPosition { position: 1, .. }));
    }
}
