//! Column descriptors reported by a cursor after execution.

use super::oracle_type::OracleType;

/// Describes one column of a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetadata {
    /// Column name, in the case the driver reports it.
    pub name: String,
    /// Column data type.
    pub data_type: OracleType,
    /// Whether NULL values are allowed.
    pub nullable: bool,
}

impl ColumnMetadata {
    /// Create new, nullable column metadata.
    pub fn new(name: impl Into<String>, data_type: OracleType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
        }
    }

    /// Mark the column NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_metadata_builder() {
        let col = ColumnMetadata::new("ID", OracleType::Number { precision: 10, scale: 0 }).not_null();
        assert_eq!(col.name, "ID");
        assert!(!col.nullable);
        assert_eq!(col.data_type.precision(), 10);
    }
}
