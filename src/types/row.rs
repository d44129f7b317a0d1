//! Row type for query results.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::value::Value;

/// One result row: an ordered mapping from column name to value.
///
/// Column names are shared between all rows of a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Column names, in select-list order.
    columns: Arc<[String]>,
    /// Column values, parallel to `columns`.
    values: Vec<Value>,
}

impl Row {
    /// Create a new row with values and shared column names.
    ///
    /// `values` must have one entry per column.
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Build a row from `(name, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let (columns, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self {
            columns: columns.into(),
            values,
        }
    }

    /// Get value by exact column name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get value by column name (case-insensitive).
    pub fn get_ignore_case(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .and_then(|idx| self.values.get(idx))
    }

    /// Get value by column index (0-based).
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get the number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get column names.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Get all values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Iterate over `(name, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Convert into a name-keyed map. Duplicate names keep the last value.
    pub fn into_map(self) -> BTreeMap<String, Value> {
        self.columns.iter().cloned().zip(self.values).collect()
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::iter::Zip<std::vec::IntoIter<String>, std::vec::IntoIter<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.to_vec().into_iter().zip(self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row() -> Row {
        Row::from_pairs([("NAME", Value::from("test")), ("Value", Value::from(42))])
    }

    #[test]
    fn test_row_access() {
        let row = make_row();
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("NAME"), Some(&Value::String("test".to_string())));
        assert_eq!(row.get("name"), None);
        assert_eq!(row.get_ignore_case("name"), row.get("NAME"));
        assert_eq!(row.get_index(1), Some(&Value::Integer(42)));
    }

    #[test]
    fn test_row_order_preserved() {
        let row = make_row();
        let names: Vec<&str> = row.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["NAME", "Value"]);

        let pairs: Vec<(String, Value)> = row.clone().into_iter().collect();
        assert_eq!(pairs[1], ("Value".to_string(), Value::Integer(42)));
        assert_eq!(row.into_map().len(), 2);
    }
}
