//! Turning fetched cells into owned rows.
//!
//! Every column gets a [`Conversion`] picked from its declared type once per
//! result set; each cell is then converted by its column's entry.

use std::sync::Arc;

use crate::config::ColumnCase;
use crate::error::{Error, Result};
use crate::types::{ColumnMetadata, Fetched, OracleType, Row, Value};

/// What to do with a cell before it leaves the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Scalar; use as returned.
    AsIs,
    /// Character LOB; read the handle into a `Value::String`.
    Text,
    /// Binary LOB; read the handle into a `Value::Bytes`.
    Bytes,
}

impl Conversion {
    /// Conversion for a declared column type.
    pub fn for_type(data_type: &OracleType) -> Self {
        match data_type {
            OracleType::Clob | OracleType::Nclob | OracleType::Long => Conversion::Text,
            OracleType::LongRaw => Conversion::Bytes,
            t if t.is_lob() => Conversion::Bytes,
            _ => Conversion::AsIs,
        }
    }

    /// Convert one cell.
    ///
    /// LOB read failures come back from the driver unchanged.
    pub fn apply(self, column: &str, cell: Fetched) -> Result<Value> {
        match (self, cell) {
            (_, Fetched::Value(value)) => Ok(value),
            (Conversion::Text, Fetched::Lob(mut lob)) => lob.read_text().map(Value::String),
            (Conversion::Bytes, Fetched::Lob(mut lob)) => lob.read_bytes().map(Value::Bytes),
            (Conversion::AsIs, Fetched::Lob(_)) => Err(Error::type_conversion(format!(
                "column {} returned a LOB handle but is not declared as a LOB type",
                column
            ))),
        }
    }
}

/// Per-column conversions for one result set.
#[derive(Debug, Clone)]
pub struct ConversionTable {
    names: Arc<[String]>,
    conversions: Vec<Conversion>,
}

impl ConversionTable {
    /// Build the table from a cursor description.
    pub fn new(columns: &[ColumnMetadata], case: ColumnCase) -> Self {
        let names: Vec<String> = columns.iter().map(|c| case.apply(&c.name)).collect();
        let conversions = columns
            .iter()
            .map(|c| Conversion::for_type(&c.data_type))
            .collect();
        Self {
            names: names.into(),
            conversions,
        }
    }

    /// Convert one fetched row.
    pub fn row(&self, cells: Vec<Fetched>) -> Result<Row> {
        if cells.len() != self.conversions.len() {
            return Err(Error::type_conversion(format!(
                "row has {} values but the cursor describes {} columns",
                cells.len(),
                self.conversions.len()
            )));
        }
        let values = cells
            .into_iter()
            .zip(self.conversions.iter().zip(self.names.iter()))
            .map(|(cell, (conversion, name))| conversion.apply(name, cell))
            .collect::<Result<Vec<Value>>>()?;
        Ok(Row::new(Arc::clone(&self.names), values))
    }

    /// Convert every fetched row, preserving order.
    pub fn rows(&self, fetched: Vec<Vec<Fetched>>) -> Result<Vec<Row>> {
        fetched.into_iter().map(|cells| self.row(cells)).collect()
    }
}
