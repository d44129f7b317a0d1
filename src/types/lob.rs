//! LOB (Large Object) handles for CLOB, NCLOB, BLOB and BFILE columns.
//!
//! A driver hands LOB columns back as a [`LobReader`] rather than a value.
//! The handle is only good while its connection is open, so every handle is
//! read to completion before a row leaves `Db::select`.

use crate::error::{Error, Result};

use super::value::Value;

/// Synchronous access to the full contents of one large object.
pub trait LobReader {
    /// Size in characters (CLOB) or bytes (BLOB), if the driver knows it.
    fn size(&self) -> Option<u64> {
        None
    }

    /// Read the whole object as text.
    fn read_text(&mut self) -> Result<String>;

    /// Read the whole object as bytes.
    fn read_bytes(&mut self) -> Result<Vec<u8>>;
}

/// A cell as it comes off a driver cursor.
pub enum Fetched {
    /// Plain value, usable as returned.
    Value(Value),
    /// Large-object handle that still has to be read.
    Lob(Box<dyn LobReader>),
}

impl Fetched {
    /// Wrap a LOB handle.
    pub fn lob(reader: impl LobReader + 'static) -> Self {
        Fetched::Lob(Box::new(reader))
    }

    /// Whether this cell still holds a handle.
    pub fn is_lob(&self) -> bool {
        matches!(self, Fetched::Lob(_))
    }
}

impl std::fmt::Debug for Fetched {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fetched::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Fetched::Lob(lob) => match lob.size() {
                Some(size) => write!(f, "Lob(<{} units>)", size),
                None => write!(f, "Lob(<unknown size>)"),
            },
        }
    }
}

impl From<Value> for Fetched {
    fn from(v: Value) -> Self {
        Fetched::Value(v)
    }
}

/// LOB whose contents were already transferred by the driver.
///
/// Drivers that prefetch small LOBs, or that cannot hand out a handle
/// detached from their session, copy the data into one of these.
#[derive(Debug, Clone, PartialEq)]
pub struct LobValue {
    data: Vec<u8>,
    is_text: bool,
}

impl LobValue {
    /// Character LOB contents.
    pub fn text(data: impl Into<String>) -> Self {
        Self {
            data: data.into().into_bytes(),
            is_text: true,
        }
    }

    /// Binary LOB contents.
    pub fn binary(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            is_text: false,
        }
    }

    /// Whether the contents are character data.
    pub fn is_text(&self) -> bool {
        self.is_text
    }
}

impl LobReader for LobValue {
    fn size(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }

    fn read_text(&mut self) -> Result<String> {
        String::from_utf8(self.data.clone())
            .map_err(|e| Error::type_conversion(format!("LOB is not valid UTF-8: {}", e)))
    }

    fn read_bytes(&mut self) -> Result<Vec<u8>> {
        Ok(self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lob_value_text() {
        let mut lob = LobValue::text("hello");
        assert!(lob.is_text());
        assert_eq!(lob.size(), Some(5));
        assert_eq!(lob.read_text().unwrap(), "hello");
        assert_eq!(lob.read_bytes().unwrap(), b"hello".to_vec());
    }

    #[test]
    fn test_lob_value_binary_not_utf8() {
        let mut lob = LobValue::binary(vec![0xff, 0xfe]);
        assert!(!lob.is_text());
        assert!(matches!(lob.read_text(), Err(Error::TypeConversion { .. })));
        assert_eq!(lob.read_bytes().unwrap(), vec![0xff, 0xfe]);
    }

    #[test]
    fn test_fetched_debug() {
        let cell = Fetched::lob(LobValue::binary(b"abc".to_vec()));
        assert!(cell.is_lob());
        assert_eq!(format!("{:?}", cell), "Lob(<3 units>)");
        assert_eq!(format!("{:?}", Fetched::from(Value::Integer(1))), "Value(Integer(1))");
    }
}
