//! Oracle data type enum with type-specific attributes.
//!
//! Drivers describe each result column with one of these. The materializer
//! only cares which family a type belongs to; the attributes are kept for
//! callers that inspect column metadata.

/// Oracle data type with type-specific attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleType {
    /// VARCHAR2(max_length) - variable-length string.
    Varchar2 { max_size: u32 },
    /// NVARCHAR2(max_length).
    Nvarchar2 { max_size: u32 },
    /// CHAR(size) - fixed-length string.
    Char { max_size: u32 },
    /// NCHAR(size).
    Nchar { max_size: u32 },
    /// NUMBER(precision, scale) - numeric type.
    Number { precision: i16, scale: i8 },
    /// BINARY_FLOAT.
    BinaryFloat,
    /// BINARY_DOUBLE.
    BinaryDouble,
    /// DATE - date/time (no timezone).
    Date,
    /// TIMESTAMP and its timezone variants.
    Timestamp,
    /// RAW(size).
    Raw { max_size: u32 },
    /// ROWID / UROWID.
    RowId,
    /// LONG - legacy large text type.
    Long,
    /// LONG RAW - legacy large binary type.
    LongRaw,
    /// CLOB - Character Large Object.
    Clob,
    /// NCLOB - National Character Large Object.
    Nclob,
    /// BLOB - Binary Large Object.
    Blob,
    /// BFILE - external binary file locator.
    BFile,
    /// Anything the driver reports that has no dedicated variant.
    Other(String),
}

impl OracleType {
    /// Whether values of this type arrive as a large-object handle.
    pub fn is_lob(&self) -> bool {
        matches!(
            self,
            OracleType::Clob | OracleType::Nclob | OracleType::Blob | OracleType::BFile
        )
    }

    /// Get precision (for Number types, 0 otherwise).
    pub fn precision(&self) -> i16 {
        match self {
            OracleType::Number { precision, .. } => *precision,
            _ => 0,
        }
    }

    /// Get scale (for Number types, 0 otherwise).
    pub fn scale(&self) -> i8 {
        match self {
            OracleType::Number { scale, .. } => *scale,
            _ => 0,
        }
    }

    /// Get max_size (for sized types, 0 otherwise).
    pub fn max_size(&self) -> u32 {
        match self {
            OracleType::Varchar2 { max_size }
            | OracleType::Nvarchar2 { max_size }
            | OracleType::Char { max_size }
            | OracleType::Nchar { max_size }
            | OracleType::Raw { max_size } => *max_size,
            _ => 0,
        }
    }
}

impl std::fmt::Display for OracleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleType::Varchar2 { max_size } => write!(f, "VARCHAR2({})", max_size),
            OracleType::Nvarchar2 { max_size } => write!(f, "NVARCHAR2({})", max_size),
            OracleType::Char { max_size } => write!(f, "CHAR({})", max_size),
            OracleType::Nchar { max_size } => write!(f, "NCHAR({})", max_size),
            OracleType::Number { precision, scale } => {
                if *precision == 0 && *scale == 0 {
                    write!(f, "NUMBER")
                } else if *scale == 0 {
                    write!(f, "NUMBER({})", precision)
                } else {
                    write!(f, "NUMBER({},{})", precision, scale)
                }
            }
            OracleType::BinaryFloat => write!(f, "BINARY_FLOAT"),
            OracleType::BinaryDouble => write!(f, "BINARY_DOUBLE"),
            OracleType::Date => write!(f, "DATE"),
            OracleType::Timestamp => write!(f, "TIMESTAMP"),
            OracleType::Raw { max_size } => write!(f, "RAW({})", max_size),
            OracleType::RowId => write!(f, "ROWID"),
            OracleType::Long => write!(f, "LONG"),
            OracleType::LongRaw => write!(f, "LONG RAW"),
            OracleType::Clob => write!(f, "CLOB"),
            OracleType::Nclob => write!(f, "NCLOB"),
            OracleType::Blob => write!(f, "BLOB"),
            OracleType::BFile => write!(f, "BFILE"),
            OracleType::Other(name) => write!(f, "{}", name),
        }
    }
}
