//! Data types shared by the driver seam and the result rows.

mod column;
mod lob;
mod oracle_type;
mod row;
mod value;

pub use column::ColumnMetadata;
pub use lob::{Fetched, LobReader, LobValue};
pub use oracle_type::OracleType;
pub use row::Row;
pub use value::Value;
