//! Oracle SELECT helper
//!
//! A thin layer over an Oracle client library: open a session, run one
//! SELECT with optional binds, read every large object into memory, close the
//! session, and hand back the rows as ordered name-to-value mappings.
//!
//! The client library sits behind the [`Connector`] / [`Connection`] /
//! [`Cursor`] traits. With the `sibyl` feature enabled, [`OracleDb`] uses OCI
//! through the `sibyl` crate.
//!
//! # Example
//!
//! ```ignore
//! use oracle_select::{Binds, OracleDb, Result};
//!
//! fn main() -> Result<()> {
//!     let db = OracleDb::new("hr", "hr", "localhost:1521/FREEPDB1");
//!
//!     // All rows, no binds
//!     let rows = db.select("SELECT * FROM departments", (), 0)?;
//!
//!     // First row only, positional bind
//!     let first = db.select(
//!         "SELECT * FROM employees WHERE department_id = :1",
//!         Binds::positional([50]),
//!         1,
//!     )?;
//!
//!     println!("{} departments, first employee: {:?}", rows.len(), first.first());
//!     Ok(())
//! }
//! ```

pub mod binds;
pub mod config;
pub mod db;
pub mod driver;
pub mod error;
pub mod format;
pub mod materialize;
pub mod monitor;
pub mod types;

#[cfg(feature = "sibyl")]
pub mod oci;

// Re-export main types
pub use binds::Binds;
pub use config::{ColumnCase, Credentials};
pub use db::Db;
pub use driver::{Connection, Connector, Cursor};
pub use error::{Error, Result};
pub use format::{format_list, sql_literal};
pub use materialize::{Conversion, ConversionTable};
pub use monitor::{MonitorConfig, ProcessMonitor, ProcessRecord, RunStatus};
pub use types::{ColumnMetadata, Fetched, LobReader, LobValue, OracleType, Row, Value};

#[cfg(feature = "sibyl")]
pub use oci::{OracleDb, SibylConnector};
