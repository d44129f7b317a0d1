//! The seam between `Db` and an Oracle client library.
//!
//! A driver supplies three layers: a [`Connector`] that opens sessions from
//! credentials, a [`Connection`] that hands out cursors, and a [`Cursor`] that
//! executes one statement and fetches its rows. Large-object columns come back
//! as [`LobReader`](crate::LobReader) handles inside [`Fetched`] cells.
//!
//! # Example
//!
//! ```
//! use oracle_select::{Binds, ColumnMetadata, Connection, Connector, Credentials, Cursor, Fetched, Result};
//!
//! struct Dual;
//! struct DualConn;
//! struct DualCursor(Vec<ColumnMetadata>);
//!
//! impl Connector for Dual {
//!     type Connection = DualConn;
//!     fn connect(&self, _: &Credentials) -> Result<DualConn> {
//!         Ok(DualConn)
//!     }
//! }
//!
//! impl Connection for DualConn {
//!     type Cursor<'conn> = DualCursor;
//!     fn cursor(&mut self) -> Result<DualCursor> {
//!         Ok(DualCursor(Vec::new()))
//!     }
//!     fn close(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! impl Cursor for DualCursor {
//!     fn execute(&mut self, _: &str, _: &Binds) -> Result<()> {
//!         Ok(())
//!     }
//!     fn description(&self) -> &[ColumnMetadata] {
//!         &self.0
//!     }
//!     fn fetch_many(&mut self, _: usize) -> Result<Vec<Vec<Fetched>>> {
//!         Ok(Vec::new())
//!     }
//!     fn fetch_all(&mut self) -> Result<Vec<Vec<Fetched>>> {
//!         Ok(Vec::new())
//!     }
//!     fn close(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let db = oracle_select::Db::with_connector(Credentials::new("u", "p", "h"), Dual);
//! assert!(db.select("SELECT * FROM DUAL WHERE 1 = 0", (), 0)?.is_empty());
//! # Ok::<(), oracle_select::Error>(())
//! ```

use std::sync::Arc;

use crate::binds::Binds;
use crate::config::Credentials;
use crate::error::Result;
use crate::types::{ColumnMetadata, Fetched};

/// Opens sessions.
pub trait Connector {
    /// Session type produced by this connector.
    type Connection: Connection;

    /// Open a new session with the given credentials.
    fn connect(&self, credentials: &Credentials) -> Result<Self::Connection>;
}

impl<C: Connector + ?Sized> Connector for &C {
    type Connection = C::Connection;

    fn connect(&self, credentials: &Credentials) -> Result<Self::Connection> {
        (**self).connect(credentials)
    }
}

impl<C: Connector + ?Sized> Connector for Arc<C> {
    type Connection = C::Connection;

    fn connect(&self, credentials: &Credentials) -> Result<Self::Connection> {
        (**self).connect(credentials)
    }
}

/// An open session.
///
/// A cursor borrows its connection mutably, so only one cursor is active per
/// connection at a time.
pub trait Connection {
    /// Cursor type, borrowing this connection.
    type Cursor<'conn>: Cursor
    where
        Self: 'conn;

    /// Create a cursor.
    fn cursor(&mut self) -> Result<Self::Cursor<'_>>;

    /// Close the session and release server resources.
    fn close(&mut self) -> Result<()>;
}

/// Executes one statement and fetches its rows.
pub trait Cursor {
    /// Prepare and execute `sql`. `Binds::None` means no parameters.
    fn execute(&mut self, sql: &str, binds: &Binds) -> Result<()>;

    /// Column descriptors of the executed query.
    ///
    /// Drivers that describe lazily must have this filled in by the time a
    /// fetch returns.
    fn description(&self) -> &[ColumnMetadata];

    /// Fetch up to `size` rows.
    fn fetch_many(&mut self, size: usize) -> Result<Vec<Vec<Fetched>>>;

    /// Fetch all remaining rows.
    fn fetch_all(&mut self) -> Result<Vec<Vec<Fetched>>>;

    /// Close the cursor.
    fn close(&mut self) -> Result<()>;
}
