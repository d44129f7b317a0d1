//! High-level query API.

use tracing::{debug, instrument, warn};

use crate::binds::Binds;
use crate::config::{ColumnCase, Credentials};
use crate::driver::{Connection, Connector, Cursor};
use crate::error::Result;
use crate::materialize::ConversionTable;
use crate::types::Row;

/// A database handle: credentials plus the driver used to reach them.
///
/// No session is kept between calls. Each [`select`](Db::select) opens its
/// own connection and closes it before returning, so one `Db` can be shared
/// freely between threads when its connector allows it.
#[derive(Debug, Clone)]
pub struct Db<C> {
    credentials: Credentials,
    connector: C,
    column_case: ColumnCase,
}

impl<C: Connector + Default> Db<C> {
    /// Create a handle using the connector's default configuration.
    ///
    /// Nothing is opened here; the credentials are first used by `select`.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self::with_connector(Credentials::new(username, password, host), C::default())
    }
}

impl<C: Connector> Db<C> {
    /// Create a handle with an explicit connector.
    pub fn with_connector(credentials: Credentials, connector: C) -> Self {
        Self {
            credentials,
            connector,
            column_case: ColumnCase::default(),
        }
    }

    /// Set how column names are keyed in returned rows.
    pub fn with_column_case(mut self, case: ColumnCase) -> Self {
        self.column_case = case;
        self
    }

    /// Get the credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Get the connector.
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Run a query and return its rows.
    ///
    /// * `sql` - the SELECT statement, with `:name` or `:1` placeholders
    /// * `binds` - anything convertible to [`Binds`]; `()` for none. Empty
    ///   binds are treated the same as none.
    /// * `fetch` - maximum number of rows to fetch; 0 fetches all of them
    ///
    /// Large-object columns are read in full before the connection closes.
    /// Driver errors are returned as the driver reported them, after the
    /// connection has been closed.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use oracle_select::{Binds, OracleDb};
    ///
    /// let db = OracleDb::new("hr", "hr", "localhost:1521/FREEPDB1");
    /// let rows = db.select(
    ///     "SELECT employee_id, last_name FROM employees WHERE manager_id = :id",
    ///     Binds::named([("id", 103)]),
    ///     0,
    /// )?;
    /// for row in &rows {
    ///     println!("{:?}", row.get("LAST_NAME"));
    /// }
    /// ```
    #[instrument(level = "debug", skip(self, binds), fields(user = %self.credentials.username, host = %self.credentials.host))]
    pub fn select(&self, sql: &str, binds: impl Into<Binds>, fetch: usize) -> Result<Vec<Row>> {
        let binds = binds.into().normalized();

        let mut conn = ScopedConnection::new(self.connector.connect(&self.credentials)?);
        debug!("connection opened");

        let rows = run_query(conn.get_mut(), sql, &binds, fetch, self.column_case)?;
        conn.close()?;

        debug!(rows = rows.len(), "select complete");
        Ok(rows)
    }
}

/// Execute, fetch and materialize inside a scoped cursor.
fn run_query<K: Connection>(
    conn: &mut K,
    sql: &str,
    binds: &Binds,
    fetch: usize,
    case: ColumnCase,
) -> Result<Vec<Row>> {
    let mut cursor = ScopedCursor::new(conn.cursor()?);
    let cur = cursor.get_mut();

    cur.execute(sql, binds)?;
    let fetched = if fetch > 0 {
        cur.fetch_many(fetch)?
    } else {
        cur.fetch_all()?
    };
    debug!(fetched = fetched.len(), "rows fetched");

    let table = ConversionTable::new(cur.description(), case);
    let rows = table.rows(fetched)?;

    cursor.close()?;
    Ok(rows)
}

/// Closes the wrapped connection exactly once: explicitly via `close`, or on
/// drop when an error unwinds past it.
struct ScopedConnection<K: Connection> {
    inner: K,
    closed: bool,
}

impl<K: Connection> ScopedConnection<K> {
    fn new(inner: K) -> Self {
        Self {
            inner,
            closed: false,
        }
    }

    fn get_mut(&mut self) -> &mut K {
        &mut self.inner
    }

    fn close(mut self) -> Result<()> {
        self.closed = true;
        let result = self.inner.close();
        debug!("connection closed");
        result
    }
}

impl<K: Connection> Drop for ScopedConnection<K> {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            match self.inner.close() {
                Ok(()) => debug!("connection closed after error"),
                Err(e) => warn!(error = %e, "failed to close connection after error"),
            }
        }
    }
}

/// Cursor counterpart of [`ScopedConnection`].
struct ScopedCursor<C: Cursor> {
    inner: C,
    closed: bool,
}

impl<C: Cursor> ScopedCursor<C> {
    fn new(inner: C) -> Self {
        Self {
            inner,
            closed: false,
        }
    }

    fn get_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    fn close(mut self) -> Result<()> {
        self.closed = true;
        self.inner.close()
    }
}

impl<C: Cursor> Drop for ScopedCursor<C> {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Err(e) = self.inner.close() {
                warn!(error = %e, "failed to close cursor after error");
            }
        }
    }
}
