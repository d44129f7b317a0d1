//! In-memory stand-in for an Oracle client library.
//!
//! Every call is recorded so tests can check what the driver saw and that
//! every connection and cursor was closed.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use oracle_select::{
    Binds, ColumnMetadata, Connection, Connector, Credentials, Cursor, Db, Error, Fetched,
    LobReader, OracleType, Result, Value,
};

/// Where the mock should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Connect,
    Cursor,
    Execute,
    Fetch,
    LobRead,
}

/// A cell in the mock table.
#[derive(Debug, Clone)]
pub enum Cell {
    Value(Value),
    Clob(String),
    Blob(Vec<u8>),
}

impl Cell {
    pub fn value(v: impl Into<Value>) -> Self {
        Cell::Value(v.into())
    }
}

/// Everything the mock observed.
#[derive(Debug, Default)]
pub struct Recorded {
    pub connects: usize,
    pub connection_closes: usize,
    pub cursor_closes: usize,
    pub credentials: Vec<Credentials>,
    pub executed: Vec<(String, Binds)>,
    pub fetch_many: Vec<usize>,
    pub fetch_all: usize,
    pub lob_reads: usize,
}

struct Table {
    columns: Vec<ColumnMetadata>,
    rows: Vec<Vec<Cell>>,
    filter_column: Option<String>,
    fail_at: Option<FailAt>,
    error: Error,
}

/// Mock connector. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct MockDriver {
    table: Arc<Mutex<Table>>,
    recorded: Arc<Mutex<Recorded>>,
}

impl MockDriver {
    pub fn new(columns: Vec<ColumnMetadata>) -> Self {
        Self {
            table: Arc::new(Mutex::new(Table {
                columns,
                rows: Vec::new(),
                filter_column: None,
                fail_at: None,
                error: Error::oracle(600, "internal error code"),
            })),
            recorded: Arc::new(Mutex::new(Recorded::default())),
        }
    }

    /// Single NUMBER column `ID` holding `ids`.
    pub fn with_ids(ids: &[i64]) -> Self {
        let driver = Self::new(vec![ColumnMetadata::new(
            "ID",
            OracleType::Number {
                precision: 10,
                scale: 0,
            },
        )]);
        for id in ids {
            driver.push_row(vec![Cell::value(*id)]);
        }
        driver
    }

    pub fn push_row(&self, row: Vec<Cell>) {
        self.table.lock().unwrap().rows.push(row);
    }

    /// Replace all rows.
    pub fn set_rows(&self, rows: Vec<Vec<Cell>>) {
        self.table.lock().unwrap().rows = rows;
    }

    /// When binds are given, keep only rows whose `column` equals the first
    /// bind value.
    pub fn filter_on(self, column: &str) -> Self {
        self.table.lock().unwrap().filter_column = Some(column.to_string());
        self
    }

    pub fn fail_at(self, stage: FailAt, error: Error) -> Self {
        {
            let mut table = self.table.lock().unwrap();
            table.fail_at = Some(stage);
            table.error = error;
        }
        self
    }

    pub fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap()
    }

    pub fn db(&self) -> Db<MockDriver> {
        Db::with_connector(Credentials::new("scott", "tiger", "mockhost:1521/MOCK"), self.clone())
    }

    fn check(&self, stage: FailAt) -> Result<()> {
        let table = self.table.lock().unwrap();
        if table.fail_at == Some(stage) {
            Err(table.error.clone())
        } else {
            Ok(())
        }
    }
}

impl Connector for MockDriver {
    type Connection = MockConnection;

    fn connect(&self, credentials: &Credentials) -> Result<MockConnection> {
        {
            let mut rec = self.recorded();
            rec.connects += 1;
            rec.credentials.push(credentials.clone());
        }
        self.check(FailAt::Connect)?;
        Ok(MockConnection {
            driver: self.clone(),
            alive: Arc::new(AtomicBool::new(true)),
        })
    }
}

pub struct MockConnection {
    driver: MockDriver,
    alive: Arc<AtomicBool>,
}

impl Connection for MockConnection {
    type Cursor<'conn> = MockCursor<'conn>;

    fn cursor(&mut self) -> Result<MockCursor<'_>> {
        if !self.alive.load(Ordering::SeqCst) {
            return Err(Error::ConnectionClosed);
        }
        self.driver.check(FailAt::Cursor)?;
        Ok(MockCursor {
            conn: self,
            columns: Vec::new(),
            pending: Vec::new(),
        })
    }

    fn close(&mut self) -> Result<()> {
        self.alive.store(false, Ordering::SeqCst);
        self.driver.recorded().connection_closes += 1;
        Ok(())
    }
}

pub struct MockCursor<'conn> {
    conn: &'conn MockConnection,
    columns: Vec<ColumnMetadata>,
    pending: Vec<Vec<Cell>>,
}

impl MockCursor<'_> {
    fn to_fetched(&self, row: Vec<Cell>) -> Vec<Fetched> {
        row.into_iter()
            .map(|cell| match cell {
                Cell::Value(v) => Fetched::Value(v),
                Cell::Clob(text) => Fetched::lob(MockLob {
                    data: text.into_bytes(),
                    alive: Arc::clone(&self.conn.alive),
                    driver: self.conn.driver.clone(),
                }),
                Cell::Blob(data) => Fetched::lob(MockLob {
                    data,
                    alive: Arc::clone(&self.conn.alive),
                    driver: self.conn.driver.clone(),
                }),
            })
            .collect()
    }
}

impl Cursor for MockCursor<'_> {
    fn execute(&mut self, sql: &str, binds: &Binds) -> Result<()> {
        let driver = &self.conn.driver;
        driver
            .recorded()
            .executed
            .push((sql.to_string(), binds.clone()));
        driver.check(FailAt::Execute)?;

        let table = driver.table.lock().unwrap();
        self.columns = table.columns.clone();
        let key = match (&table.filter_column, binds) {
            (Some(column), Binds::Named(_)) => binds.get(column).cloned().map(|v| (column.clone(), v)),
            (Some(column), Binds::Positional(values)) => {
                values.first().cloned().map(|v| (column.clone(), v))
            }
            _ => None,
        };
        let index_of = |name: &str| {
            table
                .columns
                .iter()
                .position(|c| c.name.eq_ignore_ascii_case(name))
        };
        self.pending = table
            .rows
            .iter()
            .filter(|row| match &key {
                Some((column, wanted)) => index_of(column)
                    .and_then(|idx| row.get(idx))
                    .map_or(false, |cell| matches!(cell, Cell::Value(v) if v == wanted)),
                None => true,
            })
            .cloned()
            .collect();
        Ok(())
    }

    fn description(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    fn fetch_many(&mut self, size: usize) -> Result<Vec<Vec<Fetched>>> {
        self.conn.driver.recorded().fetch_many.push(size);
        self.conn.driver.check(FailAt::Fetch)?;
        let take = size.min(self.pending.len());
        let rows: Vec<Vec<Cell>> = self.pending.drain(..take).collect();
        Ok(rows.into_iter().map(|row| self.to_fetched(row)).collect())
    }

    fn fetch_all(&mut self) -> Result<Vec<Vec<Fetched>>> {
        self.conn.driver.recorded().fetch_all += 1;
        self.conn.driver.check(FailAt::Fetch)?;
        let rows = std::mem::take(&mut self.pending);
        Ok(rows.into_iter().map(|row| self.to_fetched(row)).collect())
    }

    fn close(&mut self) -> Result<()> {
        self.pending.clear();
        self.conn.driver.recorded().cursor_closes += 1;
        Ok(())
    }
}

/// LOB handle that is only readable while its connection is open.
pub struct MockLob {
    data: Vec<u8>,
    alive: Arc<AtomicBool>,
    driver: MockDriver,
}

impl MockLob {
    fn read(&mut self) -> Result<Vec<u8>> {
        if !self.alive.load(Ordering::SeqCst) {
            return Err(Error::ConnectionClosed);
        }
        self.driver.recorded().lob_reads += 1;
        self.driver.check(FailAt::LobRead)?;
        Ok(self.data.clone())
    }
}

impl LobReader for MockLob {
    fn size(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }

    fn read_text(&mut self) -> Result<String> {
        let data = self.read()?;
        String::from_utf8(data).map_err(|e| Error::type_conversion(e.to_string()))
    }

    fn read_bytes(&mut self) -> Result<Vec<u8>> {
        self.read()
    }
}
