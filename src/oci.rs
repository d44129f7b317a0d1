//! Blocking OCI driver built on the `sibyl` crate.
//!
//! Requires the Oracle client libraries (Instant Client) at link time and at
//! run time. Sessions borrow the OCI environment, which is created once per
//! process and kept in a static.

use chrono::NaiveDateTime;
use once_cell::sync::OnceCell;
use sibyl::{ColumnType, Environment, Session, ToSql};
use tracing::debug;

use crate::binds::Binds;
use crate::config::Credentials;
use crate::driver::{Connection, Connector, Cursor};
use crate::error::{Error, Result};
use crate::materialize::Conversion;
use crate::types::{ColumnMetadata, Fetched, LobValue, OracleType, Value};

/// `Db` backed by OCI through `sibyl`.
pub type OracleDb = crate::Db<SibylConnector>;

fn oci_env() -> Result<&'static Environment> {
    static OCI_ENV: OnceCell<Environment> = OnceCell::new();
    OCI_ENV.get_or_try_init(sibyl::env).map_err(from_sibyl)
}

fn from_sibyl(err: sibyl::Error) -> Error {
    match err {
        sibyl::Error::Oracle(code, message) => Error::oracle(code.unsigned_abs(), message),
        other => Error::driver(other.to_string()),
    }
}

/// Opens OCI sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SibylConnector;

impl Connector for SibylConnector {
    type Connection = SibylConnection;

    fn connect(&self, credentials: &Credentials) -> Result<SibylConnection> {
        let env = oci_env()?;
        let session = env
            .connect(&credentials.host, &credentials.username, &credentials.password)
            .map_err(from_sibyl)?;
        Ok(SibylConnection {
            session: Some(session),
        })
    }
}

/// An OCI user session. Closing drops the session, which logs off.
pub struct SibylConnection {
    session: Option<Session<'static>>,
}

impl Connection for SibylConnection {
    type Cursor<'conn> = SibylCursor<'conn>;

    fn cursor(&mut self) -> Result<SibylCursor<'_>> {
        let session = self.session.as_ref().ok_or(Error::ConnectionClosed)?;
        Ok(SibylCursor {
            session,
            pending: None,
            columns: Vec::new(),
        })
    }

    fn close(&mut self) -> Result<()> {
        if self.session.take().is_some() {
            debug!("OCI session released");
        }
        Ok(())
    }
}

/// OCI statements borrow their result buffers, so the statement is prepared
/// and run when rows are fetched, and every cell (LOBs included) is copied
/// out before the statement goes away.
pub struct SibylCursor<'conn> {
    session: &'conn Session<'static>,
    pending: Option<(String, Binds)>,
    columns: Vec<ColumnMetadata>,
}

impl Cursor for SibylCursor<'_> {
    fn execute(&mut self, sql: &str, binds: &Binds) -> Result<()> {
        self.pending = Some((sql.to_string(), binds.clone()));
        Ok(())
    }

    fn description(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    fn fetch_many(&mut self, size: usize) -> Result<Vec<Vec<Fetched>>> {
        self.run(Some(size))
    }

    fn fetch_all(&mut self) -> Result<Vec<Vec<Fetched>>> {
        self.run(None)
    }

    fn close(&mut self) -> Result<()> {
        self.pending = None;
        Ok(())
    }
}

impl SibylCursor<'_> {
    fn run(&mut self, limit: Option<usize>) -> Result<Vec<Vec<Fetched>>> {
        let (sql, binds) = self
            .pending
            .take()
            .ok_or_else(|| Error::driver("fetch called before execute"))?;

        let stmt = self.session.prepare(&sql).map_err(from_sibyl)?;
        if let Some(size) = limit {
            stmt.set_prefetch_rows(size.min(u32::MAX as usize) as u32)
                .map_err(from_sibyl)?;
        }

        let names = bind_names(&binds);
        let mut storage = bind_storage(&binds, &names);
        let args: Vec<&mut dyn ToSql> = storage
            .iter_mut()
            .map(|arg| arg.as_mut() as &mut dyn ToSql)
            .collect();
        let rows = stmt.query(args).map_err(from_sibyl)?;

        let column_count = stmt.column_count().map_err(from_sibyl)?;
        let mut columns = Vec::with_capacity(column_count);
        for pos in 0..column_count {
            let info = stmt
                .column(pos)
                .ok_or_else(|| Error::driver(format!("no metadata for column {}", pos)))?;
            let data_type = oracle_type(
                info.data_type().map_err(from_sibyl)?,
                info.precision().map_err(from_sibyl)?,
                info.scale().map_err(from_sibyl)?,
            );
            let mut meta = ColumnMetadata::new(info.name().map_err(from_sibyl)?, data_type);
            meta.nullable = info.is_null().map_err(from_sibyl)?;
            columns.push(meta);
        }

        let mut fetched = Vec::new();
        while limit.map_or(true, |n| fetched.len() < n) {
            let row = match rows.next().map_err(from_sibyl)? {
                Some(row) => row,
                None => break,
            };
            let cells = columns
                .iter()
                .enumerate()
                .map(|(pos, col)| read_cell(&row, pos, &col.data_type))
                .collect::<Result<Vec<_>>>()?;
            fetched.push(cells);
        }

        self.columns = columns;
        Ok(fetched)
    }
}

/// Placeholder names for named binds, in bind order. sibyl matches them
/// as `":NAME"`.
fn bind_names(binds: &Binds) -> Vec<String> {
    match binds {
        Binds::Named(pairs) => pairs.iter().map(|(name, _)| format!(":{}", name)).collect(),
        _ => Vec::new(),
    }
}

/// Bind arguments borrowing from `binds`; named arguments also borrow their
/// placeholder from `names`.
fn bind_storage<'a>(binds: &'a Binds, names: &'a [String]) -> Vec<Box<dyn ToSql + 'a>> {
    match binds {
        Binds::None => Vec::new(),
        Binds::Positional(values) => values.iter().map(positional_arg).collect(),
        Binds::Named(pairs) => pairs
            .iter()
            .zip(names)
            .map(|((_, value), name)| named_arg(name.as_str(), value))
            .collect(),
    }
}

fn positional_arg(value: &Value) -> Box<dyn ToSql + '_> {
    match value {
        Value::Null => Box::new(None::<String>),
        Value::Integer(i) => Box::new(*i),
        Value::Float(f) => Box::new(*f),
        Value::Number(n) | Value::String(n) => Box::new(n.as_str()),
        Value::Bytes(b) => Box::new(b.as_slice()),
        Value::Date(dt) => Box::new(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
    }
}

fn named_arg<'a>(name: &'a str, value: &'a Value) -> Box<dyn ToSql + 'a> {
    match value {
        Value::Null => Box::new((name, None::<String>)),
        Value::Integer(i) => Box::new((name, *i)),
        Value::Float(f) => Box::new((name, *f)),
        Value::Number(n) | Value::String(n) => Box::new((name, n.as_str())),
        Value::Bytes(b) => Box::new((name, b.as_slice())),
        Value::Date(dt) => Box::new((name, dt.format("%Y-%m-%d %H:%M:%S").to_string())),
    }
}

fn oracle_type(column_type: ColumnType, precision: i16, scale: i8) -> OracleType {
    match column_type {
        ColumnType::Char => OracleType::Char { max_size: 0 },
        ColumnType::NChar => OracleType::Nchar { max_size: 0 },
        ColumnType::Varchar => OracleType::Varchar2 { max_size: 0 },
        ColumnType::NVarchar => OracleType::Nvarchar2 { max_size: 0 },
        ColumnType::Number => OracleType::Number { precision, scale },
        ColumnType::BinaryFloat => OracleType::BinaryFloat,
        ColumnType::BinaryDouble => OracleType::BinaryDouble,
        ColumnType::Date => OracleType::Date,
        ColumnType::Timestamp => OracleType::Timestamp,
        ColumnType::Raw => OracleType::Raw { max_size: 0 },
        ColumnType::RowID => OracleType::RowId,
        ColumnType::Long => OracleType::Long,
        ColumnType::LongRaw => OracleType::LongRaw,
        ColumnType::Clob => OracleType::Clob,
        ColumnType::NClob => OracleType::Nclob,
        ColumnType::Blob => OracleType::Blob,
        other => OracleType::Other(other.to_string()),
    }
}

/// sibyl has no column type for BFILE and reports it as UNKNOWN.
const UNDECODED_TYPE: &str = "UNKNOWN";

/// BFILE contents, copied out while the file is open.
fn read_bfile(row: &sibyl::Row, pos: usize) -> Result<Value> {
    let file = match row.get::<Option<sibyl::BFile>, _>(pos) {
        Ok(Some(file)) => file,
        Ok(None) => return Ok(Value::Null),
        Err(err) => {
            return Err(Error::driver(format!(
                "column {} has an unsupported type: {}",
                pos, err
            )))
        }
    };
    file.open_file().map_err(from_sibyl)?;
    let read = file.len().and_then(|len| {
        let mut data = Vec::new();
        file.read(0, len, &mut data).map(|_| data)
    });
    let closed = file.close_file();
    let data = read.map_err(from_sibyl)?;
    closed.map_err(from_sibyl)?;
    Ok(Value::Bytes(data))
}

fn read_cell(row: &sibyl::Row, pos: usize, data_type: &OracleType) -> Result<Fetched> {
    if row.is_null(pos) {
        return Ok(Fetched::Value(Value::Null));
    }
    let cell = match (Conversion::for_type(data_type), data_type) {
        (Conversion::Text, OracleType::Clob | OracleType::Nclob) => {
            match row.get::<Option<sibyl::CLOB>, _>(pos).map_err(from_sibyl)? {
                Some(lob) => {
                    let len = lob.len().map_err(from_sibyl)?;
                    let mut text = String::new();
                    lob.read(0, len, &mut text).map_err(from_sibyl)?;
                    Fetched::lob(LobValue::text(text))
                }
                None => Fetched::Value(Value::Null),
            }
        }
        (Conversion::Bytes, OracleType::Blob) => {
            match row.get::<Option<sibyl::BLOB>, _>(pos).map_err(from_sibyl)? {
                Some(lob) => {
                    let len = lob.len().map_err(from_sibyl)?;
                    let mut data = Vec::new();
                    lob.read(0, len, &mut data).map_err(from_sibyl)?;
                    Fetched::lob(LobValue::binary(data))
                }
                None => Fetched::Value(Value::Null),
            }
        }
        (_, OracleType::Raw { .. } | OracleType::LongRaw) => {
            let data = row.get::<Option<&[u8]>, _>(pos).map_err(from_sibyl)?;
            Fetched::Value(data.map(<[u8]>::to_vec).into())
        }
        (_, OracleType::Number { precision, scale }) if *scale == 0 && (1..=18).contains(precision) => {
            Fetched::Value(row.get::<Option<i64>, _>(pos).map_err(from_sibyl)?.into())
        }
        (_, OracleType::Number { .. }) => {
            match row.get::<Option<sibyl::Number>, _>(pos).map_err(from_sibyl)? {
                Some(num) => Fetched::Value(Value::Number(num.to_string("TM").map_err(from_sibyl)?)),
                None => Fetched::Value(Value::Null),
            }
        }
        (_, OracleType::BinaryFloat | OracleType::BinaryDouble) => {
            Fetched::Value(row.get::<Option<f64>, _>(pos).map_err(from_sibyl)?.into())
        }
        (_, OracleType::Date) => match row.get::<Option<sibyl::Date>, _>(pos).map_err(from_sibyl)? {
            Some(date) => {
                let text = date.to_string("YYYY-MM-DD HH24:MI:SS").map_err(from_sibyl)?;
                Fetched::Value(Value::Date(parse_datetime(&text)?))
            }
            None => Fetched::Value(Value::Null),
        },
        (_, OracleType::Timestamp) => {
            match row.get::<Option<sibyl::Timestamp>, _>(pos).map_err(from_sibyl)? {
                Some(ts) => {
                    let text = ts
                        .to_string("YYYY-MM-DD HH24:MI:SS.FF", 6)
                        .map_err(from_sibyl)?;
                    Fetched::Value(Value::Date(parse_datetime(&text)?))
                }
                None => Fetched::Value(Value::Null),
            }
        }
        (_, OracleType::Other(name)) if name == UNDECODED_TYPE => {
            Fetched::Value(read_bfile(row, pos)?)
        }
        _ => Fetched::Value(row.get::<Option<String>, _>(pos).map_err(from_sibyl)?.into()),
    };
    Ok(cell)
}

fn parse_datetime(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .map_err(|e| Error::type_conversion(format!("invalid datetime '{}': {}", text, e)))
}
