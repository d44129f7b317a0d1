//! Polling PeopleSoft Process Scheduler requests until they finish.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use tracing::info;

use crate::db::Db;
use crate::driver::Connector;
use crate::error::{Error, Result};
use crate::format::format_list;
use crate::types::{Row, Value};

const PROCESS_LIST_SQL: &str = "
    select
        prcsinstance,
        prcsname,
        prcstype,
        runcntlid,
        runstatus,
        begindttm,
        enddttm
    from ps_pmn_prcslist
    where
        prcsinstance in ({})
    order by prcsinstance";

/// RUNSTATUS codes of requests that are still in flight.
const WORKING_STATUSES: [i64; 8] = [5, 6, 7, 11, 14, 15, 16, 18];
/// RUNSTATUS codes of requests that completed successfully.
const COMPLETE_STATUSES: [i64; 1] = [9];

/// Polling cadence and deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Delay between polls (default: 5 seconds).
    pub freq: Duration,
    /// Give up after this long (default: 4 hours).
    pub timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            freq: Duration::from_secs(5),
            timeout: Duration::from_secs(60 * 60 * 4),
        }
    }
}

impl MonitorConfig {
    /// Set the delay between polls.
    pub fn with_freq(mut self, freq: Duration) -> Self {
        self.freq = freq;
        self
    }

    /// Set the overall deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Coarse state of one scheduler request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Finished,
    Working,
    Failed,
}

impl RunStatus {
    /// Classify a RUNSTATUS code.
    pub fn from_code(code: i64) -> Self {
        if COMPLETE_STATUSES.contains(&code) {
            RunStatus::Finished
        } else if WORKING_STATUSES.contains(&code) {
            RunStatus::Working
        } else {
            RunStatus::Failed
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Finished => write!(f, "Finished"),
            RunStatus::Working => write!(f, "Working"),
            RunStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// One row of `PS_PMN_PRCSLIST` with its classified status.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRecord {
    /// The row as selected.
    pub row: Row,
    /// Status derived from RUNSTATUS.
    pub status: RunStatus,
}

impl ProcessRecord {
    fn from_row(row: Row) -> Result<Self> {
        let code = row
            .get_ignore_case("runstatus")
            .and_then(Value::to_i64)
            .ok_or_else(|| Error::MonitorInconsistent {
                message: format!("missing or non-numeric RUNSTATUS in {:?}", row),
            })?;
        Ok(Self {
            row,
            status: RunStatus::from_code(code),
        })
    }

    /// The process instance number, as rendered by the driver.
    pub fn instance(&self) -> String {
        self.row
            .get_ignore_case("prcsinstance")
            .map(Value::to_string)
            .unwrap_or_default()
    }
}

type Callback<'a> = Box<dyn FnMut(&[ProcessRecord]) + 'a>;

/// Watches a set of process instances until they all finish, one fails, or
/// the deadline passes.
///
/// # Example
///
/// ```ignore
/// use oracle_select::{MonitorConfig, OracleDb, ProcessMonitor, Value};
/// use std::time::Duration;
///
/// let db = OracleDb::new("sysadm", "secret", "psdb:1521/HRPRD");
/// let finished = ProcessMonitor::new(&db)
///     .config(MonitorConfig::default().with_freq(Duration::from_secs(10)))
///     .on_failure(|procs| eprintln!("{} processes, at least one failed", procs.len()))
///     .run(&[Value::from(123456), Value::from(123457)])?;
/// ```
pub struct ProcessMonitor<'a, C> {
    db: &'a Db<C>,
    config: MonitorConfig,
    on_success: Option<Callback<'a>>,
    on_failure: Option<Callback<'a>>,
}

impl<'a, C: Connector> ProcessMonitor<'a, C> {
    /// Create a monitor with the default cadence.
    pub fn new(db: &'a Db<C>) -> Self {
        Self {
            db,
            config: MonitorConfig::default(),
            on_success: None,
            on_failure: None,
        }
    }

    /// Replace the polling configuration.
    pub fn config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Called with every record once all processes finished.
    pub fn on_success(mut self, callback: impl FnMut(&[ProcessRecord]) + 'a) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Called with every record when any process failed.
    pub fn on_failure(mut self, callback: impl FnMut(&[ProcessRecord]) + 'a) -> Self {
        self.on_failure = Some(Box::new(callback));
        self
    }

    /// Poll until done.
    ///
    /// Process instances are compared as strings, so numbers and text work
    /// alike.
    pub fn run(&mut self, processes: &[Value]) -> Result<Vec<ProcessRecord>> {
        if processes.is_empty() {
            return Err(Error::MonitorInconsistent {
                message: "no process instances to monitor".to_string(),
            });
        }
        let instances: Vec<Value> = processes
            .iter()
            .map(|p| Value::String(p.to_string()))
            .collect();
        let sql = PROCESS_LIST_SQL.replace("{}", &format_list(&instances, false)?);
        let start = Instant::now();

        while start.elapsed() <= self.config.timeout {
            let records = self
                .db
                .select(&sql, (), 0)?
                .into_iter()
                .map(ProcessRecord::from_row)
                .collect::<Result<Vec<_>>>()?;

            if records.is_empty() {
                return Err(Error::MonitorInconsistent {
                    message: "no matching process instances".to_string(),
                });
            }

            if records.iter().all(|r| r.status == RunStatus::Finished) {
                info!(processes = records.len(), "{}", RunStatus::Finished);
                if let Some(callback) = self.on_success.as_mut() {
                    callback(&records);
                }
                return Ok(records);
            }

            if records.iter().any(|r| r.status == RunStatus::Failed) {
                info!(processes = records.len(), "{}", RunStatus::Failed);
                if let Some(callback) = self.on_failure.as_mut() {
                    callback(&records);
                }
                let failed = records
                    .iter()
                    .filter(|r| r.status == RunStatus::Failed)
                    .map(ProcessRecord::instance)
                    .collect();
                return Err(Error::ProcessFailed { instances: failed });
            }

            let working = records
                .iter()
                .filter(|r| r.status == RunStatus::Working)
                .count();
            info!(processes = records.len(), working, "{}", RunStatus::Working);
            thread::sleep(self.config.freq);
        }

        Err(Error::MonitorTimeout {
            timeout: self.config.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_classification() {
        assert_eq!(RunStatus::from_code(9), RunStatus::Finished);
        for code in WORKING_STATUSES {
            assert_eq!(RunStatus::from_code(code), RunStatus::Working);
        }
        assert_eq!(RunStatus::from_code(3), RunStatus::Failed);
        assert_eq!(RunStatus::from_code(8), RunStatus::Failed);
        assert_eq!(RunStatus::from_code(10), RunStatus::Failed);
    }

    #[test]
    fn test_record_parses_text_status() {
        let row = Row::from_pairs([
            ("PRCSINSTANCE", Value::from(42)),
            ("RUNSTATUS", Value::from("9")),
        ]);
        let record = ProcessRecord::from_row(row).unwrap();
        assert_eq!(record.status, RunStatus::Finished);
        assert_eq!(record.instance(), "42");
    }

    #[test]
    fn test_record_without_status() {
        let row = Row::from_pairs([("PRCSINSTANCE", Value::from(42))]);
        assert!(matches!(
            ProcessRecord::from_row(row),
            Err(Error::MonitorInconsistent { .. })
        ));
    }

    #[test]
    fn test_default_config() {
        let config = MonitorConfig::default();
        assert_eq!(config.freq, Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(14400));
        let config = config.with_freq(Duration::ZERO);
        assert_eq!(config.freq, Duration::ZERO);
    }
}
