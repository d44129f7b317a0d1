//! Connection credentials and per-instance options.

use std::fmt;

/// Everything needed to open a session.
///
/// `host` is handed to the driver untouched, so it may be an EZConnect string
/// (`host:port/service`), a TNS alias, or a full connect descriptor.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Database username.
    pub username: String,
    /// Database password.
    pub password: String,
    /// Connect string identifying the database.
    pub host: String,
}

impl Credentials {
    /// Create credentials.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            host: host.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .finish()
    }
}

/// How column names are keyed in returned rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnCase {
    /// Exactly as the driver reports them (Oracle upper-cases unquoted names).
    #[default]
    AsProvided,
    /// Lower-cased.
    Lower,
}

impl ColumnCase {
    pub(crate) fn apply(self, name: &str) -> String {
        match self {
            ColumnCase::AsProvided => name.to_string(),
            ColumnCase::Lower => name.to_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("scott", "tiger", "localhost:1521/FREEPDB1");
        let shown = format!("{:?}", creds);
        assert!(shown.contains("scott"));
        assert!(shown.contains("localhost:1521/FREEPDB1"));
        assert!(!shown.contains("tiger"));
    }

    #[test]
    fn test_column_case() {
        assert_eq!(ColumnCase::default().apply("EMP_ID"), "EMP_ID");
        assert_eq!(ColumnCase::Lower.apply("EMP_ID"), "emp_id");
    }
}
