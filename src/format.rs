//! Rendering values as SQL literals.

use crate::error::{Error, Result};
use crate::types::Value;

/// Oracle rejects IN lists with more than this many expressions (ORA-01795).
pub const MAX_IN_LIST_ITEMS: usize = 1000;

/// Render `items` as a comma-separated literal list for a SQL `IN` clause.
///
/// Strings are single-quoted with embedded quotes doubled; numbers are written
/// bare. With `parenthesis` the list is wrapped in `( )`.
///
/// # Example
///
/// ```
/// use oracle_select::{format_list, Value};
///
/// let items = [Value::from("a"), Value::from("b"), Value::from("c")];
/// assert_eq!(format_list(&items, true)?, "('a', 'b', 'c')");
/// assert_eq!(format_list(&items, false)?, "'a', 'b', 'c'");
///
/// let mixed = [Value::from(1), Value::from(2), Value::from(3), Value::from("4")];
/// assert_eq!(format_list(&mixed, true)?, "(1, 2, 3, '4')");
/// # Ok::<(), oracle_select::Error>(())
/// ```
pub fn format_list(items: &[Value], parenthesis: bool) -> Result<String> {
    if items.len() > MAX_IN_LIST_ITEMS {
        return Err(Error::TooManyItems {
            count: items.len(),
            limit: MAX_IN_LIST_ITEMS,
        });
    }
    let formatted = items
        .iter()
        .map(sql_literal)
        .collect::<Vec<_>>()
        .join(", ");
    if parenthesis {
        Ok(format!("({})", formatted))
    } else {
        Ok(formatted)
    }
}

/// Render one value as an Oracle SQL literal.
pub fn sql_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Number(n) => n.clone(),
        Value::String(s) => quote(s),
        Value::Bytes(b) => {
            let hex: String = b.iter().map(|byte| format!("{:02X}", byte)).collect();
            format!("HEXTORAW('{}')", hex)
        }
        Value::Date(dt) => format!(
            "TO_DATE('{}', 'YYYY-MM-DD HH24:MI:SS')",
            dt.format("%Y-%m-%d %H:%M:%S")
        ),
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
