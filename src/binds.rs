//! Bind parameters for a statement.

use std::collections::{BTreeMap, HashMap};

use crate::types::Value;

/// Values substituted for placeholders at execution time.
///
/// Named binds match `:name` placeholders; positional binds match `:1`,
/// `:2`, ... in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Binds {
    /// No parameters.
    #[default]
    None,
    /// Named parameters, in the order given.
    Named(Vec<(String, Value)>),
    /// Positional parameters.
    Positional(Vec<Value>),
}

impl Binds {
    /// Named binds from `(name, value)` pairs.
    ///
    /// A leading `:` on a name is dropped, so `":id"` and `"id"` are the same
    /// bind.
    pub fn named<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Binds::Named(
            pairs
                .into_iter()
                .map(|(k, v)| {
                    let name: String = k.into();
                    let name = match name.strip_prefix(':') {
                        Some(stripped) => stripped.to_string(),
                        None => name,
                    };
                    (name, v.into())
                })
                .collect(),
        )
    }

    /// Positional binds.
    pub fn positional<V, I>(values: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Binds::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Number of bind values.
    pub fn len(&self) -> usize {
        match self {
            Binds::None => 0,
            Binds::Named(pairs) => pairs.len(),
            Binds::Positional(values) => values.len(),
        }
    }

    /// True when there is nothing to bind.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty mappings and sequences mean the same thing as no binds.
    pub(crate) fn normalized(self) -> Self {
        if self.is_empty() {
            Binds::None
        } else {
            self
        }
    }

    /// Look up a named bind (case-insensitive, as Oracle placeholders are).
    pub fn get(&self, name: &str) -> Option<&Value> {
        let name = name.strip_prefix(':').unwrap_or(name);
        match self {
            Binds::Named(pairs) => pairs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<()> for Binds {
    fn from(_: ()) -> Self {
        Binds::None
    }
}

impl<T: Into<Binds>> From<Option<T>> for Binds {
    fn from(binds: Option<T>) -> Self {
        binds.map_or(Binds::None, Into::into)
    }
}

impl From<Vec<Value>> for Binds {
    fn from(values: Vec<Value>) -> Self {
        Binds::Positional(values)
    }
}

impl From<&[Value]> for Binds {
    fn from(values: &[Value]) -> Self {
        Binds::Positional(values.to_vec())
    }
}

impl<const N: usize> From<[Value; N]> for Binds {
    fn from(values: [Value; N]) -> Self {
        Binds::Positional(values.into())
    }
}

impl From<Vec<(String, Value)>> for Binds {
    fn from(pairs: Vec<(String, Value)>) -> Self {
        Binds::named(pairs)
    }
}

impl<const N: usize> From<[(&str, Value); N]> for Binds {
    fn from(pairs: [(&str, Value); N]) -> Self {
        Binds::named(pairs)
    }
}

impl From<HashMap<String, Value>> for Binds {
    fn from(map: HashMap<String, Value>) -> Self {
        let mut pairs: Vec<(String, Value)> = map.into_iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        Binds::named(pairs)
    }
}

impl From<BTreeMap<String, Value>> for Binds {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Binds::named(map)
    }
}
