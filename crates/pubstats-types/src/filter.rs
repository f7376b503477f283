//! Filters narrowing an aggregation or search.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Mapping from filter key to the value or values a record must carry.
///
/// Keys are domain constants owned by the backend. The daemon forwards them
/// untouched, so an unknown key is only rejected if the backend rejects it.
pub type Filter = BTreeMap<String, FilterValue>;

/// Right-hand side of a filter entry.
///
/// On the wire a single value is a JSON string and a set is a JSON array of
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Exactly one accepted value.
    One(String),
    /// Any of several accepted values.
    Many(BTreeSet<String>),
}

impl FilterValue {
    /// Returns `true` when `candidate` is one of the accepted values.
    #[must_use]
    pub fn accepts(&self, candidate: &str) -> bool {
        match self {
            Self::One(value) => value == candidate,
            Self::Many(values) => values.contains(candidate),
        }
    }

    /// Returns `true` when no value would ever be accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(_) => false,
            Self::Many(values) => values.is_empty(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::One(value.to_owned())
    }
}

impl<const N: usize> From<[&str; N]> for FilterValue {
    fn from(values: [&str; N]) -> Self {
        Self::Many(values.iter().map(|value| (*value).to_owned()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_single_and_set_values() {
        let filter: Filter =
            serde_json::from_str(r#"{"collection":"scl","languages":["en","pt"]}"#)
                .expect("decode filter");

        assert_eq!(filter.get("collection"), Some(&FilterValue::from("scl")));
        assert_eq!(filter.get("languages"), Some(&FilterValue::from(["en", "pt"])));
    }

    #[test]
    fn set_accepts_any_member() {
        let value = FilterValue::from(["2001", "2002"]);
        assert!(value.accepts("2002"));
        assert!(!value.accepts("2003"));
    }

    #[test]
    fn empty_set_is_empty() {
        assert!(FilterValue::Many(BTreeSet::new()).is_empty());
        assert!(!FilterValue::from("").is_empty());
    }
}
