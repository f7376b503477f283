//! Engine serving counts and searches from a precomputed JSON snapshot.
//!
//! The snapshot holds flat records per scope:
//!
//! ```json
//! {
//!   "journal": [{"issn": "0034-8910", "collection": "scl", "status": "current"}],
//!   "article": [{"pid": "S0034-89102010000100001", "languages": ["pt", "en"]}]
//! }
//! ```
//!
//! Field values may be strings, numbers, booleans, or arrays of those. A scope
//! absent from the file is reported as an unavailable index.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use pubstats_types::Filter;

use super::{Buckets, EngineError, StatsEngine};
use crate::registry::{Facet, Scope};

const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 1000;

type Record = Map<String, Value>;

/// Errors raised while loading a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot file could not be read.
    #[error("failed to read snapshot '{path}': {source}")]
    Read {
        /// Snapshot path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The snapshot was not valid JSON of the expected shape.
    #[error("failed to parse snapshot: {source}")]
    Parse {
        /// Underlying decoding error.
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
struct Snapshot {
    journal: Option<Vec<Record>>,
    article: Option<Vec<Record>>,
}

/// Result document of [`SnapshotEngine::search`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHits {
    /// Number of records matching the query, before paging.
    pub total: u64,
    /// Requested page of matching records.
    pub hits: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchBody {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    filters: Option<Filter>,
    #[serde(default)]
    from: usize,
    #[serde(default = "default_page_size")]
    size: usize,
}

const fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// In-memory engine over a snapshot file.
#[derive(Debug, Default)]
pub struct SnapshotEngine {
    snapshot: Snapshot,
}

impl SnapshotEngine {
    /// Engine without any loaded index; every call fails operationally.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads a snapshot from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the file cannot be read or parsed.
    pub fn from_path(path: &Utf8Path) -> Result<Self, SnapshotError> {
        let text = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parses a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Parse`] when the text is not a snapshot.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        let snapshot =
            serde_json::from_str(text).map_err(|source| SnapshotError::Parse { source })?;
        Ok(Self { snapshot })
    }

    fn records(&self, scope: Scope) -> Result<&[Record], EngineError> {
        let records = match scope {
            Scope::Journal => self.snapshot.journal.as_deref(),
            Scope::Article => self.snapshot.article.as_deref(),
        };
        records.ok_or_else(|| {
            let name: &'static str = scope.into();
            EngineError::operational(format!("index '{name}' unavailable"))
        })
    }
}

impl StatsEngine for SnapshotEngine {
    type Document = SearchHits;

    fn aggregate(
        &self,
        scope: Scope,
        facet: Facet,
        filters: Option<&Filter>,
    ) -> Result<Buckets, EngineError> {
        validate_filters(filters)?;
        let records = self.records(scope)?;
        let field = facet.to_string();

        let mut counts: HashMap<String, u64> = HashMap::new();
        for record in records.iter().filter(|record| matches_filters(record, filters)) {
            // A record counts once per distinct value, even when an array
            // field repeats it.
            let values: BTreeSet<String> =
                record.get(&field).map(scalar_values).unwrap_or_default().into_iter().collect();
            for value in values {
                *counts.entry(value).or_default() += 1;
            }
        }

        let mut buckets: Buckets = counts.into_iter().collect();
        buckets.sort_by(|(left_key, left), (right_key, right)| {
            right.cmp(left).then_with(|| left_key.cmp(right_key))
        });
        Ok(buckets)
    }

    fn search(&self, document_type: &str, body: &Value) -> Result<Self::Document, EngineError> {
        let scope: Scope = document_type.parse().map_err(|_| {
            EngineError::invalid_input(format!("unknown document type: {document_type}"))
        })?;
        let search = parse_search_body(body)?;
        validate_filters(search.filters.as_ref())?;
        let records = self.records(scope)?;

        let needle = search.q.as_deref().map(str::to_lowercase).unwrap_or_default();
        let matching: Vec<&Record> = records
            .iter()
            .filter(|record| matches_filters(record, search.filters.as_ref()))
            .filter(|record| matches_text(record, &needle))
            .collect();

        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let hits = matching
            .into_iter()
            .skip(search.from)
            .take(search.size)
            .map(|record| Value::Object(record.clone()))
            .collect();
        Ok(SearchHits { total, hits })
    }
}

fn parse_search_body(body: &Value) -> Result<SearchBody, EngineError> {
    let raw = if body.is_null() {
        Value::Object(Map::new())
    } else {
        body.clone()
    };
    let parsed: SearchBody = serde_json::from_value(raw)
        .map_err(|error| EngineError::invalid_input(format!("invalid query body: {error}")))?;
    if parsed.size > MAX_PAGE_SIZE {
        return Err(EngineError::invalid_input(format!(
            "query size {} exceeds the maximum of {MAX_PAGE_SIZE}",
            parsed.size
        )));
    }
    Ok(parsed)
}

fn validate_filters(filters: Option<&Filter>) -> Result<(), EngineError> {
    let Some(filters) = filters else {
        return Ok(());
    };
    for (key, value) in filters {
        if key.trim().is_empty() {
            return Err(EngineError::invalid_input("filter keys must not be empty"));
        }
        if value.is_empty() {
            return Err(EngineError::invalid_input(format!(
                "filter '{key}' has no values"
            )));
        }
    }
    Ok(())
}

fn matches_filters(record: &Record, filters: Option<&Filter>) -> bool {
    filters.is_none_or(|filters| {
        filters.iter().all(|(key, accepted)| {
            record
                .get(key)
                .is_some_and(|field| scalar_values(field).iter().any(|value| accepted.accepts(value)))
        })
    })
}

fn matches_text(record: &Record, needle: &str) -> bool {
    needle.is_empty()
        || record
            .values()
            .flat_map(scalar_values)
            .any(|value| value.to_lowercase().contains(needle))
}

/// Flattens a field into the textual values it contributes.
fn scalar_values(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => vec![text.clone()],
        Value::Number(number) => vec![number.to_string()],
        Value::Bool(flag) => vec![flag.to_string()],
        Value::Array(items) => items
            .iter()
            .filter(|item| !item.is_array())
            .flat_map(scalar_values)
            .collect(),
        Value::Null | Value::Object(_) => Vec::new(),
    }
}
