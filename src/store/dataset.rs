use crate::store::{AnalysisLookup, AnalysisResult, ErrorKind, ErrorRecord, ErrorStore, Severity};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

pub const SCHEMA_VERSION: u32 = 1;

const EMBEDDED_DATASET: &str = include_str!("../../data/dataset.json");

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown schema_version in dataset: {0}")]
    UnknownSchemaVersion(u32),
    #[error("duplicate record id in dataset: {0}")]
    DuplicateId(u32),
}

#[derive(Debug, Deserialize)]
struct DatasetDoc {
    schema_version: u32,
    errors: Vec<RecordDoc>,
    #[serde(default)]
    analyses: BTreeMap<u32, AnalysisResult>,
}

/// Wire form of one record. Timestamps travel as `age_secs` relative to
/// load time and are resolved to concrete instants here.
#[derive(Debug, Deserialize)]
struct RecordDoc {
    id: u32,
    kind: ErrorKind,
    message: String,
    source: String,
    age_secs: i64,
    count: u32,
    severity: Severity,
    stack: String,
    #[serde(default)]
    user_agent: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    status_code: Option<u16>,
}

impl RecordDoc {
    fn into_record(self, loaded_at: DateTime<Utc>) -> ErrorRecord {
        ErrorRecord {
            id: self.id,
            kind: self.kind,
            message: self.message,
            source: self.source,
            timestamp: loaded_at - Duration::seconds(self.age_secs),
            count: self.count,
            severity: self.severity,
            stack: self.stack,
            user_agent: self.user_agent,
            url: self.url,
            endpoint: self.endpoint,
            status_code: self.status_code,
        }
    }
}

/// Load the dataset compiled into the binary. There is no other data feed;
/// every launch starts from the same records.
pub fn load_embedded() -> Result<(ErrorStore, AnalysisLookup, Vec<String>), DatasetError> {
    load_str(EMBEDDED_DATASET, Utc::now())
}

fn load_str(
    raw: &str,
    loaded_at: DateTime<Utc>,
) -> Result<(ErrorStore, AnalysisLookup, Vec<String>), DatasetError> {
    let doc: DatasetDoc = serde_json::from_str(raw)?;
    if doc.schema_version != SCHEMA_VERSION {
        return Err(DatasetError::UnknownSchemaVersion(doc.schema_version));
    }

    let mut seen = BTreeSet::new();
    for record in &doc.errors {
        if !seen.insert(record.id) {
            return Err(DatasetError::DuplicateId(record.id));
        }
    }

    let mut warnings = Vec::new();
    for id in doc.analyses.keys() {
        if !seen.contains(id) {
            warnings.push(format!("analysis entry {id} has no matching error record"));
        }
    }

    let records = doc
        .errors
        .into_iter()
        .map(|record| record.into_record(loaded_at))
        .collect();

    Ok((
        ErrorStore::new(records),
        AnalysisLookup::new(doc.analyses),
        warnings,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_dataset_loads_without_warnings() {
        let (store, lookup, warnings) =
            load_embedded().expect("embedded dataset should load");
        assert_eq!(store.len(), 8);
        assert_eq!(lookup.len(), 8);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn embedded_dataset_matches_expected_shape() {
        let (store, lookup, _) = load_embedded().expect("embedded dataset should load");
        let jwt = store.get(4).expect("record 4 should exist");
        assert_eq!(jwt.kind, ErrorKind::Backend);
        assert!(jwt.message.contains("jwt"));
        assert_eq!(jwt.status_code, Some(401));

        let db = lookup.get(2).expect("analysis 2 should exist");
        assert_eq!(db.related_errors, vec![6]);
        assert!(db.confidence <= 100);
    }

    #[test]
    fn age_secs_resolve_against_load_time() {
        let loaded_at = Utc::now();
        let raw = r#"{
          "schema_version": 1,
          "errors": [{
            "id": 1, "kind": "frontend", "message": "m", "source": "s",
            "age_secs": 120, "count": 1, "severity": "low", "stack": ""
          }],
          "analyses": {}
        }"#;
        let (store, _, _) = load_str(raw, loaded_at).expect("dataset should load");
        let record = store.get(1).expect("record should exist");
        assert_eq!(loaded_at - record.timestamp, Duration::seconds(120));
    }

    #[test]
    fn unknown_schema_version_is_rejected() {
        let raw = r#"{"schema_version": 99, "errors": [], "analyses": {}}"#;
        assert!(matches!(
            load_str(raw, Utc::now()),
            Err(DatasetError::UnknownSchemaVersion(99))
        ));
    }

    #[test]
    fn duplicate_record_id_is_rejected() {
        let raw = r#"{
          "schema_version": 1,
          "errors": [
            {"id": 1, "kind": "frontend", "message": "a", "source": "s",
             "age_secs": 0, "count": 1, "severity": "low", "stack": ""},
            {"id": 1, "kind": "backend", "message": "b", "source": "s",
             "age_secs": 0, "count": 1, "severity": "high", "stack": ""}
          ],
          "analyses": {}
        }"#;
        assert!(matches!(
            load_str(raw, Utc::now()),
            Err(DatasetError::DuplicateId(1))
        ));
    }

    #[test]
    fn orphan_analysis_entry_is_a_warning_not_an_error() {
        let raw = r#"{
          "schema_version": 1,
          "errors": [{
            "id": 1, "kind": "frontend", "message": "m", "source": "s",
            "age_secs": 0, "count": 1, "severity": "low", "stack": ""
          }],
          "analyses": {
            "42": {
              "root_cause": "x", "suggestions": [], "confidence": 50,
              "category": "Test", "related_errors": []
            }
          }
        }"#;
        let (_, lookup, warnings) = load_str(raw, Utc::now()).expect("dataset should load");
        assert_eq!(lookup.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("42"));
    }

    #[test]
    fn missing_optional_fields_deserialize_as_absent() {
        let raw = r#"{
          "schema_version": 1,
          "errors": [{
            "id": 7, "kind": "backend", "message": "m", "source": "s",
            "age_secs": 5, "count": 2, "severity": "medium", "stack": "at x"
          }],
          "analyses": {}
        }"#;
        let (store, _, _) = load_str(raw, Utc::now()).expect("dataset should load");
        let record = store.get(7).expect("record should exist");
        assert!(record.user_agent.is_none());
        assert!(record.url.is_none());
        assert!(record.endpoint.is_none());
        assert!(record.status_code.is_none());
    }
}
