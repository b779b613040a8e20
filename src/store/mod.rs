use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Frontend,
    Backend,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 2] = [ErrorKind::Frontend, ErrorKind::Backend];

    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Frontend => "Frontend",
            ErrorKind::Backend => "Backend",
        }
    }
}

/// One logged fault entry. Optional provenance fields are kind-specific
/// (`user_agent`/`url` for frontend, `endpoint`/`status_code` for backend)
/// but nothing enforces that; rendering tolerates any of them being absent.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub id: u32,
    pub kind: ErrorKind,
    pub message: String,
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub count: u32,
    pub severity: Severity,
    pub stack: String,
    pub user_agent: Option<String>,
    pub url: Option<String>,
    pub endpoint: Option<String>,
    pub status_code: Option<u16>,
}

/// Precomputed diagnostic for one error record. `related_errors` holds weak
/// references: ids without a matching record are dropped at display time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub root_cause: String,
    pub suggestions: Vec<String>,
    pub confidence: u8,
    pub category: String,
    #[serde(default)]
    pub related_errors: Vec<u32>,
}

/// Immutable ordered sequence of error records, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct ErrorStore {
    records: Vec<ErrorRecord>,
}

impl ErrorStore {
    pub fn new(records: Vec<ErrorRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    pub fn get(&self, id: u32) -> Option<&ErrorRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_occurrences(&self) -> u64 {
        self.records.iter().map(|record| u64::from(record.count)).sum()
    }

    pub fn critical_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.severity == Severity::Critical)
            .count()
    }

    pub fn frontend_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.kind == ErrorKind::Frontend)
            .count()
    }

    pub fn backend_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.kind == ErrorKind::Backend)
            .count()
    }
}

/// Static table mapping a record id to its canned analysis.
#[derive(Debug, Clone, Default)]
pub struct AnalysisLookup {
    entries: BTreeMap<u32, AnalysisResult>,
}

impl AnalysisLookup {
    pub fn new(entries: BTreeMap<u32, AnalysisResult>) -> Self {
        Self { entries }
    }

    pub fn get(&self, id: u32) -> Option<&AnalysisResult> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
