use anyhow::{Context, Result};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dependency::Dependency;

/// A license expression detected in files that contradicts the declared
/// metadata, with the files it was found in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub detected_expression: String,
    pub files: Vec<String>,
}

/// Third-party file-level detection results for one dependency.
///
/// Conflicts are diagnostic: they are reported regardless of the approval
/// outcome and only reject under the provenance-match requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceResult {
    pub has_file_level_data: bool,
    pub metadata_matches_file_level: bool,
    #[serde(default)]
    pub conflicts: Vec<Conflict>,
}

/// A provenance lookup backend. Absence and lookup failure are
/// indistinguishable to the engine; both surface as `None`.
pub trait ProvenanceSource: Sync {
    /// Label used by the report when a dependency has no file-level data.
    fn name(&self) -> &str;

    fn lookup(&self, name: &str, version: &str) -> Option<ProvenanceResult>;
}

/// An already-fetched provenance document keyed by `name@version`.
#[derive(Debug, Clone)]
pub struct DocumentProvenance {
    label: String,
    entries: IndexMap<String, ProvenanceResult>,
}

impl DocumentProvenance {
    pub fn new(label: impl Into<String>) -> Self {
        DocumentProvenance {
            label: label.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn parse(label: impl Into<String>, raw: &str) -> Result<Self> {
        let entries: IndexMap<String, ProvenanceResult> =
            serde_json::from_str(raw).context("provenance document is not a JSON object")?;
        Ok(DocumentProvenance {
            label: label.into(),
            entries,
        })
    }

    pub fn insert(&mut self, id: impl Into<String>, result: ProvenanceResult) {
        self.entries.insert(id.into(), result);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DocumentProvenance {
    fn default() -> Self {
        DocumentProvenance::new("license scanner")
    }
}

impl ProvenanceSource for DocumentProvenance {
    fn name(&self) -> &str {
        &self.label
    }

    fn lookup(&self, name: &str, version: &str) -> Option<ProvenanceResult> {
        self.entries.get(&format!("{}@{}", name, version)).cloned()
    }
}

/// Look up provenance for every dependency.
///
/// Lookups are independent, so they fan out on the rayon pool (which also
/// bounds how many run at once); results come back in input order because
/// report ordering is part of the observable contract.
pub fn enrich<S>(dependencies: &[Dependency], source: &S) -> Vec<Option<ProvenanceResult>>
where
    S: ProvenanceSource + ?Sized,
{
    dependencies
        .par_iter()
        .map(|dependency| source.lookup(&dependency.name, &dependency.version))
        .collect()
}
