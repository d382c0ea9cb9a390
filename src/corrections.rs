use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::license::LicenseMetadata;
use crate::policy::PolicyConfiguration;

/// Where a correction came from. The derived order is the precedence used
/// when more than one record exists for the same dependency: automatic
/// corrections beat crowd-sourced ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrectionSource {
    CrowdSourced,
    Automatic,
}

/// An externally supplied replacement for a package's declared license.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    pub license: String,
    pub source: CorrectionSource,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(CorrectionRecord),
    Many(Vec<CorrectionRecord>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<CorrectionRecord> {
        match self {
            OneOrMany::One(record) => vec![record],
            OneOrMany::Many(records) => records,
        }
    }
}

/// An already-loaded correction set keyed by `name@version`.
#[derive(Debug, Clone, Default)]
pub struct CorrectionSet {
    records: IndexMap<String, Vec<CorrectionRecord>>,
}

impl CorrectionSet {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn insert(&mut self, id: impl Into<String>, record: CorrectionRecord) {
        self.records.entry(id.into()).or_default().push(record);
    }

    /// The active correction for a dependency, if any. Precedence between
    /// coexisting records is decided by [`CorrectionSource`]'s order.
    pub fn lookup(&self, name: &str, version: &str) -> Option<&CorrectionRecord> {
        self.records
            .get(&format!("{}@{}", name, version))?
            .iter()
            .max_by_key(|record| record.source)
    }

    /// Resolve the effective license for a dependency.
    ///
    /// Pure lookup: with the corrections toggle off the declared metadata
    /// passes through untouched, toggled on an active correction replaces it
    /// with a single corrected expression.
    pub fn resolve(
        &self,
        name: &str,
        version: &str,
        declared: &LicenseMetadata,
        config: &PolicyConfiguration,
    ) -> (LicenseMetadata, Option<CorrectionSource>) {
        if !config.corrections {
            return (declared.clone(), None);
        }
        match self.lookup(name, version) {
            Some(record) => (
                LicenseMetadata::Single(record.license.clone()),
                Some(record.source),
            ),
            None => (declared.clone(), None),
        }
    }
}

// The correction document maps `name@version` to one record or a list of
// records; both shapes collapse into the same table.
impl<'de> Deserialize<'de> for CorrectionSet {
    fn deserialize<D: serde::de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: IndexMap<String, OneOrMany> = IndexMap::deserialize(deserializer)?;
        Ok(CorrectionSet {
            records: raw
                .into_iter()
                .map(|(id, records)| (id, records.into_vec()))
                .collect(),
        })
    }
}
