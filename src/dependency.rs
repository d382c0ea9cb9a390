use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::license::LicenseMetadata;

/// Repository/homepage metadata: registries publish either a bare URL string
/// or an object carrying a `url` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Link {
    Url(String),
    Detailed {
        url: String,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        directory: Option<String>,
    },
    Other(Value),
}

impl Link {
    /// The URL to display, if the shape carries one.
    pub fn url(&self) -> Option<&str> {
        match self {
            Link::Url(url) => Some(url),
            Link::Detailed { url, .. } => Some(url),
            Link::Other(_) => None,
        }
    }
}

/// A single author or contributor entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Person {
    Plain(String),
    Detailed {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    Other(Value),
}

/// Author/contributor fields accept a single entry or a list of entries.
/// `Many` comes first so arrays are never swallowed by [`Person::Other`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum People {
    Many(Vec<Person>),
    One(Person),
}

/// One resolved package from the dependency document.
///
/// Records are produced once by the external collector and never mutated.
/// The importing-package back-reference is not a field here; it lives in
/// [`ParentIndex`] so the record serializes and compares without special
/// cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub license: LicenseMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<People>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributors: Option<People>,
    /// Development-only marker; honored by the input boundary, not the engine.
    #[serde(default)]
    pub dev: bool,
}

impl Dependency {
    /// Identity key used by the corrections, provenance and parent tables.
    pub fn id(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

/// Lookup table from a dependency's identity to the identity of the package
/// that imported it. An absent entry means the project root imported it
/// directly. Kept outside [`Dependency`] and never serialized.
#[derive(Debug, Clone, Default)]
pub struct ParentIndex {
    parents: HashMap<String, String>,
}

impl ParentIndex {
    pub fn insert(&mut self, child_id: String, parent_id: String) {
        self.parents.insert(child_id, parent_id);
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.parents.get(id).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// A decoded dependency document: the ordered records plus the parent table
/// stripped out of them.
#[derive(Debug, Clone, Default)]
pub struct DependencyDocument {
    pub dependencies: Vec<Dependency>,
    pub parents: ParentIndex,
}

/// Decode a JSON array of dependency records.
///
/// Any `parent` key on a record is removed into the [`ParentIndex`] before
/// the typed decode, so it can never leak into an [`EvaluationResult`]
/// serialization downstream. A record without a usable name/version identity
/// is a collaborator error and fails the whole document.
///
/// [`EvaluationResult`]: crate::policy::EvaluationResult
pub fn decode_document(raw: &str) -> Result<DependencyDocument> {
    let records: Vec<Value> =
        serde_json::from_str(raw).context("dependency document is not a JSON array")?;

    let mut dependencies = Vec::with_capacity(records.len());
    let mut parents = ParentIndex::default();

    for (index, mut record) in records.into_iter().enumerate() {
        let parent = match record.as_object_mut() {
            Some(map) => map.remove("parent"),
            None => None,
        };

        let dependency: Dependency = serde_json::from_value(record)
            .with_context(|| format!("invalid dependency record at index {}", index))?;

        if let Some(parent_id) = parent.as_ref().and_then(parent_id) {
            parents.insert(dependency.id(), parent_id);
        }

        dependencies.push(dependency);
    }

    Ok(DependencyDocument {
        dependencies,
        parents,
    })
}

// Parent references arrive either as an identity string or as an object with
// name/version keys.
fn parent_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Object(map) => {
            let name = map.get("name")?.as_str()?;
            match map.get("version").and_then(Value::as_str) {
                Some(version) => Some(format!("{}@{}", name, version)),
                None => Some(name.to_string()),
            }
        }
        _ => None,
    }
}
