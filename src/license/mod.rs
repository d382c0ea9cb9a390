use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod expression;

// Re-export the oracle entry points
pub use expression::{is_valid_expression, satisfies};

/// Declared license metadata as published by a package.
///
/// Registries ship this field as a string, an array of strings, nothing at
/// all, or arbitrary garbage; the closed variant keeps every consumer
/// exhaustive instead of re-inspecting raw JSON shapes. An array is a
/// conjunctive set of obligations, not alternatives.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LicenseMetadata {
    #[default]
    Missing,
    Malformed(Value),
    Single(String),
    Conjunctive(Vec<String>),
}

impl LicenseMetadata {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => LicenseMetadata::Missing,
            Value::String(expr) => LicenseMetadata::Single(expr),
            Value::Array(items) => {
                if items.iter().any(|item| !item.is_string()) {
                    return LicenseMetadata::Malformed(Value::Array(items));
                }
                let exprs = items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(expr) => Some(expr),
                        _ => None,
                    })
                    .collect();
                LicenseMetadata::Conjunctive(exprs)
            }
            other => LicenseMetadata::Malformed(other),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, LicenseMetadata::Missing)
    }

    /// Render for the human-readable report.
    ///
    /// A valid expression is shown verbatim, an invalid one keeps the raw
    /// string inside an explicit notice, an array is shown in its literal
    /// serialized form, and anything else collapses to an invalid-metadata
    /// notice.
    pub fn display(&self) -> String {
        match self {
            LicenseMetadata::Missing => "None listed".to_string(),
            LicenseMetadata::Single(expr) => {
                if expression::is_valid_expression(expr) {
                    expr.clone()
                } else {
                    format!("Invalid SPDX expression \"{}\"", expr)
                }
            }
            LicenseMetadata::Conjunctive(exprs) => Value::from(exprs.clone()).to_string(),
            LicenseMetadata::Malformed(_) => "Invalid license metadata".to_string(),
        }
    }
}

// Serializes back to the raw published shape so machine-readable records
// carry the field verbatim.
impl Serialize for LicenseMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LicenseMetadata::Missing => serializer.serialize_unit(),
            LicenseMetadata::Malformed(raw) => raw.serialize(serializer),
            LicenseMetadata::Single(expr) => serializer.serialize_str(expr),
            LicenseMetadata::Conjunctive(exprs) => exprs.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for LicenseMetadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(LicenseMetadata::from_value(value))
    }
}
