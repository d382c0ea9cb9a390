use anyhow::{bail, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The rules a dependency set is evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfiguration {
    /// Permitted SPDX expression. Absent means no expression-based
    /// restriction; only whitelist and provenance rules apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permitted: Option<String>,

    /// Package name to version-range string, exact-name match. A dependency
    /// whose version satisfies the range is approved unconditionally.
    #[serde(default)]
    pub whitelist: IndexMap<String, String>,

    /// Let the corrections overlay override declared metadata.
    #[serde(default)]
    pub corrections: bool,

    /// Require that provenance lookup produced any result at all.
    #[serde(default)]
    pub require_provenance: bool,

    /// Require that file-level detection agrees with declared metadata.
    #[serde(default)]
    pub require_provenance_match: bool,

    /// Drop development-only dependencies before evaluation. Enforced by the
    /// input boundary, never by the engine.
    #[serde(default)]
    pub production_only: bool,
}

impl PolicyConfiguration {
    /// Structural validation, run once before any dependency is evaluated.
    ///
    /// This only rejects configurations that cannot be evaluated at all; an
    /// unparsable `permitted` expression is handled per dependency by the
    /// engine's fail-closed guard instead.
    pub fn validate(&self) -> Result<()> {
        for (name, range) in &self.whitelist {
            if name.trim().is_empty() {
                bail!("whitelist entry with an empty package name");
            }
            if range.trim().is_empty() {
                bail!("whitelist entry for '{}' has an empty version range", name);
            }
        }
        Ok(())
    }
}
