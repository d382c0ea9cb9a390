use serde::Serialize;

use super::config::PolicyConfiguration;
use super::whitelist::range_matches;
use crate::corrections::{CorrectionSet, CorrectionSource};
use crate::dependency::{Dependency, Link, People};
use crate::license::{expression, LicenseMetadata};
use crate::provenance::{Conflict, ProvenanceResult};

/// The approval decision for one dependency, immutable once produced.
///
/// Carries every dependency field (with `license` reflecting any applied
/// correction) so the reporter needs nothing else. There is no parent
/// back-reference here; that lookup table never reaches serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub name: String,
    pub version: String,
    pub license: LicenseMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<People>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors: Option<People>,
    pub dev: bool,
    pub approved: bool,
    pub via_whitelist: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected: Option<CorrectionSource>,
    pub has_file_level_data: bool,
    pub conflicts: Vec<Conflict>,
}

// What the rule chain decided, before the result record is assembled.
struct Decision {
    approved: bool,
    via_whitelist: bool,
    license: LicenseMetadata,
    corrected: Option<CorrectionSource>,
}

impl Decision {
    fn rejected(license: LicenseMetadata, corrected: Option<CorrectionSource>) -> Self {
        Decision {
            approved: false,
            via_whitelist: false,
            license,
            corrected,
        }
    }
}

/// Decide approval for one dependency.
///
/// Deterministic, no hidden state: the provenance result was looked up
/// beforehand, so nothing here can block or fail. Malformed per-dependency
/// data always resolves to a rejection that keeps enough raw data for the
/// report to explain itself.
pub fn evaluate(
    dependency: Dependency,
    config: &PolicyConfiguration,
    corrections: &CorrectionSet,
    provenance: Option<&ProvenanceResult>,
) -> EvaluationResult {
    // Diagnostic passthrough, independent of the approval outcome.
    let has_file_level_data = provenance.map_or(false, |p| p.has_file_level_data);
    let conflicts = provenance.map_or_else(Vec::new, |p| p.conflicts.clone());

    let decision = decide(&dependency, config, corrections, provenance);

    let Dependency {
        name,
        version,
        repository,
        homepage,
        author,
        contributors,
        dev,
        ..
    } = dependency;

    EvaluationResult {
        name,
        version,
        license: decision.license,
        repository,
        homepage,
        author,
        contributors,
        dev,
        approved: decision.approved,
        via_whitelist: decision.via_whitelist,
        corrected: decision.corrected,
        has_file_level_data,
        conflicts,
    }
}

// The rule chain, in strict order; the first matching terminal rule decides.
fn decide(
    dependency: &Dependency,
    config: &PolicyConfiguration,
    corrections: &CorrectionSet,
    provenance: Option<&ProvenanceResult>,
) -> Decision {
    // 1. Whitelist short-circuit: no license checks run at all.
    if let Some(range) = config.whitelist.get(&dependency.name) {
        if range_matches(&dependency.version, range) {
            return Decision {
                approved: true,
                via_whitelist: true,
                license: dependency.license.clone(),
                corrected: None,
            };
        }
    }

    // 2. An unparsable permitted expression fails closed: no dependency can
    //    satisfy an invalid policy.
    if let Some(permitted) = &config.permitted {
        if !expression::is_valid_expression(permitted) {
            return Decision::rejected(dependency.license.clone(), None);
        }
    }

    // 3. Effective license resolution.
    let (effective, corrected) = corrections.resolve(
        &dependency.name,
        &dependency.version,
        &dependency.license,
        config,
    );

    // 4. Provenance requirement: any result at all.
    if config.require_provenance && provenance.is_none() {
        return Decision::rejected(effective, corrected);
    }

    // 5. Provenance-match requirement.
    if config.require_provenance_match
        && !provenance.map_or(false, |p| p.metadata_matches_file_level)
    {
        return Decision::rejected(effective, corrected);
    }

    // 6. Expression satisfaction; skipped when the policy has no expression.
    if let Some(permitted) = &config.permitted {
        let satisfied = match &effective {
            LicenseMetadata::Single(expr) => expression::satisfies(expr, permitted),
            // Array form is a conjunctive set of obligations: every element
            // must independently be valid and satisfied.
            LicenseMetadata::Conjunctive(exprs) => {
                !exprs.is_empty() && exprs.iter().all(|expr| expression::satisfies(expr, permitted))
            }
            LicenseMetadata::Missing | LicenseMetadata::Malformed(_) => false,
        };
        if !satisfied {
            return Decision::rejected(effective, corrected);
        }
    }

    // 7. Nothing rejected it.
    Decision {
        approved: true,
        via_whitelist: false,
        license: effective,
        corrected,
    }
}

/// Evaluate an ordered dependency sequence against one policy.
///
/// `provenance` pairs positionally with `dependencies` (the enrichment
/// output); result order equals input order. No evaluation observes another.
pub fn evaluate_all(
    dependencies: Vec<Dependency>,
    config: &PolicyConfiguration,
    corrections: &CorrectionSet,
    provenance: Vec<Option<ProvenanceResult>>,
) -> Vec<EvaluationResult> {
    let mut provenance = provenance.into_iter();
    dependencies
        .into_iter()
        .map(|dependency| {
            let result = provenance.next().flatten();
            evaluate(dependency, config, corrections, result.as_ref())
        })
        .collect()
}
