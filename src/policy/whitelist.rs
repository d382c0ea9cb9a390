use anyhow::{bail, Result};
use indexmap::IndexMap;
use semver::{Version, VersionReq};

/// Parse comma-delimited `name@range` whitelist entries from the command
/// line into the policy's whitelist map. A malformed entry is a
/// configuration error, not a per-dependency one.
pub fn parse_entries(raw: &str) -> Result<IndexMap<String, String>> {
    let mut entries = IndexMap::new();

    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        // Scoped package names carry a leading '@' of their own.
        let (name, range) = match part.strip_prefix('@') {
            Some(rest) => match rest.split_once('@') {
                Some((name, range)) => (format!("@{}", name), range),
                None => bail!("invalid whitelist entry '{}': expected name@range", part),
            },
            None => match part.split_once('@') {
                Some((name, range)) => (name.to_string(), range),
                None => bail!("invalid whitelist entry '{}': expected name@range", part),
            },
        };

        if name.trim().is_empty() || range.trim().is_empty() {
            bail!("invalid whitelist entry '{}': expected name@range", part);
        }

        entries.insert(name, range.trim().to_string());
    }

    Ok(entries)
}

/// Whether a dependency version satisfies a whitelist range. Unparsable
/// version or range data is a non-match, never an error.
pub fn range_matches(version: &str, range: &str) -> bool {
    let version = match Version::parse(version.trim()) {
        Ok(version) => version,
        Err(_) => return false,
    };
    let range = match VersionReq::parse(range.trim()) {
        Ok(range) => range,
        Err(_) => return false,
    };
    range.matches(&version)
}
