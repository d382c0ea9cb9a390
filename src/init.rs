use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::CONFIG_FILE;

#[derive(Debug, Clone, Copy)]
pub enum InitPreset {
    Strict,
    Permissive,
}

/// Materialize a preset policy into `dep-license-gate.toml` in the working
/// directory.
pub fn generate_config(preset: InitPreset) -> Result<()> {
    generate_config_at_path(CONFIG_FILE, preset)?;
    println!("Wrote policy configuration to {}", CONFIG_FILE);
    Ok(())
}

/// Write the preset to an explicit path. An existing file keeps any keys the
/// preset does not set; preset keys win.
pub fn generate_config_at_path<P: AsRef<Path>>(path: P, preset: InitPreset) -> Result<()> {
    let path = path.as_ref();

    let existing = if path.exists() {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        String::new()
    };

    let mut doc = existing
        .parse::<toml_edit::DocumentMut>()
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let preset_doc = get_preset_config(preset)
        .parse::<toml_edit::DocumentMut>()
        .context("Invalid preset config format")?;

    for (key, item) in preset_doc.iter() {
        doc[key] = item.clone();
    }

    fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

fn get_preset_config(preset: InitPreset) -> &'static str {
    match preset {
        InitPreset::Strict => include_str!("../presets/strict.toml"),
        InitPreset::Permissive => include_str!("../presets/permissive.toml"),
    }
}
