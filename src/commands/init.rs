use anyhow::Result;

use crate::cli::InitPreset;
use dep_license_gate::init;

pub fn handle_init(preset: InitPreset) -> Result<()> {
    let preset = match preset {
        InitPreset::Strict => init::InitPreset::Strict,
        InitPreset::Permissive => init::InitPreset::Permissive,
    };
    init::generate_config(preset)
}
