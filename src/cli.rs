use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dep-license-gate")]
#[command(about = "Evaluate dependency license metadata against a license policy")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a dependency document against the policy
    Check {
        /// Dependency document (JSON array); reads stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Policy configuration file (default: dep-license-gate.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Permitted SPDX license expression
        #[arg(long)]
        permitted: Option<String>,

        /// Whitelist entries, comma-delimited name@range pairs
        #[arg(long)]
        whitelist: Option<String>,

        /// Apply license corrections from the corrections document
        #[arg(long)]
        corrections: bool,

        /// Corrections document (JSON object keyed by name@version)
        #[arg(long)]
        corrections_data: Option<PathBuf>,

        /// Provenance document (JSON object keyed by name@version)
        #[arg(long)]
        provenance_data: Option<PathBuf>,

        /// Reject dependencies with no provenance result at all
        #[arg(long)]
        require_provenance: bool,

        /// Reject dependencies whose file-level detection disagrees with metadata
        #[arg(long)]
        require_provenance_match: bool,

        /// Skip development-only dependencies
        #[arg(long)]
        production: bool,

        /// Only report dependencies that fail approval
        #[arg(short, long)]
        errors_only: bool,

        /// Suppress report output, keep the exit status
        #[arg(short, long)]
        quiet: bool,

        /// Emit newline-delimited JSON records instead of text
        #[arg(long)]
        ndjson: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write a policy configuration file with a preset
    Init {
        /// Policy preset
        preset: InitPreset,
    },
    /// Show or validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum InitPreset {
    Strict,
    Permissive,
}
