use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use dep_license_gate::config::{load_config, load_config_from};
use dep_license_gate::corrections::CorrectionSet;
use dep_license_gate::dependency::{decode_document, DependencyDocument};
use dep_license_gate::output::{self, ReportOptions};
use dep_license_gate::policy::{evaluate_all, whitelist};
use dep_license_gate::provenance::{self, DocumentProvenance, ProvenanceSource};

pub struct CheckArgs {
    pub input: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub permitted: Option<String>,
    pub whitelist: Option<String>,
    pub corrections: bool,
    pub corrections_data: Option<PathBuf>,
    pub provenance_data: Option<PathBuf>,
    pub require_provenance: bool,
    pub require_provenance_match: bool,
    pub production: bool,
    pub errors_only: bool,
    pub quiet: bool,
    pub ndjson: bool,
    pub output: Option<PathBuf>,
}

pub fn handle_check(args: CheckArgs) -> Result<()> {
    // Configuration problems are fatal and surface before any evaluation.
    let config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    // Explicit flags override file values
    let mut policy = config.policy.unwrap_or_default();
    if let Some(permitted) = args.permitted {
        policy.permitted = Some(permitted);
    }
    if let Some(raw) = &args.whitelist {
        policy.whitelist = whitelist::parse_entries(raw)?;
    }
    if args.corrections {
        policy.corrections = true;
    }
    if args.require_provenance {
        policy.require_provenance = true;
    }
    if args.require_provenance_match {
        policy.require_provenance_match = true;
    }
    if args.production {
        policy.production_only = true;
    }
    policy.validate()?;

    let options = ReportOptions {
        errors_only: args.errors_only || config.errors_only.unwrap_or(false),
        quiet: args.quiet || config.quiet.unwrap_or(false),
        ndjson: args.ndjson || config.ndjson.unwrap_or(false),
    };

    // The dependency document is the primary input; an unreadable one is a
    // fatal collaborator error, unlike the degradable lookups below.
    let raw = read_input(args.input.as_deref())?;
    let DependencyDocument {
        mut dependencies, ..
    } = decode_document(&raw)?;

    // Production filtering happens at the input boundary; the engine never
    // sees the flag.
    if policy.production_only {
        dependencies.retain(|dependency| !dependency.dev);
    }

    let corrections = load_corrections(args.corrections_data.as_deref());
    let provenance_source = load_provenance(args.provenance_data.as_deref());
    let lookups = provenance::enrich(&dependencies, &provenance_source);

    let results = evaluate_all(dependencies, &policy, &corrections, lookups);

    let mut rendered = Vec::new();
    output::write_report(&mut rendered, &results, options, provenance_source.name())?;
    match args.output {
        Some(path) => fs::write(path, rendered)?,
        None => io::stdout().write_all(&rendered)?,
    }

    if output::exit_code(&results) != 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read dependency document {}", path.display())),
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read dependency document from stdin")?;
            Ok(raw)
        }
    }
}

// Correction-set unavailability degrades to "no corrections"; it never
// aborts the run.
fn load_corrections(path: Option<&Path>) -> CorrectionSet {
    let path = match path {
        Some(path) => path,
        None => return CorrectionSet::default(),
    };

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!(
                "Warning: ignoring unreadable corrections document {}: {}",
                path.display(),
                e
            );
            return CorrectionSet::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(set) => set,
        Err(e) => {
            eprintln!(
                "Warning: ignoring invalid corrections document {}: {}",
                path.display(),
                e
            );
            CorrectionSet::default()
        }
    }
}

// Same degradation rule for the provenance document: every dependency simply
// has no provenance data.
fn load_provenance(path: Option<&Path>) -> DocumentProvenance {
    let path = match path {
        Some(path) => path,
        None => return DocumentProvenance::default(),
    };

    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!(
                "Warning: ignoring unreadable provenance document {}: {}",
                path.display(),
                e
            );
            return DocumentProvenance::new(label);
        }
    };

    match DocumentProvenance::parse(label.clone(), &content) {
        Ok(source) => source,
        Err(e) => {
            eprintln!(
                "Warning: ignoring invalid provenance document {}: {}",
                path.display(),
                e
            );
            DocumentProvenance::new(label)
        }
    }
}
