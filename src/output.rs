use anyhow::Result;
use std::io::Write;

use crate::corrections::CorrectionSource;
use crate::dependency::{Link, People, Person};
use crate::policy::EvaluationResult;

/// Emission flags for the report sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Emit only results that failed approval.
    pub errors_only: bool,
    /// Emit nothing; the exit status still reflects the evaluation.
    pub quiet: bool,
    /// One machine-readable JSON record per line instead of text blocks.
    pub ndjson: bool,
}

/// Whether a result passes the emission filter. Filtering omits, it never
/// reorders.
pub fn should_emit(options: ReportOptions, result: &EvaluationResult) -> bool {
    !options.quiet && (!options.errors_only || !result.approved)
}

/// Render the result sequence to the sink in input order.
///
/// `provenance_label` names the provenance source in the no-file-data
/// notice of the human-readable form.
pub fn write_report<W: Write>(
    out: &mut W,
    results: &[EvaluationResult],
    options: ReportOptions,
    provenance_label: &str,
) -> Result<()> {
    for result in results {
        if !should_emit(options, result) {
            continue;
        }
        if options.ndjson {
            serde_json::to_writer(&mut *out, result)?;
            writeln!(out)?;
        } else {
            out.write_all(format_result_block(result, provenance_label).as_bytes())?;
        }
    }
    Ok(())
}

/// Exit status for the whole run: 0 when the sequence is empty or every
/// result is approved, 1 otherwise.
pub fn exit_code(results: &[EvaluationResult]) -> i32 {
    if results.iter().any(|result| !result.approved) {
        1
    } else {
        0
    }
}

/// One human-readable block per result, fields in a fixed order.
pub fn format_result_block(result: &EvaluationResult, provenance_label: &str) -> String {
    let mut block = String::new();

    block.push_str(&format!("{}@{}\n", result.name, result.version));

    if result.approved {
        if result.via_whitelist {
            block.push_str("  Approved by whitelist\n");
        } else {
            block.push_str("  Approved by rule\n");
        }
    } else {
        block.push_str("  NOT APPROVED\n");
    }

    if !result.has_file_level_data {
        block.push_str(&format!(
            "  No file-level license information found from {}\n",
            provenance_label
        ));
    }

    block.push_str(&format!("  License metadata: {}\n", result.license.display()));

    match result.corrected {
        Some(CorrectionSource::Automatic) => {
            block.push_str("  Corrected: automatic-license-correction\n");
        }
        Some(CorrectionSource::CrowdSourced) => {
            block.push_str("  Corrected: crowd-sourced-license-correction\n");
        }
        None => {}
    }

    for conflict in &result.conflicts {
        let count = conflict.files.len();
        block.push_str(&format!(
            "  Bad license hits: {} ({} file{})\n",
            conflict.detected_expression,
            count,
            if count == 1 { "" } else { "s" }
        ));
        for file in &conflict.files {
            block.push_str(&format!("    {}\n", file));
        }
    }

    block.push_str(&format!(
        "  Repository: {}\n",
        format_link(result.repository.as_ref())
    ));
    block.push_str(&format!(
        "  Homepage: {}\n",
        format_link(result.homepage.as_ref())
    ));
    block.push_str(&format_people_field("Author", result.author.as_ref()));
    block.push_str(&format_people_field(
        "Contributors",
        result.contributors.as_ref(),
    ));

    block
}

fn format_link(link: Option<&Link>) -> String {
    match link.and_then(Link::url) {
        Some(url) => url.to_string(),
        None => "None listed".to_string(),
    }
}

// A single person renders inline after the label; a list renders one per
// line, indented.
fn format_people_field(label: &str, people: Option<&People>) -> String {
    match people {
        None => format!("  {}: None listed\n", label),
        Some(People::One(person)) => format!("  {}: {}\n", label, format_person(person)),
        Some(People::Many(list)) if list.is_empty() => format!("  {}: None listed\n", label),
        Some(People::Many(list)) => {
            let mut out = format!("  {}:\n", label);
            for person in list {
                out.push_str(&format!("    {}\n", format_person(person)));
            }
            out
        }
    }
}

fn format_person(person: &Person) -> String {
    match person {
        Person::Plain(text) => text.clone(),
        Person::Detailed { name, email, url } => {
            let mut rendered = name.clone();
            if let Some(email) = email {
                rendered.push_str(&format!(" <{}>", email));
            }
            if let Some(url) = url {
                rendered.push_str(&format!(" ({})", url));
            }
            rendered
        }
        Person::Other(raw) => raw.to_string(),
    }
}
