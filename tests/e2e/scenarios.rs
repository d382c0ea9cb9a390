use super::helpers::TestProject;

#[test]
fn test_permitted_expression_approves_declared_license() {
    let test_env = TestProject::new();
    test_env.write_file(
        "deps.json",
        r#"[{"name": "left-pad", "version": "1.0.0", "license": "MIT"}]"#,
    );

    let output = test_env.run(&[
        "check",
        "--input",
        "deps.json",
        "--permitted",
        "MIT OR Apache-2.0",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("left-pad@1.0.0"));
    assert!(stdout.contains("Approved by rule"));
}

#[test]
fn test_disallowed_license_fails_the_run() {
    let test_env = TestProject::new();
    test_env.write_file(
        "deps.json",
        r#"[{"name": "copyleft-pkg", "version": "2.0.0", "license": "GPL-3.0"}]"#,
    );

    let output = test_env.run(&[
        "check",
        "--input",
        "deps.json",
        "--permitted",
        "MIT OR Apache-2.0",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("NOT APPROVED"));
}

#[test]
fn test_whitelist_bypasses_disallowed_license() {
    let test_env = TestProject::new();
    test_env.write_file(
        "deps.json",
        r#"[{"name": "optimist", "version": "0.6.0", "license": "GPL-2.0"}]"#,
    );

    let output = test_env.run(&[
        "check",
        "--input",
        "deps.json",
        "--whitelist",
        "optimist@<=0.6.1",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Approved by whitelist"));
}

#[test]
fn test_automatic_correction_rescues_unknown_metadata() {
    let test_env = TestProject::new();
    test_env.write_file(
        "deps.json",
        r#"[{"name": "mislabeled", "version": "2.0.0", "license": "UNKNOWN"}]"#,
    );
    test_env.write_file(
        "corrections.json",
        r#"{"mislabeled@2.0.0": {"license": "MIT", "source": "automatic"}}"#,
    );

    let output = test_env.run(&[
        "check",
        "--input",
        "deps.json",
        "--permitted",
        "MIT",
        "--corrections",
        "--corrections-data",
        "corrections.json",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Corrected: automatic-license-correction"));
    assert!(stdout.contains("License metadata: MIT"));
}

#[test]
fn test_corrections_are_inert_without_the_toggle() {
    let test_env = TestProject::new();
    test_env.write_file(
        "deps.json",
        r#"[{"name": "mislabeled", "version": "2.0.0", "license": "UNKNOWN"}]"#,
    );
    test_env.write_file(
        "corrections.json",
        r#"{"mislabeled@2.0.0": {"license": "MIT", "source": "automatic"}}"#,
    );

    let output = test_env.run(&[
        "check",
        "--input",
        "deps.json",
        "--permitted",
        "MIT",
        "--corrections-data",
        "corrections.json",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Corrected:"));
}

#[test]
fn test_require_provenance_rejects_unscanned_dependency() {
    let test_env = TestProject::new();
    test_env.write_file(
        "deps.json",
        r#"[{"name": "left-pad", "version": "1.0.0", "license": "MIT"}]"#,
    );

    let output = test_env.run(&[
        "check",
        "--input",
        "deps.json",
        "--permitted",
        "MIT",
        "--require-provenance",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("NOT APPROVED"));
    assert!(stdout.contains("No file-level license information found from"));
}

#[test]
fn test_provenance_document_satisfies_requirements() {
    let test_env = TestProject::new();
    test_env.write_file(
        "deps.json",
        r#"[{"name": "left-pad", "version": "1.0.0", "license": "MIT"}]"#,
    );
    test_env.write_file(
        "provenance.json",
        r#"{"left-pad@1.0.0": {"hasFileLevelData": true, "metadataMatchesFileLevel": true}}"#,
    );

    let output = test_env.run(&[
        "check",
        "--input",
        "deps.json",
        "--permitted",
        "MIT",
        "--require-provenance",
        "--require-provenance-match",
        "--provenance-data",
        "provenance.json",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("No file-level license information"));
}

#[test]
fn test_conflicts_are_reported_for_approved_dependencies() {
    let test_env = TestProject::new();
    test_env.write_file(
        "deps.json",
        r#"[{"name": "vendored", "version": "1.0.0", "license": "MIT"}]"#,
    );
    test_env.write_file(
        "provenance.json",
        r#"{
            "vendored@1.0.0": {
                "hasFileLevelData": true,
                "metadataMatchesFileLevel": false,
                "conflicts": [
                    {"detectedExpression": "GPL-3.0-only", "files": ["lib/blob.c", "lib/blob.h"]}
                ]
            }
        }"#,
    );

    let output = test_env.run(&[
        "check",
        "--input",
        "deps.json",
        "--permitted",
        "MIT",
        "--provenance-data",
        "provenance.json",
    ]);

    // Conflicts alone never reject without --require-provenance-match.
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Bad license hits: GPL-3.0-only (2 files)"));
    assert!(stdout.contains("lib/blob.c"));
}

#[test]
fn test_empty_input_is_silent_success() {
    let test_env = TestProject::new();
    test_env.write_file("deps.json", "[]");

    let output = test_env.run(&["check", "--input", "deps.json", "--permitted", "MIT"]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_stdin_input() {
    let test_env = TestProject::new();

    let output = test_env.run_with_stdin(
        &["check", "--permitted", "MIT"],
        r#"[{"name": "left-pad", "version": "1.0.0", "license": "MIT"}]"#,
    );

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("left-pad@1.0.0"));
}

#[test]
fn test_ndjson_records_and_parent_stripping() {
    let test_env = TestProject::new();
    test_env.write_file(
        "deps.json",
        r#"[
            {"name": "left-pad", "version": "1.0.0", "license": "MIT", "parent": "app@1.0.0"},
            {"name": "copyleft-pkg", "version": "2.0.0", "license": "GPL-3.0", "parent": "left-pad@1.0.0"}
        ]"#,
    );

    let output = test_env.run(&[
        "check",
        "--input",
        "deps.json",
        "--permitted",
        "MIT",
        "--ndjson",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["name"], "left-pad");
    assert_eq!(first["approved"], true);
    assert_eq!(first["viaWhitelist"], false);
    assert!(first.get("parent").is_none());

    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["approved"], false);
    assert!(second.get("parent").is_none());
}

#[test]
fn test_errors_only_omits_without_reordering() {
    let test_env = TestProject::new();
    test_env.write_file(
        "deps.json",
        r#"[
            {"name": "bad-first", "version": "1.0.0", "license": "GPL-3.0"},
            {"name": "good", "version": "1.0.0", "license": "MIT"},
            {"name": "bad-last", "version": "1.0.0", "license": "GPL-3.0"}
        ]"#,
    );

    let output = test_env.run(&[
        "check",
        "--input",
        "deps.json",
        "--permitted",
        "MIT",
        "--errors-only",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("good@1.0.0"));
    let first = stdout.find("bad-first@1.0.0").unwrap();
    let last = stdout.find("bad-last@1.0.0").unwrap();
    assert!(first < last);
}

#[test]
fn test_quiet_suppresses_output_but_not_exit_code() {
    let test_env = TestProject::new();
    test_env.write_file(
        "deps.json",
        r#"[{"name": "copyleft-pkg", "version": "2.0.0", "license": "GPL-3.0"}]"#,
    );

    let output = test_env.run(&[
        "check",
        "--input",
        "deps.json",
        "--permitted",
        "MIT",
        "--quiet",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_production_flag_skips_dev_dependencies() {
    let test_env = TestProject::new();
    test_env.write_file(
        "deps.json",
        r#"[
            {"name": "runtime-dep", "version": "1.0.0", "license": "MIT"},
            {"name": "test-harness", "version": "3.0.0", "license": "GPL-3.0", "dev": true}
        ]"#,
    );

    let output = test_env.run(&[
        "check",
        "--input",
        "deps.json",
        "--permitted",
        "MIT",
        "--production",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("runtime-dep@1.0.0"));
    assert!(!stdout.contains("test-harness"));
}

#[test]
fn test_malformed_whitelist_flag_is_fatal() {
    let test_env = TestProject::new();
    test_env.write_file(
        "deps.json",
        r#"[{"name": "left-pad", "version": "1.0.0", "license": "MIT"}]"#,
    );

    let output = test_env.run(&[
        "check",
        "--input",
        "deps.json",
        "--whitelist",
        "no-range-here",
    ]);

    assert!(!output.status.success());
    // Fatal config errors go to the error stream, not the report.
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no-range-here"));
}

#[test]
fn test_invalid_permitted_expression_fails_every_dependency() {
    let test_env = TestProject::new();
    test_env.write_file(
        "deps.json",
        r#"[
            {"name": "left-pad", "version": "1.0.0", "license": "MIT"},
            {"name": "optimist", "version": "0.6.0", "license": "GPL-2.0"}
        ]"#,
    );

    let output = test_env.run(&[
        "check",
        "--input",
        "deps.json",
        "--permitted",
        "definitely not an spdx expression",
        "--whitelist",
        "optimist@<=0.6.1",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    // The whitelisted entry is spared, everything else fails closed.
    assert!(stdout.contains("Approved by whitelist"));
    assert!(stdout.contains("NOT APPROVED"));
}

#[test]
fn test_unreadable_provenance_document_degrades_to_no_data() {
    let test_env = TestProject::new();
    test_env.write_file(
        "deps.json",
        r#"[{"name": "left-pad", "version": "1.0.0", "license": "MIT"}]"#,
    );
    test_env.write_file("provenance.json", "not json at all");

    let output = test_env.run(&[
        "check",
        "--input",
        "deps.json",
        "--permitted",
        "MIT",
        "--provenance-data",
        "provenance.json",
    ]);

    // The run completes; the dependency just has no provenance data.
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No file-level license information found from provenance.json"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Warning"));
}

#[test]
fn test_init_then_check_uses_config_file() {
    let test_env = TestProject::new();

    let init_output = test_env.run(&["init", "strict"]);
    assert!(init_output.status.success());

    test_env.write_file(
        "deps.json",
        r#"[{"name": "left-pad", "version": "1.0.0", "license": "MIT"}]"#,
    );

    let output = test_env.run(&["check", "--input", "deps.json"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Approved by rule"));
}

#[test]
fn test_config_show_and_validate() {
    let test_env = TestProject::new();

    let init_output = test_env.run(&["init", "permissive"]);
    assert!(init_output.status.success());

    let show_output = test_env.run(&["config", "--show"]);
    assert!(show_output.status.success());
    assert!(String::from_utf8_lossy(&show_output.stdout).contains("permitted"));

    let validate_output = test_env.run(&["config", "--validate"]);
    assert!(validate_output.status.success());
    assert!(String::from_utf8_lossy(&validate_output.stdout).contains("Configuration is valid"));
}

#[test]
fn test_output_file_flag() {
    let test_env = TestProject::new();
    test_env.write_file(
        "deps.json",
        r#"[{"name": "left-pad", "version": "1.0.0", "license": "MIT"}]"#,
    );

    let output = test_env.run(&[
        "check",
        "--input",
        "deps.json",
        "--permitted",
        "MIT",
        "--output",
        "report.txt",
    ]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let report = std::fs::read_to_string(test_env.dir.path().join("report.txt")).unwrap();
    assert!(report.contains("left-pad@1.0.0"));
}
