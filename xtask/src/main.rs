//! Developer tasks (schema generation, explain coverage, fixture conformance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use guardian_test_util::normalize_nondeterministic;
use schemars::schema_for;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|_| std::env::current_dir())
        .unwrap_or_else(|_| PathBuf::from("."));

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(manifest_dir)
    } else {
        manifest_dir
    }
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_scan_schema() -> schemars::Schema {
    schema_for!(guardian_types::ScanReport)
}

fn generate_node_schema() -> schemars::Schema {
    schema_for!(guardian_types::Node)
}

fn generate_advisory_schema() -> schemars::Schema {
    schema_for!(guardian_types::Advisory)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(guardian_settings::GuardianConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "guardian.scan.v1.json",
            generate: generate_scan_schema,
        },
        SchemaSpec {
            filename: "guardian.node.v1.json",
            generate: generate_node_schema,
        },
        SchemaSpec {
            filename: "guardian.advisory.v1.json",
            generate: generate_advisory_schema,
        },
        SchemaSpec {
            filename: "guardian.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {}", name);
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {}", name);
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Run the guardian binary on tests/fixtures and compare reports");
    eprintln!("  explain-coverage  Validate all rule ids have explanations");
}

/// No absolute paths, no `..`, forward slashes only.
fn is_clean_path(path: &str) -> bool {
    !(path.starts_with('/')
        || path.contains("..")
        || path.contains('\\')
        || (path.len() >= 2 && path.as_bytes()[1] == b':'))
}

/// Copy a fixture tree into `dest` so the run's writes never touch the checked-in fixture.
fn copy_tree(src: &Path, dest: &Path) -> anyhow::Result<()> {
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("copy {}", entry.path().display()))?;
        }
    }
    Ok(())
}

/// Run the built binary on every fixture under tests/fixtures/.
///
/// Per fixture:
/// 1. the produced report validates against the generated scan schema
/// 2. every issue path is clean
/// 3. the normalized report equals `expected.report.json` when present
fn conform() -> anyhow::Result<()> {
    let schema = serde_json::to_value(generate_scan_schema()).context("scan schema to json")?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile scan schema: {}", e))?;

    let guardian_bin = project_root().join("target").join("debug").join("guardian");
    #[cfg(target_os = "windows")]
    let guardian_bin = guardian_bin.with_extension("exe");

    if !guardian_bin.exists() {
        bail!(
            "guardian binary not found at {}.\nRun `cargo build -p guardian-cli` first.",
            guardian_bin.display()
        );
    }

    let mut errors = Vec::new();
    let mut fixture_count = 0;

    let mut fixtures: Vec<PathBuf> = fs::read_dir(fixtures_dir())
        .context("Failed to read tests/fixtures/")?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.join("guardian-data").is_dir())
        .collect();
    fixtures.sort();

    for fixture_dir in fixtures {
        let name = fixture_dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let work = tempfile::tempdir().context("Failed to create temp dir")?;
        copy_tree(&fixture_dir, work.path())?;
        let report_out = work.path().join("report.json");

        let output = std::process::Command::new(&guardian_bin)
            .current_dir(work.path())
            .args(["check", "--report-out"])
            .arg(&report_out)
            .output()
            .with_context(|| format!("Failed to run guardian on fixture '{}'", name))?;

        if !matches!(output.status.code(), Some(0 | 2)) {
            errors.push(format!(
                "fixture '{}': guardian exited with {:?}: {}",
                name,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            ));
            continue;
        }

        let report: Value = serde_json::from_str(
            &fs::read_to_string(&report_out)
                .with_context(|| format!("fixture '{}': no report written", name))?,
        )
        .with_context(|| format!("Failed to parse report for fixture '{}'", name))?;

        for err in validator.iter_errors(&report) {
            errors.push(format!("fixture '{}': schema validation: {}", name, err));
        }

        let issue_paths = report["results"]
            .as_array()
            .into_iter()
            .flatten()
            .flat_map(|r| r["issues"].as_array().into_iter().flatten())
            .filter_map(|i| i["path"].as_str());
        for path in issue_paths {
            if !is_clean_path(path) {
                errors.push(format!("fixture '{}': issue path '{}' is not clean", name, path));
            }
        }

        let golden_path = fixture_dir.join("expected.report.json");
        if golden_path.exists() {
            let golden: Value = serde_json::from_str(&fs::read_to_string(&golden_path)?)
                .with_context(|| format!("Failed to parse {}", golden_path.display()))?;
            if normalize_nondeterministic(report) != normalize_nondeterministic(golden) {
                errors.push(format!(
                    "fixture '{}': output differs from expected.report.json",
                    name
                ));
            } else {
                println!("  ✓ fixture '{}' matches expected report", name);
            }
        } else {
            println!("  ✓ fixture '{}' produces a valid report (no golden file)", name);
        }
        fixture_count += 1;
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!("Conformance failed with {} errors", errors.len());
    }

    println!("\n✓ All {} fixtures pass conformance checks!", fixture_count);
    Ok(())
}

/// Validate that every rule id has a complete explanation.
fn explain_coverage() -> anyhow::Result<()> {
    let rules = guardian_types::explain::all_rules();
    let mut errors = Vec::new();

    for rule in rules {
        match guardian_types::lookup_explanation(rule) {
            Some(exp) => {
                if exp.title.is_empty() {
                    errors.push(format!("Rule '{}' has empty title", rule));
                }
                if exp.description.is_empty() {
                    errors.push(format!("Rule '{}' has empty description", rule));
                }
                if exp.remediation.is_empty() {
                    errors.push(format!("Rule '{}' has empty remediation", rule));
                }
                if exp.examples.before.is_empty() || exp.examples.after.is_empty() {
                    errors.push(format!("Rule '{}' is missing an example", rule));
                }
            }
            None => errors.push(format!("Rule '{}' has no explanation", rule)),
        }
    }

    if errors.is_empty() {
        println!("✓ {} rules have explanations", rules.len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!("Explain coverage validation failed with {} errors", errors.len())
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
