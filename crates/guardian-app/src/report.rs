use anyhow::Context;
use camino::Utf8Path;
use guardian_types::{ScanReport, SCHEMA_SCAN_V1};
use tracing::debug;

/// Parse a report written by `check`. Reports of another schema are rejected.
pub fn parse_report_json(text: &str) -> anyhow::Result<ScanReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if schema != SCHEMA_SCAN_V1 {
        anyhow::bail!("unknown report schema: {schema:?} (expected {SCHEMA_SCAN_V1})");
    }

    serde_json::from_value(value).context("parse guardian scan report")
}

pub fn serialize_report(report: &ScanReport) -> anyhow::Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(report).context("serialize scan report")?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub fn write_report(path: &Utf8Path, report: &ScanReport) -> anyhow::Result<()> {
    write_bytes(path, &serialize_report(report)?)
}

pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes())
}

fn write_bytes(path: &Utf8Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write {path}"))?;
    debug!(%path, bytes = bytes.len(), "wrote output");
    Ok(())
}
