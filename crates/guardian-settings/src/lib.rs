//! Config parsing and resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{GuardianConfigV1, SCHEMA_CONFIG_V1};
pub use resolve::{FailOn, Overrides, ResolvedConfig};

/// Parse `guardian.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<GuardianConfigV1> {
    let cfg: GuardianConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config (file values + overrides + defaults).
pub fn resolve_config(
    cfg: GuardianConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
