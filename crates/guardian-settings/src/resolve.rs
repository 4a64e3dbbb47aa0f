use crate::model::{GuardianConfigV1, SCHEMA_CONFIG_V1};
use guardian_types::ids;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailOn {
    /// Any failing node fails the run.
    #[default]
    Advisory,
    /// Report only; the run always passes.
    Never,
}

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub data_dir: Option<String>,
    pub parallel: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub data_dir: String,
    pub path_prefix: String,
    pub parallel: bool,
    pub fail_on: FailOn,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            data_dir: ids::DEFAULT_DATA_DIR.to_string(),
            path_prefix: ids::DEFAULT_PATH_PREFIX.to_string(),
            parallel: false,
            fail_on: FailOn::Advisory,
        }
    }
}

pub fn resolve_config(
    cfg: GuardianConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }

    let mut resolved = ResolvedConfig::default();

    if let Some(data_dir) = overrides.data_dir.or(cfg.data_dir) {
        resolved.data_dir = non_empty("data_dir", data_dir)?;
    }
    if let Some(prefix) = cfg.path_prefix {
        resolved.path_prefix = non_empty("path_prefix", prefix)?;
    }
    if let Some(parallel) = overrides.parallel.or(cfg.parallel) {
        resolved.parallel = parallel;
    }
    if let Some(fail_on) = cfg.fail_on.as_deref() {
        resolved.fail_on = parse_fail_on(fail_on)?;
    }

    Ok(resolved)
}

fn non_empty(key: &str, value: String) -> anyhow::Result<String> {
    if value.trim().is_empty() {
        anyhow::bail!("{key} must not be empty");
    }
    Ok(value)
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "advisory" => Ok(FailOn::Advisory),
        "never" => Ok(FailOn::Never),
        other => anyhow::bail!("unknown fail_on: {other} (expected advisory|never)"),
    }
}
