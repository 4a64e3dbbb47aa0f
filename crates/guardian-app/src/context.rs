use anyhow::Context;
use camino::Utf8PathBuf;
use guardian_domain::RuleEvaluator;
use guardian_repo::Storage;
use guardian_settings::{GuardianConfigV1, Overrides, ResolvedConfig};
use guardian_types::PathNormalizer;

/// Parse and resolve configuration. An empty string means "no config file".
pub fn load_config(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let cfg = if config_text.trim().is_empty() {
        GuardianConfigV1::default()
    } else {
        guardian_settings::parse_config_toml(config_text).context("parse config")?
    };
    guardian_settings::resolve_config(cfg, overrides).context("resolve config")
}

/// Resolved configuration plus the storage adapters it points at.
pub struct GuardianContext {
    pub config: ResolvedConfig,
    pub storage: Storage,
}

impl GuardianContext {
    pub fn new(config: ResolvedConfig) -> Self {
        let storage = Storage::open(Utf8PathBuf::from(config.data_dir.as_str()));
        Self { config, storage }
    }

    pub fn load(config_text: &str, overrides: Overrides) -> anyhow::Result<Self> {
        Ok(Self::new(load_config(config_text, overrides)?))
    }

    pub fn normalizer(&self) -> PathNormalizer {
        PathNormalizer::new(&self.config.path_prefix)
    }

    pub fn evaluator(&self) -> RuleEvaluator<'_> {
        RuleEvaluator::new(&self.storage.files, self.normalizer())
    }
}
