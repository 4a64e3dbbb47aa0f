//! Stable identifiers for issue rules, checksum modes, and storage defaults.

// Issue rules
pub const RULE_MISSING: &str = "missing";
pub const RULE_FORBID: &str = "forbid";
pub const RULE_REQUIRE: &str = "require";
pub const RULE_CHECKSUM: &str = "checksum";

// Checksum modes. Drift comparison runs only for this exact value.
pub const CHECKSUM_SHA256: &str = "sha256";

// Storage
pub const DEFAULT_DATA_DIR: &str = "guardian-data";
pub const DEFAULT_PATH_PREFIX: &str = "guardian-data/";
pub const NODES_DIR: &str = "nodes";
pub const ADVISORIES_DIR: &str = "advisories";
