use guardian_settings::Overrides;
use tempfile::TempDir;

/// Overrides pointing the data dir at `tmp`.
pub fn data_dir(tmp: &TempDir) -> Overrides {
    Overrides {
        data_dir: Some(tmp.path().to_str().expect("utf8 temp dir").to_string()),
        ..Overrides::default()
    }
}

pub fn write(tmp: &TempDir, rel: &str, contents: &str) {
    let path = tmp.path().join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, contents).expect("write file");
}
