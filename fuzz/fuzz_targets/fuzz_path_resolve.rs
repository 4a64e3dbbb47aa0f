//! Fuzz target for storage-root path resolution.
//!
//! Goal: no declared path ever resolves outside the storage root.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_path_resolve
//! ```

#![no_main]

use guardian_repo::FsFiles;
use guardian_types::PathNormalizer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|path: &str| {
    if path.len() > 1024 {
        return;
    }

    let normalized = PathNormalizer::default().normalize(path);
    let files = FsFiles::new("/srv/guardian-data");
    if let Ok(resolved) = files.resolve(normalized) {
        assert!(resolved.starts_with("/srv/guardian-data"), "{path:?} -> {resolved}");
        assert!(!resolved.as_str().contains("/../"), "{path:?} -> {resolved}");
    }
});
