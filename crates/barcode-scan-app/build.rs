//! Exports the workspace `VERSION` file as `BARCODE_SCAN_VERSION`.

use std::path::{Path, PathBuf};

fn workspace_root(manifest_dir: &Path) -> &Path {
    manifest_dir
        .ancestors()
        .nth(2)
        .expect("crate must live under <root>/crates/<name>")
}

fn main() {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let version_file = workspace_root(&manifest_dir).join("VERSION");
    println!("cargo:rerun-if-changed={}", version_file.display());

    let contents = std::fs::read_to_string(&version_file)
        .unwrap_or_else(|error| panic!("cannot read {}: {error}", version_file.display()));
    let version = contents.trim();
    assert!(!version.is_empty(), "VERSION must not be blank");

    println!("cargo:rustc-env=BARCODE_SCAN_VERSION={version}");
}
