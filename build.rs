use std::env;
use std::path::PathBuf;

// Bake the package root into the binary so bundled definitions and the
// tests tree resolve from installed copies too.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=default_models");
    println!("cargo:rerun-if-env-changed=RAMANFIT_ROOT_HINT");

    let root = env::var_os("RAMANFIT_ROOT_HINT")
        .or_else(|| env::var_os("CARGO_MANIFEST_DIR"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let root = root.canonicalize().unwrap_or(root);

    if !root.join("default_models").is_dir() {
        println!(
            "cargo:warning=no default_models directory under {}; bundled definitions will be empty",
            root.display()
        );
    }
    println!("cargo:rustc-env=RAMANFIT_PACKAGE_ROOT={}", root.display());
}
