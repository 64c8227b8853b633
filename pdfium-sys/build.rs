use std::env;
use std::path::{Path, PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PDFIUM_LIB_DIR");

    let target = env::var("TARGET").unwrap();

    // Priority 1: Manual override via PDFIUM_LIB_DIR
    if let Ok(lib_dir) = env::var("PDFIUM_LIB_DIR") {
        println!("cargo:warning=Using PDFIUM_LIB_DIR: {}", lib_dir);
        setup_linking(Some(&PathBuf::from(lib_dir)), &target);
        return;
    }

    // Priority 2: A local build next to the workspace (out/Release)
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let release_dir = manifest_dir.parent().unwrap().join("out/Release");

    if has_library(&release_dir, &target) {
        println!("cargo:warning=Using development build: {}", release_dir.display());
        setup_linking(Some(&release_dir), &target);
        return;
    }

    // Priority 3: Whatever the system linker can find
    setup_linking(None, &target);
}

fn library_name(target: &str) -> &'static str {
    if target.contains("windows") {
        "pdfium.dll"
    } else if target.contains("apple") {
        "libpdfium.dylib"
    } else {
        "libpdfium.so"
    }
}

fn has_library(dir: &Path, target: &str) -> bool {
    dir.join(library_name(target)).exists()
}

fn setup_linking(lib_dir: Option<&PathBuf>, target: &str) {
    println!("cargo:rustc-link-lib=dylib=pdfium");

    let Some(lib_dir) = lib_dir else {
        return;
    };
    println!("cargo:rustc-link-search=native={}", lib_dir.display());

    // Add rpath for runtime library discovery (macOS/Linux)
    if target.contains("apple") || target.contains("linux") {
        println!("cargo:rustc-link-arg=-Wl,-rpath,{}", lib_dir.display());
    }
}
