//! Build Script for Quote Proxy
//!
//! Emits the `coverage` cfg when the crate is built under an LLVM coverage run.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CARGO_LLVM_COV");
    println!("cargo:rerun-if-env-changed=LLVM_PROFILE_FILE");

    if std::env::var("CARGO_LLVM_COV").is_ok()
        || std::env::var("LLVM_PROFILE_FILE").is_ok()
        || std::env::var("RUSTFLAGS")
            .map(|f| f.contains("instrument-coverage"))
            .unwrap_or(false)
    {
        println!("cargo:rustc-cfg=coverage");
    }
}
