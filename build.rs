//! Build script to compile the C reference reduction.

use std::env;

fn main() {
    println!("cargo:rustc-check-cfg=cfg(c_implementation_active)");
    // Check for C compiler compatibility and type
    let build = cc::Build::new();
    let compiler = match build.try_get_compiler() {
        Ok(compiler) => compiler,
        Err(e) => {
            println!("cargo:warning=No C compiler found ({}). C reference reduction disabled.", e);
            return;
        }
    };
    let is_gnu_like = compiler.is_like_gnu() || compiler.is_like_clang();
    let is_msvc = compiler.is_like_msvc();

    if !(is_gnu_like || is_msvc) {
        println!("cargo:warning=C compiler is not compatible (needs GCC, Clang, or MSVC). C reference reduction disabled.");
        return;
    }

    let compiler_name = if compiler.is_like_clang() {
        // Only Apple Clang is accepted; vanilla Clang shares Rust's LLVM backend
        let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
        if target_os != "macos" {
            println!("cargo:warning=Vanilla Clang detected. C reference reduction disabled (requires GCC, MSVC, or Apple Clang).");
            return;
        }
        "Apple Clang"
    } else if compiler.is_like_gnu() {
        "GCC"
    } else {
        "MSVC"
    };

    let mut build = cc::Build::new();

    // Auto-detect all C files in src/ directory
    let c_files = match glob::glob("src/**/*.c") {
        Ok(paths) => paths.filter_map(|entry| entry.ok()),
        Err(e) => {
            println!("cargo:warning=Invalid glob pattern ({}). C reference reduction disabled.", e);
            return;
        }
    };

    for file in c_files {
        println!("cargo:rerun-if-changed={}", file.display());
        build.file(file);
    }

    // No -ffast-math: the C baseline must keep strict index-order accumulation
    build.opt_level(3).flag_if_supported("-ffp-contract=off");

    if let Err(e) = build.try_compile("dot_reduce_c") {
        println!("cargo:warning=C compilation failed ({}). C reference reduction disabled.", e);
        return;
    }

    println!("cargo:rustc-cfg=c_implementation_active");
    println!("cargo:rustc-env=C_COMPILER_NAME={}", compiler_name);
}
