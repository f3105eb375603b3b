//! Layering guardrails to keep the semantic core free of dependencies.
//!
//! `twinrun_core` holds pure, IO-free semantics. Processes, async runtimes and serialization belong to the
//! `twinrun` crate. This test scans the core crate's `Cargo.toml` and fails if it grows a `[dependencies]` entry.

#[test]
fn semantic_core_has_no_dependencies() {
    let manifest = include_str!("../crates/twinrun_core/Cargo.toml");
    let mut in_dependencies = false;

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        panic!("`twinrun_core` must stay dependency-free, found: {line}");
    }
}

#[test]
fn core_crate_is_a_path_dependency_of_the_harness() {
    let manifest = include_str!("../Cargo.toml");
    assert!(
        manifest
            .lines()
            .any(|line| line.trim_start().starts_with("twinrun_core = { path = \"crates/twinrun_core\" }")),
        "the harness must depend on the workspace core crate"
    );
}
