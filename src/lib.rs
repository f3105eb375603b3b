#![forbid(unsafe_code)]
//! twinrun: differential conformance harness for a Python-to-JavaScript transpiler.
//!
//! A snippet runs on a reference backend (CPython) and on a transpiled backend; the observable
//! outcomes must match byte for byte. Suites enumerate builtin functions against a fixed catalog of
//! edge-case scenarios, with per-function exclusions for known gaps.
//!
//! ## Layout
//!
//! - [`backend`]: the engine capability and the subprocess engine
//! - [`runner`]: executes one snippet on one backend, converting every error into an outcome
//! - [`suite`]: pair enumeration, exclusions, code cases and reporting
//! - [`config`]: the TOML manifest and configuration errors
//! - [`cli`]: the `twinrun` binary
//!
//! Pure semantics (snippets, outcomes, the comparator, the scenario registry) live in `twinrun_core`.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli`, `backend` and `suite`
//!   modules enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod backend;
pub mod cli;
pub mod config;
pub mod runner;
pub mod suite;
pub mod suites;
pub mod version;

pub use backend::{BackendKind, BackendPair, CommandEngine, Engine, Execution};
pub use config::{ConfigError, Manifest};
pub use suite::{ConformanceSuite, ExclusionSet, SuiteConfig, SuiteReport};
pub use twinrun_core::{ComparisonResult, FailureKind, Outcome, Snippet, compare};
