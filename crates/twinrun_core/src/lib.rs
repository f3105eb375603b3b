//! Provide the pure semantics of the twinrun conformance harness.
//!
//! This crate holds the deterministic pieces that do not touch processes or the filesystem:
//! - snippets and their normalization,
//! - execution outcomes and the reference-vs-transpiled comparator,
//! - traceback-tail classification of raised errors,
//! - Python-style `ascii()` string escaping,
//! - the registry-first vocabularies (builtin functions and edge-case scenarios).
//!
//! ## Notes
//!
//! - This is a “semantic core” crate: **no IO**, no global mutable state, no dependencies.
//! - Backends, suites, and reporting live in the `twinrun` crate and build on these types.

pub mod compare;
pub mod lang;
pub mod outcome;
pub mod snippet;
pub mod strings;
pub mod traceback;

pub use compare::{ComparisonResult, compare};
pub use outcome::{FailureKind, Outcome};
pub use snippet::Snippet;
