//! Conformance vocabulary registries.
//!
//! This module is the “front door” for the names the harness is keyed on: builtin functions under test
//! and the edge-case scenarios every builtin is exercised with.
//!
//! Callers work with **stable IDs** (e.g. `BuiltinFnId`, `ScenarioId`) and look up spellings and metadata
//! through registry tables instead of scattering string checks.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no IO, no side effects, no mutable globals.
//! - Spellings are the stable identity. Suite exclusions refer to scenarios by name, so a rename is a
//!   breaking change and is guarded by `tests/registry_guardrails.rs`.
//!
//! ## Examples
//! ```rust
//! use twinrun_core::lang::scenarios::{self, ScenarioId};
//!
//! assert_eq!(scenarios::from_str("NotImplemented"), Some(ScenarioId::NotImplemented));
//! assert_eq!(scenarios::as_str(ScenarioId::NoArgs), "noargs");
//! ```

pub mod builtins;
pub mod registry;
pub mod scenarios;
