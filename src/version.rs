//! twinrun version information.
//!
//! ## Notes
//!
//! - The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.

/// The twinrun version string (for example, `0.1.0`).
pub const TWINRUN_VERSION: &str = env!("CARGO_PKG_VERSION");
