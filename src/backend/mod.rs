//! Execution backends.
//!
//! A backend is anything that can run a complete source snippet and report what the program wrote to
//! stdout, or which exception it died with. The harness knows exactly two of them, the trusted reference
//! semantics and the transpiled target, and addresses them through the closed [`BackendKind`] enum.
//!
//! ## Modules
//!
//! - `subprocess` - the default engine: run a command, feed it the snippet, enforce a time ceiling

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod subprocess;

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use twinrun_core::Snippet;

pub use subprocess::CommandEngine;

/// Which side of the comparison an execution belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Reference,
    Transpiled,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Reference => "reference",
            BackendKind::Transpiled => "transpiled",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An exception the program reported before exiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raised {
    pub kind: String,
    pub message: String,
}

/// Raw result of one execution, before it is turned into an `Outcome`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Execution {
    /// Everything written to stdout, including output produced before a raise.
    pub stdout: Vec<u8>,
    pub raised: Option<Raised>,
}

impl Execution {
    pub fn completed(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            raised: None,
        }
    }

    pub fn raised(stdout: impl Into<Vec<u8>>, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            raised: Some(Raised {
                kind: kind.into(),
                message: message.into(),
            }),
        }
    }
}

/// Errors that occur inside an engine, as opposed to errors raised by the program it runs.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("execution exceeded {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("process exited with {status} and no exception report\n{stderr}")]
    Crashed { status: String, stderr: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The capability every backend provides: run a snippet, return what it printed or raised.
///
/// Implementations must give each call its own capture scope; nothing written during one call may be
/// observed by another.
pub trait Engine: Send + Sync {
    /// Human-readable engine name for logs and reports.
    fn name(&self) -> &str;

    fn execute(&self, snippet: &Snippet) -> Result<Execution, BackendError>;
}

/// Exactly one engine per [`BackendKind`].
pub struct BackendPair {
    reference: Box<dyn Engine>,
    transpiled: Box<dyn Engine>,
}

impl BackendPair {
    pub fn new(reference: impl Engine + 'static, transpiled: impl Engine + 'static) -> Self {
        Self {
            reference: Box::new(reference),
            transpiled: Box::new(transpiled),
        }
    }

    pub fn get(&self, kind: BackendKind) -> &dyn Engine {
        match kind {
            BackendKind::Reference => self.reference.as_ref(),
            BackendKind::Transpiled => self.transpiled.as_ref(),
        }
    }
}

impl fmt::Debug for BackendPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendPair")
            .field("reference", &self.reference.name())
            .field("transpiled", &self.transpiled.name())
            .finish()
    }
}
