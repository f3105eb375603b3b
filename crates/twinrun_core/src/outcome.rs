//! Execution outcomes.
//!
//! An [`Outcome`] is the externally observable result of running one snippet on one backend: either
//! everything written to stdout, or a classified failure. Exactly one of the two is ever present; a
//! successful run that prints nothing is `Output(b"")`.

use std::fmt;

use crate::strings::py_bytes_repr;

/// Classification of a failed execution.
///
/// ## Notes
/// - `Raised` carries the exception class name reported by the program (`TypeError`, `ValueError`, ...).
/// - The remaining kinds are produced by the harness itself and never by a snippet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The program raised an exception of the named class.
    Raised(String),
    /// The execution exceeded its time ceiling and was killed.
    Timeout,
    /// The program died without a classifiable error report.
    Crashed,
    /// The backend could not be started at all.
    Unavailable,
}

impl FailureKind {
    pub fn raised(name: impl Into<String>) -> Self {
        FailureKind::Raised(name.into())
    }

    /// Short label used in reports (`TypeError`, `timeout`, ...).
    pub fn label(&self) -> &str {
        match self {
            FailureKind::Raised(name) => name,
            FailureKind::Timeout => "timeout",
            FailureKind::Crashed => "crashed",
            FailureKind::Unavailable => "unavailable",
        }
    }

    /// Whether the failure originates from the harness rather than the program under test.
    pub fn is_harness_side(&self) -> bool {
        !matches!(self, FailureKind::Raised(_))
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Captured result of one execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Everything written to stdout, verbatim.
    Output(Vec<u8>),
    /// An unrecoverable error raised during execution.
    Failure { kind: FailureKind, message: String },
}

impl Outcome {
    pub fn output(bytes: impl Into<Vec<u8>>) -> Self {
        Outcome::Output(bytes.into())
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Outcome::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }

    pub fn stdout(&self) -> Option<&[u8]> {
        match self {
            Outcome::Output(bytes) => Some(bytes),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<&FailureKind> {
        match self {
            Outcome::Output(_) => None,
            Outcome::Failure { kind, .. } => Some(kind),
        }
    }

    /// One-line summary, e.g. `output (12 bytes)` or `failure TypeError`.
    pub fn summary(&self) -> String {
        match self {
            Outcome::Output(bytes) => format!("output ({} bytes)", bytes.len()),
            Outcome::Failure { kind, .. } => format!("failure {kind}"),
        }
    }
}

impl fmt::Display for Outcome {
    /// Render the outcome verbatim: captured output as-is (as a `b'...'` literal when it is not valid UTF-8),
    /// or the failure as `Kind: message`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Output(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => f.write_str(text),
                Err(_) => f.write_str(&py_bytes_repr(bytes)),
            },
            Outcome::Failure { kind, message } if message.is_empty() => write!(f, "{kind}"),
            Outcome::Failure { kind, message } => write!(f, "{kind}: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_run_is_empty_output() {
        let outcome = Outcome::output(Vec::new());
        assert_eq!(outcome.stdout(), Some(&b""[..]));
        assert!(!outcome.is_failure());
        assert_eq!(outcome.summary(), "output (0 bytes)");
    }

    #[test]
    fn invalid_utf8_output_displays_as_bytes() {
        assert_eq!(Outcome::output(&b"ok\n\xff"[..]).to_string(), r"b'ok\n\xff'");
        assert_eq!(Outcome::output("caf\u{e9}\n").to_string(), "caf\u{e9}\n");
    }

    #[test]
    fn failure_displays_kind_and_message() {
        let outcome = Outcome::failure(FailureKind::raised("TypeError"), "bad operand");
        assert_eq!(outcome.to_string(), "TypeError: bad operand");
        assert_eq!(outcome.failure_kind(), Some(&FailureKind::Raised("TypeError".to_string())));
        assert_eq!(outcome.stdout(), None);
    }

    #[test]
    fn harness_side_kinds_are_flagged() {
        assert!(FailureKind::Timeout.is_harness_side());
        assert!(FailureKind::Unavailable.is_harness_side());
        assert!(!FailureKind::raised("ValueError").is_harness_side());
        assert_eq!(Outcome::failure(FailureKind::Timeout, "").to_string(), "timeout");
    }
}
