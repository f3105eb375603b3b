//! Compare a reference outcome against a transpiled outcome.
//!
//! ## Rules
//! - `Output` vs `Output`: byte-identical or a mismatch. No normalization, no trimming; line order and
//!   trailing newlines are significant.
//! - `Failure` vs `Failure`: only the raised exception class must agree. Messages are phrased per runtime
//!   and are not compared.
//! - A harness-side failure (timeout, crash, unavailable backend) on either side is always a mismatch: it
//!   says nothing about the program, even when both sides fail the same way.
//! - `Output` vs `Failure` (either way round): always a mismatch.
//!
//! A mismatch carries both outcomes and a description that contains them verbatim, followed by an escaped
//! line listing so invisible differences (trailing spaces, `\r`, lookalike code points) stay visible.
//! Lines are split on raw bytes; a line that is not valid UTF-8 is shown as a `b'...'` literal.

use std::fmt::Write as _;

use crate::outcome::Outcome;
use crate::strings::{py_ascii, py_bytes_repr};

/// Verdict of comparing two outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonResult {
    Match,
    Mismatch {
        reference: Outcome,
        transpiled: Outcome,
        diff: String,
    },
}

impl ComparisonResult {
    pub fn is_match(&self) -> bool {
        matches!(self, ComparisonResult::Match)
    }

    /// The mismatch description, if any.
    pub fn diff(&self) -> Option<&str> {
        match self {
            ComparisonResult::Match => None,
            ComparisonResult::Mismatch { diff, .. } => Some(diff),
        }
    }
}

/// Compare the reference outcome with the transpiled outcome.
///
/// ## Examples
/// ```rust
/// use twinrun_core::{compare, FailureKind, Outcome};
///
/// let a = Outcome::failure(FailureKind::raised("TypeError"), "ascii() takes exactly one argument (0 given)");
/// let b = Outcome::failure(FailureKind::raised("TypeError"), "expected 1 argument, got 0");
/// assert!(compare(a, b).is_match());
///
/// let timeout = Outcome::failure(FailureKind::Timeout, "exceeded 10000ms");
/// assert!(!compare(timeout.clone(), timeout).is_match());
///
/// let c = Outcome::output("'aaa'\n");
/// let d = Outcome::output("'aaa'");
/// assert!(!compare(c, d).is_match());
/// ```
pub fn compare(reference: Outcome, transpiled: Outcome) -> ComparisonResult {
    let same = match (&reference, &transpiled) {
        (Outcome::Output(r), Outcome::Output(t)) => r == t,
        (Outcome::Failure { kind: r, .. }, Outcome::Failure { kind: t, .. }) => r == t && !r.is_harness_side(),
        _ => false,
    };

    if same {
        return ComparisonResult::Match;
    }

    let diff = describe_mismatch(&reference, &transpiled);
    ComparisonResult::Mismatch {
        reference,
        transpiled,
        diff,
    }
}

/// Build the human-readable mismatch description.
pub fn describe_mismatch(reference: &Outcome, transpiled: &Outcome) -> String {
    let mut out = String::new();
    // Writing to String cannot fail.
    let _ = writeln!(out, "{}", headline(reference, transpiled));
    push_verbatim(&mut out, "reference", reference);
    push_verbatim(&mut out, "transpiled", transpiled);

    if let (Outcome::Output(r), Outcome::Output(t)) = (reference, transpiled) {
        out.push_str(&line_diff(r, t));
    }
    out
}

fn headline(reference: &Outcome, transpiled: &Outcome) -> String {
    match (reference, transpiled) {
        (Outcome::Output(r), Outcome::Output(t)) => match first_divergent_line(r, t) {
            Some(line) => format!("output differs (first divergence at line {line})"),
            None => "output differs".to_string(),
        },
        (Outcome::Failure { kind: r, .. }, Outcome::Failure { kind: t, .. })
            if r.is_harness_side() || t.is_harness_side() =>
        {
            format!("harness failure, no program behavior to compare: reference {r}, transpiled {t}")
        }
        (Outcome::Failure { kind: r, .. }, Outcome::Failure { kind: t, .. }) => {
            format!("failure kinds differ: reference {r}, transpiled {t}")
        }
        (Outcome::Output(_), Outcome::Failure { kind, .. }) => {
            format!("reference produced output but transpiled failed with {kind}")
        }
        (Outcome::Failure { kind, .. }, Outcome::Output(_)) => {
            format!("reference failed with {kind} but transpiled produced output")
        }
    }
}

fn push_verbatim(out: &mut String, label: &str, outcome: &Outcome) {
    let _ = writeln!(out, "--- {label}: {} ---", outcome.summary());
    if let Outcome::Output(bytes) = outcome {
        if std::str::from_utf8(bytes).is_err() {
            let _ = writeln!(out, "(not valid UTF-8, shown as bytes)\n{}", py_bytes_repr(bytes));
            return;
        }
    }
    let text = outcome.to_string();
    out.push_str(&text);
    if !text.ends_with('\n') {
        out.push_str("\n(no trailing newline)\n");
    }
}

fn split_lines(bytes: &[u8]) -> Vec<&[u8]> {
    bytes.split_inclusive(|&b| b == b'\n').collect()
}

fn escape_line(line: &[u8]) -> String {
    match std::str::from_utf8(line) {
        Ok(text) => py_ascii(text),
        Err(_) => py_bytes_repr(line),
    }
}

/// Return the 1-based number of the first line that differs, if the texts differ at all.
pub fn first_divergent_line(reference: &[u8], transpiled: &[u8]) -> Option<usize> {
    if reference == transpiled {
        return None;
    }
    let r = split_lines(reference);
    let t = split_lines(transpiled);
    let max_lines = r.len().max(t.len());
    (0..max_lines).find(|&i| r.get(i) != t.get(i)).map(|i| i + 1)
}

fn line_diff(reference: &[u8], transpiled: &[u8]) -> String {
    let r = split_lines(reference);
    let t = split_lines(transpiled);
    let max_lines = r.len().max(t.len());

    let mut diff = String::from("--- line diff (escaped) ---\n");
    for i in 0..max_lines {
        let orig = r.get(i);
        let new = t.get(i);
        if orig == new {
            continue;
        }
        if let Some(line) = orig {
            let _ = writeln!(diff, "-{:4} | {}", i + 1, escape_line(line));
        }
        if let Some(line) = new {
            let _ = writeln!(diff, "+{:4} | {}", i + 1, escape_line(line));
        }
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::FailureKind;

    #[test]
    fn identical_output_matches() {
        let result = compare(Outcome::output("'aaa'\n"), Outcome::output("'aaa'\n"));
        assert_eq!(result, ComparisonResult::Match);
    }

    #[test]
    fn trailing_newline_is_significant() {
        let result = compare(Outcome::output("x\n"), Outcome::output("x"));
        let diff = result.diff().unwrap();
        assert!(diff.contains("first divergence at line 1"), "{diff}");
        assert!(diff.contains(r"-   1 | 'x\n'"), "{diff}");
        assert!(diff.contains("+   1 | 'x'"), "{diff}");
    }

    #[test]
    fn line_order_is_significant() {
        let result = compare(Outcome::output("a\nb\n"), Outcome::output("b\na\n"));
        assert!(!result.is_match());
    }

    #[test]
    fn no_unicode_normalization() {
        // precomposed vs combining sequence
        let result = compare(Outcome::output("\u{e9}\n"), Outcome::output("e\u{301}\n"));
        assert!(!result.is_match());
    }

    #[test]
    fn failure_messages_may_differ() {
        let r = Outcome::failure(FailureKind::raised("TypeError"), "ascii() takes exactly one argument (0 given)");
        let t = Outcome::failure(FailureKind::raised("TypeError"), "ascii expected 1 argument");
        assert!(compare(r, t).is_match());
    }

    #[test]
    fn failure_kinds_must_agree() {
        let r = Outcome::failure(FailureKind::raised("TypeError"), "x");
        let t = Outcome::failure(FailureKind::raised("ValueError"), "x");
        let result = compare(r, t);
        assert!(result.diff().unwrap().contains("reference TypeError, transpiled ValueError"));
    }

    #[test]
    fn cross_variant_is_always_mismatch() {
        let r = Outcome::output("");
        let t = Outcome::failure(FailureKind::Timeout, "exceeded 10s");
        let result = compare(r.clone(), t.clone());
        match result {
            ComparisonResult::Mismatch {
                reference,
                transpiled,
                diff,
            } => {
                assert_eq!(reference, r);
                assert_eq!(transpiled, t);
                assert!(diff.contains("transpiled failed with timeout"));
                assert!(diff.contains("timeout: exceeded 10s"));
            }
            ComparisonResult::Match => panic!("expected mismatch"),
        }
    }

    #[test]
    fn mismatch_contains_both_outcomes_verbatim() {
        let r = Outcome::output("'\\xfcberm\\xf6hren'\n");
        let t = Outcome::output("'übermöhren'\n");
        let diff = compare(r, t).diff().unwrap().to_string();
        assert!(diff.contains("'\\xfcberm\\xf6hren'\n"));
        assert!(diff.contains("'übermöhren'\n"));
    }

    #[test]
    fn harness_failures_never_match() {
        for kind in [FailureKind::Timeout, FailureKind::Crashed, FailureKind::Unavailable] {
            let result = compare(Outcome::failure(kind.clone(), "a"), Outcome::failure(kind.clone(), "a"));
            let diff = result.diff().unwrap();
            assert!(
                diff.contains(&format!("harness failure, no program behavior to compare: reference {kind}")),
                "{diff}"
            );
        }
        let result = compare(
            Outcome::failure(FailureKind::raised("TypeError"), "x"),
            Outcome::failure(FailureKind::Crashed, "segfault"),
        );
        assert!(result.diff().unwrap().contains("transpiled crashed"));
    }

    #[test]
    fn invalid_utf8_divergence_stays_visible() {
        let result = compare(Outcome::output(&b"ok\n\xff\n"[..]), Outcome::output(&b"ok\n\xfe\n"[..]));
        let diff = result.diff().unwrap();
        assert!(diff.starts_with("output differs (first divergence at line 2)"), "{diff}");
        assert!(diff.contains(r"b'ok\n\xff\n'"), "{diff}");
        assert!(diff.contains(r"b'ok\n\xfe\n'"), "{diff}");
        assert!(diff.contains(r"-   2 | b'\xff\n'"), "{diff}");
        assert!(diff.contains(r"+   2 | b'\xfe\n'"), "{diff}");
        assert!(!diff.contains('\u{fffd}'), "{diff}");
    }

    #[test]
    fn divergence_line_is_one_based() {
        assert_eq!(first_divergent_line(b"a\nb\nc\n", b"a\nb\nd\n"), Some(3));
        assert_eq!(first_divergent_line(b"a\n", b"a\nb\n"), Some(2));
        assert_eq!(first_divergent_line(b"same", b"same"), None);
        assert_eq!(first_divergent_line(b"a\n\xff", b"a\n\xfe"), Some(2));
    }
}
