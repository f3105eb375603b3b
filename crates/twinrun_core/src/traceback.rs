//! Classify the error report a program leaves on stderr.
//!
//! Both backends report an uncaught exception the CPython way: a traceback whose last line is
//! `ExceptionName: message` (or just `ExceptionName` when the message is empty). Only that last line is
//! inspected; everything above it is backend-specific noise.

/// The exception class and message recovered from a traceback tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracebackTail {
    pub kind: String,
    pub message: String,
}

/// Recover the raised exception from a program's stderr.
///
/// ## Parameters
/// - `stderr`: everything the program wrote to stderr.
///
/// ## Returns
/// - `Some(TracebackTail)` when the last non-empty line names an exception class.
/// - `None` when stderr is empty or its last line does not look like an exception report.
///
/// ## Notes
/// - Dotted names (`json.decoder.JSONDecodeError`) are reduced to their last segment so both backends
///   classify the same way regardless of module qualification.
/// - Indented lines are never a tail; they belong to the traceback body.
///
/// ## Examples
/// ```rust
/// use twinrun_core::traceback::classify_stderr;
///
/// let stderr = "Traceback (most recent call last):\n  File \"<stdin>\", line 1, in <module>\nTypeError: ascii() takes exactly one argument (0 given)\n";
/// let tail = classify_stderr(stderr).unwrap();
/// assert_eq!(tail.kind, "TypeError");
/// assert_eq!(tail.message, "ascii() takes exactly one argument (0 given)");
/// ```
pub fn classify_stderr(stderr: &str) -> Option<TracebackTail> {
    let line = stderr.lines().rev().find(|l| !l.trim().is_empty())?;
    let line = line.trim_end();
    if line.starts_with(char::is_whitespace) {
        return None;
    }

    let (name, message) = match line.split_once(": ") {
        Some((name, message)) => (name, message),
        None => (line.strip_suffix(':').unwrap_or(line), ""),
    };

    let kind = exception_name(name)?;
    Some(TracebackTail {
        kind: kind.to_string(),
        message: message.to_string(),
    })
}

fn exception_name(qualified: &str) -> Option<&str> {
    if !qualified.split('.').all(is_identifier) {
        return None;
    }
    let last = qualified.rsplit('.').next()?;
    last.starts_with(|c: char| c.is_ascii_uppercase()).then_some(last)
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// Return the last `max_lines` lines of a text, for crash reports.
pub fn tail_lines(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}
