//! Define shared string helpers (Python-style escaping + snippet text normalization).
//!
//! ## Notes
//! - **Escaping model**: [`py_ascii`] reproduces Python's `ascii()` on a `str` exactly. Output is compared
//!   byte-for-byte between backends, so the escape tiers are a format contract:
//!   `\xHH` up to U+00FF, `\uHHHH` up to U+FFFF, `\UHHHHHHHH` above that (full scalar, never a surrogate pair),
//!   always lowercase hex.
//! - **Quote selection** follows `repr()`: single quotes unless the text contains `'` and no `"`.
//! - [`py_bytes_repr`] is the `bytes` counterpart, for output that is not valid UTF-8.

use std::fmt::Write as _;

/// Render a string the way Python's `ascii()` renders a `str` object.
///
/// ## Parameters
/// - `s`: the text to render.
///
/// ## Returns
/// - (`String`): a quoted, pure-ASCII literal (e.g. `'\xfcber'`).
///
/// ## Examples
/// ```rust
/// use twinrun_core::strings::py_ascii;
///
/// assert_eq!(py_ascii("aaa"), "'aaa'");
/// assert_eq!(py_ascii("übermöhren"), r"'\xfcberm\xf6hren'");
/// assert_eq!(py_ascii("a𓈈"), r"'a\U00013208'");
/// ```
pub fn py_ascii(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for ch in s.chars() {
        push_escaped(&mut out, ch, quote);
    }
    out.push(quote);
    out
}

fn push_escaped(out: &mut String, ch: char, quote: char) {
    let cp = ch as u32;
    // Writing to String cannot fail.
    match ch {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if cp < 0x20 || cp == 0x7f => {
            let _ = write!(out, "\\x{:02x}", c as u32);
        }
        c if c.is_ascii() => out.push(c),
        _ if cp <= 0xff => {
            let _ = write!(out, "\\x{cp:02x}");
        }
        _ if cp <= 0xffff => {
            let _ = write!(out, "\\u{cp:04x}");
        }
        _ => {
            let _ = write!(out, "\\U{cp:08x}");
        }
    }
}

/// Remove the common leading indentation from a block of source text.
///
/// Hand-written snippets are usually embedded as indented raw strings; this normalizes them into a
/// standalone program once, at construction time.
///
/// ## Parameters
/// - `source`: indented source text.
///
/// ## Returns
/// - (`String`): the text with one leading newline dropped, the shared margin of spaces/tabs removed from
///   every line, and whitespace-only lines emptied.
///
/// ## Notes
/// - Whitespace-only lines do not participate in computing the margin.
/// - Line order and the final newline structure are preserved.
pub fn dedent(source: &str) -> String {
    let body = source
        .strip_prefix("\r\n")
        .or_else(|| source.strip_prefix('\n'))
        .unwrap_or(source);

    let margin = body
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(leading_whitespace)
        .reduce(common_prefix)
        .unwrap_or("");

    body.split('\n')
        .map(|line| if line.trim().is_empty() { "" } else { &line[margin.len()..] })
        .collect::<Vec<_>>()
        .join("\n")
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start_matches([' ', '\t']).len()]
}

/// Longest shared prefix of two runs of spaces and tabs (ASCII, so any byte index is a char boundary).
fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let shared = a.bytes().zip(b.bytes()).take_while(|(x, y)| x == y).count();
    &a[..shared]
}

/// Render bytes the way Python's `repr()` renders a `bytes` object.
///
/// Used for captured output that is not valid UTF-8, so every divergent byte stays visible.
///
/// ## Examples
/// ```rust
/// use twinrun_core::strings::py_bytes_repr;
///
/// assert_eq!(py_bytes_repr(b"ok\n\xff"), r"b'ok\n\xff'");
/// ```
pub fn py_bytes_repr(bytes: &[u8]) -> String {
    let quote = if bytes.contains(&b'\'') && !bytes.contains(&b'"') { b'"' } else { b'\'' };
    let mut out = String::with_capacity(bytes.len() + 3);
    out.push('b');
    out.push(char::from(quote));
    for &byte in bytes {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b if b == quote => {
                out.push('\\');
                out.push(char::from(b));
            }
            0x20..=0x7e => out.push(char::from(byte)),
            _ => {
                let _ = write!(out, "\\x{byte:02x}");
            }
        }
    }
    out.push(char::from(quote));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_leaves_plain_text_unescaped() {
        assert_eq!(py_ascii("aaa"), "'aaa'");
        assert_eq!(py_ascii(""), "''");
    }

    #[test]
    fn ascii_escapes_latin1_range_with_two_digits() {
        assert_eq!(py_ascii("übermöhren"), r"'\xfcberm\xf6hren'");
        assert_eq!(py_ascii("\u{a0}"), r"'\xa0'");
    }

    #[test]
    fn ascii_escapes_bmp_with_four_digits() {
        assert_eq!(py_ascii("バタビア"), r"'\u30d0\u30bf\u30d3\u30a2'");
        assert_eq!(py_ascii("\u{100}"), r"'\u0100'");
    }

    #[test]
    fn ascii_escapes_supplementary_plane_with_eight_digits() {
        assert_eq!(py_ascii("a𓈈"), r"'a\U00013208'");
        assert_eq!(py_ascii("\u{10000}"), r"'\U00010000'");
    }

    #[test]
    fn ascii_escapes_control_characters() {
        assert_eq!(py_ascii("a\nb\tc\rd"), r"'a\nb\tc\rd'");
        assert_eq!(py_ascii("\u{0}\u{1b}\u{7f}"), r"'\x00\x1b\x7f'");
        assert_eq!(py_ascii("back\\slash"), r"'back\\slash'");
    }

    #[test]
    fn ascii_picks_quotes_like_repr() {
        assert_eq!(py_ascii("it's"), r#""it's""#);
        assert_eq!(py_ascii(r#"say "hi""#), r#"'say "hi"'"#);
        assert_eq!(py_ascii(r#"it's "both""#), r#"'it\'s "both"'"#);
    }

    #[test]
    fn dedent_strips_common_margin() {
        let src = "\n    print(1)\n    if x:\n        print(2)\n    ";
        assert_eq!(dedent(src), "print(1)\nif x:\n    print(2)\n");
    }

    #[test]
    fn dedent_ignores_blank_lines_for_margin() {
        let src = "\n        a\n\n        b\n";
        assert_eq!(dedent(src), "a\n\nb\n");
    }

    #[test]
    fn dedent_only_strips_a_shared_prefix() {
        assert_eq!(dedent("\tx\n    y"), "\tx\n    y");
        assert_eq!(dedent("  \tx\n  y\n"), "\tx\ny\n");
        assert_eq!(dedent("\t\ta\n\tb\n"), "\ta\nb\n");
    }

    #[test]
    fn bytes_repr_escapes_non_printable_bytes() {
        assert_eq!(py_bytes_repr(b"ok\n\xff\n"), r"b'ok\n\xff\n'");
        assert_eq!(py_bytes_repr(b"\x00\x7f\x80"), r"b'\x00\x7f\x80'");
        assert_eq!(py_bytes_repr(b"it's"), r#"b"it's""#);
        assert_eq!(py_bytes_repr(b"back\\slash"), r"b'back\\slash'");
    }

    #[test]
    fn dedent_keeps_unindented_text() {
        assert_eq!(dedent("print('x')\n"), "print('x')\n");
        assert_eq!(dedent(""), "");
    }
}
