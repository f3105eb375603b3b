//! Source snippets executed as standalone programs.

use std::fmt;
use std::sync::Arc;

use crate::strings::dedent;

/// An immutable piece of source text executed as a complete program.
///
/// Cloning is cheap; the text is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Snippet(Arc<str>);

impl Snippet {
    /// Wrap source text verbatim.
    pub fn new(source: impl Into<String>) -> Self {
        Self(Arc::from(source.into()))
    }

    /// Build a snippet from an indented block (see [`dedent`]).
    ///
    /// ## Examples
    /// ```rust
    /// use twinrun_core::Snippet;
    ///
    /// let s = Snippet::adjusted(
    ///     r#"
    ///     print(ascii("aaa"))
    ///     "#,
    /// );
    /// assert_eq!(s.as_str(), "print(ascii(\"aaa\"))\n");
    /// ```
    pub fn adjusted(source: &str) -> Self {
        Self::new(dedent(source))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Snippet {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for Snippet {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}
