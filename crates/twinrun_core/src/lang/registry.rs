//! Shareable metadata for `twinrun_core::lang` registries.
//!
//! The `twinrun_core::lang` module is a set of **registry-first** vocabularies. This submodule provides
//! the small, dependency-free metadata types reused across all of them.
//!
//! ## Notes
//! - These types are `Copy`-friendly so registries can live in `const` tables.
//!
//! ## See also
//! - [`crate::lang::builtins`]
//! - [`crate::lang::scenarios`]

/// Describe the lifecycle status of a vocabulary item.
///
/// ## Examples
/// ```rust
/// use twinrun_core::lang::registry::Stability;
///
/// let s = Stability::Stable;
/// assert_eq!(format!("{s:?}"), "Stable");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Draft,
    Deprecated,
}

/// Shared metadata shape for “registry-first” vocabulary items.
///
/// - stable identity (`id`)
/// - accepted spellings (`canonical` + `aliases`)
/// - documentation (`description`)
/// - lifecycle (`stability`)
///
/// Registries that need extra per-item data (e.g. scenario samples) wrap this struct in an “extension”
/// info type.
#[derive(Debug, Clone, Copy)]
pub struct LangItemInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub stability: Stability,
}
