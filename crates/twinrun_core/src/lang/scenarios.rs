//! Builtin edge-case scenario vocabulary.
//!
//! Every builtin function under test is exercised with the same, suite-wide catalog of scenarios: called
//! with no arguments, called with a class object, with the `NotImplemented` sentinel, with a `range`, with
//! a `slice`, and with one sample of every other builtin value kind.
//!
//! Callers use [`ScenarioId`] for identity, but suites refer to scenarios **by name** (exclusion lists
//! are plain strings), so the canonical spellings below are a stable contract.
//!
//! ## Snippet shape
//!
//! For function `f` and each sample argument list `arg`, the generated program is:
//!
//! ```text
//! print('>>> f(arg)')
//! try:
//!     print(f(arg))
//! except Exception as e:
//!     print('!!!', type(e).__name__)
//! ```
//!
//! Each call is guarded so one raising sample cannot hide the samples after it; the exception class
//! becomes part of the compared output. Scenarios with an `expected_failure` (only `noargs`) are the
//! exception: their calls are left unguarded so the raise ends the program.
//!
//! The header literal is rendered with Python `ascii()` escaping, so it is always valid pure-ASCII source
//! no matter which quotes or characters the sample contains.
//!
//! ## Notes
//! - Generation is referentially transparent: same `(function, scenario)` in, same text out.
//! - Samples are chosen to be deterministic across runs (no hash-ordered string sets).
//! - Adding a scenario means adding an id + a table entry; existing names must never change.

use std::fmt::Write as _;

use super::registry::{LangItemInfo, Stability};
use crate::snippet::Snippet;
use crate::strings::py_ascii;

/// Stable identifier for an edge-case scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScenarioId {
    NoArgs,
    Bool,
    Bytearray,
    Bytes,
    Class,
    Complex,
    Dict,
    Float,
    Frozenset,
    Int,
    List,
    None,
    NotImplemented,
    Range,
    Set,
    Slice,
    Str,
    Tuple,
}

/// Metadata for a scenario: shared registry fields plus the call samples.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioInfo {
    pub item: LangItemInfo<ScenarioId>,
    /// Argument-list source text for each call, in order (`""` means a call with no arguments).
    pub samples: &'static [&'static str],
    /// Exception class a conforming reference implementation is expected to raise, if any.
    pub expected_failure: Option<&'static str>,
}

impl ScenarioInfo {
    pub fn id(&self) -> ScenarioId {
        self.item.id
    }

    pub fn name(&self) -> &'static str {
        self.item.canonical
    }

    pub fn description(&self) -> &'static str {
        self.item.description
    }

    /// Generate the program that calls `function` in this scenario's configuration.
    ///
    /// ## Examples
    /// ```rust
    /// use twinrun_core::lang::scenarios::{self, ScenarioId};
    ///
    /// let snippet = scenarios::info_for(ScenarioId::NoArgs).snippet_for("ascii");
    /// assert_eq!(snippet.as_str(), "print('>>> ascii()')\nprint(ascii())\n");
    /// ```
    pub fn snippet_for(&self, function: &str) -> Snippet {
        let mut source = String::new();
        for sample in self.samples {
            let call = format!("{function}({sample})");
            // Writing to String cannot fail.
            let _ = writeln!(source, "print({})", py_ascii(&format!(">>> {call}")));
            if self.expected_failure.is_some() {
                let _ = writeln!(source, "print({call})");
            } else {
                let _ = writeln!(source, "try:");
                let _ = writeln!(source, "    print({call})");
                let _ = writeln!(source, "except Exception as e:");
                let _ = writeln!(source, "    print({}, type(e).__name__)", py_ascii(RAISED_MARKER));
            }
        }
        Snippet::new(source)
    }
}

/// Printed before the exception class name when a guarded sample raises.
pub const RAISED_MARKER: &str = "!!!";

/// Registry of all scenarios, in catalog order.
pub const SCENARIOS: &[ScenarioInfo] = &[
    ScenarioInfo {
        item: item(ScenarioId::NoArgs, "noargs", "Call the function with zero arguments."),
        samples: &[""],
        expected_failure: Some("TypeError"),
    },
    ScenarioInfo {
        item: item(ScenarioId::Bool, "bool", "Pass the boolean singletons."),
        samples: &["True", "False"],
        expected_failure: None,
    },
    ScenarioInfo {
        item: item(ScenarioId::Bytearray, "bytearray", "Pass mutable byte sequences."),
        samples: &["bytearray()", "bytearray(3)", "bytearray([1, 2, 3])"],
        expected_failure: None,
    },
    ScenarioInfo {
        item: item(ScenarioId::Bytes, "bytes", "Pass immutable byte sequences."),
        samples: &["b''", "b'This is another string of bytes'"],
        expected_failure: None,
    },
    ScenarioInfo {
        item: item(
            ScenarioId::Class,
            "class",
            "Pass class objects (not instances), exercising type introspection.",
        ),
        samples: &[
            "type(1)",
            "type('a')",
            "type(object())",
            "type('MyClass', (object,), {})",
        ],
        expected_failure: None,
    },
    ScenarioInfo {
        item: item(ScenarioId::Complex, "complex", "Pass complex numbers."),
        samples: &["1j", "(1+2j)", "(-1.5-0.5j)"],
        expected_failure: None,
    },
    ScenarioInfo {
        item: item(ScenarioId::Dict, "dict", "Pass dictionaries."),
        samples: &["{}", "{'a': 1, 'c': 2.3456, 'd': 'another'}"],
        expected_failure: None,
    },
    ScenarioInfo {
        item: item(ScenarioId::Float, "float", "Pass floating point numbers."),
        samples: &["2.3456", "0.0", "-3.14159", "-4.81756"],
        expected_failure: None,
    },
    ScenarioInfo {
        item: item(ScenarioId::Frozenset, "frozenset", "Pass immutable sets."),
        samples: &["frozenset()", "frozenset({1, 2, 3})"],
        expected_failure: None,
    },
    ScenarioInfo {
        item: item(ScenarioId::Int, "int", "Pass integers."),
        samples: &["3", "0", "-5"],
        expected_failure: None,
    },
    ScenarioInfo {
        item: item(ScenarioId::List, "list", "Pass lists."),
        samples: &["[]", "[3, 4, 5]", "[1, 2.3456, 'another']"],
        expected_failure: None,
    },
    ScenarioInfo {
        item: item(ScenarioId::None, "None", "Pass the None singleton."),
        samples: &["None"],
        expected_failure: None,
    },
    ScenarioInfo {
        item: item(
            ScenarioId::NotImplemented,
            "NotImplemented",
            "Pass the NotImplemented sentinel singleton.",
        ),
        samples: &["NotImplemented"],
        expected_failure: None,
    },
    ScenarioInfo {
        item: item(ScenarioId::Range, "range", "Pass lazy integer range objects."),
        samples: &["range(0)", "range(5)", "range(2, 7)", "range(1, 10, 3)"],
        expected_failure: None,
    },
    ScenarioInfo {
        item: item(ScenarioId::Set, "set", "Pass mutable sets."),
        samples: &["set()", "{1, 2, 3}"],
        expected_failure: None,
    },
    ScenarioInfo {
        item: item(ScenarioId::Slice, "slice", "Pass slice descriptor objects."),
        samples: &["slice(5)", "slice(1, 5)", "slice(1, 10, 2)"],
        expected_failure: None,
    },
    ScenarioInfo {
        item: item(ScenarioId::Str, "str", "Pass text strings, including non-ASCII text."),
        samples: &["''", "'3'", "'This is another string'", "'Mÿ hôvèrçràft îß fûłl öf éêlś'"],
        expected_failure: None,
    },
    ScenarioInfo {
        item: item(ScenarioId::Tuple, "tuple", "Pass tuples."),
        samples: &["()", "(1,)", "(1, 2.3456, 'another')"],
        expected_failure: None,
    },
];

/// Prefix used by legacy suites when naming scenarios after their generated test methods.
pub const LEGACY_TEST_PREFIX: &str = "test_";

/// Return the canonical spelling for a scenario.
pub fn as_str(id: ScenarioId) -> &'static str {
    info_for(id).name()
}

/// Return the full metadata entry for a scenario.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: ScenarioId) -> &'static ScenarioInfo {
    SCENARIOS
        .iter()
        .find(|s| s.item.id == id)
        .expect("scenario info missing")
}

/// Resolve a spelling to a scenario identifier.
///
/// ## Notes
/// - Matching is **case-sensitive** (`None` and `NotImplemented` are capitalized like the values they pass).
/// - A leading `test_` is accepted and ignored, so `test_noargs` resolves like `noargs`.
pub fn from_str(name: &str) -> Option<ScenarioId> {
    let name = normalize(name);
    SCENARIOS
        .iter()
        .find(|s| s.item.canonical == name || s.item.aliases.contains(&name))
        .map(|s| s.item.id)
}

/// Strip the legacy `test_` prefix from a scenario name.
pub fn normalize(name: &str) -> &str {
    name.strip_prefix(LEGACY_TEST_PREFIX).unwrap_or(name)
}

/// An ordered selection of scenarios that a suite runs for every function.
///
/// The catalog is passed explicitly into a suite; nothing reads a global table at run time.
#[derive(Debug, Clone)]
pub struct ScenarioCatalog {
    entries: Vec<&'static ScenarioInfo>,
}

impl ScenarioCatalog {
    /// The full catalog, in registry order.
    pub fn standard() -> Self {
        Self {
            entries: SCENARIOS.iter().collect(),
        }
    }

    /// A catalog restricted to the given scenarios, in the given order.
    pub fn from_ids(ids: &[ScenarioId]) -> Self {
        Self {
            entries: ids.iter().map(|&id| info_for(id)).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static ScenarioInfo> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a scenario in this catalog by name (legacy `test_` prefix accepted).
    pub fn lookup(&self, name: &str) -> Option<&'static ScenarioInfo> {
        let id = from_str(name)?;
        self.iter().find(|s| s.id() == id)
    }
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

const fn item(id: ScenarioId, canonical: &'static str, description: &'static str) -> LangItemInfo<ScenarioId> {
    LangItemInfo {
        id,
        canonical,
        aliases: &[],
        description,
        stability: Stability::Stable,
    }
}
