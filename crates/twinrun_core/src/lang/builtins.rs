//! Builtin function vocabulary.
//!
//! This module defines the canonical set of builtin functions a conformance suite may target. A suite that
//! names a function outside this registry is a configuration error caught at suite construction.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//!
//! ## Examples
//! ```rust
//! use twinrun_core::lang::builtins::{self, BuiltinFnId};
//!
//! assert_eq!(builtins::from_str("ascii"), Some(BuiltinFnId::Ascii));
//! assert_eq!(builtins::as_str(BuiltinFnId::Import), "__import__");
//! assert_eq!(builtins::from_str("println"), None);
//! ```

use super::registry::{LangItemInfo, Stability};

/// Stable identifier for a builtin function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFnId {
    Abs,
    All,
    Any,
    Ascii,
    Bin,
    Bool,
    Breakpoint,
    Bytearray,
    Bytes,
    Callable,
    Chr,
    Classmethod,
    Compile,
    Complex,
    Delattr,
    Dict,
    Dir,
    Divmod,
    Enumerate,
    Eval,
    Exec,
    Filter,
    Float,
    Format,
    Frozenset,
    Getattr,
    Globals,
    Hasattr,
    Hash,
    Help,
    Hex,
    Id,
    Input,
    Int,
    Isinstance,
    Issubclass,
    Iter,
    Len,
    List,
    Locals,
    Map,
    Max,
    Memoryview,
    Min,
    Next,
    Object,
    Oct,
    Open,
    Ord,
    Pow,
    Print,
    Property,
    Range,
    Repr,
    Reversed,
    Round,
    Set,
    Setattr,
    Slice,
    Sorted,
    Staticmethod,
    Str,
    Sum,
    Super,
    Tuple,
    Type,
    Vars,
    Zip,
    Import,
}

/// Metadata for a builtin function.
pub type BuiltinFnInfo = LangItemInfo<BuiltinFnId>;

/// Registry of all builtin functions.
pub const BUILTIN_FUNCTIONS: &[BuiltinFnInfo] = &[
    info(BuiltinFnId::Abs, "abs", "Return the absolute value of a number."),
    info(BuiltinFnId::All, "all", "Return True if every element of an iterable is truthy."),
    info(BuiltinFnId::Any, "any", "Return True if any element of an iterable is truthy."),
    info(BuiltinFnId::Ascii, "ascii", "Return a printable representation with non-ASCII characters escaped."),
    info(BuiltinFnId::Bin, "bin", "Convert an integer to a binary string."),
    info(BuiltinFnId::Bool, "bool", "Convert a value to a boolean."),
    info(BuiltinFnId::Breakpoint, "breakpoint", "Drop into the debugger."),
    info(BuiltinFnId::Bytearray, "bytearray", "Construct a mutable byte sequence."),
    info(BuiltinFnId::Bytes, "bytes", "Construct an immutable byte sequence."),
    info(BuiltinFnId::Callable, "callable", "Return whether an object appears callable."),
    info(BuiltinFnId::Chr, "chr", "Return the string for a Unicode code point."),
    info(BuiltinFnId::Classmethod, "classmethod", "Transform a method into a class method."),
    info(BuiltinFnId::Compile, "compile", "Compile source into a code object."),
    info(BuiltinFnId::Complex, "complex", "Construct a complex number."),
    info(BuiltinFnId::Delattr, "delattr", "Delete a named attribute."),
    info(BuiltinFnId::Dict, "dict", "Construct a dictionary."),
    info(BuiltinFnId::Dir, "dir", "List the names in a scope or object."),
    info(BuiltinFnId::Divmod, "divmod", "Return quotient and remainder."),
    info(BuiltinFnId::Enumerate, "enumerate", "Enumerate an iterable into (index, value) pairs."),
    info(BuiltinFnId::Eval, "eval", "Evaluate an expression."),
    info(BuiltinFnId::Exec, "exec", "Execute dynamically built code."),
    info(BuiltinFnId::Filter, "filter", "Filter an iterable with a predicate."),
    info(BuiltinFnId::Float, "float", "Convert a value to a float."),
    info(BuiltinFnId::Format, "format", "Format a value with a format spec."),
    info(BuiltinFnId::Frozenset, "frozenset", "Construct an immutable set."),
    info(BuiltinFnId::Getattr, "getattr", "Read a named attribute."),
    info(BuiltinFnId::Globals, "globals", "Return the module namespace."),
    info(BuiltinFnId::Hasattr, "hasattr", "Return whether an object has a named attribute."),
    info(BuiltinFnId::Hash, "hash", "Return the hash of an object."),
    info(BuiltinFnId::Help, "help", "Invoke the help system."),
    info(BuiltinFnId::Hex, "hex", "Convert an integer to a hexadecimal string."),
    info(BuiltinFnId::Id, "id", "Return the identity of an object."),
    info(BuiltinFnId::Input, "input", "Read a line from standard input."),
    info(BuiltinFnId::Int, "int", "Convert a value to an integer."),
    info(BuiltinFnId::Isinstance, "isinstance", "Check an object against a class."),
    info(BuiltinFnId::Issubclass, "issubclass", "Check a class against a class."),
    info(BuiltinFnId::Iter, "iter", "Return an iterator for an object."),
    info(BuiltinFnId::Len, "len", "Return the number of items of a container."),
    info(BuiltinFnId::List, "list", "Construct a list."),
    info(BuiltinFnId::Locals, "locals", "Return the local namespace."),
    info(BuiltinFnId::Map, "map", "Apply a function across iterables."),
    info(BuiltinFnId::Max, "max", "Return the largest item."),
    info(BuiltinFnId::Memoryview, "memoryview", "Create a memory view of a buffer."),
    info(BuiltinFnId::Min, "min", "Return the smallest item."),
    info(BuiltinFnId::Next, "next", "Advance an iterator."),
    info(BuiltinFnId::Object, "object", "Construct a featureless object."),
    info(BuiltinFnId::Oct, "oct", "Convert an integer to an octal string."),
    info(BuiltinFnId::Open, "open", "Open a file."),
    info(BuiltinFnId::Ord, "ord", "Return the code point of a one-character string."),
    info(BuiltinFnId::Pow, "pow", "Raise a number to a power."),
    info(BuiltinFnId::Print, "print", "Print values to stdout."),
    info(BuiltinFnId::Property, "property", "Construct a property attribute."),
    info(BuiltinFnId::Range, "range", "Create a lazy range of integers."),
    info(BuiltinFnId::Repr, "repr", "Return the canonical string representation."),
    info(BuiltinFnId::Reversed, "reversed", "Return a reverse iterator."),
    info(BuiltinFnId::Round, "round", "Round a number."),
    info(BuiltinFnId::Set, "set", "Construct a set."),
    info(BuiltinFnId::Setattr, "setattr", "Assign a named attribute."),
    info(BuiltinFnId::Slice, "slice", "Construct a slice descriptor."),
    info(BuiltinFnId::Sorted, "sorted", "Return a new sorted list."),
    info(BuiltinFnId::Staticmethod, "staticmethod", "Transform a method into a static method."),
    info(BuiltinFnId::Str, "str", "Convert a value to a string."),
    info(BuiltinFnId::Sum, "sum", "Sum the items of an iterable."),
    info(BuiltinFnId::Super, "super", "Return a proxy to the parent class."),
    info(BuiltinFnId::Tuple, "tuple", "Construct a tuple."),
    info(BuiltinFnId::Type, "type", "Return the type of an object."),
    info(BuiltinFnId::Vars, "vars", "Return the __dict__ of an object."),
    info(BuiltinFnId::Zip, "zip", "Zip iterables element-wise into tuples."),
    info(BuiltinFnId::Import, "__import__", "Import a module by name."),
];

/// Return the canonical spelling for a builtin function.
pub fn as_str(id: BuiltinFnId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a builtin function.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: BuiltinFnId) -> &'static BuiltinFnInfo {
    BUILTIN_FUNCTIONS
        .iter()
        .find(|b| b.id == id)
        .expect("builtin info missing")
}

/// Resolve a spelling to a builtin function identifier.
///
/// ## Returns
/// - `Some(BuiltinFnId)` if `name` matches a canonical spelling or alias.
/// - `None` otherwise.
pub fn from_str(name: &str) -> Option<BuiltinFnId> {
    if let Some(b) = BUILTIN_FUNCTIONS.iter().find(|b| b.canonical == name) {
        return Some(b.id);
    }
    BUILTIN_FUNCTIONS
        .iter()
        .find(|b| b.aliases.contains(&name))
        .map(|b| b.id)
}

const fn info(id: BuiltinFnId, canonical: &'static str, description: &'static str) -> BuiltinFnInfo {
    LangItemInfo {
        id,
        canonical,
        aliases: &[],
        description,
        stability: Stability::Stable,
    }
}
