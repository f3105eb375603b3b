//! Built-in suites shipped with the binary.

use twinrun_core::lang::scenarios::ScenarioCatalog;

use crate::config::ConfigError;
use crate::suite::{ConformanceSuite, SuiteConfig};

/// Names accepted by [`builtin_suite`].
pub const BUILTIN_SUITES: &[&str] = &["ascii"];

/// Scenarios the transpiled `ascii` does not handle yet.
pub const ASCII_NOT_IMPLEMENTED: &[&str] = &["noargs", "class", "NotImplemented", "range", "slice"];

/// Hand-written `ascii` checks covering each escape width.
pub const ASCII_CODE: &str = r#"
    print(ascii("aaa"))
    print(ascii("übermöhren"))
    print(ascii("バタビア"))
    print(ascii("a𓈈"))
"#;

/// Configuration of the `ascii` suite.
pub fn ascii_config() -> SuiteConfig {
    SuiteConfig::new()
        .with_function("ascii", ASCII_NOT_IMPLEMENTED.iter().copied())
        .with_code_case("ascii", ASCII_CODE)
}

/// Look up a built-in suite by name, validated against the standard catalog.
pub fn builtin_suite(name: &str) -> Result<ConformanceSuite, ConfigError> {
    let config = match name {
        "ascii" => ascii_config(),
        _ => {
            return Err(ConfigError::UnknownSuite {
                name: name.to_string(),
                available: BUILTIN_SUITES.join(", "),
            });
        }
    };
    ConformanceSuite::from_config(config, ScenarioCatalog::standard())
}
