//! Suite configuration: the manifest format and configuration errors.
//!
//! A manifest is a TOML file describing both backends and the suite to run:
//!
//! ```toml
//! timeout_ms = 10000
//!
//! [backends.reference]
//! command = ["python3", "-"]
//!
//! [backends.transpiled]
//! command = ["node", "run_batavia.js", "{file}"]
//! cwd = "../batavia"
//!
//! [[functions]]
//! name = "ascii"
//! not_implemented = ["noargs", "class", "NotImplemented", "range", "slice"]
//!
//! [[code]]
//! name = "ascii"
//! source = '''
//! print(ascii("aaa"))
//! '''
//! ```
//!
//! Every authoring mistake (unknown function, unknown scenario, empty command, ...) is reported as a
//! [`ConfigError`] before any snippet runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use crate::backend::{BackendKind, BackendPair, CommandEngine};
use crate::suite::SuiteConfig;

/// Errors in suite authoring or manifest loading. These abort the whole run.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown builtin function `{name}`")]
    #[diagnostic(
        code(twinrun::config::unknown_function),
        help("function names must be builtins such as `ascii`, `len` or `repr`")
    )]
    UnknownFunction { name: String },

    #[error("function `{function}` excludes unknown scenario `{scenario}`")]
    #[diagnostic(code(twinrun::config::unknown_scenario), help("known scenarios: {known}"))]
    UnknownScenario {
        function: String,
        scenario: String,
        known: String,
    },

    #[error("exclusions are declared for `{function}`, which is not under test")]
    #[diagnostic(
        code(twinrun::config::unlisted_function),
        help("add `{function}` to the functions under test or drop its exclusions")
    )]
    UnlistedFunction { function: String },

    #[error("function `{name}` is listed more than once")]
    #[diagnostic(code(twinrun::config::duplicate_function))]
    DuplicateFunction { name: String },

    #[error("code case `{name}` is listed more than once")]
    #[diagnostic(code(twinrun::config::duplicate_code_case))]
    DuplicateCodeCase { name: String },

    #[error("the {backend} backend command is empty")]
    #[diagnostic(
        code(twinrun::config::empty_command),
        help("give the program and its arguments, e.g. command = [\"python3\", \"-\"]")
    )]
    EmptyCommand { backend: BackendKind },

    #[error("timeout must be greater than zero")]
    #[diagnostic(code(twinrun::config::zero_timeout))]
    ZeroTimeout,

    #[error("unknown built-in suite `{name}`")]
    #[diagnostic(code(twinrun::config::unknown_suite), help("available suites: {available}"))]
    UnknownSuite { name: String, available: String },

    #[error("failed to read manifest {}: {source}", path.display())]
    #[diagnostic(code(twinrun::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest: {0}")]
    #[diagnostic(code(twinrun::config::parse))]
    Parse(#[from] toml::de::Error),
}

/// Command line and environment of one backend.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BackendSpec {
    /// Program followed by its arguments; the argument `{file}` receives the staged snippet path.
    pub command: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Working directory, relative to the manifest.
    pub cwd: Option<PathBuf>,
    /// Suffix of the staged snippet file (default `.py`).
    pub suffix: Option<String>,
}

impl BackendSpec {
    pub fn from_command(command: Vec<String>) -> Self {
        Self {
            command,
            env: BTreeMap::new(),
            cwd: None,
            suffix: None,
        }
    }

    /// Build the engine for this backend.
    ///
    /// ## Parameters
    /// - `kind`: which side this spec describes (for naming and errors).
    /// - `timeout`: the per-call execution ceiling.
    /// - `base_dir`: directory relative `cwd` values are resolved against.
    pub fn engine(&self, kind: BackendKind, timeout: Duration, base_dir: &Path) -> Result<CommandEngine, ConfigError> {
        let mut engine = CommandEngine::from_argv(&self.command)
            .ok_or(ConfigError::EmptyCommand { backend: kind })?
            .named(format!("{kind}:{}", self.command.join(" ")))
            .with_timeout(timeout);
        for (key, value) in &self.env {
            engine = engine.with_env(key, value);
        }
        if let Some(cwd) = &self.cwd {
            engine = engine.with_current_dir(base_dir.join(cwd));
        }
        if let Some(suffix) = &self.suffix {
            engine = engine.with_file_suffix(suffix);
        }
        Ok(engine)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BackendsSection {
    pub reference: BackendSpec,
    pub transpiled: BackendSpec,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FunctionEntry {
    pub name: String,
    /// Scenario names skipped for this function (legacy `test_` prefixes accepted).
    #[serde(default)]
    pub not_implemented: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CodeEntry {
    pub name: String,
    pub source: String,
}

/// A parsed suite manifest.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub timeout_ms: Option<u64>,
    pub backends: BackendsSection,
    #[serde(default)]
    pub functions: Vec<FunctionEntry>,
    #[serde(default)]
    pub code: Vec<CodeEntry>,
    /// Directory the manifest was loaded from; relative paths resolve against it.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Manifest {
    /// Parse a manifest from TOML text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let manifest: Manifest = toml::from_str(text)?;
        manifest.timeout()?;
        Ok(manifest)
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut manifest = Self::parse(&text)?;
        manifest.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        tracing::debug!(path = %path.display(), functions = manifest.functions.len(), "loaded manifest");
        Ok(manifest)
    }

    /// The per-call execution ceiling.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        match self.timeout_ms {
            Some(0) => Err(ConfigError::ZeroTimeout),
            Some(ms) => Ok(Duration::from_millis(ms)),
            None => Ok(crate::backend::subprocess::DEFAULT_TIMEOUT),
        }
    }

    /// Spec of one backend.
    pub fn backend(&self, kind: BackendKind) -> &BackendSpec {
        match kind {
            BackendKind::Reference => &self.backends.reference,
            BackendKind::Transpiled => &self.backends.transpiled,
        }
    }

    /// Build the engine for one backend.
    pub fn engine(&self, kind: BackendKind) -> Result<CommandEngine, ConfigError> {
        self.backend(kind).engine(kind, self.timeout()?, &self.base_dir)
    }

    /// Build both engines.
    pub fn backend_pair(&self) -> Result<BackendPair, ConfigError> {
        Ok(BackendPair::new(
            self.engine(BackendKind::Reference)?,
            self.engine(BackendKind::Transpiled)?,
        ))
    }

    /// The suite described by this manifest (validated later, at suite construction).
    pub fn suite_config(&self) -> SuiteConfig {
        let mut config = SuiteConfig::new();
        for function in &self.functions {
            config = config.with_function(&function.name, function.not_implemented.iter().map(String::as_str));
        }
        for case in &self.code {
            config = config.with_code_case(&case.name, &case.source);
        }
        config
    }
}
