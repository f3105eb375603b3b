//! CLI module for the twinrun conformance harness
//!
//! ## Commands
//!
//! - `run <manifest>` - Run the suite described by a TOML manifest
//! - `builtin <suite>` - Run a built-in suite against ad-hoc backend commands
//! - `exec` - Run one snippet on one backend and print its outcome
//! - `scenarios` - List the scenario catalog
//! - `snippet <function> <scenario>` - Print the snippet generated for one pair
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::backend::BackendKind;
use crate::config::ConfigError;
use crate::version::TWINRUN_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// Configuration errors: the suite never ran.
    pub const CONFIG: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    /// Rendered through miette so codes and help text reach the terminal.
    fn from(err: ConfigError) -> Self {
        Self::new(format!("{:?}", miette::Report::new(err)), ExitCode::CONFIG)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Output format of suite reports.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Console,
    Json,
}

/// Which backend `exec` targets.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendArg {
    Reference,
    Transpiled,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Reference => BackendKind::Reference,
            BackendArg::Transpiled => BackendKind::Transpiled,
        }
    }
}

/// Differential conformance harness for a Python-to-JavaScript transpiler
#[derive(Parser, Debug)]
#[command(name = "twinrun")]
#[command(version = TWINRUN_VERSION)]
#[command(about = "Run snippets on a reference and a transpiled backend and compare their output", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the suite described by a manifest
    Run {
        /// Suite manifest (TOML)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
        /// Only run pairs whose label contains EXPR
        #[arg(short = 'k', value_name = "EXPR")]
        filter: Option<String>,
        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
        format: ReportFormat,
    },

    /// Run a built-in suite against ad-hoc backend commands
    Builtin {
        /// Suite name (e.g. `ascii`)
        #[arg(value_name = "SUITE")]
        suite: String,
        /// Reference command line, split on whitespace (e.g. "python3 -")
        #[arg(long, value_name = "CMD")]
        reference: String,
        /// Transpiled command line, split on whitespace; `{file}` receives the snippet path
        #[arg(long, value_name = "CMD")]
        transpiled: String,
        /// Per-call timeout in milliseconds
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
        /// Only run pairs whose label contains EXPR
        #[arg(short = 'k', value_name = "EXPR")]
        filter: Option<String>,
        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
        format: ReportFormat,
    },

    /// Run one snippet on one backend and print its outcome
    Exec {
        /// Backend to run on
        #[arg(long, value_enum)]
        backend: BackendArg,
        /// Manifest providing the backend commands
        #[arg(long, value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Snippet file
        #[arg(value_name = "FILE", conflicts_with = "code", required_unless_present = "code")]
        file: Option<PathBuf>,
        /// Inline snippet source
        #[arg(short = 'c', long = "code", value_name = "CODE")]
        code: Option<String>,
    },

    /// List the scenario catalog
    Scenarios,

    /// Print the snippet generated for one (function, scenario) pair
    Snippet {
        #[arg(value_name = "FUNCTION")]
        function: String,
        #[arg(value_name = "SCENARIO")]
        scenario: String,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Run {
            manifest,
            verbose,
            filter,
            format,
        } => commands::run_manifest(&manifest, verbose, filter.as_deref(), format),
        Command::Builtin {
            suite,
            reference,
            transpiled,
            timeout_ms,
            verbose,
            filter,
            format,
        } => commands::run_builtin(
            &suite,
            &commands::AdHocBackends {
                reference,
                transpiled,
                timeout_ms,
            },
            verbose,
            filter.as_deref(),
            format,
        ),
        Command::Exec {
            backend,
            manifest,
            file,
            code,
        } => {
            let source = match (code, file) {
                (Some(code), _) => code,
                (None, Some(file)) => commands::read_source(&file)?,
                (None, None) => return Err(CliError::failure("Error: exec requires a file path or -c \"code\"")),
            };
            commands::exec_snippet(&manifest, backend.into(), &source)
        }
        Command::Scenarios => commands::list_scenarios(),
        Command::Snippet { function, scenario } => commands::print_snippet(&function, &scenario),
    }
}

// ============================================================================
// Tests
// ============================================================================
