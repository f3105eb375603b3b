//! Command implementations for the CLI.
//!
//! All functions return `CliResult<ExitCode>`; only `cli::run()` exits the process.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::time::Duration;

use twinrun_core::Outcome;
use twinrun_core::Snippet;
use twinrun_core::lang::scenarios::{self, ScenarioCatalog};

use super::{CliError, CliResult, ExitCode, ReportFormat};
use crate::backend::{BackendKind, BackendPair, subprocess::DEFAULT_TIMEOUT};
use crate::config::{BackendSpec, ConfigError, Manifest};
use crate::runner;
use crate::suite::{ConformanceSuite, ConsoleReporter, JsonReporter, SuiteReport, SuiteReporter};
use crate::suites;

/// Backend command lines given on the command line instead of a manifest.
#[derive(Debug, Clone)]
pub struct AdHocBackends {
    pub reference: String,
    pub transpiled: String,
    pub timeout_ms: Option<u64>,
}

impl AdHocBackends {
    /// Build both engines; command lines are split on whitespace.
    pub fn backend_pair(&self) -> Result<BackendPair, ConfigError> {
        let timeout = match self.timeout_ms {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_TIMEOUT,
        };
        let cwd = Path::new(".");
        let spec = |line: &str| BackendSpec::from_command(line.split_whitespace().map(str::to_string).collect());
        Ok(BackendPair::new(
            spec(&self.reference).engine(BackendKind::Reference, timeout, cwd)?,
            spec(&self.transpiled).engine(BackendKind::Transpiled, timeout, cwd)?,
        ))
    }
}

/// Read a snippet file.
pub fn read_source(path: &Path) -> CliResult<String> {
    fs::read_to_string(path).map_err(|e| CliError::failure(format!("Error reading '{}': {}", path.display(), e)))
}

/// Run the suite described by a manifest.
pub fn run_manifest(path: &Path, verbose: bool, filter: Option<&str>, format: ReportFormat) -> CliResult<ExitCode> {
    let manifest = Manifest::load(path)?;
    let suite = ConformanceSuite::from_config(manifest.suite_config(), ScenarioCatalog::standard())?;
    let backends = manifest.backend_pair()?;
    Ok(exit_code_for(&run_suite(&suite, &backends, verbose, filter, format)))
}

/// Run a built-in suite against ad-hoc commands.
pub fn run_builtin(
    name: &str,
    backends: &AdHocBackends,
    verbose: bool,
    filter: Option<&str>,
    format: ReportFormat,
) -> CliResult<ExitCode> {
    let suite = suites::builtin_suite(name)?;
    let backends = backends.backend_pair()?;
    Ok(exit_code_for(&run_suite(&suite, &backends, verbose, filter, format)))
}

fn run_suite(
    suite: &ConformanceSuite,
    backends: &BackendPair,
    verbose: bool,
    filter: Option<&str>,
    format: ReportFormat,
) -> SuiteReport {
    let mut reporter: Box<dyn SuiteReporter> = match format {
        ReportFormat::Console => {
            let color = io::stdout().is_terminal();
            Box::new(ConsoleReporter::stdout(verbose).with_color(color))
        }
        ReportFormat::Json => Box::new(JsonReporter::stdout()),
    };
    suite.run(backends, filter, reporter.as_mut())
}

fn exit_code_for(report: &SuiteReport) -> ExitCode {
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Run one snippet on one backend.
///
/// Output is written to stdout byte for byte; a failure is printed to stderr and exits 1.
pub fn exec_snippet(manifest: &Path, kind: BackendKind, source: &str) -> CliResult<ExitCode> {
    let manifest = Manifest::load(manifest)?;
    let backends = manifest.backend_pair()?;
    let snippet = Snippet::new(source);

    match runner::execute(&snippet, kind, &backends) {
        Outcome::Output(bytes) => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(&bytes)
                .and_then(|()| stdout.flush())
                .map_err(|e| CliError::failure(format!("Error writing output: {e}")))?;
            Ok(ExitCode::SUCCESS)
        }
        failure @ Outcome::Failure { .. } => {
            eprintln!("{failure}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// List the standard scenario catalog.
pub fn list_scenarios() -> CliResult<ExitCode> {
    let catalog = ScenarioCatalog::standard();
    let width = catalog.iter().map(|s| s.name().len()).max().unwrap_or(0);
    for scenario in catalog.iter() {
        let expectation = scenario
            .expected_failure
            .map(|kind| format!(" (expects {kind})"))
            .unwrap_or_default();
        println!("{:width$}  {}{}", scenario.name(), scenario.description(), expectation);
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the snippet generated for one pair.
pub fn print_snippet(function: &str, scenario: &str) -> CliResult<ExitCode> {
    let id = scenarios::from_str(scenario).ok_or_else(|| {
        let known: Vec<_> = scenarios::SCENARIOS.iter().map(|s| s.name()).collect();
        CliError::failure(format!(
            "Error: unknown scenario '{}' (known: {})",
            scenario,
            known.join(", ")
        ))
    })?;
    print!("{}", scenarios::info_for(id).snippet_for(function));
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ad_hoc_backends_reject_empty_commands() {
        let backends = AdHocBackends {
            reference: "python3 -".into(),
            transpiled: "   ".into(),
            timeout_ms: None,
        };
        let err = backends.backend_pair().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::EmptyCommand {
                backend: BackendKind::Transpiled
            }
        ));
    }

    #[test]
    fn ad_hoc_backends_reject_zero_timeout() {
        let backends = AdHocBackends {
            reference: "python3 -".into(),
            transpiled: "node run.js".into(),
            timeout_ms: Some(0),
        };
        assert!(matches!(backends.backend_pair(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn print_snippet_rejects_unknown_scenario() {
        let err = print_snippet("ascii", "lambda").unwrap_err();
        assert!(err.message.contains("unknown scenario 'lambda'"));
    }

    #[test]
    fn missing_manifest_is_a_config_error() {
        let err = run_manifest(Path::new("/nonexistent/suite.toml"), false, None, ReportFormat::Console).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::CONFIG);
    }
}
