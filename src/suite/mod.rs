//! Conformance suite: runs every (function, scenario) pair plus hand-written code cases on both
//! backends and reports one verdict per pair.
//!
//! ## Notes
//! - Construction validates the whole configuration; a [`ConfigError`] aborts before anything runs.
//! - Excluded pairs are reported as skipped and never executed.
//! - A failing pair never stops its siblings.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod report;

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use twinrun_core::lang::builtins;
use twinrun_core::lang::scenarios::{self, ScenarioCatalog, ScenarioInfo};
use twinrun_core::{ComparisonResult, FailureKind, Outcome, Snippet, compare};

use crate::backend::BackendPair;
use crate::config::ConfigError;
use crate::runner;

pub use report::{
    ConsoleReporter, JsonReporter, PairReport, PairResult, SilentReporter, SuiteReporter, SuiteSummary,
};

/// Reason attached to excluded pairs.
pub const NOT_IMPLEMENTED: &str = "not implemented";

/// Label prefix of hand-written code cases.
pub const CODE_CASE_PREFIX: &str = "code";

// ============================================================================
// Configuration
// ============================================================================

/// Function name to excluded scenario names.
///
/// Scenario names are stored without the legacy `test_` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    by_function: BTreeMap<String, BTreeSet<String>>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ExclusionSet::insert`] for several scenarios.
    pub fn exclude<'a>(mut self, function: &str, scenarios: impl IntoIterator<Item = &'a str>) -> Self {
        for scenario in scenarios {
            self.insert(function, scenario);
        }
        self
    }

    pub fn insert(&mut self, function: &str, scenario: &str) {
        self.by_function
            .entry(function.to_string())
            .or_default()
            .insert(scenarios::normalize(scenario).to_string());
    }

    pub fn is_excluded(&self, function: &str, scenario: &str) -> bool {
        self.by_function
            .get(function)
            .is_some_and(|set| set.contains(scenarios::normalize(scenario)))
    }

    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.by_function.keys().map(String::as_str)
    }

    pub fn scenarios_for(&self, function: &str) -> impl Iterator<Item = &str> {
        self.by_function.get(function).into_iter().flatten().map(String::as_str)
    }

    /// Number of excluded pairs.
    pub fn len(&self) -> usize {
        self.by_function.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A hand-written snippet compared between backends as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCase {
    name: String,
    snippet: Snippet,
}

impl CodeCase {
    /// Create a code case; the source is dedented once here.
    pub fn new(name: impl Into<String>, source: &str) -> Self {
        Self {
            name: name.into(),
            snippet: Snippet::adjusted(source),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn snippet(&self) -> &Snippet {
        &self.snippet
    }

    pub fn label(&self) -> String {
        format!("{CODE_CASE_PREFIX}::{}", self.name)
    }
}

/// Unvalidated description of a suite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteConfig {
    functions: Vec<String>,
    exclusions: ExclusionSet,
    code_cases: Vec<CodeCase>,
}

impl SuiteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function under test with the scenarios it does not implement yet.
    pub fn with_function<'a>(mut self, name: &str, not_implemented: impl IntoIterator<Item = &'a str>) -> Self {
        self.functions.push(name.to_string());
        self.exclusions = self.exclusions.exclude(name, not_implemented);
        self
    }

    pub fn with_code_case(mut self, name: &str, source: &str) -> Self {
        self.code_cases.push(CodeCase::new(name, source));
        self
    }

    pub fn functions(&self) -> &[String] {
        &self.functions
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    pub fn code_cases(&self) -> &[CodeCase] {
        &self.code_cases
    }
}

// ============================================================================
// Suite
// ============================================================================

/// What a planned pair does when it runs.
#[derive(Debug, Clone)]
enum Action {
    Skip(&'static str),
    Run {
        snippet: Snippet,
        expected_failure: Option<&'static str>,
    },
}

#[derive(Debug, Clone)]
struct PlannedPair {
    label: String,
    function: Option<String>,
    scenario: Option<String>,
    action: Action,
}

/// Result of one suite run.
#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub reports: Vec<PairReport>,
    pub summary: SuiteSummary,
}

impl SuiteReport {
    pub fn is_success(&self) -> bool {
        self.summary.is_success()
    }

    pub fn get(&self, label: &str) -> Option<&PairReport> {
        self.reports.iter().find(|report| report.label == label)
    }
}

/// A validated conformance suite.
#[derive(Debug, Clone)]
pub struct ConformanceSuite {
    functions: Vec<String>,
    exclusions: ExclusionSet,
    code_cases: Vec<CodeCase>,
    catalog: ScenarioCatalog,
}

impl ConformanceSuite {
    /// Validate `functions` and `exclusions` against the builtin vocabulary and `catalog`.
    ///
    /// ## Errors
    /// - [`ConfigError::UnknownFunction`] / [`ConfigError::DuplicateFunction`] for bad function lists.
    /// - [`ConfigError::UnlistedFunction`] when exclusions name a function not under test.
    /// - [`ConfigError::UnknownScenario`] when an exclusion names a scenario missing from `catalog`.
    pub fn new(functions: Vec<String>, exclusions: ExclusionSet, catalog: ScenarioCatalog) -> Result<Self, ConfigError> {
        let mut seen = BTreeSet::new();
        for name in &functions {
            if builtins::from_str(name).is_none() {
                return Err(ConfigError::UnknownFunction { name: name.clone() });
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateFunction { name: name.clone() });
            }
        }

        for function in exclusions.functions() {
            if !seen.contains(function) {
                return Err(ConfigError::UnlistedFunction {
                    function: function.to_string(),
                });
            }
            for scenario in exclusions.scenarios_for(function) {
                if catalog.lookup(scenario).is_none() {
                    return Err(ConfigError::UnknownScenario {
                        function: function.to_string(),
                        scenario: scenario.to_string(),
                        known: catalog.iter().map(ScenarioInfo::name).collect::<Vec<_>>().join(", "),
                    });
                }
            }
        }

        Ok(Self {
            functions,
            exclusions,
            code_cases: Vec::new(),
            catalog,
        })
    }

    /// Validate a whole [`SuiteConfig`], code cases included.
    pub fn from_config(config: SuiteConfig, catalog: ScenarioCatalog) -> Result<Self, ConfigError> {
        let SuiteConfig {
            functions,
            exclusions,
            code_cases,
        } = config;
        let mut suite = Self::new(functions, exclusions, catalog)?;
        for case in code_cases {
            suite = suite.with_code_case(case)?;
        }
        Ok(suite)
    }

    /// Append a hand-written code case; names must be unique.
    pub fn with_code_case(mut self, case: CodeCase) -> Result<Self, ConfigError> {
        if self.code_cases.iter().any(|existing| existing.name == case.name) {
            return Err(ConfigError::DuplicateCodeCase { name: case.name });
        }
        self.code_cases.push(case);
        Ok(self)
    }

    pub fn functions(&self) -> &[String] {
        &self.functions
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    /// Labels of every pair in run order, before filtering.
    pub fn labels(&self) -> Vec<String> {
        self.plan().into_iter().map(|pair| pair.label).collect()
    }

    fn plan(&self) -> Vec<PlannedPair> {
        let mut pairs = Vec::with_capacity(self.functions.len() * self.catalog.len() + self.code_cases.len());
        for function in &self.functions {
            for scenario in self.catalog.iter() {
                let action = if self.exclusions.is_excluded(function, scenario.name()) {
                    Action::Skip(NOT_IMPLEMENTED)
                } else {
                    Action::Run {
                        snippet: scenario.snippet_for(function),
                        expected_failure: scenario.expected_failure,
                    }
                };
                pairs.push(PlannedPair {
                    label: format!("{function}::{}", scenario.name()),
                    function: Some(function.clone()),
                    scenario: Some(scenario.name().to_string()),
                    action,
                });
            }
        }
        for case in &self.code_cases {
            pairs.push(PlannedPair {
                label: case.label(),
                function: None,
                scenario: None,
                action: Action::Run {
                    snippet: case.snippet.clone(),
                    expected_failure: None,
                },
            });
        }
        pairs
    }

    /// Run the suite.
    ///
    /// ## Parameters
    /// - `backends`: the engines to compare.
    /// - `filter`: keep only pairs whose label contains this substring; the rest are not counted.
    /// - `reporter`: receives progress and the final summary.
    ///
    /// ## Returns
    /// Every pair report in run order plus the aggregate counts.
    #[tracing::instrument(skip_all, fields(functions = self.functions.len(), scenarios = self.catalog.len()))]
    pub fn run(&self, backends: &BackendPair, filter: Option<&str>, reporter: &mut dyn SuiteReporter) -> SuiteReport {
        let start = Instant::now();
        let pairs: Vec<_> = self
            .plan()
            .into_iter()
            .filter(|pair| filter.is_none_or(|keyword| pair.label.contains(keyword)))
            .collect();

        tracing::info!(pairs = pairs.len(), "running conformance suite");
        reporter.on_suite_start(pairs.len());

        let mut summary = SuiteSummary::default();
        let mut reports = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let result = match &pair.action {
                Action::Skip(reason) => PairResult::Skipped((*reason).to_string()),
                Action::Run {
                    snippet,
                    expected_failure,
                } => run_pair(&pair.label, snippet, *expected_failure, backends),
            };
            summary.record(&result);
            let report = PairReport {
                label: pair.label,
                function: pair.function,
                scenario: pair.scenario,
                result,
            };
            reporter.on_pair_complete(&report);
            reports.push(report);
        }

        summary.duration = start.elapsed();
        tracing::info!(
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            "conformance suite finished"
        );
        reporter.on_run_complete(&summary, &reports);
        SuiteReport { reports, summary }
    }
}

/// Run one snippet on both backends and compare.
pub fn check_snippet(snippet: &Snippet, backends: &BackendPair) -> ComparisonResult {
    let (reference, transpiled) = runner::execute_both(snippet, backends);
    compare(reference, transpiled)
}

#[tracing::instrument(skip_all, fields(pair = label))]
fn run_pair(label: &str, snippet: &Snippet, expected_failure: Option<&str>, backends: &BackendPair) -> PairResult {
    let start = Instant::now();
    let (reference, transpiled) = runner::execute_both(snippet, backends);
    if let Some(expected) = expected_failure {
        warn_on_unexpected_reference(&reference, expected);
    }
    let elapsed: Duration = start.elapsed();
    match compare(reference, transpiled) {
        ComparisonResult::Match => PairResult::Passed(elapsed),
        ComparisonResult::Mismatch { diff, .. } => {
            tracing::debug!("pair failed");
            PairResult::Failed(elapsed, diff)
        }
    }
}

/// The reference backend defines truth, but a reference that does not raise where the scenario
/// expects it usually means the reference command is misconfigured.
fn warn_on_unexpected_reference(reference: &Outcome, expected: &str) {
    match reference.failure_kind() {
        Some(FailureKind::Raised(name)) if name == expected => {}
        other => tracing::warn!(
            expected,
            actual = %other.map_or_else(|| reference.summary(), ToString::to_string),
            "reference backend did not raise the expected error"
        ),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use twinrun_core::lang::scenarios::ScenarioId;

    use super::*;
    use crate::backend::{BackendError, Engine, Execution};

    /// Engine that echoes the snippet as output and counts calls.
    struct Echo {
        calls: Arc<AtomicUsize>,
        mangle: Option<&'static str>,
    }

    impl Echo {
        fn new() -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    calls: Arc::clone(&calls),
                    mangle: None,
                },
                calls,
            )
        }
    }

    impl Engine for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn execute(&self, snippet: &Snippet) -> Result<Execution, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.mangle {
                Some(needle) if snippet.as_str().contains(needle) => Ok(Execution::completed("mangled\n")),
                _ => Ok(Execution::completed(snippet.as_str())),
            }
        }
    }

    fn small_catalog() -> ScenarioCatalog {
        ScenarioCatalog::from_ids(&[ScenarioId::NoArgs, ScenarioId::Int, ScenarioId::Range])
    }

    #[test]
    fn every_pair_gets_exactly_one_verdict() {
        let (reference, ref_calls) = Echo::new();
        let (mut transpiled, tr_calls) = Echo::new();
        transpiled.mangle = Some("range(");
        let backends = BackendPair::new(reference, transpiled);

        let config = SuiteConfig::new()
            .with_function("ascii", ["test_noargs"])
            .with_function("repr", [])
            .with_code_case("smoke", "print(1)\n");
        let suite = ConformanceSuite::from_config(config, small_catalog()).unwrap();
        let report = suite.run(&backends, None, &mut SilentReporter);

        assert_eq!(report.summary.total(), 2 * 3 + 1);
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.summary.failed, 2);
        assert_eq!(report.summary.passed, 4);
        assert!(matches!(report.get("ascii::noargs").unwrap().result, PairResult::Skipped(_)));
        assert!(report.get("repr::range").unwrap().result.is_failed());
        assert!(matches!(report.get("code::smoke").unwrap().result, PairResult::Passed(_)));
        // Skipped pair never reached either engine.
        assert_eq!(ref_calls.load(Ordering::SeqCst), 6);
        assert_eq!(tr_calls.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn filter_drops_pairs_from_the_count() {
        let (reference, _) = Echo::new();
        let (transpiled, calls) = Echo::new();
        let backends = BackendPair::new(reference, transpiled);
        let suite = ConformanceSuite::new(vec!["ascii".into(), "len".into()], ExclusionSet::new(), small_catalog())
            .unwrap();

        let report = suite.run(&backends, Some("len::"), &mut SilentReporter);
        assert_eq!(report.summary.total(), 3);
        assert!(report.reports.iter().all(|r| r.label.starts_with("len::")));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn labels_follow_catalog_order() {
        let suite = ConformanceSuite::from_config(
            SuiteConfig::new().with_function("ascii", []).with_code_case("x", "pass"),
            small_catalog(),
        )
        .unwrap();
        assert_eq!(suite.labels(), ["ascii::noargs", "ascii::int", "ascii::range", "code::x"]);
    }

    #[test]
    fn rejects_unknown_function() {
        let err = ConformanceSuite::new(vec!["asci".into()], ExclusionSet::new(), small_catalog()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFunction { name } if name == "asci"));
    }

    #[test]
    fn rejects_duplicate_function() {
        let err =
            ConformanceSuite::new(vec!["ascii".into(), "ascii".into()], ExclusionSet::new(), small_catalog()).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateFunction { .. }));
    }

    #[test]
    fn rejects_scenario_outside_catalog() {
        let exclusions = ExclusionSet::new().exclude("ascii", ["slice"]);
        let err = ConformanceSuite::new(vec!["ascii".into()], exclusions, small_catalog()).unwrap_err();
        match err {
            ConfigError::UnknownScenario { scenario, known, .. } => {
                assert_eq!(scenario, "slice");
                assert_eq!(known, "noargs, int, range");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_exclusions_for_unlisted_function() {
        let exclusions = ExclusionSet::new().exclude("len", ["noargs"]);
        let err = ConformanceSuite::new(vec!["ascii".into()], exclusions, small_catalog()).unwrap_err();
        assert!(matches!(err, ConfigError::UnlistedFunction { function } if function == "len"));
    }

    #[test]
    fn rejects_duplicate_code_case() {
        let config = SuiteConfig::new().with_code_case("a", "pass").with_code_case("a", "pass");
        let err = ConformanceSuite::from_config(config, small_catalog()).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateCodeCase { .. }));
    }

    #[test]
    fn exclusion_names_accept_legacy_prefix() {
        let set = ExclusionSet::new().exclude("ascii", ["test_range", "slice"]);
        assert!(set.is_excluded("ascii", "range"));
        assert!(set.is_excluded("ascii", "test_slice"));
        assert!(!set.is_excluded("len", "range"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn code_case_snippet_is_dedented() {
        let case = CodeCase::new("ascii", "\n    print(1)\n    print(2)\n");
        assert_eq!(case.snippet().as_str(), "print(1)\nprint(2)\n");
        assert_eq!(case.label(), "code::ascii");
    }
}
