//! Suite reporting (pytest-style console output and JSON).
//!
//! ## SuiteReporter Trait
//!
//! The suite separates reporting from execution through [`SuiteReporter`]. Output formats are
//! added by implementing the trait; the suite itself never prints.

use std::io::Write;
use std::time::Duration;

use serde::Serialize;

// ============================================================================
// Results
// ============================================================================

/// Verdict for one (function, scenario) pair or one code case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairResult {
    Passed(Duration),
    /// Carries the full mismatch description.
    Failed(Duration, String),
    Skipped(String),
}

impl PairResult {
    pub fn status(&self) -> &'static str {
        match self {
            PairResult::Passed(_) => "PASSED",
            PairResult::Failed(..) => "FAILED",
            PairResult::Skipped(_) => "SKIPPED",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PairResult::Failed(..))
    }

    pub fn duration(&self) -> Option<Duration> {
        match self {
            PairResult::Passed(d) | PairResult::Failed(d, _) => Some(*d),
            PairResult::Skipped(_) => None,
        }
    }
}

/// One reported line of a suite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairReport {
    /// `function::scenario` or `code::<name>`.
    pub label: String,
    pub function: Option<String>,
    pub scenario: Option<String>,
    pub result: PairResult,
}

/// Aggregate counts of a suite run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration: Duration,
}

impl SuiteSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    pub fn record(&mut self, result: &PairResult) {
        match result {
            PairResult::Passed(_) => self.passed += 1,
            PairResult::Failed(..) => self.failed += 1,
            PairResult::Skipped(_) => self.skipped += 1,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

// ============================================================================
// Reporter trait
// ============================================================================

/// Receives suite progress.
pub trait SuiteReporter {
    /// Called once the pairs to run are known (after filtering).
    fn on_suite_start(&mut self, _pair_count: usize) {}

    /// Called after each pair has a verdict.
    fn on_pair_complete(&mut self, report: &PairReport);

    /// Called once at the end with every report in run order.
    fn on_run_complete(&mut self, summary: &SuiteSummary, reports: &[PairReport]);
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct SilentReporter;

impl SuiteReporter for SilentReporter {
    fn on_pair_complete(&mut self, _report: &PairReport) {}

    fn on_run_complete(&mut self, _summary: &SuiteSummary, _reports: &[PairReport]) {}
}

// ============================================================================
// Console
// ============================================================================

const GREEN: &str = "32";
const RED: &str = "31";
const YELLOW: &str = "33";
const BOLD: &str = "1";
const BOLD_RED: &str = "1;31";

/// Pytest-style console reporter.
///
/// Write errors on the sink are ignored.
pub struct ConsoleReporter<W: Write> {
    out: W,
    verbose: bool,
    color: bool,
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout(verbose: bool) -> Self {
        Self::new(std::io::stdout(), verbose)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            color: true,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

impl<W: Write> SuiteReporter for ConsoleReporter<W> {
    fn on_suite_start(&mut self, pair_count: usize) {
        let header = self.paint(BOLD, "=================== conformance session starts ===================");
        let _ = writeln!(self.out, "{header}");
        let _ = writeln!(self.out, "collected {pair_count} pair(s)");
        let _ = writeln!(self.out);
    }

    fn on_pair_complete(&mut self, report: &PairReport) {
        let status = match &report.result {
            PairResult::Passed(d) => {
                let status = self.paint(GREEN, "PASSED");
                if self.verbose {
                    format!("{status} ({}ms)", d.as_millis())
                } else {
                    status
                }
            }
            PairResult::Failed(d, _) => {
                let status = self.paint(RED, "FAILED");
                if self.verbose {
                    format!("{status} ({}ms)", d.as_millis())
                } else {
                    status
                }
            }
            PairResult::Skipped(reason) => {
                let status = self.paint(YELLOW, "SKIPPED");
                if reason.is_empty() {
                    status
                } else {
                    format!("{status} ({reason})")
                }
            }
        };
        let _ = writeln!(self.out, "{} {status}", report.label);
    }

    fn on_run_complete(&mut self, summary: &SuiteSummary, reports: &[PairReport]) {
        let failures: Vec<_> = reports
            .iter()
            .filter_map(|report| match &report.result {
                PairResult::Failed(_, diff) => Some((report.label.as_str(), diff.as_str())),
                _ => None,
            })
            .collect();

        if !failures.is_empty() {
            let _ = writeln!(self.out);
            let banner = self.paint(BOLD_RED, "=================== FAILURES ===================");
            let _ = writeln!(self.out, "{banner}");
            for (label, diff) in failures {
                let _ = writeln!(self.out);
                let title = self.paint(BOLD, &format!("___________ {label} ___________"));
                let _ = writeln!(self.out, "{title}");
                let _ = writeln!(self.out);
                let _ = writeln!(self.out, "{}", diff.trim_end());
            }
        }

        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(self.paint(GREEN, &format!("{} passed", summary.passed)));
        }
        if summary.failed > 0 {
            parts.push(self.paint(RED, &format!("{} failed", summary.failed)));
        }
        if summary.skipped > 0 {
            parts.push(self.paint(YELLOW, &format!("{} skipped", summary.skipped)));
        }
        if parts.is_empty() {
            parts.push("no pairs ran".to_string());
        }

        let _ = writeln!(self.out);
        let _ = writeln!(
            self.out,
            "=================== {} in {:.2}s ===================",
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
        let _ = self.out.flush();
    }
}

// ============================================================================
// JSON
// ============================================================================

#[derive(Serialize)]
struct JsonPair<'a> {
    label: &'a str,
    function: Option<&'a str>,
    scenario: Option<&'a str>,
    status: &'static str,
    duration_ms: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diff: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonSummary {
    passed: usize,
    failed: usize,
    skipped: usize,
    total: usize,
    duration_ms: u128,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    pairs: Vec<JsonPair<'a>>,
    summary: JsonSummary,
}

/// Writes a single JSON document once the run completes.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl JsonReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SuiteReporter for JsonReporter<W> {
    fn on_pair_complete(&mut self, _report: &PairReport) {}

    fn on_run_complete(&mut self, summary: &SuiteSummary, reports: &[PairReport]) {
        let pairs = reports
            .iter()
            .map(|report| JsonPair {
                label: &report.label,
                function: report.function.as_deref(),
                scenario: report.scenario.as_deref(),
                status: report.result.status(),
                duration_ms: report.result.duration().map(|d| d.as_millis()),
                reason: match &report.result {
                    PairResult::Skipped(reason) => Some(reason.as_str()),
                    _ => None,
                },
                diff: match &report.result {
                    PairResult::Failed(_, diff) => Some(diff.as_str()),
                    _ => None,
                },
            })
            .collect();
        let document = JsonDocument {
            pairs,
            summary: JsonSummary {
                passed: summary.passed,
                failed: summary.failed,
                skipped: summary.skipped,
                total: summary.total(),
                duration_ms: summary.duration.as_millis(),
            },
        };
        if let Err(err) = serde_json::to_writer_pretty(&mut self.out, &document) {
            tracing::error!(%err, "failed to write JSON report");
            return;
        }
        let _ = writeln!(self.out);
        let _ = self.out.flush();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn reports() -> Vec<PairReport> {
        vec![
            PairReport {
                label: "ascii::noargs".into(),
                function: Some("ascii".into()),
                scenario: Some("noargs".into()),
                result: PairResult::Skipped("not implemented".into()),
            },
            PairReport {
                label: "ascii::int".into(),
                function: Some("ascii".into()),
                scenario: Some("int".into()),
                result: PairResult::Passed(Duration::from_millis(3)),
            },
            PairReport {
                label: "code::ascii".into(),
                function: None,
                scenario: None,
                result: PairResult::Failed(Duration::from_millis(5), "output differs".into()),
            },
        ]
    }

    fn summarize(reports: &[PairReport]) -> SuiteSummary {
        let mut summary = SuiteSummary::default();
        for report in reports {
            summary.record(&report.result);
        }
        summary
    }

    #[test]
    fn summary_counts_every_verdict() {
        let summary = summarize(&reports());
        assert_eq!((summary.passed, summary.failed, summary.skipped), (1, 1, 1));
        assert_eq!(summary.total(), 3);
        assert!(!summary.is_success());
    }

    #[test]
    fn console_lists_pairs_and_failures() {
        let reports = reports();
        let mut reporter = ConsoleReporter::new(Vec::new(), false).with_color(false);
        reporter.on_suite_start(reports.len());
        for report in &reports {
            reporter.on_pair_complete(report);
        }
        reporter.on_run_complete(&summarize(&reports), &reports);
        let text = String::from_utf8(reporter.into_inner()).unwrap();

        assert!(text.contains("collected 3 pair(s)"));
        assert!(text.contains("ascii::noargs SKIPPED (not implemented)\n"));
        assert!(text.contains("ascii::int PASSED\n"));
        assert!(text.contains("code::ascii FAILED\n"));
        assert!(text.contains("___________ code::ascii ___________\n\noutput differs\n"));
        assert!(text.contains("1 passed, 1 failed, 1 skipped in 0.00s"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn verbose_console_shows_durations() {
        let reports = reports();
        let mut reporter = ConsoleReporter::new(Vec::new(), true).with_color(false);
        reporter.on_pair_complete(&reports[1]);
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(text, "ascii::int PASSED (3ms)\n");
    }

    #[test]
    fn json_document_has_pairs_and_totals() {
        let reports = reports();
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.on_run_complete(&summarize(&reports), &reports);
        let value: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();

        assert_eq!(value["summary"]["total"], 3);
        assert_eq!(value["summary"]["skipped"], 1);
        assert_eq!(value["pairs"][0]["status"], "SKIPPED");
        assert_eq!(value["pairs"][0]["reason"], "not implemented");
        assert_eq!(value["pairs"][2]["function"], serde_json::Value::Null);
        assert_eq!(value["pairs"][2]["diff"], "output differs");
        assert!(value["pairs"][1].get("diff").is_none());
    }
}
