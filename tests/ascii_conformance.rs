//! End-to-end conformance runs of the built-in `ascii` suite.
//!
//! CPython serves as the reference backend. The transpiled backend comes from `TWINRUN_TRANSPILED`
//! (a whitespace-separated command line, `{file}` for the staged snippet); without it CPython is
//! compared against itself through a staged file, which exercises the whole harness.
//! Tests return early when `python3` is not installed.

#![cfg(unix)]

use std::process::Command;
use std::time::Duration;

use twinrun::backend::{BackendKind, BackendPair, CommandEngine};
use twinrun::runner;
use twinrun::suite::{ConformanceSuite, ExclusionSet, PairResult, SilentReporter, check_snippet};
use twinrun::suites::{self, ASCII_CODE};
use twinrun_core::lang::scenarios::{self, ScenarioCatalog, ScenarioId};
use twinrun_core::{FailureKind, Outcome, Snippet};

fn python_available() -> bool {
    Command::new("python3")
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success())
}

fn reference() -> CommandEngine {
    CommandEngine::new("python3")
        .with_args(["-"])
        .named("python3")
        .with_timeout(Duration::from_secs(20))
}

fn transpiled() -> CommandEngine {
    let argv: Vec<String> = std::env::var("TWINRUN_TRANSPILED")
        .ok()
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .filter(|argv: &Vec<String>| !argv.is_empty())
        .unwrap_or_else(|| vec!["python3".into(), "{file}".into()]);
    CommandEngine::from_argv(&argv)
        .unwrap()
        .with_timeout(Duration::from_secs(20))
}

#[test]
fn reference_ascii_matches_known_values() {
    if !python_available() {
        return;
    }
    let backends = BackendPair::new(reference(), transpiled());
    let outcome = runner::execute(&Snippet::adjusted(ASCII_CODE), BackendKind::Reference, &backends);
    assert_eq!(
        outcome,
        Outcome::Output(b"'aaa'\n'\\xfcberm\\xf6hren'\n'\\u30d0\\u30bf\\u30d3\\u30a2'\n'a\\U00013208'\n".to_vec())
    );
}

#[test]
fn reference_noargs_raises_type_error() {
    if !python_available() {
        return;
    }
    let backends = BackendPair::new(reference(), transpiled());
    let snippet = Snippet::new("print('>>> ascii()')\nprint(ascii())\n");
    let outcome = runner::execute(&snippet, BackendKind::Reference, &backends);
    assert_eq!(outcome.failure_kind(), Some(&FailureKind::raised("TypeError")));
}

#[test]
fn ascii_suite_passes_against_transpiled_backend() {
    if !python_available() {
        return;
    }
    let backends = BackendPair::new(reference(), transpiled());
    let suite = suites::builtin_suite("ascii").unwrap();
    let report = suite.run(&backends, None, &mut SilentReporter);

    let failures: Vec<_> = report
        .reports
        .iter()
        .filter_map(|r| match &r.result {
            PairResult::Failed(_, diff) => Some(format!("{}:\n{diff}", r.label)),
            _ => None,
        })
        .collect();
    assert!(failures.is_empty(), "{}", failures.join("\n\n"));

    assert_eq!(report.summary.skipped, 5);
    assert_eq!(report.summary.total(), suite.catalog().len() + 1);
    for scenario in ["noargs", "class", "NotImplemented", "range", "slice"] {
        let label = format!("ascii::{scenario}");
        assert!(
            matches!(report.get(&label).unwrap().result, PairResult::Skipped(_)),
            "{label} should be skipped"
        );
    }
}

#[test]
fn divergent_backend_fails_without_aborting_siblings() {
    if !python_available() {
        return;
    }
    let liar = CommandEngine::new("sh").with_args(["-c", "cat > /dev/null; echo nope"]);
    let backends = BackendPair::new(reference(), liar);
    let suite = suites::builtin_suite("ascii").unwrap();
    let report = suite.run(&backends, Some("ascii::"), &mut SilentReporter);

    assert_eq!(report.summary.skipped, 5);
    assert_eq!(report.summary.passed, 0);
    assert_eq!(report.summary.failed, suite.catalog().len() - 5);
    assert!(report.get("code::ascii").is_none());
}

#[test]
fn check_snippet_reports_escaped_diff() {
    if !python_available() {
        return;
    }
    let liar = CommandEngine::new("sh").with_args(["-c", "cat > /dev/null; printf 'cafe\\n'"]);
    let backends = BackendPair::new(reference(), liar);
    let result = check_snippet(&Snippet::new("print('café')\n"), &backends);
    let diff = result.diff().unwrap();
    assert!(diff.contains("caf\\xe9"), "{diff}");
}

#[test]
fn reference_runs_are_repeatable() {
    if !python_available() {
        return;
    }
    let backends = BackendPair::new(reference(), transpiled());
    let snippets = [
        Snippet::adjusted(ASCII_CODE),
        scenarios::info_for(ScenarioId::Str).snippet_for("ascii"),
        scenarios::info_for(ScenarioId::NoArgs).snippet_for("ascii"),
    ];
    for snippet in &snippets {
        let first = runner::execute(snippet, BackendKind::Reference, &backends);
        let second = runner::execute(snippet, BackendKind::Reference, &backends);
        assert_eq!(first, second, "{}", snippet.as_str());
    }
}

#[test]
fn divergence_after_a_raising_sample_is_caught() {
    if !python_available() {
        return;
    }
    // `len(0)` returns 99 instead of raising; `len(3)` still raises before it.
    let patched = CommandEngine::new("python3")
        .with_args([
            "-c",
            "import builtins, sys\no = builtins.len\nbuiltins.len = lambda x: 99 if x == 0 else o(x)\nexec(sys.stdin.read())",
        ])
        .with_timeout(Duration::from_secs(20));
    let backends = BackendPair::new(reference(), patched);
    let suite = ConformanceSuite::new(
        vec!["len".into()],
        ExclusionSet::new(),
        ScenarioCatalog::from_ids(&[ScenarioId::Int]),
    )
    .unwrap();
    let report = suite.run(&backends, None, &mut SilentReporter);

    let result = &report.get("len::int").unwrap().result;
    assert!(result.is_failed(), "{result:?}");
}
