//! Snippet runner: execute one snippet on one backend and capture its [`Outcome`].
//!
//! The runner is the boundary where engine errors stop. Whatever happens inside an engine (a launch
//! failure, a timeout, a crash, even a panic in an in-process engine) comes back as
//! `Outcome::Failure`, so a broken backend can never abort the comparison of its sibling.

use std::panic::{self, AssertUnwindSafe};

use twinrun_core::{FailureKind, Outcome, Snippet};

use crate::backend::{BackendError, BackendKind, BackendPair, Engine};

/// Execute `snippet` on the engine registered for `kind`.
pub fn execute(snippet: &Snippet, kind: BackendKind, backends: &BackendPair) -> Outcome {
    run_engine(snippet, kind, backends.get(kind))
}

/// Execute `snippet` on the reference backend, then on the transpiled backend.
///
/// The reference run always completes before the transpiled run starts.
pub fn execute_both(snippet: &Snippet, backends: &BackendPair) -> (Outcome, Outcome) {
    let reference = execute(snippet, BackendKind::Reference, backends);
    let transpiled = execute(snippet, BackendKind::Transpiled, backends);
    (reference, transpiled)
}

#[tracing::instrument(skip_all, fields(backend = %kind, engine = engine.name()))]
fn run_engine(snippet: &Snippet, kind: BackendKind, engine: &dyn Engine) -> Outcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| engine.execute(snippet)));

    let outcome = match result {
        Ok(Ok(execution)) => match execution.raised {
            None => Outcome::Output(execution.stdout),
            Some(raised) => {
                if !execution.stdout.is_empty() {
                    tracing::debug!(
                        bytes = execution.stdout.len(),
                        "discarding output written before {}",
                        raised.kind
                    );
                }
                Outcome::failure(FailureKind::Raised(raised.kind), raised.message)
            }
        },
        Ok(Err(err)) => failure_from_error(&err),
        Err(payload) => Outcome::failure(
            FailureKind::Crashed,
            format!("engine panicked: {}", panic_message(payload.as_ref())),
        ),
    };

    if let Outcome::Failure { kind: failure, .. } = &outcome {
        if failure.is_harness_side() {
            tracing::warn!(%failure, "{kind} backend did not produce an outcome of its own");
        }
    }
    outcome
}

fn failure_from_error(err: &BackendError) -> Outcome {
    let kind = match err {
        BackendError::Spawn { .. } => FailureKind::Unavailable,
        BackendError::Timeout(_) => FailureKind::Timeout,
        BackendError::Crashed { .. } | BackendError::Io(_) => FailureKind::Crashed,
    };
    Outcome::failure(kind, err.to_string())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
