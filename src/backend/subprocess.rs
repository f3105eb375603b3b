//! Run snippets in a child process.
//!
//! [`CommandEngine`] launches a configured command once per snippet. The snippet reaches the program
//! either on stdin or, when an argument is the literal `{file}`, through a temporary file whose path
//! replaces that argument. Every call owns its child, its pipes, and its temporary file, so captured
//! output can never leak between calls.
//!
//! ## Exit protocol
//!
//! - exit status 0: the run completed; stdout is the observable output.
//! - non-zero exit with a traceback tail on stderr (`Name: message`): the program raised `Name`.
//! - anything else: the engine reports a crash with the end of stderr.
//!
//! The time ceiling is enforced with `tokio::time::timeout`; an expired child is killed on drop.

use std::collections::BTreeMap;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use twinrun_core::Snippet;
use twinrun_core::traceback::{classify_stderr, tail_lines};

use super::{BackendError, Engine, Execution};

/// Argument placeholder replaced by the path of the staged snippet file.
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Default execution ceiling per call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment applied to every child before user overrides; keeps CPython output stable.
const DEFAULT_ENV: &[(&str, &str)] = &[("PYTHONIOENCODING", "utf-8"), ("PYTHONHASHSEED", "0")];

const CRASH_TAIL_LINES: usize = 20;

/// An engine that executes snippets with an external command.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    name: String,
    program: String,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    current_dir: Option<PathBuf>,
    timeout: Duration,
    file_suffix: String,
}

impl CommandEngine {
    /// Create an engine running `program` with no arguments (snippet on stdin).
    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        Self {
            name: program.clone(),
            program,
            args: Vec::new(),
            env: DEFAULT_ENV
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            current_dir: None,
            timeout: DEFAULT_TIMEOUT,
            file_suffix: ".py".to_string(),
        }
    }

    /// Create an engine from a full argv (`program` followed by its arguments).
    ///
    /// Returns `None` for an empty argv.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone()).with_args(args.iter().cloned()))
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the file name suffix used when the snippet is staged to a file (default `.py`).
    pub fn with_file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.file_suffix = suffix.into();
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn uses_file(&self) -> bool {
        self.args.iter().any(|a| a.contains(FILE_PLACEHOLDER))
    }

    fn stage(&self, snippet: &Snippet) -> Result<Option<NamedTempFile>, BackendError> {
        if !self.uses_file() {
            return Ok(None);
        }
        let mut file = tempfile::Builder::new()
            .prefix("twinrun_")
            .suffix(&self.file_suffix)
            .tempfile()?;
        file.write_all(snippet.as_bytes())?;
        file.flush()?;
        Ok(Some(file))
    }

    fn resolve_args(&self, staged: Option<&Path>) -> Vec<String> {
        match staged {
            Some(path) => {
                let path = path.to_string_lossy();
                self.args.iter().map(|a| a.replace(FILE_PLACEHOLDER, &path)).collect()
            }
            None => self.args.clone(),
        }
    }

    async fn run(&self, snippet: &Snippet) -> Result<Execution, BackendError> {
        let staged = self.stage(snippet)?;
        let args = self.resolve_args(staged.as_ref().map(|f| f.path()));

        let mut command = Command::new(&self.program);
        command
            .args(&args)
            .envs(&self.env)
            .stdin(if staged.is_some() { Stdio::null() } else { Stdio::piped() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| BackendError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let stdin = child.stdin.take();
        let source = snippet.clone();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                match stdin.write_all(source.as_bytes()).await {
                    // The program may exit before consuming its input; that is its outcome, not ours.
                    Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
                    _ => {}
                }
            }
            Ok(())
        };

        let collected = async { tokio::join!(feed, child.wait_with_output()) };
        let (fed, output) = tokio::time::timeout(self.timeout, collected)
            .await
            .map_err(|_| BackendError::Timeout(self.timeout))?;
        fed?;
        let output = output?;
        drop(staged);

        if output.status.success() {
            return Ok(Execution::completed(output.stdout));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        match classify_stderr(&stderr) {
            Some(tail) => Ok(Execution::raised(output.stdout, tail.kind, tail.message)),
            None => Err(BackendError::Crashed {
                status: output.status.to_string(),
                stderr: tail_lines(&stderr, CRASH_TAIL_LINES),
            }),
        }
    }
}

impl Engine for CommandEngine {
    fn name(&self) -> &str {
        &self.name
    }

    #[tracing::instrument(skip_all, fields(engine = %self.name, snippet_len = snippet.as_str().len()))]
    fn execute(&self, snippet: &Snippet) -> Result<Execution, BackendError> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(self.run(snippet))
    }
}
