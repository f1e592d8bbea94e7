//! Spawning and supervising the test process.

use std::env;
use std::ffi::{OsStr, OsString};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::report::TestRunReport;

/// Tracing target for test-run supervision.
const TESTRUN_TARGET: &str = "patchgate_testrun::command";

/// Default wall-clock budget for one test run, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Interval between child exit checks.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A configured test invocation.
///
/// Runs `pytest -v --tb=short` in the working directory, optionally narrowed
/// to a single test selector. The test binary can be overridden with
/// [`TestCommand::program`] or the `PATCHGATE_PYTEST` environment variable.
#[derive(Debug, Clone)]
pub struct TestCommand {
    working_dir: PathBuf,
    selector: Option<String>,
    timeout: Duration,
    program: Option<OsString>,
}

impl TestCommand {
    /// Creates a test invocation for the given project directory.
    #[must_use]
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            selector: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            program: None,
        }
    }

    /// Narrows the run to a single test file or selector expression.
    #[must_use]
    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    /// Overrides the wall-clock budget.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the test binary.
    #[must_use]
    pub fn program(mut self, program: impl Into<OsString>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Runs the test command to completion or deadline.
    ///
    /// Never returns an error: spawn failures, wait failures, and timeouts
    /// all become a failed [`TestRunReport`]. On every exit path the child
    /// process is either observed exited or killed and reaped, and both
    /// stream readers are joined.
    #[must_use]
    pub fn run(&self) -> TestRunReport {
        let program = resolve_test_binary(self.program.as_deref());

        let mut command = Command::new(&program);
        command.arg("-v").arg("--tb=short");
        if let Some(selector) = &self.selector {
            command.arg(selector);
        }
        command
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(
            target: TESTRUN_TARGET,
            program = %program.to_string_lossy(),
            working_dir = %self.working_dir.display(),
            timeout_secs = self.timeout.as_secs(),
            "spawning test process"
        );

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(err) => {
                return TestRunReport::failed(format!(
                    "failed to launch {}: {err}",
                    program.to_string_lossy()
                ));
            }
        };

        let stdout_reader = capture_stream(child.stdout.take());
        let stderr_reader = capture_stream(child.stderr.take());

        match wait_with_deadline(&mut child, self.timeout) {
            WaitOutcome::Exited(status) => {
                let stdout = join_capture(stdout_reader);
                let stderr = join_capture(stderr_reader);
                debug!(target: TESTRUN_TARGET, ?status, "test process exited");
                TestRunReport::completed(status, stdout, stderr)
            }
            WaitOutcome::TimedOut => {
                warn!(
                    target: TESTRUN_TARGET,
                    timeout_secs = self.timeout.as_secs(),
                    "test run timed out, killing process"
                );
                kill_and_reap(&mut child);
                // Killing the child closes its pipes, so the readers finish.
                let _ = join_capture(stdout_reader);
                let _ = join_capture(stderr_reader);
                TestRunReport::failed(format!(
                    "Tests timed out after {} seconds",
                    self.timeout.as_secs()
                ))
            }
            WaitOutcome::WaitFailed(message) => {
                kill_and_reap(&mut child);
                let _ = join_capture(stdout_reader);
                let _ = join_capture(stderr_reader);
                TestRunReport::failed(message)
            }
        }
    }
}

/// Result of waiting on the child process.
enum WaitOutcome {
    /// The child exited before the deadline.
    Exited(ExitStatus),
    /// The deadline passed with the child still running.
    TimedOut,
    /// Polling the child failed.
    WaitFailed(String),
}

/// Polls the child until it exits or the deadline passes.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> WaitOutcome {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return WaitOutcome::Exited(status),
            Ok(None) => {
                if start.elapsed() > timeout {
                    return WaitOutcome::TimedOut;
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(err) => return WaitOutcome::WaitFailed(format!("failed to wait on tests: {err}")),
        }
    }
}

/// Ensures a child that will not be waited on normally is still reaped.
fn kill_and_reap(child: &mut Child) {
    drop(child.kill());
    drop(child.wait());
}

/// Reads a captured stream to the end on a background thread.
fn capture_stream(stream: Option<impl Read + Send + 'static>) -> Option<JoinHandle<String>> {
    stream.map(|mut reader| {
        std::thread::spawn(move || {
            let mut buffer = String::new();
            if reader.read_to_string(&mut buffer).is_err() {
                warn!(target: TESTRUN_TARGET, "test output was not valid UTF-8");
            }
            buffer
        })
    })
}

/// Joins a reader thread, tolerating a panicked or absent reader.
fn join_capture(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Resolves the test binary: explicit override, then the `PATCHGATE_PYTEST`
/// environment variable, then plain `pytest` on the search path.
fn resolve_test_binary(program_override: Option<&OsStr>) -> OsString {
    program_override
        .map(OsString::from)
        .or_else(|| env::var_os("PATCHGATE_PYTEST"))
        .unwrap_or_else(|| OsString::from("pytest"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_test_binary_uses_override() {
        let resolved = resolve_test_binary(Some(OsStr::new("/custom/pytest")));
        assert_eq!(resolved, OsString::from("/custom/pytest"));
    }

    #[test]
    fn resolve_test_binary_falls_back_to_default() {
        let resolved = resolve_test_binary(None);
        if let Some(from_env) = env::var_os("PATCHGATE_PYTEST") {
            assert_eq!(resolved, from_env);
        } else {
            assert_eq!(resolved, OsString::from("pytest"));
        }
    }

    #[test]
    fn missing_binary_becomes_failed_report() {
        let report = TestCommand::new(".")
            .program("/nonexistent/patchgate-pytest")
            .run();

        assert!(!report.success());
        match report {
            TestRunReport::Failed { error, returncode, .. } => {
                assert_eq!(returncode, -1);
                assert!(error.contains("failed to launch"));
            }
            TestRunReport::Completed { .. } => panic!("expected a failed report"),
        }
    }

    #[cfg(unix)]
    mod unix {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::Path;

        use super::*;

        /// Writes an executable shell script standing in for pytest.
        fn fake_pytest(dir: &Path, body: &str) -> std::path::PathBuf {
            let path = dir.join("fake-pytest");
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
            path
        }

        #[test]
        fn passing_run_captures_streams() {
            let dir = tempfile::tempdir().expect("tempdir");
            let script = fake_pytest(dir.path(), "echo collected; echo noise >&2; exit 0");

            let report = TestCommand::new(dir.path()).program(script).run();

            match report {
                TestRunReport::Completed {
                    success,
                    stdout,
                    stderr,
                    returncode,
                } => {
                    assert!(success);
                    assert_eq!(returncode, 0);
                    assert!(stdout.contains("collected"));
                    assert!(stderr.contains("noise"));
                }
                TestRunReport::Failed { .. } => panic!("expected a completed report"),
            }
        }

        #[test]
        fn failing_run_reports_exit_code() {
            let dir = tempfile::tempdir().expect("tempdir");
            let script = fake_pytest(dir.path(), "echo 1 failed; exit 2");

            let report = TestCommand::new(dir.path()).program(script).run();

            match report {
                TestRunReport::Completed {
                    success,
                    returncode,
                    ..
                } => {
                    assert!(!success);
                    assert_eq!(returncode, 2);
                }
                TestRunReport::Failed { .. } => panic!("expected a completed report"),
            }
        }

        #[test]
        fn selector_is_forwarded_to_the_command() {
            let dir = tempfile::tempdir().expect("tempdir");
            let script = fake_pytest(dir.path(), "echo \"$@\"");

            let report = TestCommand::new(dir.path())
                .program(script)
                .selector("tests/test_gate.py")
                .run();

            match report {
                TestRunReport::Completed { stdout, .. } => {
                    assert!(stdout.contains("tests/test_gate.py"));
                }
                TestRunReport::Failed { .. } => panic!("expected a completed report"),
            }
        }

        #[test]
        fn timeout_kills_and_reports_failure() {
            let dir = tempfile::tempdir().expect("tempdir");
            let script = fake_pytest(dir.path(), "sleep 30");

            let report = TestCommand::new(dir.path())
                .program(script)
                .timeout(Duration::from_secs(1))
                .run();

            match report {
                TestRunReport::Failed { error, returncode, .. } => {
                    assert_eq!(returncode, -1);
                    assert!(error.contains("timed out after 1 seconds"));
                }
                TestRunReport::Completed { .. } => panic!("expected a timed-out report"),
            }
        }
    }
}
