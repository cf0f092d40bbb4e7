//! External process execution
//!
//! Runs external commands with an explicit working directory, an explicit
//! environment overlay, and optional stdout capture. Defined as a capability
//! trait so tests can substitute a deterministic fake without spawning real
//! processes.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// Error from a single external invocation.
///
/// Carries the rendered command line so the failing stage can surface it
/// verbatim. There are no retries; one failed invocation is terminal for the
/// stage that issued it.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The process could not be spawned at all
    #[error("failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited non-zero (code -1 if killed by a signal)
    #[error("`{command}` exited with status {code}: {stderr}")]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },
}

/// Options for a single external invocation
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Working directory for the command; inherits the process cwd if unset
    pub cwd: Option<PathBuf>,

    /// Environment overlay merged over the ambient environment. On key
    /// collision the overlay wins.
    pub env: Vec<(String, String)>,

    /// Capture stdout instead of passing it through to the console
    pub capture_output: bool,
}

impl ExecOptions {
    /// Options that run in the given directory with inherited stdio.
    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        ExecOptions {
            cwd: Some(cwd.into()),
            ..Default::default()
        }
    }

    /// Enable stdout capture.
    pub fn captured(mut self) -> Self {
        self.capture_output = true;
        self
    }
}

/// Output of a completed invocation
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    /// Captured stdout; empty unless capture was requested
    pub stdout: String,
}

/// Capability interface for executing external commands.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run a command to completion.
    ///
    /// # Returns
    /// The captured output on a zero exit status, `ExecError` otherwise.
    async fn run(
        &self,
        command: &str,
        args: &[&str],
        options: &ExecOptions,
    ) -> Result<CapturedOutput, ExecError>;
}

/// Runner backed by real OS processes via tokio.
pub struct SystemProcessRunner;

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(
        &self,
        command: &str,
        args: &[&str],
        options: &ExecOptions,
    ) -> Result<CapturedOutput, ExecError> {
        let rendered = render_command(command, args);
        tracing::debug!(command = %rendered, "Executing command");

        let mut cmd = Command::new(command);
        cmd.args(args).stdin(Stdio::null());

        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }
        for (key, value) in &options.env {
            cmd.env(key, value);
        }

        if options.capture_output {
            let output = cmd
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output()
                .await
                .map_err(|e| ExecError::Spawn {
                    command: rendered.clone(),
                    source: e,
                })?;

            if !output.status.success() {
                return Err(ExecError::NonZeroExit {
                    command: rendered,
                    code: output.status.code().unwrap_or(-1),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }

            Ok(CapturedOutput {
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            })
        } else {
            let status = cmd.status().await.map_err(|e| ExecError::Spawn {
                command: rendered.clone(),
                source: e,
            })?;

            if !status.success() {
                // stderr already went to the console in passthrough mode
                return Err(ExecError::NonZeroExit {
                    command: rendered,
                    code: status.code().unwrap_or(-1),
                    stderr: String::new(),
                });
            }

            Ok(CapturedOutput::default())
        }
    }
}

fn render_command(command: &str, args: &[&str]) -> String {
    if args.is_empty() {
        command.to_string()
    } else {
        format!("{} {}", command, args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_capture_stdout() {
        let runner = SystemProcessRunner;
        let output = runner
            .run("echo", &["hello"], &ExecOptions::default().captured())
            .await
            .unwrap();
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_passthrough_returns_empty_output() {
        let runner = SystemProcessRunner;
        let output = runner
            .run("echo", &["hello"], &ExecOptions::default())
            .await
            .unwrap();
        assert!(output.stdout.is_empty());
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let runner = SystemProcessRunner;
        let result = runner
            .run("gt-sync-no-such-command", &[], &ExecOptions::default())
            .await;
        assert!(matches!(result, Err(ExecError::Spawn { .. })));
    }

    #[tokio::test]
    async fn test_non_zero_exit_carries_code_and_command() {
        let runner = SystemProcessRunner;
        let result = runner
            .run("sh", &["-c", "exit 3"], &ExecOptions::default().captured())
            .await;
        match result {
            Err(ExecError::NonZeroExit { command, code, .. }) => {
                assert_eq!(code, 3);
                assert!(command.starts_with("sh -c"));
            }
            other => panic!("expected NonZeroExit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_zero_exit_captures_stderr() {
        let runner = SystemProcessRunner;
        let result = runner
            .run(
                "sh",
                &["-c", "echo boom >&2; exit 1"],
                &ExecOptions::default().captured(),
            )
            .await;
        match result {
            Err(ExecError::NonZeroExit { stderr, .. }) => assert_eq!(stderr, "boom"),
            other => panic!("expected NonZeroExit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_env_overlay_wins_over_ambient() {
        // HOME is always present in the ambient environment, so overriding it
        // exercises the collision rule.
        let runner = SystemProcessRunner;
        let options = ExecOptions {
            env: vec![("HOME".to_string(), "/overlay-home".to_string())],
            capture_output: true,
            ..Default::default()
        };
        let output = runner
            .run("sh", &["-c", "printf %s \"$HOME\""], &options)
            .await
            .unwrap();
        assert_eq!(output.stdout, "/overlay-home");
    }

    #[tokio::test]
    async fn test_env_overlay_adds_new_variable() {
        let runner = SystemProcessRunner;
        let options = ExecOptions {
            env: vec![("GT_SYNC_TEST_VALUE".to_string(), "abc123".to_string())],
            capture_output: true,
            ..Default::default()
        };
        let output = runner
            .run("sh", &["-c", "printf %s \"$GT_SYNC_TEST_VALUE\""], &options)
            .await
            .unwrap();
        assert_eq!(output.stdout, "abc123");
    }

    #[tokio::test]
    async fn test_working_directory() {
        let temp = TempDir::new().unwrap();
        let runner = SystemProcessRunner;
        let output = runner
            .run("pwd", &[], &ExecOptions::in_dir(temp.path()).captured())
            .await
            .unwrap();
        assert_eq!(
            PathBuf::from(output.stdout.trim()).canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_render_command() {
        assert_eq!(render_command("git", &[]), "git");
        assert_eq!(render_command("git", &["status", "--porcelain"]), "git status --porcelain");
    }
}
