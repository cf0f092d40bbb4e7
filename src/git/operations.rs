//! Git CLI operations
//!
//! Thin compositions over the process runner. Every action fails with the
//! underlying invocation's `ExecError`; mapping to a stage error is the
//! pipeline's job.

use std::path::PathBuf;

use crate::process::{ExecError, ExecOptions, ProcessRunner};

/// Commit-author name used for translation commits
pub const BOT_NAME: &str = "generaltranslation-bot";

/// Commit-author email used for translation commits
pub const BOT_EMAIL: &str = "bot@generaltranslation.com";

/// Git actions scoped to one working directory.
pub struct GitOperations<'a> {
    runner: &'a dyn ProcessRunner,

    /// Directory to run git in; inherits the process cwd if unset
    cwd: Option<PathBuf>,
}

impl<'a> GitOperations<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, cwd: Option<PathBuf>) -> Self {
        GitOperations { runner, cwd }
    }

    fn options(&self) -> ExecOptions {
        ExecOptions {
            cwd: self.cwd.clone(),
            ..Default::default()
        }
    }

    async fn git(&self, args: &[&str]) -> Result<(), ExecError> {
        self.runner.run("git", args, &self.options()).await?;
        Ok(())
    }

    /// Set the local commit-author identity. Must run before any commit.
    pub async fn configure_identity(&self, name: &str, email: &str) -> Result<(), ExecError> {
        self.git(&["config", "user.name", name]).await?;
        self.git(&["config", "user.email", email]).await?;
        Ok(())
    }

    /// Create and switch to a new branch from the current HEAD.
    pub async fn create_branch(&self, name: &str) -> Result<(), ExecError> {
        self.git(&["checkout", "-b", name]).await
    }

    /// Stage all working-tree changes and commit with the given message.
    pub async fn commit_all(&self, message: &str) -> Result<(), ExecError> {
        self.git(&["add", "-A"]).await?;
        self.git(&["commit", "-m", message]).await
    }

    /// Push the current branch, or explicitly push to a named branch.
    ///
    /// Assumes the remote is preconfigured; credentials are handled by the
    /// invoking CI runner.
    pub async fn push(&self, branch: Option<&str>) -> Result<(), ExecError> {
        match branch {
            Some(name) => self.git(&["push", "origin", name]).await,
            None => self.git(&["push"]).await,
        }
    }

    /// Check whether the working tree has uncommitted modifications.
    ///
    /// Judges "changes exist" iff the porcelain status output is non-empty
    /// after trimming. Idempotent: asking twice without an intervening
    /// mutation yields the same answer.
    pub async fn has_pending_changes(&self) -> Result<bool, ExecError> {
        let output = self
            .runner
            .run("git", &["status", "--porcelain"], &self.options().captured())
            .await?;
        Ok(!output.stdout.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{CapturedOutput, SystemProcessRunner};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use tokio::process::Command;

    async fn setup_git_repo() -> TempDir {
        let temp = TempDir::new().unwrap();

        Command::new("git")
            .args(["init"])
            .current_dir(temp.path())
            .output()
            .await
            .unwrap();

        Command::new("git")
            .args(["config", "user.email", "test@test.com"])
            .current_dir(temp.path())
            .output()
            .await
            .unwrap();

        Command::new("git")
            .args(["config", "user.name", "Test"])
            .current_dir(temp.path())
            .output()
            .await
            .unwrap();

        // Create initial commit
        std::fs::write(temp.path().join("README.md"), "# Test").unwrap();

        Command::new("git")
            .args(["add", "-A"])
            .current_dir(temp.path())
            .output()
            .await
            .unwrap();

        Command::new("git")
            .args(["commit", "-m", "Initial commit"])
            .current_dir(temp.path())
            .output()
            .await
            .unwrap();

        temp
    }

    async fn capture_git(temp: &TempDir, args: &[&str]) -> String {
        let runner = SystemProcessRunner;
        runner
            .run("git", args, &ExecOptions::in_dir(temp.path()).captured())
            .await
            .unwrap()
            .stdout
            .trim()
            .to_string()
    }

    #[tokio::test]
    async fn test_has_pending_changes() {
        let temp = setup_git_repo().await;
        let runner = SystemProcessRunner;
        let git = GitOperations::new(&runner, Some(temp.path().to_path_buf()));

        // Clean after the initial commit
        assert!(!git.has_pending_changes().await.unwrap());

        std::fs::write(temp.path().join("new_file.txt"), "content").unwrap();
        assert!(git.has_pending_changes().await.unwrap());
    }

    #[tokio::test]
    async fn test_commit_all_uses_message_and_cleans_tree() {
        let temp = setup_git_repo().await;
        let runner = SystemProcessRunner;
        let git = GitOperations::new(&runner, Some(temp.path().to_path_buf()));

        std::fs::write(temp.path().join("fr.json"), "{}").unwrap();
        git.commit_all("Update translations via GT Action")
            .await
            .unwrap();

        assert!(!git.has_pending_changes().await.unwrap());
        let subject = capture_git(&temp, &["log", "-1", "--pretty=%s"]).await;
        assert_eq!(subject, "Update translations via GT Action");
    }

    #[tokio::test]
    async fn test_commit_all_fails_on_clean_tree() {
        let temp = setup_git_repo().await;
        let runner = SystemProcessRunner;
        let git = GitOperations::new(&runner, Some(temp.path().to_path_buf()));

        let result = git.commit_all("nothing here").await;
        assert!(matches!(result, Err(ExecError::NonZeroExit { .. })));
    }

    #[tokio::test]
    async fn test_create_branch_switches_head() {
        let temp = setup_git_repo().await;
        let runner = SystemProcessRunner;
        let git = GitOperations::new(&runner, Some(temp.path().to_path_buf()));

        git.create_branch("translations-update").await.unwrap();
        let head = capture_git(&temp, &["rev-parse", "--abbrev-ref", "HEAD"]).await;
        assert_eq!(head, "translations-update");
    }

    #[tokio::test]
    async fn test_configure_identity() {
        let temp = setup_git_repo().await;
        let runner = SystemProcessRunner;
        let git = GitOperations::new(&runner, Some(temp.path().to_path_buf()));

        git.configure_identity(BOT_NAME, BOT_EMAIL).await.unwrap();

        assert_eq!(capture_git(&temp, &["config", "user.name"]).await, BOT_NAME);
        assert_eq!(capture_git(&temp, &["config", "user.email"]).await, BOT_EMAIL);
    }

    /// Runner that records rendered command lines instead of executing.
    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ProcessRunner for RecordingRunner {
        async fn run(
            &self,
            command: &str,
            args: &[&str],
            _options: &ExecOptions,
        ) -> Result<CapturedOutput, ExecError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{} {}", command, args.join(" ")).trim().to_string());
            Ok(CapturedOutput::default())
        }
    }

    #[tokio::test]
    async fn test_push_targets_named_branch_when_given() {
        let runner = RecordingRunner::default();
        let git = GitOperations::new(&runner, None);

        git.push(Some("translations-update")).await.unwrap();
        git.push(None).await.unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls[0], "git push origin translations-update");
        assert_eq!(calls[1], "git push");
    }
}
