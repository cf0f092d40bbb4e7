//! CI runner integration
//!
//! Captures the ambient GitHub Actions environment once at startup and
//! writes runner-facing presentation: collapsible log groups and the
//! `name=value` run outputs file.

use std::io::Write;
use std::path::{Path, PathBuf};

/// Ambient CI environment, read once so the pipeline never touches the
/// global environment itself.
#[derive(Debug, Clone, Default)]
pub struct ActionContext {
    /// `owner/repo` slug from GITHUB_REPOSITORY
    pub repository: Option<String>,

    /// Fully-qualified ref from GITHUB_REF (e.g. `refs/heads/main`)
    pub git_ref: Option<String>,

    /// Hosting-service token from GITHUB_TOKEN
    pub token: Option<String>,

    /// Run-outputs file from GITHUB_OUTPUT
    pub output_path: Option<PathBuf>,

    /// REST endpoint override from GITHUB_API_URL (set on GHES runners)
    pub api_url: Option<String>,
}

impl ActionContext {
    pub fn from_env() -> Self {
        ActionContext {
            repository: env_var("GITHUB_REPOSITORY"),
            git_ref: env_var("GITHUB_REF"),
            token: env_var("GITHUB_TOKEN"),
            output_path: env_var("GITHUB_OUTPUT").map(PathBuf::from),
            api_url: env_var("GITHUB_API_URL"),
        }
    }

    /// Record a named run output.
    ///
    /// Appends a `name=value` line to the GITHUB_OUTPUT file. When the file
    /// is not configured (e.g. a local run), the value is logged instead.
    pub fn set_output(&self, name: &str, value: &str) -> std::io::Result<()> {
        match &self.output_path {
            Some(path) => append_output_line(path, name, value),
            None => {
                tracing::info!(output = name, value = value, "GITHUB_OUTPUT not set, logging output only");
                Ok(())
            }
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn append_output_line(path: &Path, name: &str, value: &str) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{}={}", name, value)
}

/// Open a collapsible log group in the runner UI.
pub fn start_group(title: &str) {
    println!("::group::{}", title);
}

/// Close the current log group.
pub fn end_group() {
    println!("::endgroup::");
}
