//! Run configuration
//!
//! Resolves the parsed CLI into the immutable configuration for one pipeline
//! run, applying the same defaulting rules as the action surface: an unset
//! action input arrives as an empty string, so empty values fall back to
//! their defaults here rather than in clap.

use std::path::PathBuf;

use crate::cli::Cli;

/// Name of the translation tool's config file, looked up inside the working
/// directory. Its contents are consumed by gtx-cli, not by us.
pub const CONFIG_FILE_NAME: &str = "gt.config.json";

pub const DEFAULT_NODE_VERSION: &str = "20";
pub const DEFAULT_WORKING_DIRECTORY: &str = ".";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Update translations via GT Action";
pub const DEFAULT_PULL_REQUEST_TITLE: &str = "Update translations";
pub const DEFAULT_PULL_REQUEST_BODY: &str = "This PR updates translations via the GT Action";

/// Configuration for one pipeline run, immutable after construction.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Node.js version hint, informational only
    pub node_version: String,

    /// Base path for config lookup and the translation tool
    pub working_directory: PathBuf,

    /// API key for the translation tool; validated non-empty before any
    /// stage runs
    pub api_key: String,

    /// Optional project id for the translation tool
    pub project_id: Option<String>,

    /// Commit message for the commit stage
    pub commit_message: String,

    /// When set, a branch is created and push targets it explicitly
    pub branch_name: Option<String>,

    /// Whether to open a pull request after pushing
    pub create_pull_request: bool,

    pub pull_request_title: String,

    pub pull_request_body: String,
}

impl RunConfig {
    /// Build the run configuration from parsed CLI inputs.
    pub fn from_cli(cli: Cli) -> Self {
        let working_directory = if cli.working_directory.as_os_str().is_empty() {
            PathBuf::from(DEFAULT_WORKING_DIRECTORY)
        } else {
            cli.working_directory
        };

        RunConfig {
            node_version: or_default(cli.node_version, DEFAULT_NODE_VERSION),
            working_directory,
            api_key: cli.api_key.trim().to_string(),
            project_id: non_empty(cli.project_id),
            commit_message: or_default(cli.commit_message, DEFAULT_COMMIT_MESSAGE),
            branch_name: non_empty(cli.branch_name),
            create_pull_request: cli.create_pull_request,
            pull_request_title: or_default(cli.pull_request_title, DEFAULT_PULL_REQUEST_TITLE),
            pull_request_body: or_default(cli.pull_request_body, DEFAULT_PULL_REQUEST_BODY),
        }
    }

    /// Path to the translation tool's config file.
    pub fn config_file_path(&self) -> PathBuf {
        self.working_directory.join(CONFIG_FILE_NAME)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            node_version: DEFAULT_NODE_VERSION.to_string(),
            working_directory: PathBuf::from(DEFAULT_WORKING_DIRECTORY),
            api_key: String::new(),
            project_id: None,
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            branch_name: None,
            create_pull_request: false,
            pull_request_title: DEFAULT_PULL_REQUEST_TITLE.to_string(),
            pull_request_body: DEFAULT_PULL_REQUEST_BODY.to_string(),
        }
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
