//! CLI module for gt-sync
//!
//! Provides the command-line interface using clap. Every flag can also be
//! supplied through the `INPUT_*` environment variables the hosted runner
//! sets for action inputs, so the binary works both as an action entrypoint
//! and standalone.

use clap::Parser;
use std::path::PathBuf;

/// Sync machine translations and open automated PRs from CI
#[derive(Parser, Debug)]
#[command(name = "gt-sync")]
#[command(version)]
#[command(about = "Sync machine translations and open automated PRs from CI")]
pub struct Cli {
    /// Node.js version hint (informational only)
    #[arg(long, env = "INPUT_NODE-VERSION", default_value = "20")]
    pub node_version: String,

    /// Base path for config lookup and all git/tool operations
    #[arg(long, env = "INPUT_WORKING-DIRECTORY", default_value = ".")]
    pub working_directory: PathBuf,

    /// API key injected into the translation tool's environment
    #[arg(long, env = "INPUT_API-KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Optional project id injected alongside the API key
    #[arg(long, env = "INPUT_PROJECT-ID")]
    pub project_id: Option<String>,

    /// Commit message for the commit stage
    #[arg(long, env = "INPUT_COMMIT-MESSAGE", default_value = "")]
    pub commit_message: String,

    /// Create and push to this branch instead of the current one
    #[arg(long, env = "INPUT_BRANCH-NAME")]
    pub branch_name: Option<String>,

    /// Open a pull request after pushing (requires a branch name)
    #[arg(
        long,
        env = "INPUT_CREATE-PULL-REQUEST",
        default_value = "false",
        action = clap::ArgAction::Set,
        value_parser = parse_action_bool
    )]
    pub create_pull_request: bool,

    /// Pull request title
    #[arg(long, env = "INPUT_PULL-REQUEST-TITLE", default_value = "")]
    pub pull_request_title: String,

    /// Pull request body
    #[arg(long, env = "INPUT_PULL-REQUEST-BODY", default_value = "")]
    pub pull_request_body: String,
}

/// Parse an action-style boolean: exactly "true" enables, anything else
/// (including the empty string an unset input produces) disables.
fn parse_action_bool(value: &str) -> Result<bool, std::convert::Infallible> {
    Ok(value.trim() == "true")
}
