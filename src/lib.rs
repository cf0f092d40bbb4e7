//! gt-sync - CI automation for machine-translation synchronization
//!
//! This library provides the core functionality for the gt-sync binary:
//! - Run configuration resolved from action inputs
//! - A process runner with explicit environment overlays
//! - Git operations for identity, branch, commit, and push handling
//! - Pull request publishing against the GitHub API
//! - The sequential pipeline that ties the stages together

pub mod actions;
pub mod cli;
pub mod config;
pub mod errors;
pub mod git;
pub mod github;
pub mod pipeline;
pub mod process;

// Re-export commonly used types
pub use errors::{Result, SyncError};
pub use pipeline::{Pipeline, RunOutcome};
