//! Git operations module
//!
//! Provides wrappers for the git CLI used by the sync pipeline.

mod operations;

pub use operations::{GitOperations, BOT_EMAIL, BOT_NAME};
