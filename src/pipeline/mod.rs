//! Sequential sync pipeline
//!
//! A fixed, forward-only chain of stages, each with its own failure
//! boundary. The first failure halts the run with the stage's error; there
//! is no retry and no rollback of earlier stages (a failed push leaves the
//! local commit in place). The only early exit that is not an error is the
//! no-changes short circuit after translation.

use crate::actions::{self, ActionContext};
use crate::config::RunConfig;
use crate::errors::{Result, SyncError};
use crate::git::{GitOperations, BOT_EMAIL, BOT_NAME};
use crate::github::{
    resolve_base_branch, NewPullRequest, PublishError, PullRequestPublisher, PullRequestRecord,
    RepoSlug,
};
use crate::process::{ExecOptions, ProcessRunner};

/// Named pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    InstallTool,
    Translate,
    ConfigureGit,
    DetectChanges,
    CreateBranch,
    CommitAndPush,
    PublishPullRequest,
}

impl Stage {
    /// Human-readable stage title used for log grouping.
    pub fn title(&self) -> &'static str {
        match self {
            Stage::Validate => "Validating inputs",
            Stage::InstallTool => "Installing gtx-cli",
            Stage::Translate => "Running translations",
            Stage::ConfigureGit => "Setting up git configuration",
            Stage::DetectChanges => "Checking for changes",
            Stage::CreateBranch => "Creating branch",
            Stage::CommitAndPush => "Committing and pushing changes",
            Stage::PublishPullRequest => "Creating pull request",
        }
    }

    /// Compute the active stage sequence for a configuration.
    ///
    /// Branch creation only runs when a branch name is configured. PR
    /// creation additionally requires the create-pull-request flag: a PR
    /// without a distinct head branch is meaningless.
    pub fn plan(config: &RunConfig) -> Vec<Stage> {
        let mut stages = vec![
            Stage::Validate,
            Stage::InstallTool,
            Stage::Translate,
            Stage::ConfigureGit,
            Stage::DetectChanges,
        ];
        if config.branch_name.is_some() {
            stages.push(Stage::CreateBranch);
        }
        stages.push(Stage::CommitAndPush);
        if config.create_pull_request && config.branch_name.is_some() {
            stages.push(Stage::PublishPullRequest);
        }
        stages
    }
}

/// Success terminal of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Every planned stage completed
    Completed {
        pull_request: Option<PullRequestRecord>,
    },

    /// Translation produced no working-tree changes; valid no-op
    NoChanges,
}

/// Outcome of a single stage.
enum StageOutcome {
    /// Advance to the next planned stage
    Advance,

    /// Terminate the run successfully without the remaining stages
    NoChanges,
}

/// The orchestrator: drives the planned stages strictly in order.
pub struct Pipeline<'a> {
    config: &'a RunConfig,
    context: &'a ActionContext,
    runner: &'a dyn ProcessRunner,

    /// Absent when no token was available; the publish stage fails fast
    /// without attempting the API call.
    publisher: Option<&'a dyn PullRequestPublisher>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a RunConfig,
        context: &'a ActionContext,
        runner: &'a dyn ProcessRunner,
        publisher: Option<&'a dyn PullRequestPublisher>,
    ) -> Self {
        Pipeline {
            config,
            context,
            runner,
            publisher,
        }
    }

    /// Run the pipeline to one of its terminals.
    pub async fn run(&self) -> Result<RunOutcome> {
        let mut pull_request = None;

        for (index, stage) in Stage::plan(self.config).into_iter().enumerate() {
            actions::start_group(&format!("Step {}: {}", index + 1, stage.title()));
            let result = self.run_stage(stage, &mut pull_request).await;
            actions::end_group();

            match result? {
                StageOutcome::Advance => {}
                StageOutcome::NoChanges => {
                    tracing::info!("No translation changes detected. Skipping commit.");
                    return Ok(RunOutcome::NoChanges);
                }
            }
        }

        tracing::info!("Translation sync completed successfully");
        Ok(RunOutcome::Completed { pull_request })
    }

    async fn run_stage(
        &self,
        stage: Stage,
        pull_request: &mut Option<PullRequestRecord>,
    ) -> Result<StageOutcome> {
        match stage {
            Stage::Validate => self.validate(),
            Stage::InstallTool => self.install_tool().await,
            Stage::Translate => self.translate().await,
            Stage::ConfigureGit => self.configure_git().await,
            Stage::DetectChanges => self.detect_changes().await,
            Stage::CreateBranch => self.create_branch().await,
            Stage::CommitAndPush => self.commit_and_push().await,
            Stage::PublishPullRequest => {
                *pull_request = Some(self.publish_pull_request().await?);
                Ok(StageOutcome::Advance)
            }
        }
    }

    /// Git runs in the checkout root (the process cwd), not the working
    /// directory: the working directory may be a subdirectory of the repo
    /// and commits must cover the whole tree.
    fn git(&self) -> GitOperations<'_> {
        GitOperations::new(self.runner, None)
    }

    fn validate(&self) -> Result<StageOutcome> {
        if self.config.api_key.is_empty() {
            return Err(SyncError::Config("GT_API_KEY is required".to_string()));
        }

        if let Some(project_id) = &self.config.project_id {
            tracing::info!("GT_PROJECT_ID is set to {}", project_id);
        }

        let dir = &self.config.working_directory;
        if !dir.exists() {
            return Err(SyncError::Config(format!(
                "Working directory does not exist: {}",
                dir.display()
            )));
        }

        let config_file = self.config.config_file_path();
        if !config_file.exists() {
            return Err(SyncError::Config(format!(
                "gt.config.json not found in {}",
                dir.display()
            )));
        }

        Ok(StageOutcome::Advance)
    }

    async fn install_tool(&self) -> Result<StageOutcome> {
        self.runner
            .run("npm", &["install", "-D", "gtx-cli"], &ExecOptions::default())
            .await
            .map_err(SyncError::ToolInstall)?;

        tracing::info!("Successfully installed gtx-cli");
        Ok(StageOutcome::Advance)
    }

    async fn translate(&self) -> Result<StageOutcome> {
        let mut options = ExecOptions::in_dir(&self.config.working_directory);
        options
            .env
            .push(("GT_API_KEY".to_string(), self.config.api_key.clone()));
        if let Some(project_id) = &self.config.project_id {
            options
                .env
                .push(("GT_PROJECT_ID".to_string(), project_id.clone()));
        }

        self.runner
            .run("npx", &["gtx-cli", "translate"], &options)
            .await
            .map_err(SyncError::Translation)?;

        tracing::info!("Successfully ran translations");
        Ok(StageOutcome::Advance)
    }

    async fn configure_git(&self) -> Result<StageOutcome> {
        self.git()
            .configure_identity(BOT_NAME, BOT_EMAIL)
            .await
            .map_err(SyncError::GitConfig)?;

        tracing::info!("Git configuration complete");
        Ok(StageOutcome::Advance)
    }

    async fn detect_changes(&self) -> Result<StageOutcome> {
        if self.git().has_pending_changes().await.map_err(SyncError::Git)? {
            tracing::info!("Changes detected, proceeding with commit");
            Ok(StageOutcome::Advance)
        } else {
            Ok(StageOutcome::NoChanges)
        }
    }

    async fn create_branch(&self) -> Result<StageOutcome> {
        let branch = self.branch_name()?;
        self.git()
            .create_branch(branch)
            .await
            .map_err(SyncError::Git)?;

        tracing::info!("Created branch: {}", branch);
        Ok(StageOutcome::Advance)
    }

    async fn commit_and_push(&self) -> Result<StageOutcome> {
        let git = self.git();
        git.commit_all(&self.config.commit_message)
            .await
            .map_err(SyncError::Git)?;
        tracing::info!("Changes committed successfully");

        let branch = self.config.branch_name.as_deref();
        git.push(branch).await.map_err(SyncError::Git)?;
        match branch {
            Some(name) => tracing::info!("Pushed changes to {}", name),
            None => tracing::info!("Pushed changes to current branch"),
        }

        Ok(StageOutcome::Advance)
    }

    async fn publish_pull_request(&self) -> Result<PullRequestRecord> {
        let publisher = self
            .publisher
            .ok_or(SyncError::Publish(PublishError::MissingToken))?;

        let slug = self.context.repository.as_deref().unwrap_or_default();
        let repo = RepoSlug::parse(slug).map_err(SyncError::Publish)?;

        let request = NewPullRequest {
            title: self.config.pull_request_title.clone(),
            body: self.config.pull_request_body.clone(),
            head: self.branch_name()?.to_string(),
            base: resolve_base_branch(self.context.git_ref.as_deref()),
        };

        let record = publisher
            .create_pull_request(&repo, &request)
            .await
            .map_err(SyncError::Publish)?;

        tracing::info!("Pull request created: {}", record.url);
        self.context.set_output("pull-request-url", &record.url)?;
        self.context
            .set_output("pull-request-number", &record.number.to_string())?;

        Ok(record)
    }

    fn branch_name(&self) -> Result<&str> {
        self.config.branch_name.as_deref().ok_or_else(|| {
            SyncError::Config("a branch name is required for this stage".to_string())
        })
    }
}
