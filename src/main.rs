//! gt-sync CLI - A CI step that syncs machine translations and opens automated PRs

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gt_sync::actions::ActionContext;
use gt_sync::cli::Cli;
use gt_sync::config::RunConfig;
use gt_sync::github::{GithubPublisher, PullRequestPublisher};
use gt_sync::pipeline::Pipeline;
use gt_sync::process::SystemProcessRunner;

#[tokio::main]
async fn main() {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RunConfig::from_cli(Cli::parse());
    let context = ActionContext::from_env();

    tracing::info!("Using Node.js version: {}", config.node_version);

    let runner = SystemProcessRunner;
    let publisher = context.token.clone().map(|token| match &context.api_url {
        Some(api_url) => GithubPublisher::with_api_base(token, api_url),
        None => GithubPublisher::new(token),
    });

    let pipeline = Pipeline::new(
        &config,
        &context,
        &runner,
        publisher.as_ref().map(|p| p as &dyn PullRequestPublisher),
    );

    if let Err(e) = pipeline.run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
