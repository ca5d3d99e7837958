//! pagesync entry point.

mod config;
mod store_adapter;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pagesync_deploy::{DeployEvent, DeployOutcome, DeployPipeline};
use pagesync_store_client::Client;

use crate::config::{DeployArgs, FileConfig, Settings};
use crate::store_adapter::RemoteStore;

#[derive(Parser)]
#[command(name = "pagesync")]
#[command(about = "Publish a static site directory to the asset store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a directory and create a deployment from it
    Deploy(DeployArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the outcome only.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Deploy(args) => deploy(args).await,
    }
}

async fn deploy(args: DeployArgs) -> Result<()> {
    let file = FileConfig::load(args.config.as_deref())?;
    let settings = Settings::resolve(&args, file)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        project = %settings.client.project_name,
        directory = %settings.deploy.directory.display(),
        "starting deployment"
    );

    let client = Client::new(settings.client).context("failed to create store client")?;
    let store = RemoteStore::new(client);
    let mut pipeline = DeployPipeline::new(&store);

    let cancel = pipeline.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("SIGINT received, cancelling after the current stage");
            cancel.cancel();
        }
    });

    let progress = pipeline.take_events().map(|mut events| {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                log_event(&event);
            }
        })
    });

    let result = pipeline.run(&settings.deploy).await;
    drop(pipeline);
    if let Some(progress) = progress {
        let _ = progress.await;
    }

    let outcome = result.context("deployment failed")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

fn log_event(event: &DeployEvent) {
    match event {
        DeployEvent::Scanned { files, bytes } => {
            tracing::info!(files, bytes, "scanned output directory");
        }
        DeployEvent::Diffed { missing, total } => {
            tracing::info!(missing, total, "files to upload");
        }
        DeployEvent::BucketUploaded {
            index,
            files,
            bytes,
        } => {
            tracing::info!(bucket = index, files, bytes, "bucket uploaded");
        }
        // Stage boundaries are logged by the pipeline itself.
        _ => {}
    }
}

fn print_outcome(outcome: &DeployOutcome) {
    println!("Deployment complete: {}", outcome.url);
    println!("  id:           {}", outcome.deployment_id);
    println!("  environment:  {}", outcome.environment);
    println!("  alias:        {}", outcome.alias);
    println!("  branch alias: {}", outcome.branch_alias);
    println!(
        "  uploaded:     {} of {} files",
        outcome.uploaded_files, outcome.total_files
    );
}
