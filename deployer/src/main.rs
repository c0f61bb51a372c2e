//! cfdeploy - Entry Point
//!
//! Deploys a zip archive as a Google Cloud Function and optionally opens it
//! to unauthenticated callers.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use serde::Serialize;
use tracing::{error, info, warn};

use cfdeploy::app::options::AppOptions;
use cfdeploy::app::run::{self, Source};
use cfdeploy::config::Settings;
use cfdeploy::deploy::progress::{LogProgress, ProgressSink, TerminalProgress};
use cfdeploy::errors::DeployerError;
use cfdeploy::filesys::file::File;
use cfdeploy::http::client::HttpClient;
use cfdeploy::logs::{init_logging, LogLevel, LogOptions};
use cfdeploy::models::{ArtifactRef, DeployedFunction};
use cfdeploy::utils::version_info;

/// Exit code when the function is deployed but a later step failed
const EXIT_PARTIAL: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "cfdeploy", version, about = "Deploy zip archives as Google Cloud Functions")]
struct Cli {
    /// Settings file
    #[arg(long, short, global = true, default_value = "cfdeploy.json")]
    config: PathBuf,

    /// OAuth access token for the Cloud Functions API
    #[arg(long, global = true, env = "CFDEPLOY_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Override the project from the settings file
    #[arg(long, global = true)]
    project: Option<String>,

    /// Override the region from the settings file
    #[arg(long, global = true)]
    region: Option<String>,

    /// Override the function name from the settings file
    #[arg(long, global = true)]
    name: Option<String>,

    /// Override the log level from the settings file
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Push the archive, deploy it and release the function
    Up {
        /// Zip archive to deploy
        #[arg(long)]
        archive: PathBuf,

        /// Also write the release record to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Upload the archive and print the artifact reference
    Push {
        #[arg(long)]
        archive: PathBuf,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Deploy an uploaded archive and print the deployed function
    Deploy {
        /// Artifact reference written by `push`
        #[arg(long, required_unless_present = "source_upload_url")]
        artifact: Option<PathBuf>,

        /// Signed URL the archive was uploaded to
        #[arg(long, conflicts_with = "artifact")]
        source_upload_url: Option<String>,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Apply the release policy to a deployed function
    Release {
        /// Deployed function written by `deploy`
        #[arg(long)]
        deployment: PathBuf,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate the settings file without calling the API
    Validate,

    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Command::Version = cli.command {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => eprintln!("Failed to render version info: {e}"),
        }
        return ExitCode::SUCCESS;
    }

    let mut settings = match Settings::load(&cli.config).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    apply_overrides(&cli, &mut settings);

    let log_options = LogOptions {
        log_level: cli.log_level.clone().unwrap_or_else(|| settings.log_level.clone()),
        json_format: settings.log_json,
        log_file: settings.log_file.clone(),
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    match execute(&cli, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<DeployerError>() {
            Some(inner) if inner.is_partial_success() => {
                warn!("Partially succeeded: {:#}", e);
                ExitCode::from(EXIT_PARTIAL)
            }
            _ => {
                error!("{:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn apply_overrides(cli: &Cli, settings: &mut Settings) {
    if let Some(project) = &cli.project {
        settings.project = project.clone();
    }
    if let Some(region) = &cli.region {
        settings.region = region.clone();
    }
    if let Some(name) = &cli.name {
        settings.name = name.clone();
    }
}

async fn execute(cli: &Cli, settings: &Settings) -> anyhow::Result<()> {
    let options = AppOptions::from_settings(settings).context("Invalid settings")?;
    // JSON logging routes progress through tracing
    let progress: Box<dyn ProgressSink> = if settings.log_json {
        Box::new(LogProgress)
    } else {
        Box::new(TerminalProgress)
    };
    let progress = progress.as_ref();
    // One signal per command so the handlers stay installed until it returns
    let mut shutdown = run::shutdown_signal(await_shutdown_signal(), options.deploy_timeout);

    match &cli.command {
        Command::Up { archive, output } => {
            let client = client(cli, settings)?;
            let source = Source::Archive(File::new(archive));
            let record = run::run(client, &options, source, progress, &mut shutdown).await?;
            emit(&record, output.as_ref()).await?;
        }
        Command::Push { archive, output } => {
            let client = client(cli, settings)?;
            let artifact = run::push(
                client.as_ref(),
                &options,
                &File::new(archive),
                progress,
                &mut shutdown,
            )
            .await?;
            emit(&artifact, output.as_ref()).await?;
        }
        Command::Deploy {
            artifact,
            source_upload_url,
            output,
        } => {
            let artifact = match (artifact, source_upload_url) {
                (Some(path), _) => File::new(path)
                    .read_json::<ArtifactRef>()
                    .await
                    .with_context(|| format!("Unable to read artifact {}", path.display()))?,
                (None, Some(url)) => ArtifactRef::from_upload_url(
                    url,
                    &options.target.project,
                    &options.target.region,
                ),
                (None, None) => anyhow::bail!("--artifact or --source-upload-url is required"),
            };
            let client = client(cli, settings)?;
            let deployed =
                run::deploy(client, &options, artifact, progress, &mut shutdown).await?;
            emit(&deployed, output.as_ref()).await?;
        }
        Command::Release { deployment, output } => {
            let deployed: DeployedFunction = File::new(deployment)
                .read_json()
                .await
                .with_context(|| format!("Unable to read deployment {}", deployment.display()))?;
            let client = client(cli, settings)?;
            let record =
                run::release(client, &options, &deployed, progress, &mut shutdown).await?;
            emit(&record, output.as_ref()).await?;
        }
        Command::Validate => {
            info!("Settings are valid for {}", options.target);
            println!("{}", options.target);
        }
        Command::Version => {}
    }

    Ok(())
}

fn client(cli: &Cli, settings: &Settings) -> anyhow::Result<Arc<HttpClient>> {
    let token = cli
        .access_token
        .clone()
        .filter(|t| !t.is_empty())
        .context("An access token is required: pass --access-token or set CFDEPLOY_ACCESS_TOKEN")?;

    let client = HttpClient::new(
        &settings.api.base_url,
        SecretString::from(token),
        Duration::from_secs(settings.api.timeout_secs),
    )?;
    Ok(Arc::new(client))
}

/// Print a result as JSON on stdout and optionally save it
async fn emit<T: Serialize>(value: &T, output: Option<&PathBuf>) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    if let Some(path) = output {
        File::new(path).write_json(value).await?;
    }
    Ok(())
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        info!("SIGTERM received, shutting down...");
                    }
                    _ = sigint.recv() => {
                        info!("SIGINT received, shutting down...");
                    }
                }
                return;
            }
            _ => warn!("Unable to install signal handlers, falling back to Ctrl+C"),
        }
    }

    if tokio::signal::ctrl_c().await.is_err() {
        // Without a handler there is nothing to wait for
        std::future::pending::<()>().await;
    }
    info!("Ctrl+C received, shutting down...");
}
