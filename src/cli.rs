//! `tutorhub` command line driver.
//!
//! Every invocation is one wizard session: bootstrap, hydrate from the file
//! store, run a single command, print the resulting report as JSON.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use th_app::{SignupWizard, SignupWizardError, WizardReport};
use th_core::{Attachment, DraftField, ValidationFailure};
use th_infra::DirsAppDirsAdapter;
use tracing::{info, info_span, warn, Instrument};

use crate::bootstrap::{self, RuntimeSettings};

#[derive(Parser, Debug)]
#[command(name = "tutorhub")]
#[command(about = "Drive the tutorhub signup wizard one command at a time", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to config.toml in the data directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the current wizard state
    Show,
    /// Set a draft field (sets of choices are comma separated)
    Set { field: String, value: String },
    /// Advance to the next step
    Next,
    /// Go back one step
    Back,
    /// Create the basic account from the agreement step
    SubmitBasic,
    /// Submit the tutor profile from the last step of the tutor path
    SubmitExtended {
        /// Introduction video file
        #[arg(long)]
        video: PathBuf,
        /// Profile photo file
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Discard stored progress and start over
    Reset,
}

#[derive(Serialize)]
struct FailureOutput<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation: Option<&'a ValidationFailure>,
}

/// Resolve settings and install tracing.
pub fn bootstrap(config_path: Option<PathBuf>) -> anyhow::Result<RuntimeSettings> {
    let app_data_root = DirsAppDirsAdapter::new().app_data_root()?;
    let config = bootstrap::load_config_or_empty(config_path, &app_data_root)?;
    let settings = RuntimeSettings::resolve(&config, &app_data_root);
    bootstrap::tracing::init_tracing_subscriber(&settings.logs_dir())
        .context("Failed to initialize tracing")?;
    Ok(settings)
}

/// Run one CLI invocation.
///
/// Bootstrap problems are returned as errors. Wizard failures are printed and
/// reported through the exit code.
pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = bootstrap(cli.config)?;
    info!(data_dir = %settings.data_dir.display(), "tutorhub session started");

    let wizard = bootstrap::wire_signup_wizard(&settings);
    let span = info_span!("cli.command", command = ?cli.command);
    let result = async {
        let hydrated = wizard.hydrate().await;
        execute(&wizard, hydrated, cli.command).await
    }
    .instrument(span)
    .await;

    match result {
        Ok(report) => {
            print_report(report)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            warn!(error = %err, "command failed");
            print_failure(&err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Apply `command` to a hydrated wizard.
pub async fn execute(
    wizard: &SignupWizard,
    hydrated: WizardReport,
    command: Command,
) -> anyhow::Result<WizardReport> {
    let mut report = match command {
        Command::Show => return Ok(hydrated),
        Command::Set { field, value } => wizard.set_field_from_str(&field, &value).await?,
        Command::Next => wizard.advance().await?,
        Command::Back => wizard.retreat().await?,
        Command::SubmitBasic => wizard.submit_basic().await?,
        Command::SubmitExtended { video, photo } => {
            let video = read_attachment(&video).await?;
            wizard.attach(DraftField::IntroVideo, Some(video)).await?;
            if let Some(photo) = photo {
                let photo = read_attachment(&photo).await?;
                wizard.attach(DraftField::ProfilePhoto, Some(photo)).await?;
            }
            wizard.submit_extended().await?
        }
        Command::Reset => wizard.reset().await,
    };

    let mut warnings = hydrated.warnings;
    warnings.append(&mut report.warnings);
    report.warnings = warnings;
    Ok(report)
}

async fn read_attachment(path: &Path) -> anyhow::Result<Attachment> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read attachment: {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Attachment::new(file_name, content_type_for(path), bytes))
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

fn print_report(report: WizardReport) -> anyhow::Result<()> {
    let report = WizardReport {
        view: report.view.redacted(),
        ..report
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_failure(err: &anyhow::Error) -> anyhow::Result<()> {
    let output = FailureOutput {
        error: format!("{err:#}"),
        validation: err
            .downcast_ref::<SignupWizardError>()
            .and_then(SignupWizardError::validation),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    eprintln!("tutorhub: {err:#}");
    Ok(())
}
