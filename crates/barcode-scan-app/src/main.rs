#![warn(missing_docs)]
//! # barcode-scan binary
//!
//! Command-line entry point: submits one image to the decode service and
//! prints the result.

use std::path::PathBuf;
use std::process::ExitCode;

use barcode_scan_app::{APP_VERSION, AppConfig, AppError, Completion, ScanController, logging};
use barcode_scan_capture::{SelectedFile, StillImageFrameSource};
use barcode_scan_ui::ScanView;
use clap::{Parser, Subcommand};

/// Reads barcodes from still images through a remote decode service.
#[derive(Debug, Parser)]
#[command(name = "barcode-scan", version = APP_VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload an image file as-is.
    Upload {
        /// Image file to upload.
        path: PathBuf,
    },
    /// Treat an image file as a camera snapshot (sent as `capture.jpg`).
    Capture {
        /// Still image standing in for the camera frame.
        path: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init();

    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            tracing::error!(%error, "barcode-scan failed");
            eprintln!("barcode-scan: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool, AppError> {
    let config = AppConfig::from_env()?;
    tracing::info!(endpoint = %config.endpoint, version = APP_VERSION, "starting barcode-scan");
    let controller = ScanController::from_config(&config);

    let completion = match cli.command {
        Command::Upload { path } => controller.upload(SelectedFile::from_path(&path)?).await,
        Command::Capture { path } => {
            let camera = StillImageFrameSource::open(&path)?;
            controller.capture(&camera).await
        }
    };

    if completion == Completion::Ignored {
        eprintln!("barcode-scan: no image to submit");
        return Ok(false);
    }

    Ok(print_view(&controller.view()))
}

fn print_view(view: &ScanView) -> bool {
    if let Some(error) = &view.error {
        eprintln!("{error}");
        return false;
    }

    if let Some(label) = view.preview_label {
        println!("{label} submitted");
    }
    if let Some(summary) = &view.summary {
        println!("{summary}");
    }
    if let Some(json) = &view.result_json {
        println!("Barcode Result:\n{json}");
    }
    true
}
