//! clipfetch - fetch creator videos for clip processing
//!
//! Command-line front end over the acquisition library, mainly for operators
//! checking a host's yt-dlp setup or reproducing an ingestion failure.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clipfetch::{AcquisitionSettings, VideoDownloadService};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "clipfetch", version, about)]
struct Args {
    /// JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the platform a URL belongs to
    Detect { url: String },
    /// Check that a URL can be downloaded
    Validate { url: String },
    /// Print video metadata as JSON
    Info { url: String },
    /// Download a video and print the result as JSON
    Download {
        url: String,
        /// Title to use instead of the probed one
        #[arg(long)]
        title: Option<String>,
        /// Leave the file in place instead of removing it afterwards
        #[arg(long)]
        keep: bool,
    },
    /// Delete a previously downloaded file
    Cleanup { path: PathBuf },
    /// List supported platforms
    Platforms,
    /// Show which yt-dlp is used and its version
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let settings = match &args.config {
        Some(path) => AcquisitionSettings::load(path)?,
        None => AcquisitionSettings::default(),
    }
    .apply_env()?;

    match args.command {
        Command::Detect { url } => {
            println!("{}", clipfetch::extractor::classify(&url));
        }
        Command::Validate { url } => match clipfetch::extractor::validate(&url) {
            Ok(()) => println!("ok"),
            Err(e) => {
                eprintln!("{}", e.user_message());
                std::process::exit(1);
            }
        },
        Command::Platforms => {
            for name in clipfetch::extractor::supported_platforms() {
                println!("{}", name);
            }
        }
        Command::Info { url } => {
            let service = build_service(&settings)?;
            let info = service.get_video_info(&url).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Download { url, title, keep } => {
            let service = build_service(&settings)?;
            let result = service.download_video(&url, title.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !keep {
                service.cleanup(&result.file_path).await;
            }
        }
        Command::Cleanup { path } => {
            let service = build_service(&settings)?;
            let outcome = service.cleanup(&path).await;
            println!("{:?}", outcome);
        }
        Command::Doctor => {
            let service = build_service(&settings)?;
            println!("yt-dlp: {}", service.tool().program().display());
            let version = service.tool().version().await?;
            println!("version: {}", version);
            println!("temp dir: {}", service.temp_dir().display());
        }
    }

    Ok(())
}

fn build_service(settings: &AcquisitionSettings) -> Result<VideoDownloadService> {
    VideoDownloadService::new(settings).context("Failed to initialize yt-dlp")
}
