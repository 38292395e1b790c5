//! Command-line interface.
//!
//! With no arguments the tool prompts for one image URL or path, exactly
//! like an interactive script. Flags only override configuration.

mod helpers;

pub use helpers::{print_outcome, prompt_line, save_emails_to_file};

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, warn};

use crate::config::{load_settings, LoadOptions, Settings};
use crate::http_client::HttpClient;
use crate::ocr::{OcrBackend, PageSegMode, TesseractBackend};
use crate::pipeline::{Outcome, Pipeline};

pub const PROMPT: &str = "Enter the URL or file path of the image: ";

#[derive(Parser, Debug)]
#[command(name = "ocrmail")]
#[command(about = "Extract email addresses from an image using OCR")]
#[command(version)]
pub struct Cli {
    /// Image URL or file path (prompted for when omitted)
    pub source: Option<String>,

    /// Also save extracted emails to this file, one per line
    #[arg(short, long)]
    pub output: Option<String>,

    /// Config file path (overrides auto-discovery)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// OCR language(s), e.g. "eng" or "eng+deu"
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Tesseract page segmentation mode (0-13)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=13))]
    pub psm: Option<u8>,

    /// HTTP request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Apply flag overrides on top of file and environment settings.
    ///
    /// `--psm` is not folded in here; it goes to the pipeline as a per-run
    /// override (see [`Cli::page_seg_mode`]).
    pub fn apply_overrides(&self, settings: &mut Settings) -> anyhow::Result<()> {
        if let Some(ref output) = self.output {
            settings.output = Some(PathBuf::from(shellexpand::tilde(output).as_ref()));
        }
        if let Some(ref lang) = self.lang {
            settings.tesseract.language = lang.clone();
        }
        if let Some(secs) = self.timeout {
            settings.request_timeout = Duration::from_secs(secs);
        }
        Ok(())
    }

    /// Page segmentation mode requested on the command line, if any.
    pub fn page_seg_mode(&self) -> anyhow::Result<Option<PageSegMode>> {
        Ok(self.psm.map(PageSegMode::new).transpose()?)
    }
}

/// Log filter directive chosen before the CLI is parsed, so logging is up
/// before anything else runs.
pub fn default_log_filter() -> &'static str {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "-v" || a == "--verbose") {
        "ocrmail=debug"
    } else if args.iter().any(|a| a == "-q" || a == "--quiet") {
        "ocrmail=warn"
    } else {
        "ocrmail=info"
    }
}

/// Parse arguments, read the image source, run the pipeline, print the result.
///
/// Only setup problems (bad config, unusable stdin, HTTP client
/// construction) return `Err`; pipeline failures are printed and logged.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut settings, _config) = load_settings(LoadOptions {
        config_path: cli.config.clone(),
    })
    .await
    .context("Failed to load configuration")?;
    cli.apply_overrides(&mut settings)?;

    let client =
        HttpClient::with_user_agent(settings.request_timeout, settings.user_agent.as_deref())
            .context("Failed to create HTTP client")?;

    let backend = TesseractBackend::with_config(settings.tesseract.clone());
    if !backend.is_available() {
        warn!("{}", backend.availability_hint());
    }
    let pipeline = Pipeline::new(client, Box::new(backend)).with_psm(cli.page_seg_mode()?);

    let input = match cli.source {
        Some(source) => source,
        None => prompt_line(PROMPT, &mut io::stdin().lock(), &mut io::stdout())
            .context("Failed to read image source from stdin")?,
    };

    let outcome = pipeline.run(&input).await;
    print_outcome(&outcome, &mut io::stdout(), &mut io::stderr())?;

    if let (Outcome::Matches(emails), Some(path)) = (&outcome, settings.output.as_deref()) {
        if let Err(e) = save_emails_to_file(emails, path) {
            error!("Failed to save emails to {}: {}", path.display(), e);
            eprintln!("Could not save emails to {}: {}", path.display(), e);
        }
    }

    Ok(())
}
