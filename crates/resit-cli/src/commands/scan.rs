//! Scan command - recognize a receipt image with OCR.space, then extract.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::multipart::{Form, Part};
use tracing::{debug, info, warn};

use resit_core::models::config::OcrConfig;
use resit_core::ocr::{self, OcrSpaceResponse, UploadFormat, UploadPolicy};
use resit_core::receipt::ReceiptParser;

use super::extract::{format_receipt, write_output, OutputFormat};
use super::load_config;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Receipt image (JPEG or PNG)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Save the recognized text to this file
    #[arg(long)]
    save_text: Option<PathBuf>,

    /// Show which rule produced each field
    #[arg(long)]
    explain: bool,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let api_key = config.ocr.resolved_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OCR.space API key configured.\n\n\
             Set ocr.api_key with 'resit config set ocr.api_key <KEY>' or export {}.",
            resit_core::models::config::OCR_API_KEY_ENV
        )
    })?;

    let bytes = fs::read(&args.input)?;
    let format = UploadPolicy::from_config(&config.ocr).check(&bytes)?;

    info!("Scanning {} ({} bytes)", args.input.display(), bytes.len());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Uploading to OCR.space...");

    let response = match recognize(&config.ocr, &api_key, bytes, format).await {
        Ok(response) => response,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    if response.is_errored_on_processing {
        warn!("OCR.space reported a processing error: {}", response.error_summary());
    }

    let text = response.into_text()?;
    pb.finish_with_message("Recognized");

    if let Some(path) = &args.save_text {
        fs::write(path, &text)?;
        eprintln!("{} Recognized text saved to {}", style("✓").green(), path.display());
    }

    let parser = ReceiptParser::from_config(&config.extraction);
    let parsed = parser.parse(&text);

    debug!("Extraction took {}ms", parsed.processing_time_ms);

    let output = format_receipt(&parsed, args.format, args.explain)?;
    write_output(&output, args.output.as_ref())
}

/// Send one image to the OCR.space parse endpoint.
async fn recognize(
    config: &OcrConfig,
    api_key: &str,
    bytes: Vec<u8>,
    format: UploadFormat,
) -> anyhow::Result<OcrSpaceResponse> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let file = Part::bytes(bytes)
        .file_name(format.file_name())
        .mime_str(format.mime_type())?;

    let form = ocr::form_fields(config, api_key)
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value))
        .part("file", file);

    let response = client
        .post(&config.endpoint)
        .multipart(form)
        .send()
        .await?
        .error_for_status()?;

    let body = response.text().await?;
    debug!("OCR.space answered with {} bytes", body.len());

    Ok(OcrSpaceResponse::from_json(&body)?)
}
