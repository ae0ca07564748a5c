//! Extract command - pull receipt fields out of recognized text.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use resit_core::receipt::{ParsedReceipt, ReceiptParser};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Text file with recognized receipt text, or "-" for stdin
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show which rule produced each field
    #[arg(long)]
    explain: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = if args.input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        let path = PathBuf::from(&args.input);
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        info!("Reading text from {}", path.display());
        fs::read_to_string(&path)?
    };

    let parser = ReceiptParser::from_config(&config.extraction);
    let parsed = parser.parse(&text);

    let output = format_receipt(&parsed, args.format, args.explain)?;
    write_output(&output, args.output.as_ref())
}

/// Print to stdout or write to a file.
pub fn write_output(output: &str, path: Option<&PathBuf>) -> anyhow::Result<()> {
    if let Some(output_path) = path {
        fs::write(output_path, output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }
    Ok(())
}

pub fn format_receipt(
    parsed: &ParsedReceipt,
    format: OutputFormat,
    explain: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if explain => Ok(serde_json::to_string_pretty(parsed)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&parsed.fields)?),
        OutputFormat::Csv => format_csv(parsed),
        OutputFormat::Text => Ok(format_text(parsed, explain)),
    }
}

fn format_csv(parsed: &ParsedReceipt) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["vendor", "reference_id", "date", "amount", "transaction_type"])?;

    let fields = &parsed.fields;
    wtr.write_record([
        parsed.vendor.as_str(),
        fields.reference_id.as_deref().unwrap_or_default(),
        &fields.date_string().unwrap_or_default(),
        fields.amount.as_deref().unwrap_or_default(),
        fields.transaction_type.as_deref().unwrap_or_default(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(parsed: &ParsedReceipt, explain: bool) -> String {
    let fields = &parsed.fields;
    let or_dash = |v: Option<&str>| v.unwrap_or("-").to_string();

    let mut output = String::new();
    output.push_str(&format!("Vendor:           {}\n", parsed.vendor));
    output.push_str(&format!("Reference ID:     {}\n", or_dash(fields.reference_id.as_deref())));
    output.push_str(&format!("Date:             {}\n", or_dash(fields.date_string().as_deref())));
    output.push_str(&format!("Amount:           {}\n", or_dash(fields.amount.as_deref())));
    output.push_str(&format!(
        "Transaction type: {}\n",
        or_dash(fields.transaction_type.as_deref())
    ));

    if explain {
        output.push('\n');
        output.push_str("Matches:\n");
        for m in &parsed.matches {
            output.push_str(&format!("  {:<16} {:<40} {:?}\n", m.field.as_str(), m.rule, m.source));
        }
        if !parsed.warnings.is_empty() {
            output.push_str("Warnings:\n");
            for warning in &parsed.warnings {
                output.push_str(&format!("  - {}\n", warning));
            }
        }
        output.push_str(&format!("Processing time: {}ms\n", parsed.processing_time_ms));
    }

    output
}
