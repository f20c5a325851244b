//! Argument parsing and output shaping for the `geoaudit` binary
//!
//! Kept out of `main.rs` so it can be tested without building the binary.

use anyhow::{Result, anyhow};
use geoaudit_core::{
    Analyzer, AnalysisError, AnalyzerConfig, CompletionClient, ErrorReport, GeoScorer,
    GeoTableRow, Report, normalize_target_url,
};
use serde::Serialize;
use tracing::info;

pub const APP_NAME: &str = "geoaudit";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub url: String,
    pub geo: bool,
    pub ai_fixes: bool,
    pub question_examples: usize,
    pub compact: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CliCommand {
    Run(CliOptions),
    Help,
    Version,
}

pub fn parse_arguments(args: &[String]) -> Result<CliCommand> {
    if args.is_empty() {
        return Ok(CliCommand::Help);
    }

    let mut url: Option<String> = None;
    let mut geo = true;
    let mut ai_fixes = true;
    let mut question_examples = AnalyzerConfig::default().question_examples;
    let mut compact = false;
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if matches!(arg.as_str(), "-h" | "--help") {
            return Ok(CliCommand::Help);
        }

        if matches!(arg.as_str(), "-v" | "--version") {
            return Ok(CliCommand::Version);
        }

        if arg == "--no-geo" {
            geo = false;
            i += 1;
            continue;
        }

        if arg == "--no-ai" {
            ai_fixes = false;
            i += 1;
            continue;
        }

        if arg == "--compact" {
            compact = true;
            i += 1;
            continue;
        }

        if let Some(value) = arg.strip_prefix("--examples=") {
            question_examples = parse_examples(value)?;
            i += 1;
            continue;
        }

        if arg == "--examples" {
            let value = args
                .get(i + 1)
                .ok_or_else(|| anyhow!("--examples requires a number"))?;
            question_examples = parse_examples(value)?;
            i += 2;
            continue;
        }

        if arg.starts_with('-') {
            return Err(anyhow!("unknown flag: {arg}"));
        }

        if url.is_none() {
            url = Some(arg.clone());
        } else {
            return Err(anyhow!("unexpected additional argument: {}", arg));
        }

        i += 1;
    }

    let url = url.ok_or_else(|| anyhow!("missing <url> argument"))?;

    Ok(CliCommand::Run(CliOptions {
        url,
        geo,
        ai_fixes,
        question_examples,
        compact,
    }))
}

fn parse_examples(value: &str) -> Result<usize> {
    value
        .parse()
        .map_err(|_| anyhow!("--examples expects a non-negative number, got {value:?}"))
}

pub fn print_help() {
    println!("{APP_NAME} - SEO/GEO audit of a single web page");
    println!("Usage: {APP_NAME} [OPTIONS] <URL>\n");
    println!("Options:");
    println!("      --no-geo            Skip GEO scoring");
    println!("      --no-ai             Do not request AI fix suggestions");
    println!("      --examples <N>      Number of question examples to keep (default 3)");
    println!("      --compact           Print single-line JSON");
    println!("  -v, --version           Show version information");
    println!("  -h, --help              Show this help message");
    println!("\nEnvironment:");
    println!("  YANDEX_API_KEY          YandexGPT API key");
    println!("  YANDEX_MODEL_URI        Model URI, or YANDEX_FOLDER_ID to derive it");
    println!("  RUST_LOG                Log filter (default geoaudit=info)");
}

pub fn print_version() {
    println!("{APP_NAME} {VERSION}");
}

/// Successful run as printed to stdout.
#[derive(Debug, Serialize)]
pub struct AuditOutput {
    pub success: bool,
    pub geo_table: Vec<GeoTableRow>,
    pub website_analysis: Report,
}

impl CliOptions {
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            question_examples: self.question_examples,
            ai_fixes: self.ai_fixes,
            ..AnalyzerConfig::default()
        }
    }
}

/// Run the audit for `options` with `client` serving both AI fixes and GEO scoring.
pub async fn run_audit<C: CompletionClient>(
    options: &CliOptions,
    client: C,
) -> Result<AuditOutput, AnalysisError> {
    let url = normalize_target_url(&options.url)?;
    info!(url = url.as_str(), "Starting audit");

    let geo_table = if options.geo {
        GeoScorer::new(&client).score(&url).await.table()
    } else {
        Vec::new()
    };

    let analyzer = Analyzer::new(options.analyzer_config(), client)?;
    let website_analysis = analyzer.analyze(&url).await?;

    Ok(AuditOutput {
        success: true,
        geo_table,
        website_analysis,
    })
}

/// Serialize either outcome of a run.
pub fn render<T: Serialize>(value: &T, compact: bool) -> Result<String> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(rendered)
}

pub fn render_error(err: &AnalysisError, compact: bool) -> Result<String> {
    render(&ErrorReport::from(err), compact)
}
