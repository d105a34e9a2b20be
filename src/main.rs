use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pdf_grade::{GradeReport, GradeResult, Grader, GraderConfig};

#[derive(Debug, Parser)]
#[command(author, version, about = "Heuristic PDF grading helper")]
struct Cli {
    /// Path to the PDF file to grade
    #[arg(required_unless_present = "list_backends")]
    pdf: Option<PathBuf>,

    /// Enable OCR fallback for image-based PDFs
    #[arg(long)]
    ocr: bool,

    /// Print JSON instead of the formatted summary
    #[arg(long)]
    json: bool,

    /// Path to configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// List detected extraction backends and exit
    #[arg(long)]
    list_backends: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = GraderConfig::load_or_default(cli.config.as_deref())?;
    info!("Configuration: {}", config);

    let grader = Grader::new(&config);

    if cli.list_backends {
        let registry = grader.registry();
        println!("Backends: {}", registry.available_names().join(", "));
        println!(
            "OCR: {}",
            if registry.ocr_available() { "available" } else { "unavailable" }
        );
        return Ok(());
    }

    let Some(pdf) = cli.pdf else {
        anyhow::bail!("A PDF path is required");
    };
    if !pdf.exists() {
        anyhow::bail!("PDF not found: {:?}", pdf);
    }

    let result = grader
        .grade(pdf.as_path(), cli.ocr)
        .with_context(|| format!("Failed to grade {:?}", pdf))?;

    if cli.json {
        let report = GradeReport::from(&result);
        println!("{}", report.to_pretty_json()?);
    } else {
        print_summary(&result);
    }

    Ok(())
}

fn print_summary(result: &GradeResult) {
    print!("{}", format_summary(result));
}

fn format_summary(result: &GradeResult) -> String {
    let breakdown = result.breakdown();
    let mut out = String::new();

    out.push_str(&format!("Score: {:.2}/{:.1}\n", result.score(), result.max_score()));
    out.push_str(&format!("Passed: {}\n", if result.passed() { "yes" } else { "no" }));
    out.push_str(&format!("Summary: {}\n", result.summary()));
    out.push_str("Breakdown:\n");
    out.push_str(&format!("  - word_count: {}\n", breakdown.word_count));
    out.push_str(&format!("  - sentence_count: {}\n", breakdown.sentence_count));
    out.push_str(&format!("  - avg_sentence_length: {}\n", breakdown.avg_sentence_length));
    out.push_str(&format!("  - keyword_hits: {}\n", breakdown.keyword_hits));
    out.push_str(&format!("  - reading_ease: {}\n", breakdown.reading_ease));

    if !result.text_preview().is_empty() {
        out.push_str(&format!("Preview:\n{}\n", result.text_preview()));
    }
    out
}
