use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use pdf_grade::{GradeReport, Grader, GraderConfig};

const SIDECAR_SUFFIX: &str = "grade.json";

#[derive(Debug, Parser)]
#[command(author, version, about = "Grade a directory of PDF submissions")]
struct Args {
    /// Input directory containing PDF files
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for grade files (defaults to next to each PDF)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum number of documents to grade
    #[arg(long)]
    max: Option<usize>,

    /// Enable OCR fallback for scanned PDFs
    #[arg(long, default_value = "false")]
    ocr: bool,

    /// Print results instead of writing grade files
    #[arg(long, default_value = "false")]
    dry_run: bool,

    /// Append one JSON line per document to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Path to configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace), overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReportLine<'a> {
    file: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    grade: Option<GradeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = match &args.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting batch grading");
    info!("Input directory: {:?}", args.input);

    let config = GraderConfig::load_or_default(args.config.as_deref())?;
    let grader = Grader::new(&config);

    if let Some(output) = &args.output {
        fs::create_dir_all(output)
            .with_context(|| format!("Failed to create output directory: {:?}", output))?;
    }

    let mut report_file = match &args.report {
        Some(path) => Some(
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open report file: {:?}", path))?,
        ),
        None => None,
    };

    let pdf_files = find_pdfs(&args.input);
    info!("Found {} PDF files", pdf_files.len());

    let options = BatchOptions {
        output: args.output.as_deref(),
        max: args.max,
        ocr: args.ocr,
        dry_run: args.dry_run,
    };
    let summary = run_batch(
        &grader,
        &pdf_files,
        &options,
        report_file.as_mut().map(|f| f as &mut dyn Write),
    );

    if summary.failed > 0 {
        warn!("{} document(s) could not be graded", summary.failed);
    }
    info!(
        "Finished. Processed {} document(s), skipped {} already graded, {} failed.",
        summary.processed, summary.skipped, summary.failed
    );

    Ok(())
}

struct BatchOptions<'a> {
    output: Option<&'a Path>,
    max: Option<usize>,
    ocr: bool,
    dry_run: bool,
}

#[derive(Debug, Default, PartialEq)]
struct BatchSummary {
    processed: usize,
    skipped: usize,
    failed: usize,
}

/// Grade every PDF without a sidecar. `max` caps attempts, failures included.
fn run_batch(
    grader: &Grader,
    pdf_files: &[PathBuf],
    options: &BatchOptions<'_>,
    mut report: Option<&mut dyn Write>,
) -> BatchSummary {
    let mut summary = BatchSummary::default();
    let mut attempted = 0;

    for pdf_path in pdf_files {
        let sidecar = sidecar_path(pdf_path, options.output);
        if sidecar.exists() {
            summary.skipped += 1;
            continue;
        }

        if options.max.is_some_and(|max| attempted >= max) {
            info!("Reached --max {}, stopping", attempted);
            break;
        }
        attempted += 1;

        info!("Grading {:?}", pdf_path);
        let line = match grade_one(grader, pdf_path, &sidecar, options) {
            Ok(grade) => {
                summary.processed += 1;
                ReportLine {
                    file: pdf_path,
                    grade: Some(grade),
                    error: None,
                }
            }
            Err(e) => {
                error!("Failed to grade {:?}: {:#}", pdf_path, e);
                summary.failed += 1;
                ReportLine {
                    file: pdf_path,
                    grade: None,
                    error: Some(format!("{:#}", e)),
                }
            }
        };

        if let Some(writer) = report.as_deref_mut() {
            if let Err(e) = write_report_line(writer, &line) {
                error!("Failed to append report line for {:?}: {:#}", pdf_path, e);
            }
        }
    }

    summary
}

/// Grade one document and write (or print) its payload
fn grade_one(
    grader: &Grader,
    pdf_path: &Path,
    sidecar: &Path,
    options: &BatchOptions<'_>,
) -> Result<GradeReport> {
    let result = grader.grade(pdf_path, options.ocr)?;
    let grade = GradeReport::from(&result);
    let payload = grade.to_pretty_json()?;

    if options.dry_run {
        info!("[dry-run] Would write {:?} with score {:.2}", sidecar, grade.score);
        println!("{}", payload);
    } else {
        fs::write(sidecar, &payload)
            .with_context(|| format!("Failed to write grade file: {:?}", sidecar))?;
        info!("Wrote {:?}", sidecar);
    }

    Ok(grade)
}

fn write_report_line(writer: &mut dyn Write, line: &ReportLine<'_>) -> Result<()> {
    let json = serde_json::to_string(line)?;
    writeln!(writer, "{}", json)?;
    Ok(())
}

fn find_pdfs(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

/// `<stem>.grade.json`, next to the PDF or inside `output`
fn sidecar_path(pdf: &Path, output: Option<&Path>) -> PathBuf {
    let stem = pdf
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let name = format!("{}.{}", stem, SIDECAR_SUFFIX);

    match output {
        Some(dir) => dir.join(name),
        None => pdf.with_file_name(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_grade::{BackendError, BackendRegistry, DocumentBytes, ExtractionOutcome, TextBackend};

    /// Treats file bytes as the text layer; files starting with "corrupt" fail
    struct PlainText;

    impl TextBackend for PlainText {
        fn name(&self) -> &'static str {
            "plain"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn extract(&self, document: &DocumentBytes, _: bool) -> Result<ExtractionOutcome, BackendError> {
            let text = String::from_utf8_lossy(document.as_bytes());
            if text.starts_with("corrupt") {
                return Err(BackendError::parse("plain", "broken xref table"));
            }
            Ok(ExtractionOutcome {
                text: text.into_owned(),
                page_count: 1,
                backend: "plain",
                ocr_pages: Vec::new(),
            })
        }
    }

    fn plain_grader() -> Grader {
        let registry = BackendRegistry::from_backends(vec![Box::new(PlainText)]);
        Grader::with_registry(&GraderConfig::default(), registry)
    }

    fn write_inputs(dir: &Path, files: &[(&str, &str)]) -> Vec<PathBuf> {
        for (name, body) in files {
            fs::write(dir.join(name), body).unwrap();
        }
        find_pdfs(dir)
    }

    fn options(output: Option<&Path>, max: Option<usize>) -> BatchOptions<'_> {
        BatchOptions {
            output,
            max,
            ocr: false,
            dry_run: false,
        }
    }

    #[test]
    fn test_failures_are_isolated_per_document() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_inputs(
            dir.path(),
            &[
                ("a.pdf", "The analysis is sound."),
                ("b.pdf", "corrupt bytes"),
                ("c.pdf", "Our conclusion follows."),
            ],
        );

        let summary = run_batch(&plain_grader(), &files, &options(None, None), None);

        assert_eq!(
            summary,
            BatchSummary {
                processed: 2,
                skipped: 0,
                failed: 1
            }
        );
        assert!(dir.path().join("a.grade.json").exists());
        assert!(!dir.path().join("b.grade.json").exists());
        assert!(dir.path().join("c.grade.json").exists());

        let written = fs::read_to_string(dir.path().join("a.grade.json")).unwrap();
        let report: GradeReport = serde_json::from_str(&written).unwrap();
        assert_eq!(report.max_score, 10.0);
    }

    #[test]
    fn test_max_counts_failed_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_inputs(
            dir.path(),
            &[
                ("doc1.pdf", "corrupt one"),
                ("doc2.pdf", "corrupt two"),
                ("doc3.pdf", "corrupt three"),
                ("doc4.pdf", "corrupt four"),
            ],
        );

        let summary = run_batch(&plain_grader(), &files, &options(None, Some(1)), None);

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.processed, 0);
    }

    #[test]
    fn test_existing_sidecars_skipped_and_not_counted_against_max() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_inputs(
            dir.path(),
            &[
                ("a.pdf", "Already graded."),
                ("b.pdf", "The method is explained."),
                ("c.pdf", "The evidence is clear."),
            ],
        );
        fs::write(dir.path().join("a.grade.json"), "{}").unwrap();

        let summary = run_batch(&plain_grader(), &files, &options(None, Some(1)), None);

        assert_eq!(
            summary,
            BatchSummary {
                processed: 1,
                skipped: 1,
                failed: 0
            }
        );
        assert_eq!(fs::read_to_string(dir.path().join("a.grade.json")).unwrap(), "{}");
        assert!(dir.path().join("b.grade.json").exists());
        assert!(!dir.path().join("c.grade.json").exists());
    }

    #[test]
    fn test_unwritable_sidecar_counts_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_inputs(
            dir.path(),
            &[("a.pdf", "The analysis is sound."), ("b.pdf", "Our conclusion follows.")],
        );
        let missing_output = dir.path().join("no-such-dir");

        let summary = run_batch(
            &plain_grader(),
            &files,
            &options(Some(&missing_output), None),
            None,
        );

        assert_eq!(summary.failed, 2);
        assert_eq!(summary.processed, 0);
    }

    #[test]
    fn test_report_has_one_line_per_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_inputs(
            dir.path(),
            &[("a.pdf", "The analysis is sound."), ("b.pdf", "corrupt bytes")],
        );
        let mut report: Vec<u8> = Vec::new();

        let dry_run = BatchOptions {
            dry_run: true,
            ..options(None, None)
        };
        run_batch(&plain_grader(), &files, &dry_run, Some(&mut report as &mut dyn Write));

        let lines: Vec<serde_json::Value> = String::from_utf8(report)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0]["grade"]["score"].is_number());
        assert!(lines[0].get("error").is_none());
        assert!(lines[1]["error"].as_str().unwrap().contains("broken xref table"));
        assert!(!dir.path().join("a.grade.json").exists());
    }

    #[test]
    fn test_sidecar_path() {
        let pdf = Path::new("/submissions/week1/essay.pdf");
        assert_eq!(
            sidecar_path(pdf, None),
            PathBuf::from("/submissions/week1/essay.grade.json")
        );
        assert_eq!(
            sidecar_path(pdf, Some(Path::new("/grades"))),
            PathBuf::from("/grades/essay.grade.json")
        );
    }

    #[test]
    fn test_find_pdfs_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.pdf"), b"%PDF").unwrap();
        fs::write(dir.path().join("a.PDF"), b"%PDF").unwrap();
        fs::write(dir.path().join("notes.txt"), b"text").unwrap();
        fs::write(dir.path().join("nested").join("c.pdf"), b"%PDF").unwrap();

        let files = find_pdfs(dir.path());
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf", "nested/c.pdf"]);
    }
}
