//! CLI binary for req-extractor.
//!
//! A thin shim over the library crate: stage the PDF, submit it once, print
//! the markdown and save the Word document.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use req_extractor::{
    write_artifact, ExtractionResult, ExtractionSession, ExtractorConfig, HttpExtractionService,
    SessionObserver, SharedSession, UploadCandidate,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Spinner observer ─────────────────────────────────────────────────────────

/// Shows a spinner while the upload is pending and a one-line verdict after.
struct SpinnerObserver {
    bar: ProgressBar,
    started: std::sync::Mutex<Option<Instant>>,
}

impl SpinnerObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Processing...");
        Arc::new(Self {
            bar,
            started: std::sync::Mutex::new(None),
        })
    }

    fn elapsed_ms(&self) -> u128 {
        self.started
            .lock()
            .ok()
            .and_then(|g| *g)
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0)
    }
}

impl SessionObserver for SpinnerObserver {
    fn on_submit_start(&self, name: &str, bytes: usize) {
        if let Ok(mut started) = self.started.lock() {
            *started = Some(Instant::now());
        }
        self.bar.set_message(format!("{name} ({bytes} bytes)"));
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_submit_complete(&self, text_len: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{}  extracted {} bytes of markdown  {}",
            green("✔"),
            text_len,
            dim(&format!("{}ms", self.elapsed_ms()))
        );
    }

    fn on_submit_failed(&self, message: &str) {
        self.bar.finish_and_clear();
        eprintln!("{}  {}", red("✘"), message);
    }
}

// ── CLI definition ───────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "req-extract",
    version,
    about = "Extract requirements from a PDF and export them as a Word document",
    long_about = "Uploads a PDF to the requirements-extraction service, prints the returned \
                  markdown and saves it as a structured .docx document."
)]
struct Cli {
    /// PDF file to submit.
    input: PathBuf,

    /// Extraction service endpoint.
    #[arg(long, env = "REQX_ENDPOINT", default_value = req_extractor::config::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Where to save the Word document (file or directory).
    #[arg(short, long, env = "REQX_OUTPUT", default_value = "requirements.docx")]
    output: PathBuf,

    /// Also save the cleaned markdown to this file.
    #[arg(long, env = "REQX_MARKDOWN")]
    markdown: Option<PathBuf>,

    /// Title heading of the exported document.
    #[arg(long, env = "REQX_TITLE", default_value = req_extractor::config::DEFAULT_DOCUMENT_TITLE)]
    title: String,

    /// Request timeout in seconds (0 waits indefinitely).
    #[arg(long, env = "REQX_TIMEOUT", default_value_t = 300)]
    timeout: u64,

    /// Skip writing the Word document.
    #[arg(long)]
    no_docx: bool,

    /// Print the extraction result as JSON instead of raw markdown.
    #[arg(long, env = "REQX_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "REQX_NO_PROGRESS")]
    no_progress: bool,

    /// Verbose logging (debug level).
    #[arg(short, long, env = "REQX_VERBOSE")]
    verbose: bool,

    /// Only print errors.
    #[arg(short, long, env = "REQX_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config + session ───────────────────────────────────────────
    let config = build_config(&cli)?;
    let service = HttpExtractionService::new(&config).context("Failed to build HTTP client")?;
    let mut shared = SharedSession::new(
        ExtractionSession::new(config).context("Invalid configuration")?,
        Arc::new(service),
    );
    if show_progress {
        shared = shared.with_observer(SpinnerObserver::new());
    }

    let candidate = UploadCandidate::from_path(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    if let Err(e) = shared.select_file(candidate) {
        bail!("{e}");
    }

    // ── Submit ───────────────────────────────────────────────────────────
    let result = shared.submit().await;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialise result")?
        );
    }

    let text = match &result {
        ExtractionResult::Succeeded { text } => text.clone(),
        ExtractionResult::Failed { message } => bail!("{message}"),
        other => bail!("Unexpected session state after submit: {other:?}"),
    };

    if !cli.json && !cli.quiet {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(text.as_bytes())
            .context("Failed to write to stdout")?;
        if !text.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if let Some(ref path) = cli.markdown {
        tokio::fs::write(path, &text)
            .await
            .with_context(|| format!("Failed to write markdown to {}", path.display()))?;
    }

    // ── Export ───────────────────────────────────────────────────────────
    if !cli.no_docx {
        let artifact = shared
            .export()
            .context("Export failed")?
            .context("No extraction result to export")?;
        let target = match output_target(&cli.output) {
            OutputTarget::Directory(dir) => dir.join(&artifact.file_name),
            OutputTarget::File { path, .. } => path,
        };
        let path = write_artifact(&artifact, target)?;
        if !cli.quiet {
            eprintln!("{}  {}", green("✔"), bold(&path.display().to_string()));
        }
    }

    Ok(())
}

/// Where `-o` asks the Word document to go.
#[derive(Debug, PartialEq, Eq)]
enum OutputTarget {
    /// Save under the configured artifact name inside this directory.
    Directory(PathBuf),
    /// Save to this exact path; `name` becomes the artifact name.
    File { path: PathBuf, name: String },
}

/// Classify `-o`: an existing directory, a path ending in a separator, or
/// anything without a `.docx` extension is a directory (created on write).
fn output_target(output: &Path) -> OutputTarget {
    let ends_with_separator = output
        .to_str()
        .is_some_and(|s| s.ends_with('/') || s.ends_with(std::path::MAIN_SEPARATOR));
    let is_docx = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("docx"));
    let name = output.file_name().and_then(|n| n.to_str());

    match name {
        Some(name) if is_docx && !ends_with_separator && !output.is_dir() => OutputTarget::File {
            path: output.to_path_buf(),
            name: name.to_string(),
        },
        _ => OutputTarget::Directory(output.to_path_buf()),
    }
}

/// Map CLI args to `ExtractorConfig`.
fn build_config(cli: &Cli) -> Result<ExtractorConfig> {
    let mut builder = ExtractorConfig::builder()
        .endpoint(cli.endpoint.clone())
        .request_timeout_secs(cli.timeout)
        .document_title(cli.title.clone());

    if !cli.no_docx {
        if let OutputTarget::File { name, .. } = output_target(&cli.output) {
            builder = builder.artifact_name(name);
        }
    }

    builder.build().context("Invalid configuration")
}
