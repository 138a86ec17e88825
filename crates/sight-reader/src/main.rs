//! sight-reader: turns a PDF into plain text, reading scanned pages with OCR.
//!
//! Supports two CLI modes:
//! - Legacy: `sight-reader input.pdf [output.txt] [--options]`
//! - Modern: `sight-reader read input.pdf -o output.txt`

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use sight_core::options::{DeviceSelection, ReaderOptions};
use sight_core::pipeline::PipelineBuilder;
use sight_core::session::Session;
use sight_core::transcript::Transcript;
use sight_input_pdf::PdfLoader;
use sight_ocr::TesseractFactory;

#[derive(Parser)]
#[command(
    name = "sight-reader",
    version,
    about = "Extract readable text from PDFs, scanned or not"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input PDF (legacy mode)
    #[arg(global = false)]
    input: Option<PathBuf>,

    /// Output file (legacy mode); stdout when omitted
    #[arg(global = false)]
    output: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Rejoin hard-wrapped lines into paragraphs
    #[arg(long, global = true)]
    reflow: bool,

    /// OCR language code(s), e.g. por or por+eng (default: por)
    #[arg(long, global = true)]
    language: Option<String>,

    /// Device class deciding the OCR render scale
    #[arg(long, global = true, value_enum)]
    device: Option<DeviceArg>,

    /// Viewport width used when the device class is auto
    #[arg(long, global = true)]
    viewport_width: Option<u32>,

    /// User agent used when the device class is auto
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Minimum share of letters for an OCR line to be kept (0.0-1.0)
    #[arg(long, global = true)]
    noise_threshold: Option<f64>,

    /// Path to the tesseract binary
    #[arg(long, global = true)]
    tesseract: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Dump effective merged config as TOML and exit
    #[arg(long, global = true)]
    dump_config: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a PDF (modern interface)
    Read {
        /// Input PDF
        input: PathBuf,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DeviceArg {
    Auto,
    Compact,
    Standard,
}

impl From<DeviceArg> for DeviceSelection {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Auto => DeviceSelection::Auto,
            DeviceArg::Compact => DeviceSelection::Compact,
            DeviceArg::Standard => DeviceSelection::Standard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// The final text only
    Text,
    /// The full transcript, pages included
    Json,
}

/// Load config from global and project-local TOML files.
/// Later files override earlier ones. Missing files are silently ignored.
fn load_config() -> ReaderOptions {
    let mut opts = ReaderOptions::default();

    // 1. Global config: ~/.config/sight-reader/config.toml
    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join("sight-reader").join("config.toml");
        if let Some(parsed) = read_config_file(&global_path) {
            opts = parsed;
        }
    }

    // 2. Project-local config: ./.sight-reader.toml
    // serde(default) fills every missing field, so a local file replaces the
    // global one as a whole.
    if let Some(parsed) = read_config_file(Path::new(".sight-reader.toml")) {
        opts = parsed;
    }

    opts
}

fn read_config_file(path: &Path) -> Option<ReaderOptions> {
    let contents = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<ReaderOptions>(&contents) {
        Ok(parsed) => {
            log::debug!("Loaded config from {}", path.display());
            Some(parsed)
        }
        Err(e) => {
            log::warn!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

/// Apply CLI flags on top of config-loaded options.
/// Only overrides when the CLI flag was explicitly provided.
fn apply_cli_overrides(opts: &mut ReaderOptions, cli: &Cli) {
    if cli.reflow {
        opts.reflow = true;
    }

    if let Some(ref language) = cli.language {
        opts.language = language.clone();
    }

    if let Some(device) = cli.device {
        opts.device.class = device.into();
    }

    if cli.viewport_width.is_some() {
        opts.device.viewport_width = cli.viewport_width;
    }

    if cli.user_agent.is_some() {
        opts.device.user_agent = cli.user_agent.clone();
    }

    if let Some(threshold) = cli.noise_threshold {
        opts.noise_threshold = threshold;
    }

    if cli.tesseract.is_some() {
        opts.tesseract_path = cli.tesseract.clone();
    }
}

/// Default log filter when `RUST_LOG` is unset.
fn log_filter(cli: &Cli) -> &'static str {
    match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(&cli)))
        .init();

    // Handle --dump-config
    if cli.dump_config {
        let mut opts = load_config();
        apply_cli_overrides(&mut opts, &cli);
        match toml::to_string_pretty(&opts) {
            Ok(s) => {
                println!("{}", s);
                process::exit(0);
            }
            Err(e) => {
                eprintln!("Error serializing config: {}", e);
                process::exit(1);
            }
        }
    }

    let result = match &cli.command {
        Some(Commands::Read { input, output }) => run_read(input, output.as_deref(), &cli),
        None => match &cli.input {
            // Legacy mode: positional args
            Some(input) => run_read(input, cli.output.as_deref(), &cli),
            None => {
                eprintln!("Usage: sight-reader <input.pdf> [output] [options]");
                eprintln!("   or: sight-reader read <input.pdf> [-o <output>] [options]");
                process::exit(1);
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run_read(input: &Path, output: Option<&Path>, cli: &Cli) -> Result<()> {
    // Build options: config files → CLI overrides
    let mut options = load_config();
    apply_cli_overrides(&mut options, cli);

    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let pipeline = PipelineBuilder::new()
        .loader(Box::new(PdfLoader))
        .engine_factory(Box::new(TesseractFactory::new(
            options.tesseract_path.clone(),
        )))
        .progress_reporter(Arc::new(|pct: f64, msg: &str| {
            if pct < 100.0 {
                log::info!("[{:3.0}%] {}", pct, msg);
            } else {
                log::info!("Done!");
            }
        }))
        .build()?;

    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());

    let mut session = Session::new(options);
    let transcript = pipeline
        .process(&mut session, &name, &bytes)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let rendered = render_output(&transcript, cli.format)?;
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn render_output(transcript: &Transcript, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(transcript.text.clone()),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(transcript)
                .context("Failed to serialize transcript")?;
            json.push('\n');
            Ok(json)
        }
    }
}
