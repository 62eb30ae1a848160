//! Command-line interface for contextizer.
//!
//! Resolves the project root, detects where the report is going so the
//! report never includes itself, and writes the snapshot to stdout or a file.

use clap::{Parser, ValueEnum};
use contextizer::{ContextBuilder, ContextOptions, TreeWalker, output};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::exit;
use tracing_subscriber::EnvFilter;

/// contextizer — project snapshot for LLM context windows
#[derive(Parser)]
#[command(name = "contextizer", version, about, long_about = None)]
struct Cli {
    /// Path to the target project directory (default current dir)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extra ignore directive in .llmignore syntax (can be repeated)
    #[arg(short = 'I', long = "ignore")]
    ignore: Vec<String>,

    /// Do not read the project's .llmignore
    #[arg(long)]
    no_llmignore: bool,

    /// Operation mode
    #[arg(long, value_enum, default_value_t = Mode::Normal)]
    mode: Mode,

    /// Log debug details to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Mode {
    Normal,
    TreeOnly,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => output::OutputFormat::Text,
            OutputFormat::Json => output::OutputFormat::Json,
        }
    }
}

impl Cli {
    fn into_options(self) -> (ContextOptions, Option<PathBuf>, OutputFormat, Mode, bool) {
        let exclude = self.output.clone().or_else(redirected_stdout);
        let options = ContextBuilder::new(self.path)
            .exclude_path(exclude)
            .directives(self.ignore)
            .load_override_file(!self.no_llmignore)
            .build();
        (options, self.output, self.format, self.mode, self.pretty)
    }
}

/// The regular file stdout is redirected to, if any.
#[cfg(target_os = "linux")]
fn redirected_stdout() -> Option<PathBuf> {
    use std::io::IsTerminal;

    if io::stdout().is_terminal() {
        return None;
    }
    let target = std::fs::read_link("/proc/self/fd/1").ok()?;
    target.is_file().then_some(target)
}

#[cfg(not(target_os = "linux"))]
fn redirected_stdout() -> Option<PathBuf> {
    None
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let (options, output_path, format, mode, pretty) = cli.into_options();

    let walker = match TreeWalker::new(&options) {
        Ok(walker) => walker,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    let mut out: Box<dyn Write> = match &output_path {
        Some(path) => match File::create(path) {
            Ok(file) => Box::new(BufWriter::new(file)),
            Err(e) => {
                eprintln!("Error: cannot create {}: {}", path.display(), e);
                exit(1);
            }
        },
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let with_contents = mode == Mode::Normal;
    if let Err(e) = output::write_report(&walker, &mut out, format.into(), with_contents, pretty) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}
