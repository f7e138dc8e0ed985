//! Leamanyi analyzer CLI
//!
//! Loads the word lists once, then reports the relative structures found in
//! one sentence or in every line of a file.
//!
//! Usage:
//!   leamanyi --sentence "Monna yo o tsamayang o tlile"
//!   leamanyi --data data --file sample_inputs/sentences.txt
//!   leamanyi --file sentences.txt.gz --format json -vv
//!
//! Exit status: 0 when every sentence has a match, 1 when some sentence has
//! none, 2 when the lexicon or input could not be read.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, ArgGroup, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use leamanyi::report::{write_json, write_text};
use leamanyi::{Analysis, Analyzer, SentenceReader};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const SEPARATOR_WIDTH: usize = 80;

const STATUS_FOUND: u8 = 0;
const STATUS_NOT_FOUND: u8 = 1;
const STATUS_ERROR: u8 = 2;

/// Leamanyi (relative) structure analyzer for Setswana
#[derive(Parser, Debug)]
#[command(name = "leamanyi", version)]
#[command(about = "Detect Setswana relative (Leamanyi) structures")]
#[command(group(ArgGroup::new("input").required(true).args(["sentence", "file"])))]
struct Args {
    /// Directory containing the word lists (cc.txt, l01.txt, ...)
    #[arg(long, env = "LEAMANYI_DATA", default_value = "data")]
    data: PathBuf,

    /// Analyze a single sentence
    #[arg(long)]
    sentence: Option<String>,

    /// Analyze a file with one sentence per line (gzip accepted)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(STATUS_ERROR)
        }
    }
}

fn run(args: &Args) -> Result<u8> {
    let analyzer = Analyzer::from_data_dir(&args.data)
        .with_context(|| format!("failed to load lexicon from {}", args.data.display()))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let status = match (&args.sentence, &args.file) {
        (Some(sentence), _) => {
            let analysis = analyzer.analyze(sentence);
            emit(&mut out, args.format, &analysis)?;
            status_of(&analysis)
        }
        (None, Some(path)) => analyze_file(&mut out, args.format, &analyzer, path)?,
        (None, None) => bail!("one of --sentence or --file is required"),
    };

    out.flush()?;
    Ok(status)
}

fn analyze_file<W: Write>(
    out: &mut W,
    format: OutputFormat,
    analyzer: &Analyzer,
    path: &Path,
) -> Result<u8> {
    let reader = SentenceReader::from_file(path)?;
    let mut status = STATUS_FOUND;
    let mut sentences = 0;
    let mut matched = 0;

    for sentence in reader {
        let sentence = sentence.with_context(|| format!("failed to read {}", path.display()))?;
        let analysis = analyzer.analyze(&sentence.text);
        emit(out, format, &analysis)?;
        if format == OutputFormat::Text {
            writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        }

        sentences += 1;
        if analysis.found() {
            matched += 1;
        }
        status = status.max(status_of(&analysis));
    }

    info!(path = %path.display(), sentences, matched, "finished file");
    Ok(status)
}

fn emit<W: Write>(out: &mut W, format: OutputFormat, analysis: &Analysis) -> io::Result<()> {
    match format {
        OutputFormat::Text => write_text(out, analysis),
        OutputFormat::Json => write_json(out, analysis),
    }
}

fn status_of(analysis: &Analysis) -> u8 {
    if analysis.found() {
        STATUS_FOUND
    } else {
        STATUS_NOT_FOUND
    }
}
