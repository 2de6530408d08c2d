//! CLI driver: read simhashes or JSON lines from the input, find all pairs
//! within `distance` bits of each other, and write the resulting clusters
//! as TSV to the output.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use simdedup::dataset::{read_records, write_clusters, DatasetError, DatasetOptions, InputFormat};
use simdedup::{process_corpus, DedupConfig};

#[derive(Parser, Debug)]
#[command(
    name = "simdedup",
    version,
    about = "Find clusters of near-duplicate simhash fingerprints"
)]
struct Cli {
    /// Number of bit blocks to use
    #[arg(long)]
    blocks: Option<u32>,

    /// Maximum Hamming distance for two fingerprints to match
    #[arg(long)]
    distance: Option<u32>,

    /// Format of the input
    #[arg(long, value_enum)]
    format: InputFormat,

    /// Path to the input ('-' for stdin)
    #[arg(long, default_value = "-")]
    input: String,

    /// Path to the output ('-' for stdout)
    #[arg(long, default_value = "-")]
    output: String,

    /// JSON field containing the text to fingerprint
    #[arg(long)]
    text_column: Option<String>,

    /// JSON field to use as the record identifier
    #[arg(long)]
    id_column: Option<String>,

    /// Shingle window width in bytes for JSON text
    #[arg(long)]
    window: Option<usize>,

    /// Cap on input records (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    sample: usize,

    /// Optional YAML pipeline configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Driver failures, each mapped to a distinct exit code.
#[derive(Debug, Error)]
enum DriverError {
    #[error("{0}")]
    Config(String),

    #[error("invalid input: {0}")]
    Input(DatasetError),

    #[error("failed to read input: {0}")]
    InputIo(io::Error),

    #[error("failed to write output: {0}")]
    OutputIo(io::Error),
}

impl DriverError {
    fn exit_code(&self) -> u8 {
        match self {
            DriverError::Config(_) => 2,
            DriverError::Input(_) => 3,
            DriverError::InputIo(_) => 4,
            DriverError::OutputIo(_) => 5,
        }
    }
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout may carry the cluster TSV.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("simdedup: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), DriverError> {
    let config = resolve_config(&cli)?;

    let options = DatasetOptions {
        format: cli.format,
        text_column: cli.text_column.clone(),
        id_column: cli.id_column.clone(),
        sample: cli.sample,
    };

    let reader: Box<dyn BufRead> = if cli.input == "-" {
        info!("reading corpus from stdin");
        Box::new(BufReader::new(io::stdin().lock()))
    } else {
        info!(input = %cli.input, "reading corpus");
        Box::new(BufReader::new(
            File::open(&cli.input).map_err(DriverError::InputIo)?,
        ))
    };

    let dataset = read_records(reader, &options, &config.fingerprint).map_err(|err| match err {
        DatasetError::Io(source) => DriverError::InputIo(source),
        other => DriverError::Input(other),
    })?;

    let clusters = process_corpus(&dataset.hashes, &config)
        .map_err(|err| DriverError::Config(err.to_string()))?;
    info!(clusters = clusters.len(), "clustering_done");

    let writer: Box<dyn Write> = if cli.output == "-" {
        Box::new(BufWriter::new(io::stdout().lock()))
    } else {
        info!(output = %cli.output, "writing clusters");
        Box::new(BufWriter::new(
            File::create(&cli.output).map_err(DriverError::OutputIo)?,
        ))
    };
    write_clusters(writer, &clusters, &dataset.ids).map_err(DriverError::OutputIo)?;

    Ok(())
}

/// Merge the optional YAML config file with command-line overrides.
///
/// `--blocks` and `--distance` are required unless a config file supplies
/// them; explicit flags always win.
fn resolve_config(cli: &Cli) -> Result<DedupConfig, DriverError> {
    let mut config = match &cli.config {
        Some(path) => DedupConfig::from_yaml_file(path)
            .map_err(|err| DriverError::Config(err.to_string()))?,
        None => DedupConfig::default(),
    };

    match (cli.blocks, &cli.config) {
        (Some(blocks), _) => config.matcher.blocks = blocks,
        (None, Some(_)) => {}
        (None, None) => {
            return Err(DriverError::Config(
                "--blocks is required (flag or config file)".into(),
            ))
        }
    }
    match (cli.distance, &cli.config) {
        (Some(distance), _) => config.matcher.distance = distance,
        (None, Some(_)) => {}
        (None, None) => {
            return Err(DriverError::Config(
                "--distance is required (flag or config file)".into(),
            ))
        }
    }
    if let Some(window) = cli.window {
        config.fingerprint.window = window;
    }

    config
        .validate()
        .map_err(|err| DriverError::Config(err.to_string()))?;
    Ok(config)
}
