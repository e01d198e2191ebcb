use std::path::PathBuf;
use std::process::ExitCode;

use bcsv_parse::{from_file, to_csv, to_json, Encoding, HashDictionary, IoOptions};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bcsv-parse", about = "Convert BCSV tables to JSON or CSV")]
struct Cli {
    /// Output format
    #[arg(value_enum)]
    format: OutputFormat,
    /// BCSV file to convert
    input: PathBuf,
    /// Output file (default: next to the input, with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Extra wordlists to resolve hashes with, after the bundled one
    #[arg(short, long = "dictionary")]
    dictionaries: Vec<PathBuf>,
    /// String encoding: utf8, shift-jis or utf16le
    #[arg(short, long, default_value = "utf8", value_parser = parse_encoding)]
    encoding: Encoding,
    /// Read big-endian tables
    #[arg(long)]
    big_endian: bool,
    /// Keep full decoded column names (with type suffixes) in the CSV header
    #[arg(long)]
    hex_header: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

fn parse_encoding(name: &str) -> Result<Encoding, String> {
    Encoding::from_name(name).ok_or_else(|| format!("unknown encoding '{}'", name))
}

fn run(cli: &Cli) -> bcsv_parse::Result<PathBuf> {
    let extended;
    let dict = if cli.dictionaries.is_empty() {
        HashDictionary::shared()
    } else {
        let mut dict = HashDictionary::bundled();
        for path in &cli.dictionaries {
            dict.extend_from_file(path)?;
        }
        extended = dict;
        &extended
    };

    let options = IoOptions {
        big_endian: cli.big_endian,
        encoding: cli.encoding,
    };
    let table = from_file(dict, &cli.input, &options)?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension(cli.format.extension()));

    match cli.format {
        OutputFormat::Json => to_json(&table, &output)?,
        OutputFormat::Csv => to_csv(&table, &output, cli.hex_header)?,
    }

    Ok(output)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if !cli.input.is_file() {
        eprintln!("Input file does not exist: {}", cli.input.display());
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(output) => {
            tracing::info!(output = %output.display(), "wrote output");
            println!("OK!");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
