use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use parse_json::{line_col, JsonParser};
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Check a JSON document and print it back.
#[derive(Parser)]
#[command(name = "parse-json", version, about)]
struct Cli {
    /// The document to read, or `-` for standard input
    path: PathBuf,

    /// Print the value indented
    #[arg(long)]
    pretty: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{path} is not valid UTF-8")]
    Utf8 { path: String },
    #[error("cannot build the JSON grammar: {0}")]
    Grammar(#[from] parse_core::GrammarError),
    #[error("cannot serialize the value: {0}")]
    Output(#[from] serde_json::Error),
}

/// What became of the document.
enum Verdict {
    Accepted,
    Rejected,
}

fn read_source(path: &Path) -> Result<String, CliError> {
    let name = path.display().to_string();
    let bytes = if name == "-" {
        let mut bytes = Vec::new();
        io::stdin().read_to_end(&mut bytes).map(|_| bytes)
    } else {
        fs::read(path)
    }
    .map_err(|source| CliError::Read {
        path: name.clone(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| CliError::Utf8 { path: name })
}

fn run(cli: &Cli) -> Result<Verdict, CliError> {
    let source = read_source(&cli.path)?;
    let parser = JsonParser::new()?;

    match parser.parse(&source) {
        Ok(value) => {
            let output = if cli.pretty {
                serde_json::to_string_pretty(&value)?
            } else {
                serde_json::to_string(&value)?
            };
            println!("{output}");
            Ok(Verdict::Accepted)
        }
        Err(error) => {
            match error.farthest() {
                Some(farthest) => {
                    let (line, column) = line_col(&source, farthest.position);
                    eprintln!("error at line {line}, column {column}: {error}");
                    eprintln!("{farthest}");
                }
                None => eprintln!("error: {error}"),
            }
            Ok(Verdict::Rejected)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("cannot install the logger: {error}");
    }

    match run(&cli) {
        Ok(Verdict::Accepted) => ExitCode::SUCCESS,
        Ok(Verdict::Rejected) => ExitCode::from(1),
        Err(error) => {
            tracing::error!(%error, "giving up");
            eprintln!("{error}");
            ExitCode::from(2)
        }
    }
}
