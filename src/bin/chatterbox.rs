//! Command line front end: parse a Chatterbox file and print it as JSON or HTML

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, debug};

use chatterbox::{
    Chatterbox, CommonMarkRenderer, Settings, parse_chatterbox, render_chatterbox,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Parsed configuration and entries
    Json,
    /// Rendered transcript
    Html,
}

#[derive(Debug, Parser)]
#[command(name = "chatterbox", version, about = "Parse and render Chatterbox transcripts")]
struct Cli {
    /// Source file, or `-` for stdin
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Plugin settings as JSON (default configuration, Markdown fixes)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Log parser and renderer decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }

    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        debug!("Using default settings");
        return Ok(Settings::default());
    };

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings {}", path.display()))?;
    let settings = Settings::from_json(&json)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    debug!("Using settings from: {}", path.display());
    Ok(settings)
}

/// What a run prints: the rendered output, or the errors of a broken header
#[derive(Debug, PartialEq, Eq)]
enum Output {
    Stdout(String),
    Errors(Vec<String>),
}

fn render_output(format: Format, source: &str, settings: &Settings) -> Result<Output> {
    match format {
        Format::Json => match parse_chatterbox(source) {
            Ok(parsed) => {
                let merged = Chatterbox {
                    config: parsed.config.merge_over(settings.default_config()),
                    entries: parsed.entries,
                };
                let json = serde_json::to_string_pretty(&merged)
                    .context("Failed to serialize parse result")?;
                Ok(Output::Stdout(json))
            }
            Err(err) => Ok(Output::Errors(err.error_list())),
        },
        Format::Html => Ok(Output::Stdout(render_chatterbox(
            source,
            settings,
            &CommonMarkRenderer::new(),
        ))),
    }
}

fn run(cli: &Cli, out: &mut dyn Write, err: &mut dyn Write) -> Result<ExitCode> {
    let source = read_source(&cli.file)?;
    let settings = load_settings(cli.settings.as_deref())?;

    match render_output(cli.format, &source, &settings)? {
        Output::Stdout(text) => {
            writeln!(out, "{text}").context("Failed to write output")?;
            Ok(ExitCode::SUCCESS)
        }
        Output::Errors(messages) => {
            for message in messages {
                writeln!(err, "error: {message}").context("Failed to write errors")?;
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    run(&cli, &mut io::stdout().lock(), &mut io::stderr().lock())
}
