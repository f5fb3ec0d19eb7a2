//! member-synth CLI
//!
//! Expands `@PublicInit` and `@CodingKeys` in declaration source files.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use member_synth::{apply_fix_its, expand_source, Diagnostic, ExpandedSource, RenderOptions};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "member-synth")]
#[command(about = "Memberwise initializer and CodingKeys synthesis", long_about = None)]
struct Cli {
    /// Log expansion details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand every macro and print the resulting source
    Expand {
        /// Input file; stdin when omitted or `-`
        input: Option<PathBuf>,

        /// Write the expanded source here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Spaces per indentation level in generated code
        #[arg(long, default_value_t = 4)]
        indent: usize,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Report diagnostics without printing the expansion
    Check {
        input: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Apply every fix-it and print the corrected source
    Fix {
        input: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns `false` when the input has error diagnostics.
fn run(command: Commands) -> Result<bool> {
    match command {
        Commands::Expand {
            input,
            output,
            indent,
            format,
        } => {
            let source = read_input(input.as_deref())?;
            let options = RenderOptions { indent_width: indent };
            let expanded = expand_source(&source, &options).with_context(|| describe(input.as_deref()))?;
            match format {
                Format::Text => {
                    report(input.as_deref(), &expanded.diagnostics);
                    write_output(output.as_deref(), &expanded.source)?;
                }
                Format::Json => write_output(output.as_deref(), &serde_json::to_string_pretty(&expanded)?)?,
            }
            Ok(!expanded.has_errors())
        }
        Commands::Check { input, format } => {
            let source = read_input(input.as_deref())?;
            let expanded = expand_source(&source, &RenderOptions::default())
                .with_context(|| describe(input.as_deref()))?;
            match format {
                Format::Text => report(input.as_deref(), &expanded.diagnostics),
                Format::Json => println!("{}", serde_json::to_string_pretty(&expanded.diagnostics)?),
            }
            Ok(!expanded.has_errors())
        }
        Commands::Fix { input, output } => {
            let source = read_input(input.as_deref())?;
            let ExpandedSource { diagnostics, .. } = expand_source(&source, &RenderOptions::default())
                .with_context(|| describe(input.as_deref()))?;
            info!(fix_its = diagnostics.iter().filter(|d| d.fix_it.is_some()).count(), "applying fix-its");
            write_output(output.as_deref(), &apply_fix_its(&source, &diagnostics))?;
            Ok(true)
        }
    }
}

fn describe(input: Option<&Path>) -> String {
    match input {
        Some(path) if path != Path::new("-") => format!("failed to parse {}", path.display()),
        _ => "failed to parse stdin".to_string(),
    }
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        _ => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source).context("failed to read stdin")?;
            Ok(source)
        }
    }
}

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, text).with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

fn report(input: Option<&Path>, diagnostics: &[Diagnostic]) {
    let name = match input {
        Some(path) if path != Path::new("-") => path.display().to_string(),
        _ => "<stdin>".to_string(),
    };
    for diag in diagnostics {
        eprintln!("{}:{} [{}]", name, diag, diag.id());
    }
}
