// SPDX-License-Identifier: PMPL-1.0-or-later

//! codesift: heuristic code analysis from the command line
//!
//! Classifies a source file's language, estimates its complexity, reports
//! quality violations and security findings, and drafts test skeletons.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use codesift::report::{self, ReportOutputFormat};
use codesift::source::decode_source;
use codesift::sweep::{self, SweepConfig};
use codesift::{Analyzer, AnalyzerConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codesift")]
#[command(version)]
#[command(about = "Heuristic, parser-free static analysis for source files")]
#[command(long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Analyzer configuration file (.json, .yaml or .yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a single source file
    Analyze {
        /// Source file to analyse
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Language id, or "auto" to classify from content
        #[arg(short, long, default_value = "auto")]
        language: String,

        /// Output format; the coloured terminal report is shown when omitted
        #[arg(short, long, value_enum)]
        format: Option<ReportOutputFormat>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Classify the language of a source file
    Detect {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Analyse every recognised source file under a directory
    Sweep {
        /// Directory to sweep
        #[arg(value_name = "DIR")]
        directory: PathBuf,

        /// Write the JSON sweep report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only list files with at least this many issues
        #[arg(long, default_value = "0")]
        min_issues: usize,
    },
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<AnalyzerConfig> {
    match path {
        Some(path) => AnalyzerConfig::load(path),
        None => Ok(AnalyzerConfig::default()),
    }
}

fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(decode_source(&bytes))
}

/// An explicit `--format` wins; otherwise the output file's extension
/// picks one, falling back to JSON.
fn resolve_format(format: Option<ReportOutputFormat>, output: &Path) -> ReportOutputFormat {
    format
        .or_else(|| {
            output
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(ReportOutputFormat::parse)
        })
        .unwrap_or(ReportOutputFormat::Json)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let analyzer = Analyzer::new(config)?;

    match cli.command {
        Commands::Analyze {
            file,
            language,
            format,
            output,
        } => {
            let text = read_source(&file)?;
            let artifact = file.display().to_string();
            info!(file = %artifact, language = %language, "analysing");

            let result = analyzer.analyze_named(&text, &language, Some(&artifact));

            match (output, format) {
                (Some(path), format) => {
                    let format = resolve_format(format, &path);
                    report::save_report(&result, &artifact, format, &path)?;
                }
                (None, Some(format)) => {
                    println!("{}", format.serialize(&result, &artifact)?);
                }
                (None, None) => report::print_report(&result, &artifact),
            }
        }

        Commands::Detect { file } => {
            let text = read_source(&file)?;
            let artifact = file.display().to_string();
            let detection = analyzer.detect_language(&text, Some(&artifact));

            println!(
                "{}: {} (confidence {}, {})",
                artifact, detection.language, detection.confidence, detection.reason
            );
            for candidate in &detection.alternatives {
                println!("  alternative: {} ({})", candidate.language, candidate.confidence);
            }
        }

        Commands::Sweep {
            directory,
            output,
            min_issues,
        } => {
            println!("Sweeping {}...", directory.display());
            let sweep_config = SweepConfig {
                directory,
                min_issues,
            };
            let report = sweep::run(&analyzer, &sweep_config)?;
            sweep::print_summary(&report);

            if let Some(path) = output {
                sweep::write_report(&report, &path)?;
                println!("Sweep report written to: {}", path.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format_prefers_explicit_then_extension() {
        assert_eq!(
            resolve_format(Some(ReportOutputFormat::Yaml), Path::new("out.json")),
            ReportOutputFormat::Yaml
        );
        assert_eq!(
            resolve_format(None, Path::new("out.sarif")),
            ReportOutputFormat::Sarif
        );
        assert_eq!(
            resolve_format(None, Path::new("out.txt")),
            ReportOutputFormat::Json
        );
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from(["codesift", "-vv", "analyze", "a.py", "--language", "python"])
            .expect("parse");
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Analyze { file, language, .. } => {
                assert_eq!(file, PathBuf::from("a.py"));
                assert_eq!(language, "python");
            }
            _ => panic!("expected analyze"),
        }
    }
}
