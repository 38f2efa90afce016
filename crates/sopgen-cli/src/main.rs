#![allow(
    clippy::needless_pass_by_value,    // clap hands over owned values
    clippy::fn_params_excessive_bools, // CLI commands have several boolean flags
    clippy::unnecessary_debug_formatting, // useful for error messages
)]

//! sopgen CLI - Standard operating procedure document generator
//!
//! Turns parsed process steps (JSON) into a `.docx` procedure document
//! built from a template layout.

mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use config::{resolve_layout, BatchConfig, Config};
use sopgen_backend::{plan_merge_ranges, DocumentAssembler, DocxWriter, MergeRange};
use sopgen_core::{BuildInput, TemplateLayout};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Verbosity {
    /// Suppress all output except errors
    Quiet,
    /// Normal output (default)
    Normal,
    /// Verbose output with extra details
    Verbose,
}

impl Verbosity {
    const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    const fn should_show_output(self) -> bool {
        !matches!(self, Self::Quiet)
    }

    const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Default log level; `RUST_LOG` overrides it
    const fn log_level(self) -> log::LevelFilter {
        match self {
            Self::Quiet => log::LevelFilter::Error,
            Self::Normal => log::LevelFilter::Warn,
            Self::Verbose => log::LevelFilter::Info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default)]
enum PlanFormat {
    /// One line per range
    #[default]
    Text,
    /// JSON array of ranges
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "sopgen",
    about = "Generate standard operating procedure documents",
    long_about = "Generate standard operating procedure documents from parsed process steps.\n\
                  \n\
                  Each step becomes one row of the process table, with RACI columns,\n\
                  shaded branch outcomes and merged SLA cells.",
    version
)]
struct Args {
    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show detailed processing information
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a procedure document from a JSON step file
    #[command(long_about = "Build a .docx procedure document from a JSON step file.\n\
                      \n\
                      The input holds `steps` plus optional `abbreviations_list`,\n\
                      `references_list` and `general_policies_list`.\n\
                      \n\
                      Defaults can be set via .sopgen.toml configuration file.")]
    Build {
        /// Input JSON file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (default: input name with .docx extension)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Template layout TOML (default: built-in master layout)
        #[arg(short, long, value_name = "FILE")]
        layout: Option<PathBuf>,

        /// Overwrite the output file if it exists
        #[arg(short, long)]
        force: bool,
    },

    /// Build several procedure documents into one directory
    #[command(long_about = "Build one .docx per JSON step file into an output directory.\n\
                      \n\
                      Stops at the first failure unless --continue-on-error is given.\n\
                      \n\
                      Defaults can be set via .sopgen.toml configuration file.")]
    Batch {
        /// Input JSON files
        #[arg(value_name = "INPUTS", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "OUTPUT_DIR", required = true)]
        output: PathBuf,

        /// Template layout TOML (default: built-in master layout)
        #[arg(short, long, value_name = "FILE")]
        layout: Option<PathBuf>,

        /// Build inputs in parallel
        #[arg(long)]
        parallel: bool,

        /// Keep building after a failure
        #[arg(long)]
        continue_on_error: bool,
    },

    /// Print the SLA merge ranges of a step file
    Plan {
        /// Input JSON file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: PlanFormat,
    },

    /// Print the built-in master layout as TOML
    Layout {
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let verbosity = Verbosity::from_flags(args.quiet, args.verbose);

    env_logger::Builder::new()
        .filter_level(verbosity.log_level())
        .parse_default_env()
        .init();

    let config = Config::discover();

    match args.command {
        Commands::Build {
            input,
            output,
            layout,
            force,
        } => build_command(
            input,
            output,
            resolve_layout(layout, &config),
            force,
            verbosity,
        ),
        Commands::Batch {
            inputs,
            output,
            layout,
            parallel,
            continue_on_error,
        } => batch_command(
            inputs,
            output,
            resolve_layout(layout, &config),
            parallel,
            continue_on_error,
            &config.batch(),
            verbosity,
        ),
        Commands::Plan { input, format } => plan_command(&input, format),
        Commands::Layout { output } => layout_command(output, verbosity),
    }
}

/// Generate the default output path from an input file.
///
/// Given "purchasing.json", returns "purchasing.docx" in the same directory.
fn smart_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    input.with_file_name(format!("{}.docx", stem.to_string_lossy()))
}

fn load_layout(path: Option<&Path>) -> Result<TemplateLayout> {
    match path {
        Some(path) => TemplateLayout::from_file(path)
            .with_context(|| format!("Failed to load template layout: {}", path.display())),
        None => Ok(TemplateLayout::master()),
    }
}

fn load_input(path: &Path) -> Result<BuildInput> {
    BuildInput::from_file(path)
        .with_context(|| format!("Failed to read build input: {}", path.display()))
}

/// Build one document; returns the number of steps rendered
fn build_file(input: &Path, output: &Path, layout: &TemplateLayout) -> Result<usize> {
    let build_input = load_input(input)?;
    let doc = DocumentAssembler::new()
        .build(layout, &build_input)
        .with_context(|| format!("Failed to build document from {}", input.display()))?;
    DocxWriter::write_file(&doc, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(build_input.steps.len())
}

fn build_command(
    input: PathBuf,
    output: Option<PathBuf>,
    layout: Option<PathBuf>,
    force: bool,
    verbosity: Verbosity,
) -> Result<()> {
    let output = output.unwrap_or_else(|| smart_output_path(&input));
    if output.exists() && !force {
        bail!(
            "Output file already exists: {} (use --force to overwrite)",
            output.display()
        );
    }

    let layout = load_layout(layout.as_deref())?;
    let start = Instant::now();
    let steps = build_file(&input, &output, &layout)?;

    if verbosity.should_show_output() {
        eprintln!(
            "{} {} -> {}",
            "✓".green().bold(),
            input.display().to_string().bright_white(),
            output.display().to_string().bright_white()
        );
    }
    if verbosity.is_verbose() {
        eprintln!(
            "  {} steps, layout '{}', {:.2}s",
            steps,
            layout.name,
            start.elapsed().as_secs_f64()
        );
    }
    Ok(())
}

/// Pair every input with its output path in `output_dir`
///
/// Fails if two inputs share a file stem, since both would be written to the
/// same `.docx`.
fn batch_jobs(inputs: &[PathBuf], output_dir: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    let mut jobs = Vec::with_capacity(inputs.len());
    for input in inputs {
        let output =
            output_dir.join(smart_output_path(input).file_name().unwrap_or_default());
        if let Some(previous) = claimed.insert(output.clone(), input.as_path()) {
            bail!(
                "{} and {} would both be written to {}; rename one or build them separately",
                previous.display(),
                input.display(),
                output.display()
            );
        }
        jobs.push((input.clone(), output));
    }
    Ok(jobs)
}

struct BatchResult {
    input: PathBuf,
    output: PathBuf,
    outcome: Option<Result<usize>>,
}

fn batch_command(
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    layout: Option<PathBuf>,
    parallel: bool,
    continue_on_error: bool,
    config: &BatchConfig,
    verbosity: Verbosity,
) -> Result<()> {
    use rayon::prelude::*;

    // Resolve final values with precedence: CLI > config > defaults
    let parallel = parallel || config.parallel.unwrap_or(false);
    let continue_on_error = continue_on_error || config.continue_on_error.unwrap_or(false);

    let jobs = batch_jobs(&inputs, &output_dir)?;
    let layout = load_layout(layout.as_deref())?;
    fs::create_dir_all(&output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let start = Instant::now();
    let should_stop = AtomicBool::new(false);

    // Skipped inputs (after a fail-fast stop) carry no outcome
    let process = |(input, output): &(PathBuf, PathBuf)| -> BatchResult {
        let output = output.clone();
        if should_stop.load(Ordering::SeqCst) {
            return BatchResult {
                input: input.clone(),
                output,
                outcome: None,
            };
        }
        let outcome = build_file(input, &output, &layout);
        if outcome.is_err() && !continue_on_error {
            should_stop.store(true, Ordering::SeqCst);
        }
        BatchResult {
            input: input.clone(),
            output,
            outcome: Some(outcome),
        }
    };

    let results: Vec<BatchResult> = if parallel {
        jobs.par_iter().map(process).collect()
    } else {
        jobs.iter().map(process).collect()
    };

    let mut succeeded = 0usize;
    let mut failed = 0usize;
    let mut skipped = 0usize;
    let mut first_error: Option<String> = None;

    for result in &results {
        let name = result.input.display().to_string();
        match &result.outcome {
            None => skipped += 1,
            Some(Ok(steps)) => {
                succeeded += 1;
                if verbosity.is_verbose() {
                    eprintln!(
                        "{} {} -> {} ({} steps)",
                        "✓".green().bold(),
                        name.bright_white(),
                        result.output.display().to_string().bright_black(),
                        steps
                    );
                }
            }
            Some(Err(e)) => {
                failed += 1;
                let message = format!("{e:#}");
                if verbosity.should_show_output() || !continue_on_error {
                    eprintln!(
                        "{} {} - {}",
                        "✗".red().bold(),
                        name.bright_white(),
                        message.red()
                    );
                }
                if first_error.is_none() {
                    first_error = Some(message);
                }
            }
        }
    }

    if verbosity.should_show_output() {
        eprintln!("\n{}", "=== Batch Build Summary ===".bold());
        eprintln!("{:<16} {}", "Total files:", results.len().to_string().cyan());
        eprintln!("{:<16} {}", "Succeeded:", succeeded.to_string().green());
        eprintln!(
            "{:<16} {}",
            "Failed:",
            if failed > 0 {
                failed.to_string().red()
            } else {
                failed.to_string().green()
            }
        );
        if skipped > 0 {
            eprintln!("{:<16} {}", "Skipped:", skipped.to_string().yellow());
        }
        eprintln!(
            "{:<16} {:.2}s",
            "Total time:",
            start.elapsed().as_secs_f64()
        );
    }

    if !continue_on_error {
        if let Some(error) = first_error {
            bail!("Batch build stopped after a failure: {error}");
        }
    }
    Ok(())
}

fn format_range(range: &MergeRange) -> String {
    if range.is_merged() {
        format!(
            "steps {}-{}: {}",
            range.start,
            range.end,
            display_value(&range.value)
        )
    } else {
        format!("step {}: {}", range.start, display_value(&range.value))
    }
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(no SLA)"
    } else {
        value
    }
}

fn plan_command(input: &Path, format: PlanFormat) -> Result<()> {
    let build_input = load_input(input)?;
    let ranges = plan_merge_ranges(&build_input.steps);

    match format {
        PlanFormat::Json => {
            let json = serde_json::to_string_pretty(&ranges)
                .context("Failed to serialize merge ranges")?;
            println!("{json}");
        }
        PlanFormat::Text => {
            if ranges.is_empty() {
                println!("No SLA ranges in {} steps", build_input.steps.len());
            }
            for range in &ranges {
                println!("{}", format_range(range));
            }
        }
    }
    Ok(())
}

fn layout_command(output: Option<PathBuf>, verbosity: Verbosity) -> Result<()> {
    let toml = TemplateLayout::master()
        .to_toml_string()
        .context("Failed to serialize the master layout")?;

    match output {
        Some(path) => {
            fs::write(&path, toml)
                .with_context(|| format!("Failed to write layout: {}", path.display()))?;
            if verbosity.should_show_output() {
                eprintln!(
                    "{} Wrote master layout to {}",
                    "✓".green().bold(),
                    path.display()
                );
            }
        }
        None => print!("{toml}"),
    }
    Ok(())
}
