//! shelfscan - find the books in a directory tree.
//!
//! Usage:
//!   shelfscan scan [PATH]         Stream found books as they are discovered
//!   shelfscan duplicates [PATH]   Report books stored at more than one path
//!   shelfscan --help              Show help

mod settings;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use shelfscan_collect::{CandidateList, DuplicateConfig};
use shelfscan_core::{HashAlgorithm, IgnoreRules, ScanConfig, ScanEvent, TargetExtensions};
use shelfscan_scan::{ScanSummary, Scanner};

use crate::settings::Settings;

const DEFAULT_LOG_FILTER: &str = "shelfscan=info";
const VERBOSE_LOG_FILTER: &str = "shelfscan=debug,shelfscan_scan=debug,shelfscan_collect=debug";

#[derive(Parser)]
#[command(
    name = "shelfscan",
    version,
    about = "Find the PDF books in a directory tree",
    long_about = "shelfscan walks a directory tree, hashes every matching book, and \
                  streams what it finds. Hidden entries, dependency folders and log \
                  folders are skipped by default."
)]
struct Cli {
    /// Log debug output from the scanner (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a path and stream every event
    Scan {
        #[command(flatten)]
        scan: ScanArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Scan a path and report content found at more than one path
    Duplicates {
        #[command(flatten)]
        scan: ScanArgs,

        /// Minimum file size to report in bytes
        #[arg(short, long, default_value = "0")]
        min_size: u64,

        /// Maximum number of duplicate groups to show (0 = all)
        #[arg(short = 'n', long, default_value = "20")]
        top: usize,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Path to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Extra leaf-name glob to skip (repeatable)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Extension to report, replacing the defaults (repeatable)
    #[arg(short, long = "ext", value_name = "EXT")]
    ext: Vec<String>,

    /// Start from an empty ignore list instead of the built-in one
    #[arg(long)]
    no_default_ignores: bool,

    /// Content hash algorithm (md5, blake3)
    #[arg(long, value_name = "ALGORITHM")]
    hash: Option<HashAlgorithm>,

    /// Settings file (defaults to <config dir>/shelfscan/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Scan { scan, format } => {
            let config = build_config(&scan)?;
            run_scan(&config, format);
        }
        Command::Duplicates {
            scan,
            min_size,
            top,
            format,
        } => {
            let config = build_config(&scan)?;
            run_duplicates(&config, min_size, top, format)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        })
    });

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Merge built-in defaults, the settings file, and command-line flags.
fn build_config(args: &ScanArgs) -> Result<ScanConfig> {
    let settings = Settings::load(args.config.as_deref())?;

    let base = if args.no_default_ignores {
        IgnoreRules::none()
    } else {
        match &settings.ignore {
            Some(patterns) => IgnoreRules::new(patterns.iter().cloned())?,
            None => IgnoreRules::default(),
        }
    };
    let ignore = base.extend(args.ignore.iter().cloned())?;

    let extensions = if !args.ext.is_empty() {
        TargetExtensions::new(&args.ext)?
    } else if let Some(extensions) = &settings.extensions {
        TargetExtensions::new(extensions)?
    } else {
        TargetExtensions::default()
    };

    let hash = args.hash.or(settings.hash).unwrap_or_default();

    tracing::debug!(
        ignore = ?ignore.patterns(),
        extensions = ?extensions.iter().collect::<Vec<_>>(),
        %hash,
        "scan configuration"
    );

    ScanConfig::builder()
        .root(args.path.clone())
        .ignore(ignore)
        .extensions(extensions)
        .hash(hash)
        .build()
        .context("Invalid scan configuration")
}

/// Stream events as they arrive and print a summary.
fn run_scan(config: &ScanConfig, format: OutputFormat) {
    eprintln!("Scanning {}...", config.root.display());

    let scanner = Scanner::new();
    let summary = match format {
        OutputFormat::Text => scanner.scan(config, &mut |event: ScanEvent| print_event(&event)),
        OutputFormat::Json => scanner.scan(config, &mut |event: ScanEvent| {
            let line = json!({ "kind": event.kind().as_ref(), "payload": event.payload() });
            println!("{line}");
        }),
    };

    print_summary(&config.root, &summary);
}

/// Scan into a candidate list and print its duplicate report.
fn run_duplicates(
    config: &ScanConfig,
    min_size: u64,
    top_n: usize,
    format: OutputFormat,
) -> Result<()> {
    eprintln!("Scanning {}...", config.root.display());

    let mut candidates = CandidateList::new();
    let summary = Scanner::new().scan(config, &mut |event: ScanEvent| {
        if let ScanEvent::Error(failure) = &event {
            eprintln!("error: {}", failure.message());
        }
        candidates.apply(&event);
    });
    print_summary(&config.root, &summary);

    let dup_config = DuplicateConfig::builder()
        .min_size(min_size)
        .max_groups(top_n)
        .build()
        .context("Invalid duplicate configuration")?;
    let report = candidates.duplicates_with(&dup_config);

    match format {
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(70));
            println!(" Duplicate Book Report");
            println!("{}", "─".repeat(70));
            println!();

            if report.groups.is_empty() {
                println!(" No duplicate books found.");
            } else {
                println!(
                    " Found {} duplicate groups ({} files)",
                    report.group_count, report.files_with_duplicates
                );
                println!(
                    " Total wasted space: {}",
                    format_size(report.total_wasted_space)
                );
                println!();

                for (i, group) in report.groups.iter().enumerate() {
                    println!(
                        " {}. {} ({} copies, {} each, {} wasted)",
                        i + 1,
                        group.name,
                        group.count(),
                        format_size(group.size),
                        format_size(group.wasted_bytes)
                    );
                    println!("    {}", group.hash);
                    for path in &group.paths {
                        println!("    {}", path.display());
                    }
                    println!();
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn print_event(event: &ScanEvent) {
    match event {
        ScanEvent::Heartbeat(dir) => tracing::debug!(dir = %dir.display(), "scanning"),
        ScanEvent::FileFound(record) => println!(
            "{}  {:>10}  {}",
            record.content_hash,
            format_size(record.size_bytes),
            record.absolute_path.display()
        ),
        ScanEvent::Error(failure) => eprintln!("error: {}", failure.message()),
    }
}

fn print_summary(root: &Path, summary: &ScanSummary) {
    eprintln!();
    eprintln!("{}", "─".repeat(60));
    eprintln!(
        " {} - {} books, {} hashed",
        root.display(),
        summary.matches,
        format_size(summary.bytes_hashed)
    );
    eprintln!(
        " {} directories, {} files, {} ignored, {} errors",
        summary.dirs_visited, summary.files_seen, summary.entries_ignored, summary.errors
    );
    eprintln!(" Scanned in {:.2}s", summary.elapsed.as_secs_f64());
    if summary.cancelled {
        eprintln!(" Scan was cancelled before completion");
    }
    eprintln!("{}", "─".repeat(60));
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
