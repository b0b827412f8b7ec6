/*!
 * Command-line interface for bundlefs
 */

use std::fs;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bundlefs::config::{Args, Config, Mode};
use bundlefs::error::{BundleError, Result};
use bundlefs::reader::decode_file;
use bundlefs::report::{BundleReport, RebuildReport, ReportFormat, Reporter};
use bundlefs::scanner::Scanner;
use bundlefs::utils::count_files;
use bundlefs::writer::BundleWriter;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "bundlefs", &mut io::stdout());
        return;
    }

    let config = match Config::from_args(args) {
        Ok(config) => config,
        // Usage problems go through clap so they look and exit like its own errors
        Err(BundleError::MissingArgument(msg)) => Args::command()
            .error(ErrorKind::MissingRequiredArgument, msg)
            .exit(),
        Err(e) => fail(e),
    };

    if let Err(e) = run(config) {
        fail(e);
    }
}

fn fail(e: BundleError) -> ! {
    eprintln!("bundlefs: {}", e);
    std::process::exit(1);
}

fn run(config: Config) -> Result<()> {
    config.validate()?;

    match config.mode {
        Mode::Forward => encode(config),
        Mode::Reverse => decode(config),
    }
}

fn encode(config: Config) -> Result<()> {
    let exclusions = config.load_exclusions()?;
    info!(
        "Bundling {} into {} ({} exclusion patterns)",
        config.root.display(),
        config.output_file.display(),
        exclusions.len()
    );

    let progress = if config.quiet {
        ProgressBar::hidden()
    } else {
        let progress = ProgressBar::new(0);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%) ⏱️  Elapsed: {elapsed_precise}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress.enable_steady_tick(Duration::from_millis(100));
        progress
    };

    progress.set_prefix("📊 Setup");
    progress.set_message(format!("📂 Scanning directory: {}", config.root.display()));

    // Count files for progress tracking
    let total_files = count_files(&config.root, &exclusions, &config.output_file);
    progress.set_length(total_files);
    progress.set_prefix("📊 Processing");
    progress.set_message(format!("🔎 Found {} files to bundle", total_files));

    let scanner = Scanner::new(config.clone(), exclusions, Arc::new(progress.clone()));
    let writer = BundleWriter::new(config.clone());

    // Time both the scan and the write
    let start_time = Instant::now();
    let root_node = scanner.scan()?;
    let stats = writer.write(&root_node)?;
    let duration = start_time.elapsed();

    progress.finish_and_clear();

    if !config.quiet {
        let report = BundleReport {
            output_file: config.output_file.display().to_string(),
            duration,
            files_processed: stats.files_written,
            binary_files: stats.binary_files,
            unreadable_files: stats.unreadable_files,
            comments_stripped: stats.comments_stripped,
            total_lines: stats.total_lines,
            total_chars: stats.total_chars,
            output_size: fs::metadata(&config.output_file)
                .map(|m| m.len())
                .unwrap_or(0),
            file_details: stats.file_details,
        };
        Reporter::new(ReportFormat::ConsoleTable).print_bundle_report(&report);
    }

    Ok(())
}

fn decode(config: Config) -> Result<()> {
    let start_time = Instant::now();
    let (parsed, stats) = decode_file(&config.input_file, &config.root)?;
    let duration = start_time.elapsed();

    println!(
        "Recreated {} file(s) under {}",
        stats.written.len(),
        config.root.display()
    );

    if !config.quiet {
        let report = RebuildReport {
            target_root: config.root.display().to_string(),
            duration,
            files_written: stats.written.len(),
            binary_files: stats.binary_files,
            files_failed: stats.failed.len(),
            malformed_headers: parsed.malformed.len(),
            duplicate_paths: parsed.duplicates.len(),
            bytes_written: stats.bytes_written,
        };
        Reporter::new(ReportFormat::ConsoleTable).print_rebuild_report(&report);
    }

    Ok(())
}
