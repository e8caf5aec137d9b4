//! CLI for the divergence pipeline.
//!
//! Reads every 7-field price CSV in a file or directory, computes rolling
//! SNR per series and the per-date MDI across series, and writes the merged
//! reports plus per-source error reports.
//!
//! # Usage
//!
//! ```bash
//! # Process a directory of price files with the default 97-day window
//! cargo run --release --bin compute_mdi -- \
//!     --input data/prices/ \
//!     --output reports/
//!
//! # Custom window, files carrying a header row
//! cargo run --release --bin compute_mdi -- \
//!     --input data/prices/ \
//!     --output reports/ \
//!     --period 20 \
//!     --skip-header
//! ```
//!
//! # Outputs
//!
//! - `divergence_history.csv` - full merged date range
//! - `divergence_recent.csv` - trailing P data rows, same headers
//! - `<source>_errors.csv` - one per source with rejected rows
//! - `run_summary.json` - run counters

use std::env;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use market_divergence::{
    write_error_report, write_history, write_recent, CsvSource, DivergencePipeline,
    PipelineConfig, Result, DEFAULT_PERIOD,
};

/// Command-line arguments
struct Args {
    /// Input file or directory containing price CSVs
    input: PathBuf,
    /// Output directory for reports
    output: PathBuf,
    /// Rolling window length
    period: usize,
    /// Skip one leading header row in each input file
    skip_header: bool,
    /// Verbose output
    verbose: bool,
}

fn parse_args() -> std::result::Result<Args, String> {
    let args: Vec<String> = env::args().collect();

    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut period = DEFAULT_PERIOD;
    let mut skip_header = false;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" | "-i" => {
                i += 1;
                if i >= args.len() {
                    return Err("--input requires a path".to_string());
                }
                input = Some(PathBuf::from(&args[i]));
            }
            "--output" | "-o" => {
                i += 1;
                if i >= args.len() {
                    return Err("--output requires a path".to_string());
                }
                output = Some(PathBuf::from(&args[i]));
            }
            "--period" | "-p" => {
                i += 1;
                if i >= args.len() {
                    return Err("--period requires a number".to_string());
                }
                period = args[i]
                    .parse::<usize>()
                    .map_err(|_| format!("invalid period: {}", args[i]))?;
                if period == 0 {
                    return Err("period must be at least 1".to_string());
                }
            }
            "--skip-header" | "-s" => {
                skip_header = true;
            }
            "--verbose" | "-v" => {
                verbose = true;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg => {
                // Positional arguments
                if input.is_none() {
                    input = Some(PathBuf::from(arg));
                } else if output.is_none() {
                    output = Some(PathBuf::from(arg));
                } else {
                    return Err(format!("Unknown argument: {}", arg));
                }
            }
        }
        i += 1;
    }

    let input = input.ok_or("Input path is required")?;
    let output = output.ok_or("Output directory is required")?;

    Ok(Args {
        input,
        output,
        period,
        skip_header,
        verbose,
    })
}

fn print_help() {
    eprintln!(
        r#"
Compute Rolling SNR and Market Divergence Index

Reads 7-field daily price CSVs (date,open,high,low,close,volume,openint),
scores each series with a rolling signal-to-noise ratio, and merges all
series into historical and recent divergence reports.

USAGE:
    compute_mdi [OPTIONS] --input <PATH> --output <DIR>
    compute_mdi <INPUT> <OUTPUT>

OPTIONS:
    -i, --input <PATH>    Input file or directory of .csv/.txt price files
    -o, --output <DIR>    Output directory for reports
    -p, --period <N>      Rolling window length (default: 97)
    -s, --skip-header     Skip one leading header row in each input file
    -v, --verbose         Show detailed progress
    -h, --help            Print this help message

OUTPUTS:
    divergence_history.csv   Full merged date range
    divergence_recent.csv    Trailing <period> data rows
    <source>_errors.csv      Rejected rows, one file per offending source
    run_summary.json         Run counters
"#
    );
}

/// Find all price files in a path (file or directory).
fn find_input_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        files.push(path.to_path_buf());
    } else if path.is_dir() {
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let path = entry.path();
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("csv") || e.eq_ignore_ascii_case("txt"))
                .unwrap_or(false);
            if path.is_file() && matches {
                files.push(path);
            }
        }
    } else {
        return Err(market_divergence::DivergenceError::generic(format!(
            "Path does not exist: {}",
            path.display()
        )));
    }

    files.sort();
    Ok(files)
}

fn run(args: &Args) -> Result<()> {
    let files = find_input_files(&args.input)?;
    if files.is_empty() {
        println!("No .csv/.txt files found in {}", args.input.display());
        return Ok(());
    }
    println!("Found {} input file(s)", files.len());

    // Open what can be opened; an unreadable file is reported and skipped.
    let mut sources = Vec::new();
    let mut open_failures = 0usize;
    for file in &files {
        match CsvSource::from_path(file) {
            Ok(source) => sources.push(source.skip_header_row(args.skip_header)),
            Err(e) => {
                eprintln!("Error opening {}: {}", file.display(), e);
                open_failures += 1;
            }
        }
    }
    if sources.is_empty() {
        return Err(market_divergence::DivergenceError::generic(
            "no input file could be opened",
        ));
    }

    let pipeline = DivergencePipeline::with_config(PipelineConfig {
        period: args.period,
    })?;

    let start = Instant::now();
    let run = pipeline.process(sources)?;
    let elapsed = start.elapsed();

    fs::create_dir_all(&args.output)?;

    let history_path = args.output.join("divergence_history.csv");
    write_history(&run.table, BufWriter::new(File::create(&history_path)?))?;

    let recent_path = args.output.join("divergence_recent.csv");
    write_recent(
        &run.table,
        args.period,
        BufWriter::new(File::create(&recent_path)?),
    )?;

    for report in &run.reports {
        let path = args.output.join(format!("{}_errors.csv", report.source));
        write_error_report(report, BufWriter::new(File::create(&path)?))?;
        if args.verbose {
            println!(
                "  wrote {} ({} rejected row(s))",
                path.display(),
                report.len()
            );
        }
    }

    let summary_path = args.output.join("run_summary.json");
    fs::write(&summary_path, serde_json::to_string_pretty(&run.stats)?)?;

    println!("\n{}", "=".repeat(60));
    println!("Divergence Report Complete");
    println!(
        "  Sources: {} ({} unreadable, {} failed mid-read)",
        run.stats.sources + open_failures,
        open_failures,
        run.stats.sources_failed
    );
    println!(
        "  Rows: {} accepted, {} rejected",
        run.stats.rows_accepted, run.stats.rows_rejected
    );
    println!(
        "  Merged: {} series, {} dates",
        run.stats.series_merged, run.stats.merged_rows
    );
    println!("  Window: {} bars", args.period);
    println!("  Elapsed: {:.2}s", elapsed.as_secs_f64());
    println!("  Reports: {}", args.output.display());

    Ok(())
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default()
            .default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp_millis()
    .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
