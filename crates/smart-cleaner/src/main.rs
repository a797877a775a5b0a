//! CLI entry point for the smart data cleaner.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use smart_cleaner::logging::init_logging;
use smart_cleaner::utils::is_usable_table;
use smart_cleaner::visualizer::text;
use smart_cleaner::{
    Chart, CleanerConfig, CleanerError, DataCleaner, MissingStrategy, SummaryReport, Visualizer,
    VisualizerConfig, io,
};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Inspect and clean a CSV dataset",
    long_about = "Loads a CSV file, prints a data-quality report, applies the selected \
                  cleaning steps and prints the report again.\n\n\
                  Steps run in this order: convert types, remove duplicates, \
                  handle missing values, handle outliers.\n\n\
                  EXAMPLES:\n  \
                  # Report only\n  \
                  smart-cleaner -i data.csv\n\n  \
                  # Dedupe, fill with medians, cap outliers, save\n  \
                  smart-cleaner -i data.csv --remove-duplicates --missing median --outliers -o clean.csv\n\n  \
                  # Charts before and after for one column\n  \
                  smart-cleaner -i data.csv --outliers --plot price --heatmap"
)]
struct Args {
    /// Path to the CSV file to inspect
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the cleaned CSV
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Convert text columns to their best-fitting type
    #[arg(long)]
    convert_types: bool,

    /// Remove rows that repeat an earlier row
    #[arg(long)]
    remove_duplicates: bool,

    /// Missing-value strategy: drop, mean, median or mode
    #[arg(long)]
    missing: Option<String>,

    /// Columns for the missing-value strategy (comma separated, default: all)
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Cap outliers with the IQR rule
    #[arg(long)]
    outliers: bool,

    /// Columns to cap (comma separated, default: all numeric)
    #[arg(long, value_delimiter = ',')]
    outlier_columns: Vec<String>,

    /// IQR multiplier for the outlier fences
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Column to chart before and after cleaning (repeatable)
    #[arg(long)]
    plot: Vec<String>,

    /// Chart missing values before and after cleaning
    #[arg(long)]
    heatmap: bool,

    /// Categories shown by count plots before grouping into "Other"
    #[arg(long, default_value = "20")]
    top_n: usize,

    /// Width of text charts
    #[arg(long, default_value = "40")]
    chart_width: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Print reports and charts as JSON on stdout
    ///
    /// Disables all logs so stdout carries only JSON.
    #[arg(long)]
    json: bool,
}

/// Everything printed in `--json` mode.
#[derive(Serialize)]
struct RunOutput {
    before: SummaryReport,
    after: Option<SummaryReport>,
    steps: Vec<String>,
    charts_before: Vec<Chart>,
    charts_after: Vec<Chart>,
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    match run(&args) {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<CleanerError>() {
            Some(cleaner_err) => {
                if args.json {
                    println!("{}", serde_json::to_string_pretty(cleaner_err)?);
                } else {
                    eprintln!("Error [{}]: {}", cleaner_err.error_code(), cleaner_err);
                }
                std::process::exit(1);
            }
            None => Err(err),
        },
    }
}

fn run(args: &Args) -> Result<()> {
    let cleaner = DataCleaner::with_config(
        CleanerConfig::builder()
            .iqr_multiplier(args.iqr_multiplier)
            .build()?,
    );
    let visualizer = Visualizer::with_config(VisualizerConfig::builder().top_n(args.top_n).build()?);
    let strategy = args
        .missing
        .as_deref()
        .map(str::parse::<MissingStrategy>)
        .transpose()?;

    let original = io::read_csv(&args.input)?;
    let before = cleaner.get_summary(&original)?;
    let charts_before = charts(&visualizer, &original, args);

    let mut df = original.clone();
    let mut steps = Vec::new();

    if args.convert_types {
        df = cleaner.convert_data_types(&df)?;
        steps.push("convert types".to_string());
    }
    if args.remove_duplicates {
        df = cleaner.remove_duplicates(&df)?;
        steps.push("remove duplicates".to_string());
    }
    if let Some(strategy) = strategy {
        let columns: Vec<&str> = args.columns.iter().map(String::as_str).collect();
        let targets = (!columns.is_empty()).then_some(columns.as_slice());
        df = cleaner.handle_missing_values(&df, strategy, targets)?;
        steps.push(format!("handle missing values ({})", strategy));
    }
    if args.outliers {
        let columns: Vec<&str> = args.outlier_columns.iter().map(String::as_str).collect();
        let targets = (!columns.is_empty()).then_some(columns.as_slice());
        df = cleaner.handle_outliers(&df, targets)?;
        steps.push("handle outliers".to_string());
    }

    let after = if is_usable_table(Some(&df)) {
        Some(cleaner.get_summary(&df)?)
    } else {
        warn!("Cleaning left no rows; nothing to report");
        None
    };
    let charts_after = charts(&visualizer, &df, args);

    if let Some(path) = &args.output {
        let bytes = io::write_csv(&df)?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Cleaned dataset saved: {}", path.display());
    }

    if args.json {
        let output = RunOutput {
            before,
            after,
            steps,
            charts_before,
            charts_after,
            output: args.output.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_report("BEFORE CLEANING", &before);
    print_charts(&charts_before, args.chart_width);
    if steps.is_empty() {
        println!("No cleaning steps selected.");
    } else {
        println!("Applied: {}", steps.join(" -> "));
        println!();
        match &after {
            Some(after) => print_report("AFTER CLEANING", after),
            None => println!("The cleaned table has no rows."),
        }
        print_charts(&charts_after, args.chart_width);
    }
    Ok(())
}

/// Charts requested on the command line; a numeric column gets a
/// distribution and a box plot, any other column a count plot.
fn charts(visualizer: &Visualizer, df: &polars::prelude::DataFrame, args: &Args) -> Vec<Chart> {
    let mut out = Vec::new();
    if args.heatmap {
        out.extend(visualizer.missing_value_heatmap(df));
    }
    for column in &args.plot {
        let numeric: Vec<Chart> = [
            visualizer.distribution_plot(df, column),
            visualizer.box_plot(df, column),
        ]
        .into_iter()
        .flatten()
        .collect();

        if numeric.is_empty() {
            out.extend(visualizer.count_plot(df, column));
        } else {
            out.extend(numeric);
        }
    }
    out
}

/// Print a report for humans.
///
/// Uses `println!` intentionally: this is the primary output of the CLI and
/// must be visible regardless of log level.
fn print_report(heading: &str, report: &SummaryReport) {
    println!("{}", "=".repeat(80));
    println!("{heading}");
    println!("{}", "=".repeat(80));
    println!("{}", report.info);

    if !report.description.is_empty() {
        println!("NUMERIC STATISTICS");
        println!("{}", "-".repeat(40));
        println!(
            "{:<20} {:>7} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "Column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        );
        let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));
        for desc in &report.description {
            println!(
                "{:<20} {:>7} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
                truncate_str(&desc.column, 19),
                desc.count,
                fmt(desc.mean),
                fmt(desc.std),
                fmt(desc.min),
                fmt(desc.q25),
                fmt(desc.median),
                fmt(desc.q75),
                fmt(desc.max)
            );
        }
        println!();
    }

    println!("MISSING VALUES");
    println!("{}", "-".repeat(40));
    for entry in &report.missing_values {
        println!("  {:<20} {}", truncate_str(&entry.column, 19), entry.count);
    }
    println!();
    println!("Duplicate rows: {}", report.duplicate_count);
    println!(
        "Shape: {} rows x {} columns (computed {})",
        report.shape.0,
        report.shape.1,
        report.computed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();
}

fn print_charts(charts: &[Chart], width: usize) {
    for chart in charts {
        println!("{}", text::render(chart, width));
    }
}

fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
