//! CLI entry point for the analytics engine.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use lex_analytics::{
    AnalyticsConfig, AnalyticsEngine, AnalyticsReport, ClusteringMethod, Dataset,
    GenerationMethod,
};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// CLI-compatible synthetic generation method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliGenerationMethod {
    /// Sample each column from its observed distribution
    Statistical,
    /// Mutate randomly chosen source records
    Pattern,
    /// Blend pairs of source records
    Interpolation,
    /// Statistical sampling with stronger noise
    MachineLearning,
}

impl From<CliGenerationMethod> for GenerationMethod {
    fn from(cli: CliGenerationMethod) -> Self {
        match cli {
            CliGenerationMethod::Statistical => GenerationMethod::Statistical,
            CliGenerationMethod::Pattern => GenerationMethod::Pattern,
            CliGenerationMethod::Interpolation => GenerationMethod::Interpolation,
            CliGenerationMethod::MachineLearning => GenerationMethod::MachineLearning,
        }
    }
}

/// CLI-compatible clustering method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliClusteringMethod {
    /// K-Means with K-Means++ seeding
    Kmeans,
    /// Agglomerative clustering with centroid linkage
    Hierarchical,
    /// Density-based clustering
    Dbscan,
}

impl From<CliClusteringMethod> for ClusteringMethod {
    fn from(cli: CliClusteringMethod) -> Self {
        match cli {
            CliClusteringMethod::Kmeans => ClusteringMethod::KMeans,
            CliClusteringMethod::Hierarchical => ClusteringMethod::Hierarchical,
            CliClusteringMethod::Dbscan => ClusteringMethod::Dbscan,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Tabular Analytics Engine",
    long_about = "Profiles a CSV dataset and derives quality metrics, synthetic records,\n\
                  fuzzy confidence, clusters and planning scenarios. Runs fully offline.\n\n\
                  EXAMPLES:\n  \
                  # Basic usage\n  \
                  lex-analytics -i data.csv\n\n  \
                  # Healthcare data, three hierarchical clusters, reproducible\n  \
                  lex-analytics -i patients.csv --domain healthcare --clusters 3 \\\n      \
                  --cluster-method hierarchical --seed 42\n\n  \
                  # Machine-readable output\n  \
                  lex-analytics -i data.csv --json | jq .fuzzy"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long)]
    input: String,

    /// Subject area of the dataset
    ///
    /// Known domains: demographic, healthcare, quality_of_life, educational.
    /// Any other value uses generic labels and scenarios.
    #[arg(short, long, default_value = "demographic")]
    domain: String,

    /// Number of synthetic records to generate
    #[arg(long, default_value = "100")]
    synthetic_count: usize,

    /// Synthetic generation method
    #[arg(long, value_enum, default_value = "statistical")]
    synthetic_method: CliGenerationMethod,

    /// Disable numeric noise in synthetic records
    #[arg(long)]
    no_noise: bool,

    /// Target number of clusters (ignored by DBSCAN)
    #[arg(short, long, default_value = "4")]
    clusters: usize,

    /// Clustering algorithm
    #[arg(long, value_enum, default_value = "kmeans")]
    cluster_method: CliClusteringMethod,

    /// Upper bound on K-Means iterations
    #[arg(long, default_value = "100")]
    max_iterations: usize,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Skip synthetic generation
    #[arg(long)]
    no_synthetic: bool,

    /// Skip clustering (scenarios are built without cluster input)
    #[arg(long)]
    no_clustering: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    /// Useful for piping to other tools: `... --json | jq .quality`
    #[arg(long)]
    json: bool,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write the full JSON report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    info!("Loading dataset from: {}", args.input);
    let df = load_csv_with_fallbacks(&args.input)?;
    info!("Dataset loaded successfully: {:?}", df.shape());
    let dataset = Dataset::from_dataframe(&df)?;

    let mut config_builder = AnalyticsConfig::builder()
        .domain(&args.domain)
        .synthetic_count(args.synthetic_count)
        .generation_method(args.synthetic_method.into())
        .include_noise(!args.no_noise)
        .cluster_count(args.clusters)
        .clustering_method(args.cluster_method.into())
        .max_iterations(args.max_iterations)
        .run_synthetic(!args.no_synthetic)
        .run_clustering(!args.no_clustering);

    if let Some(seed) = args.seed {
        config_builder = config_builder.seed(seed);
    }

    let config = config_builder.build()?;

    let engine = AnalyticsEngine::builder()
        .config(config)
        .on_progress(|update| {
            debug!("[{:>3.0}%] {}", update.progress * 100.0, update.message);
        })
        .build()?;

    let report = match engine.run(&dataset) {
        Ok(report) => report,
        Err(e) => {
            error!("Analysis failed: {}", e);
            return Err(anyhow!("Analysis failed: {}", e));
        }
    };

    handle_output(&report, &args)
}

/// Handle engine output based on CLI flags.
///
/// Output behavior:
/// - Default: Print human-readable summary to stdout
/// - `--json`: Print JSON to stdout only (no logs)
/// - `--output`: Also write the JSON report to a file
fn handle_output(report: &AnalyticsReport, args: &Args) -> Result<()> {
    if let Some(ref path) = args.output {
        std::fs::write(path, serde_json::to_string_pretty(report)?)?;
        info!("Report written to: {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    print_human_readable_summary(report, args);
    Ok(())
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

/// Print a human-readable summary of the analysis.
///
/// Uses `println!` intentionally: this is the primary CLI output and must be
/// visible regardless of log level settings.
fn print_human_readable_summary(report: &AnalyticsReport, args: &Args) {
    let profile = &report.profile;
    let quality = &report.quality;
    let fuzzy = &report.fuzzy;

    println!();
    println!("{}", "=".repeat(80));
    println!("ANALYSIS COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        args.input, profile.row_count, profile.column_count
    );
    println!("Domain: {}", report.domain.display_name());
    println!("Duration: {}ms", report.duration_ms);
    println!();

    println!("COLUMN PROFILES");
    println!("{}", "-".repeat(40));
    println!(
        "{:<20} {:<10} {:<10} {:<10} {:<12}",
        "Column", "Type", "Missing %", "Unique", "Mean"
    );
    println!("{}", "-".repeat(66));
    for col in &profile.column_profiles {
        let mean = col
            .statistics
            .map(|s| format!("{:.2}", s.mean))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<20} {:<10} {:<10.1} {:<10} {:<12}",
            truncate_str(&col.name, 19),
            col.dominant_type,
            col.missing_percentage,
            col.unique_count,
            mean
        );
    }
    println!();

    println!("DATA QUALITY");
    println!("{}", "-".repeat(40));
    println!("  Completeness: {:.2}%", quality.completeness);
    println!("  Accuracy:     {:.2}%", quality.accuracy);
    println!(
        "  Missing: {}  Outliers: {}  Duplicates: {} ({:.1}%)",
        quality.missing_values, quality.outliers, quality.duplicates, quality.duplicate_percentage
    );
    println!();

    println!("FUZZY CONFIDENCE");
    println!("{}", "-".repeat(40));
    println!(
        "  Low: {}%  Medium: {}%  High: {}%",
        fuzzy.low, fuzzy.medium, fuzzy.high
    );
    println!("  {}", fuzzy.analysis);
    for recommendation in &fuzzy.recommendations {
        println!(
            "  - [{}] {}",
            recommendation.priority.display_name(),
            recommendation.action
        );
    }
    println!();

    if let Some(ref synthetic) = report.synthetic {
        println!("Synthetic records: {}", synthetic.len());
        println!();
    }

    if let Some(ref clusters) = report.clusters {
        println!("CLUSTERS");
        println!("{}", "-".repeat(40));
        if clusters.is_empty() {
            println!("  No clusters found");
        }
        for cluster in clusters {
            println!(
                "  {:<28} size {:<6} quality {:<5} avg {}",
                truncate_str(&cluster.label, 27),
                cluster.size,
                cluster.quality,
                cluster.avg_value
            );
        }
        println!();
    }

    println!("SCENARIOS");
    println!("{}", "-".repeat(40));
    for (i, scenario) in report.scenarios.iter().enumerate() {
        let marker = if scenario.adaptive { " (adaptive)" } else { "" };
        println!(
            "  {}. {}{} - {}, {}",
            i + 1,
            scenario.title,
            marker,
            scenario.priority_text,
            scenario.timeframe_text
        );
    }
    println!();

    if !report.fallbacks.is_empty() {
        println!("Warnings:");
        for fallback in &report.fallbacks {
            println!(
                "  ! {} used a fallback: {}",
                fallback.stage.display_name(),
                fallback.message
            );
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use -o <file> to save the full JSON report");
    println!("{}", "=".repeat(80));
}

/// Load CSV with multiple fallback strategies
fn load_csv_with_fallbacks(path: &str) -> Result<DataFrame> {
    // Strategy 1: Standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    // Strategy 2: Without quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => Ok(df),
        Err(e) => {
            error!("Could not parse CSV: {}", e);
            Err(e.into())
        }
    }
}
