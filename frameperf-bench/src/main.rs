//! Dataframe operation benchmark runner
//!
//! Usage:
//!   frameperf                                  # all built-in operations, defaults
//!   frameperf --trials 50 --rows 100000        # bigger run
//!   frameperf --op lazy.collect --op rows.identity
//!   frameperf --config bench.toml --export out # TOML config, CSV + JSON export
//!   frameperf --list                           # show registered operations

use clap::Parser;
use colored::Colorize;
use frameperf_bench::config::BenchConfig;
use frameperf_bench::report;
use frameperf_bench::{
    BenchResult, BenchSuite, DataGen, OperationRegistry, PerfTester, ResultRecord, SystemInfo,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "frameperf", about = "Trial-based dataframe operation benchmarks")]
struct Cli {
    /// TOML configuration file. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Trials per operation.
    #[arg(long)]
    trials: Option<u32>,

    /// Rows in the generated base dataset.
    #[arg(long)]
    rows: Option<usize>,

    /// Seed for the dataset generator.
    #[arg(long)]
    seed: Option<u64>,

    /// Operation to benchmark (repeatable, run in the given order).
    #[arg(long = "op")]
    operations: Vec<String>,

    /// Export directory for CSV + JSON results.
    #[arg(long)]
    export: Option<PathBuf>,

    /// List registered operations and exit.
    #[arg(long)]
    list: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    debug: bool,
}

impl Cli {
    fn into_config(self) -> BenchResult<BenchConfig> {
        let mut cfg = match &self.config {
            Some(path) => BenchConfig::load_toml(path)?,
            None => BenchConfig::default(),
        };
        if let Some(trials) = self.trials {
            cfg.trials = trials;
        }
        if let Some(rows) = self.rows {
            cfg.rows = rows;
        }
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        if !self.operations.is_empty() {
            cfg.operations = self.operations;
        }
        if self.export.is_some() {
            cfg.export = self.export;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> BenchResult<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let registry = OperationRegistry::with_builtins();

    if cli.list {
        for name in registry.names() {
            let family = registry.resolve(name)?.family();
            println!("  {:<20} {}", name, family.as_str().dimmed());
        }
        return Ok(());
    }

    let cfg = cli.into_config()?;
    let operations = registry.resolve_all(&cfg.operations)?;

    println!(
        "  Trials: {}  Rows: {}  Seed: {}  Operations: {}",
        cfg.trials,
        cfg.rows,
        cfg.seed,
        cfg.operations.join(", ")
    );

    let base_df = DataGen::new(cfg.seed).sample_frame(cfg.rows)?;
    let tester = PerfTester::new(base_df, cfg.trials)?;

    println!("\n{}", "▶ Running trials".bold().green());
    let results = tester.test(&operations)?;

    let suite = BenchSuite {
        system_info: SystemInfo::collect(),
        dataset_rows: cfg.rows,
        results: results.iter().map(ResultRecord::as_row).collect(),
    };

    report::print_suite(&suite);

    if let Some(dir) = &cfg.export {
        std::fs::create_dir_all(dir)?;
        let csv_path = dir.join("benchmark_results.csv");
        let json_path = dir.join("benchmark_results.json");
        report::export_csv(&suite, &csv_path)?;
        report::export_json(&suite, &json_path)?;
        println!("  Exported {} and {}", csv_path.display(), json_path.display());
    }

    Ok(())
}
