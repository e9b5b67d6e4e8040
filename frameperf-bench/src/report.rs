//! Pretty-print benchmark results as a table, with CSV and JSON export.

use crate::record::ResultRow;
use crate::{BenchResult, BenchSuite};
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use std::path::Path;

// ────────────────────────────────────────────────────────────────────────────────
// Terminal output
// ────────────────────────────────────────────────────────────────────────────────

/// Build the results table. The fastest average is starred and highlighted.
pub fn results_table(results: &[ResultRow]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS);

    table.set_header(vec![
        "Operation",
        "Family",
        "Trials",
        "Total",
        "Average",
    ]);

    let best_avg = results
        .iter()
        .map(|r| r.avg_time_taken)
        .fold(f64::INFINITY, f64::min);

    for r in results {
        let is_best = r.avg_time_taken == best_avg && results.len() > 1;
        let name = if is_best {
            format!("★ {}", r.operation_performed)
        } else {
            r.operation_performed.clone()
        };

        let (name_cell, avg_cell) = if is_best {
            (
                Cell::new(name).fg(Color::Green),
                Cell::new(format_secs(r.avg_time_taken)).fg(Color::Green),
            )
        } else {
            (Cell::new(name), Cell::new(format_secs(r.avg_time_taken)))
        };

        table.add_row(vec![
            name_cell,
            Cell::new(r.family.as_str()),
            Cell::new(r.trials_run),
            Cell::new(format_secs(r.time_taken)),
            avg_cell,
        ]);
    }

    table
}

/// Print the full benchmark suite report.
pub fn print_suite(suite: &BenchSuite) {
    println!(
        "\n{}",
        "━━━ Dataframe Operation Benchmark ━━━".bold().cyan()
    );
    println!(
        "  OS: {}  Arch: {}  CPUs: {}  Time: {}  Rows: {}",
        suite.system_info.os,
        suite.system_info.arch,
        suite.system_info.cpus,
        suite.system_info.timestamp,
        suite.dataset_rows
    );

    if suite.results.is_empty() {
        println!("  {}", "no results".dimmed());
        return;
    }

    println!("{}", results_table(&suite.results));
}

// ────────────────────────────────────────────────────────────────────────────────
// CSV export
// ────────────────────────────────────────────────────────────────────────────────

pub fn export_csv(suite: &BenchSuite, path: &Path) -> BenchResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(ResultRow::HEADERS)?;

    for r in &suite.results {
        let trials = r.trials_run.to_string();
        let total = format!("{:.9}", r.time_taken);
        let avg = format!("{:.9}", r.avg_time_taken);
        wtr.write_record([
            r.operation_performed.as_str(),
            r.family.as_str(),
            trials.as_str(),
            total.as_str(),
            avg.as_str(),
        ])?;
    }

    wtr.flush()?;
    tracing::info!(path = %path.display(), "exported CSV results");
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────────
// JSON export
// ────────────────────────────────────────────────────────────────────────────────

pub fn export_json(suite: &BenchSuite, path: &Path) -> BenchResult<()> {
    let json = serde_json::to_string_pretty(suite)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "exported JSON results");
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────────
// Formatting helpers
// ────────────────────────────────────────────────────────────────────────────────

fn format_secs(secs: f64) -> String {
    if secs >= 1.0 {
        format!("{:.3} s", secs)
    } else if secs >= 1e-3 {
        format!("{:.3} ms", secs * 1e3)
    } else if secs >= 1e-6 {
        format!("{:.3} µs", secs * 1e6)
    } else {
        format!("{:.0} ns", secs * 1e9)
    }
}
