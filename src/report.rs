//! Plain text rendering of the KPI document for the terminal
use std::fmt::Write;

use crate::dataset::{ComprehensiveDocument, YearDataset};
use crate::kpi::MetricKind;

const BAR_WIDTH: usize = 40;

fn fmt_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Occupancy bar scaled so that 100% fills `BAR_WIDTH`
pub fn occupancy_bar(occupancy_pct: Option<f64>) -> String {
    let filled = occupancy_pct
        .map(|pct| ((pct.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize)
        .unwrap_or(0);
    format!("{}{}", "█".repeat(filled), "·".repeat(BAR_WIDTH - filled))
}

/// Annual summary table, one line per extracted year
pub fn render_summary(document: &ComprehensiveDocument) -> String {
    let mut out = String::new();

    let coverage = &document.coverage_period;
    let _ = writeln!(
        out,
        "ホテル運営実績 年次サマリー ({}〜{}, {}年分)",
        fmt_opt(coverage.start_year),
        fmt_opt(coverage.end_year),
        coverage.total_years
    );
    let _ = writeln!(
        out,
        "{:<6} {:>8} {:>8} {:>8} {:>10} {:>4}  occupancy",
        "year", "occ %", "ADR", "RevPAR", "sales", "mon"
    );

    for dataset in document.years() {
        let summary = &dataset.annual_summary;
        let _ = writeln!(
            out,
            "{:<6} {:>8} {:>8} {:>8} {:>10} {:>4}  {}",
            dataset.year,
            fmt_opt(summary.occupancy_avg_pct.map(|v| format!("{v:.1}"))),
            fmt_opt(summary.adr_avg_jpy),
            fmt_opt(summary.revpar_avg_jpy),
            fmt_opt(summary.sales_total_annual_mil_jpy),
            dataset.valid_months,
            occupancy_bar(summary.occupancy_avg_pct)
        );
    }

    if !document.metadata.failed_years.is_empty() {
        let failed: Vec<String> = document
            .metadata
            .failed_years
            .iter()
            .map(|y| y.to_string())
            .collect();
        let _ = writeln!(out, "failed: {}", failed.join(", "));
    }

    out
}

/// Month by month table for a single year
pub fn render_year(dataset: &YearDataset) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}年 ({}, sheet '{}')",
        dataset.year, dataset.era, dataset.sheet_used
    );

    let _ = write!(out, "{:<4}", "");
    for kind in MetricKind::ALL {
        let _ = write!(out, " {:>14}", kind.key());
    }
    let _ = writeln!(out);

    for (month, record) in dataset.monthly_data.iter() {
        let _ = write!(out, "{month:02}  ");
        for kind in MetricKind::ALL {
            let _ = write!(out, " {:>14}", fmt_opt(record.get(kind)));
        }
        let _ = writeln!(out);
    }

    out
}
