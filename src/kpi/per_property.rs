/// Per-property report layout (2019-2023)
///
/// # Expected Sheet Structure:
/// ```text
/// 物件番号 | 1
/// 客室稼働率 | 2019年 | Jan .. Dec   (fraction of one)
///            | 2018年 | Jan .. Dec   (label carried over from the row above)
/// ADR（円）  | 2019年 | Jan .. Dec
/// ...
/// 物件番号 | 2
/// ...
/// ```
/// Portfolio figures are not published for these years, so occupancy, ADR and
/// RevPAR are averaged across hotels and sales are summed.
use tracing::{debug, info};

use super::era::{month_cells, YEAR_COLUMN};
use super::grid::{Cell, Grid};
use super::label::{classify_row, is_property_marker};
use super::metric::{MetricKind, MonthlyData};
use super::normalize::ExtractionThresholds;
use super::period::row_matches_year;
use crate::utils::round_to;

/// Running sum and contribution count for one metric in one month
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: u32,
}

impl Accumulator {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    fn total(&self) -> Option<f64> {
        (self.count > 0).then_some(self.sum)
    }
}

/// Accumulators for every month and metric
#[derive(Debug, Default)]
struct MonthlyAccumulators {
    cells: [[Accumulator; 7]; 12],
}

impl MonthlyAccumulators {
    fn slot(&mut self, month: u32, kind: MetricKind) -> &mut Accumulator {
        &mut self.cells[month as usize - 1][metric_index(kind)]
    }

    fn into_monthly_data(self) -> MonthlyData {
        let mut data = MonthlyData::new();
        for (month_idx, metrics) in self.cells.iter().enumerate() {
            let record = data.month_mut(month_idx as u32 + 1);
            for kind in MetricKind::ALL {
                let acc = metrics[metric_index(kind)];
                let value = match kind {
                    MetricKind::OccupancyPct => acc.mean().map(|v| round_to(v, 1)),
                    k if k.is_rate() => acc.mean(),
                    _ => acc.total(),
                };
                if let Some(value) = value {
                    record.set(kind, value);
                }
            }
        }
        data
    }
}

fn metric_index(kind: MetricKind) -> usize {
    kind as usize
}

/// Label and property position while walking the rows
#[derive(Debug, Default)]
struct ScanState {
    current_kind: Option<MetricKind>,
    property_count: usize,
}

pub fn extract(grid: &Grid, year: i32, thresholds: &ExtractionThresholds) -> MonthlyData {
    let mut acc = MonthlyAccumulators::default();
    let mut state = ScanState::default();

    for (row_idx, row) in grid.rows().enumerate() {
        if is_property_marker(row) {
            state.property_count += 1;
            state.current_kind = None;
            continue;
        }

        // Only rows with an empty label cell inherit the label above them
        match classify_row(row) {
            Some(kind) => state.current_kind = Some(kind),
            None if !row.first().map_or(true, Cell::is_empty) => {
                state.current_kind = None;
                continue;
            }
            None => {}
        }

        let Some(kind) = state.current_kind else {
            continue;
        };

        if !row_matches_year(row, YEAR_COLUMN..YEAR_COLUMN + 1, year) {
            continue;
        }

        debug!(
            "Property {}: {}年 {} row at index {}",
            state.property_count,
            year,
            kind.key(),
            row_idx
        );

        for (month, cell) in month_cells(row) {
            let Some(raw) = cell.as_number() else {
                continue;
            };
            let contribution = match kind {
                MetricKind::OccupancyPct => thresholds
                    .occupancy_fraction(raw)
                    .map(|fraction| fraction * 100.0),
                _ => thresholds.normalize(kind, raw),
            };
            if let Some(value) = contribution {
                acc.slot(month, kind).add(value);
            }
        }
    }

    info!("{}年: aggregated {} properties", year, state.property_count);
    acc.into_monthly_data()
}
