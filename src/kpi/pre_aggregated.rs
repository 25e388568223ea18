/// Pre-aggregated report layout (2024 onwards)
///
/// The sheet already carries portfolio totals for the variable-rent hotels:
/// one labeled row per metric and year, January in the third column.
use tracing::debug;

use super::era::{month_cells, YEAR_COLUMN};
use super::grid::Grid;
use super::label::classify_row;
use super::metric::MonthlyData;
use super::normalize::ExtractionThresholds;
use super::period::row_matches_year;

pub fn extract(grid: &Grid, year: i32, thresholds: &ExtractionThresholds) -> MonthlyData {
    let mut data = MonthlyData::new();

    for (row_idx, row) in grid.rows().enumerate() {
        let Some(kind) = classify_row(row) else {
            continue;
        };

        if !row_matches_year(row, YEAR_COLUMN..YEAR_COLUMN + 1, year) {
            continue;
        }

        debug!("{}年 {} row found at index {}", year, kind.key(), row_idx);

        for (month, cell) in month_cells(row) {
            if let Some(value) = cell
                .as_number()
                .and_then(|raw| thresholds.normalize(kind, raw))
            {
                data.month_mut(month).set(kind, value);
            }
        }
    }

    data
}
