/// Legacy report layout (2015-2018)
///
/// # Expected Sheet Structure:
/// ```text
/// Col A        | Col B    | Col C..N
/// 客室稼働率    | 2016年   | Jan .. Dec  (percent or fraction, mixed across sheets)
/// ADR（円）     | 平成28年 | Jan .. Dec
/// ```
/// The year label may sit in any of the first few columns and may use the
/// Heisei calendar.
use tracing::debug;

use super::era::month_cells;
use super::grid::Grid;
use super::label::classify_row;
use super::metric::MonthlyData;
use super::normalize::ExtractionThresholds;
use super::period::row_matches_year;

/// Columns searched for the year label
const YEAR_CANDIDATE_COLUMNS: std::ops::Range<usize> = 0..5;

pub fn extract(grid: &Grid, year: i32, thresholds: &ExtractionThresholds) -> MonthlyData {
    let mut data = MonthlyData::new();

    for (row_idx, row) in grid.rows().enumerate() {
        let Some(kind) = classify_row(row) else {
            continue;
        };

        if !row_matches_year(row, YEAR_CANDIDATE_COLUMNS, year) {
            continue;
        }

        debug!("{}年 {} row found at index {}", year, kind.key(), row_idx);

        for (month, cell) in month_cells(row) {
            let Some(raw) = cell.as_number() else {
                continue;
            };
            match thresholds.normalize(kind, raw) {
                Some(value) => data.month_mut(month).set(kind, value),
                None => debug!(
                    "Rejected {} value {} for month {} at row {}",
                    kind.key(),
                    raw,
                    month,
                    row_idx
                ),
            }
        }
    }

    data
}
