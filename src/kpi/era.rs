use serde::{Deserialize, Serialize};
use std::fmt;

use super::grid::{Cell, Grid};
use super::metric::MonthlyData;
use super::normalize::ExtractionThresholds;
use super::{legacy, per_property, pre_aggregated};

/// Column of January's value; the other months follow it
pub(crate) const FIRST_MONTH_COLUMN: usize = 2;

/// Column holding the year label in per-property and pre-aggregated sheets
pub(crate) const YEAR_COLUMN: usize = 1;

/// Report layout generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Era {
    /// 2015-2018: one aggregated table per sheet
    Legacy,
    /// 2019-2023: per-hotel blocks averaged/summed across properties
    PerProperty,
    /// 2024 onwards: portfolio totals, one row per metric
    PreAggregated,
}

impl Era {
    pub fn for_year(year: i32) -> Self {
        match year {
            y if y >= 2024 => Era::PreAggregated,
            2019..=2023 => Era::PerProperty,
            _ => Era::Legacy,
        }
    }

    /// Extract one year's monthly data from the selected sheet
    pub fn extract(self, grid: &Grid, year: i32, thresholds: &ExtractionThresholds) -> MonthlyData {
        match self {
            Era::Legacy => legacy::extract(grid, year, thresholds),
            Era::PerProperty => per_property::extract(grid, year, thresholds),
            Era::PreAggregated => pre_aggregated::extract(grid, year, thresholds),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Era::Legacy => "2015-2018年: HMJグループホテル等（旧形式）",
            Era::PerProperty => "2019-2023年: 個別ホテルデータを集計",
            Era::PreAggregated => "2024年以降: 変動賃料等導入28ホテル集計",
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Era::Legacy => "legacy",
            Era::PerProperty => "per_property",
            Era::PreAggregated => "pre_aggregated",
        };
        f.write_str(name)
    }
}

/// (month, cell) pairs for the twelve value columns of a row
pub(crate) fn month_cells(row: &[Cell]) -> impl Iterator<Item = (u32, &Cell)> {
    (1..=12u32).filter_map(move |month| {
        row.get(FIRST_MONTH_COLUMN + month as usize - 1)
            .map(|cell| (month, cell))
    })
}
