// KPI extraction engine
//
// Turns one worksheet grid of a yearly hotel performance report into twelve
// monthly metric records. The report layout changed several times over the
// years, so extraction is split per era:
// - Legacy (2015-2018): one aggregated table, mixed percent/fraction occupancy
// - PerProperty (2019-2023): repeated per-hotel blocks that must be aggregated
// - PreAggregated (2024+): portfolio totals, one row per metric

pub mod annual;
pub mod era;
pub mod grid;
pub mod label;
pub mod legacy;
pub mod metric;
pub mod normalize;
pub mod per_property;
pub mod period;
pub mod pre_aggregated;
pub mod sheet_selector;

pub use annual::{summarize, AnnualSummary};
pub use era::Era;
pub use grid::{Cell, Grid, InMemoryWorkbook, WorkbookSource};
pub use label::{classify_label, is_property_marker};
pub use metric::{MetricKind, MonthlyData, MonthlyRecord};
pub use normalize::ExtractionThresholds;
pub use period::matches_year;
pub use sheet_selector::select_sheet;
