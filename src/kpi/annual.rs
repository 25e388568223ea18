use serde::{Deserialize, Serialize};

use super::metric::{MonthlyData, MonthlyRecord};
use crate::utils::{mean, round_to};

/// Annual figures derived from the monthly records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnualSummary {
    pub occupancy_avg_pct: Option<f64>,
    pub adr_avg_jpy: Option<i64>,
    pub revpar_avg_jpy: Option<i64>,
    pub sales_total_annual_mil_jpy: Option<i64>,
}

/// Reduce twelve monthly records to an annual summary
///
/// Only months with an occupancy value count. Within those, each metric is
/// averaged (or summed, for sales) over the months where it is present, so a
/// month with ADR but no occupancy is ignored entirely.
pub fn summarize(data: &MonthlyData) -> AnnualSummary {
    let live: Vec<&MonthlyRecord> = data
        .records()
        .iter()
        .filter(|m| m.occupancy_pct.is_some())
        .collect();

    if live.is_empty() {
        return AnnualSummary::default();
    }

    let occupancies: Vec<f64> = live.iter().filter_map(|m| m.occupancy_pct).collect();
    let adrs: Vec<f64> = live
        .iter()
        .filter_map(|m| m.adr_jpy.map(|v| v as f64))
        .collect();
    let revpars: Vec<f64> = live
        .iter()
        .filter_map(|m| m.revpar_jpy.map(|v| v as f64))
        .collect();
    let sales: Vec<i64> = live.iter().filter_map(|m| m.sales_total_mil_jpy).collect();

    AnnualSummary {
        occupancy_avg_pct: mean(&occupancies).map(|v| round_to(v, 1)),
        adr_avg_jpy: mean(&adrs).map(|v| v.round() as i64),
        revpar_avg_jpy: mean(&revpars).map(|v| v.round() as i64),
        sales_total_annual_mil_jpy: (!sales.is_empty()).then(|| sales.iter().sum()),
    }
}
