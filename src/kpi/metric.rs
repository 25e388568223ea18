use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::month_key;

/// The seven KPIs tracked per month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    OccupancyPct,
    AdrJpy,
    RevparJpy,
    #[serde(rename = "sales_total_mil_jpy")]
    SalesTotalMil,
    #[serde(rename = "sales_lodging_mil_jpy")]
    SalesLodgingMil,
    #[serde(rename = "sales_fnb_mil_jpy")]
    SalesFnbMil,
    #[serde(rename = "sales_other_mil_jpy")]
    SalesOtherMil,
}

impl MetricKind {
    pub const ALL: [MetricKind; 7] = [
        MetricKind::OccupancyPct,
        MetricKind::AdrJpy,
        MetricKind::RevparJpy,
        MetricKind::SalesTotalMil,
        MetricKind::SalesLodgingMil,
        MetricKind::SalesFnbMil,
        MetricKind::SalesOtherMil,
    ];

    /// Key used in the output document
    pub fn key(self) -> &'static str {
        match self {
            MetricKind::OccupancyPct => "occupancy_pct",
            MetricKind::AdrJpy => "adr_jpy",
            MetricKind::RevparJpy => "revpar_jpy",
            MetricKind::SalesTotalMil => "sales_total_mil_jpy",
            MetricKind::SalesLodgingMil => "sales_lodging_mil_jpy",
            MetricKind::SalesFnbMil => "sales_fnb_mil_jpy",
            MetricKind::SalesOtherMil => "sales_other_mil_jpy",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MetricKind::OccupancyPct => "客室稼働率（%）",
            MetricKind::AdrJpy => "ADR - Average Daily Rate（円）",
            MetricKind::RevparJpy => "RevPAR - Revenue Per Available Room（円）",
            MetricKind::SalesTotalMil => "売上高合計（百万円）",
            MetricKind::SalesLodgingMil => "宿泊部門売上高（百万円）",
            MetricKind::SalesFnbMil => "料飲部門売上高（百万円）",
            MetricKind::SalesOtherMil => "その他売上高（百万円）",
        }
    }

    /// Average daily rate and RevPAR share the same plausibility range
    pub fn is_rate(self) -> bool {
        matches!(self, MetricKind::AdrJpy | MetricKind::RevparJpy)
    }

    pub fn is_sales(self) -> bool {
        matches!(
            self,
            MetricKind::SalesTotalMil
                | MetricKind::SalesLodgingMil
                | MetricKind::SalesFnbMil
                | MetricKind::SalesOtherMil
        )
    }
}

/// KPI values for one month. Missing data is `None`, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    pub occupancy_pct: Option<f64>,
    pub adr_jpy: Option<i64>,
    pub revpar_jpy: Option<i64>,
    pub sales_total_mil_jpy: Option<i64>,
    pub sales_lodging_mil_jpy: Option<i64>,
    pub sales_fnb_mil_jpy: Option<i64>,
    pub sales_other_mil_jpy: Option<i64>,
}

impl MonthlyRecord {
    /// Value of a metric as f64
    pub fn get(&self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::OccupancyPct => self.occupancy_pct,
            MetricKind::AdrJpy => self.adr_jpy.map(|v| v as f64),
            MetricKind::RevparJpy => self.revpar_jpy.map(|v| v as f64),
            MetricKind::SalesTotalMil => self.sales_total_mil_jpy.map(|v| v as f64),
            MetricKind::SalesLodgingMil => self.sales_lodging_mil_jpy.map(|v| v as f64),
            MetricKind::SalesFnbMil => self.sales_fnb_mil_jpy.map(|v| v as f64),
            MetricKind::SalesOtherMil => self.sales_other_mil_jpy.map(|v| v as f64),
        }
    }

    /// Store an already normalized value. Yen and million-yen metrics are
    /// truncated to integers.
    pub fn set(&mut self, kind: MetricKind, value: f64) {
        match kind {
            MetricKind::OccupancyPct => self.occupancy_pct = Some(value),
            MetricKind::AdrJpy => self.adr_jpy = Some(value as i64),
            MetricKind::RevparJpy => self.revpar_jpy = Some(value as i64),
            MetricKind::SalesTotalMil => self.sales_total_mil_jpy = Some(value as i64),
            MetricKind::SalesLodgingMil => self.sales_lodging_mil_jpy = Some(value as i64),
            MetricKind::SalesFnbMil => self.sales_fnb_mil_jpy = Some(value as i64),
            MetricKind::SalesOtherMil => self.sales_other_mil_jpy = Some(value as i64),
        }
    }
}

/// Twelve monthly records, serialized as a map keyed "01".."12"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, MonthlyRecord>",
    into = "BTreeMap<String, MonthlyRecord>"
)]
pub struct MonthlyData {
    months: [MonthlyRecord; 12],
}

impl MonthlyData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for a 1-based month
    ///
    /// # Panics
    /// Panics if `month` is not in 1..=12.
    pub fn month(&self, month: u32) -> &MonthlyRecord {
        &self.months[month as usize - 1]
    }

    pub fn month_mut(&mut self, month: u32) -> &mut MonthlyRecord {
        &mut self.months[month as usize - 1]
    }

    /// (month, record) pairs in calendar order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &MonthlyRecord)> {
        self.months
            .iter()
            .enumerate()
            .map(|(idx, record)| (idx as u32 + 1, record))
    }

    pub fn records(&self) -> &[MonthlyRecord; 12] {
        &self.months
    }

    /// Months with an occupancy value; occupancy is the liveness signal of a month
    pub fn valid_months(&self) -> usize {
        self.months
            .iter()
            .filter(|m| m.occupancy_pct.is_some())
            .count()
    }

    /// Monthly series of one metric in calendar order
    pub fn series(&self, kind: MetricKind) -> [Option<f64>; 12] {
        let mut series = [None; 12];
        for (slot, record) in series.iter_mut().zip(self.months.iter()) {
            *slot = record.get(kind);
        }
        series
    }
}

impl From<MonthlyData> for BTreeMap<String, MonthlyRecord> {
    fn from(data: MonthlyData) -> Self {
        data.months
            .into_iter()
            .enumerate()
            .map(|(idx, record)| (month_key(idx as u32 + 1), record))
            .collect()
    }
}

impl TryFrom<BTreeMap<String, MonthlyRecord>> for MonthlyData {
    type Error = String;

    fn try_from(map: BTreeMap<String, MonthlyRecord>) -> Result<Self, Self::Error> {
        let mut data = MonthlyData::new();
        for (key, record) in map {
            let month = key
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|m| (1..=12).contains(m))
                .ok_or_else(|| format!("invalid month key: {key}"))?;
            *data.month_mut(month) = record;
        }
        Ok(data)
    }
}
