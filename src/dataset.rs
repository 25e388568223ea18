//! Output document model
//!
//! These types are what gets written to disk and read back by the summary
//! renderer. Every month carries all seven metric keys, with `null` for missing
//! data.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::kpi::{AnnualSummary, Era, MonthlyData};

pub const SCHEMA_VERSION: &str = "4.0";

pub const GEOGRAPHICAL_REGIONS: [&str; 8] = [
    "北海道",
    "東京",
    "関東（東京除く）",
    "大阪",
    "関西（大阪除く）",
    "中国",
    "九州",
    "沖縄",
];

/// Context tags attached to years with unusual demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialNote {
    #[serde(rename = "ラグビーワールドカップ開催")]
    RugbyWorldCup,
    #[serde(rename = "COVID-19パンデミック影響期")]
    Pandemic,
    #[serde(rename = "インバウンド需要回復期")]
    InboundRecovery,
}

impl SpecialNote {
    pub fn for_year(year: i32) -> Vec<SpecialNote> {
        match year {
            2019 => vec![SpecialNote::RugbyWorldCup],
            2020..=2022 => vec![SpecialNote::Pandemic],
            y if y >= 2023 => vec![SpecialNote::InboundRecovery],
            _ => Vec::new(),
        }
    }
}

/// One successfully extracted fiscal year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearDataset {
    pub year: i32,
    pub portfolio_type: String,
    pub excel_source: String,
    pub sheet_used: String,
    pub era: Era,
    pub extraction_date: NaiveDate,
    pub valid_months: usize,
    pub monthly_data: MonthlyData,
    pub annual_summary: AnnualSummary,
    #[serde(default)]
    pub special_notes: Vec<SpecialNote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub primary_url: String,
    pub ir_library_url: String,
    pub last_updated: NaiveDate,
}

/// Years present in the document; bounds are null when nothing was extracted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoveragePeriod {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub total_years: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataDefinitions {
    pub metrics: BTreeMap<String, String>,
    pub geographical_regions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub created_date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub extraction_success_rate: String,
    pub total_expected_records: usize,
    pub total_valid_months: usize,
    pub failed_years: Vec<i32>,
}

/// The normalized multi-year KPI document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComprehensiveDocument {
    pub schema_version: String,
    pub description: String,
    pub source: SourceInfo,
    pub extraction_method: BTreeMap<String, String>,
    pub coverage_period: CoveragePeriod,
    pub data_definitions: DataDefinitions,
    /// Keyed by year ("2015", "2016", ...)
    pub datasets: BTreeMap<String, YearDataset>,
    pub metadata: DocumentMetadata,
}

impl ComprehensiveDocument {
    /// Datasets in ascending year order
    pub fn years(&self) -> impl Iterator<Item = &YearDataset> {
        self.datasets.values()
    }
}

impl CoveragePeriod {
    pub fn from_years(years: &[i32]) -> Self {
        Self {
            start_year: years.iter().min().copied(),
            end_year: years.iter().max().copied(),
            total_years: years.len(),
        }
    }
}
