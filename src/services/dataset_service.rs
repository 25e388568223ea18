use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{error, info, instrument, warn};

use crate::config::{Config, DEFAULT_PORTFOLIO_URL};
use crate::dataset::{
    ComprehensiveDocument, CoveragePeriod, DataDefinitions, DocumentMetadata, SourceInfo,
    SpecialNote, YearDataset, GEOGRAPHICAL_REGIONS, SCHEMA_VERSION,
};
use crate::importers::downloader::report_file_name;
use crate::importers::ReportWorkbook;
use crate::kpi::grid::{WorkbookError, WorkbookSource};
use crate::kpi::{select_sheet, summarize, Era, ExtractionThresholds, MetricKind};

const PORTFOLIO_TYPE: &str = "ホテル運営実績（実数値）";

/// Error types for a single year's extraction
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Report file not found: {0}")]
    SourceUnavailable(PathBuf),

    #[error("Workbook error: {0}")]
    Workbook(#[from] WorkbookError),

    #[error("No KPI sheet found for {0}")]
    NoSheet(i32),

    #[error("No occupancy values extracted for {year} from sheet '{sheet}'")]
    ZeroSignal { year: i32, sheet: String },

    #[error("Extraction task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Extract one fiscal year from an opened workbook
///
/// Selects the sheet, runs the era extractor and derives the annual summary.
/// Fails when no sheet can be selected or when no month has an occupancy value.
pub fn extract_year<W: WorkbookSource>(
    workbook: &mut W,
    source: &str,
    year: i32,
    thresholds: &ExtractionThresholds,
    extraction_date: NaiveDate,
) -> Result<YearDataset, ExtractionError> {
    let sheet_names = workbook.sheet_names();
    let sheet = select_sheet(&sheet_names, year)
        .ok_or(ExtractionError::NoSheet(year))?
        .to_string();
    info!("{}年: using sheet '{}'", year, sheet);

    let grid = workbook.grid(&sheet)?;
    let era = Era::for_year(year);
    let monthly_data = era.extract(&grid, year, thresholds);

    let valid_months = monthly_data.valid_months();
    info!("{}年: {} valid months ({} extraction)", year, valid_months, era);
    if valid_months == 0 {
        return Err(ExtractionError::ZeroSignal { year, sheet });
    }

    let annual_summary = summarize(&monthly_data);

    Ok(YearDataset {
        year,
        portfolio_type: PORTFOLIO_TYPE.to_string(),
        excel_source: source.to_string(),
        sheet_used: sheet,
        era,
        extraction_date,
        valid_months,
        monthly_data,
        annual_summary,
        special_notes: SpecialNote::for_year(year),
    })
}

/// Assemble the document from the years that succeeded
///
/// `attempted` lists every year that was processed; years without a dataset
/// are reported as failed in the metadata.
pub fn assemble_document(
    datasets: Vec<YearDataset>,
    attempted: &[i32],
    ir_library_url: &str,
    generated_at: DateTime<Utc>,
) -> ComprehensiveDocument {
    let today = generated_at.date_naive();
    let succeeded: Vec<i32> = datasets.iter().map(|d| d.year).collect();
    let failed_years: Vec<i32> = attempted
        .iter()
        .filter(|year| !succeeded.contains(*year))
        .copied()
        .collect();
    let total_valid_months: usize = datasets.iter().map(|d| d.valid_months).sum();

    let metrics: BTreeMap<String, String> = MetricKind::ALL
        .iter()
        .map(|kind| (kind.key().to_string(), kind.description().to_string()))
        .collect();
    let extraction_method: BTreeMap<String, String> = [Era::Legacy, Era::PerProperty, Era::PreAggregated]
        .iter()
        .map(|era| (era.to_string(), era.description().to_string()))
        .collect();

    ComprehensiveDocument {
        schema_version: SCHEMA_VERSION.to_string(),
        description: "ホテル運営実績KPIデータベース（月次・年次）".to_string(),
        source: SourceInfo {
            primary_url: DEFAULT_PORTFOLIO_URL.to_string(),
            ir_library_url: ir_library_url.to_string(),
            last_updated: today,
        },
        extraction_method,
        coverage_period: CoveragePeriod::from_years(&succeeded),
        data_definitions: DataDefinitions {
            metrics,
            geographical_regions: GEOGRAPHICAL_REGIONS.iter().map(|r| r.to_string()).collect(),
        },
        metadata: DocumentMetadata {
            created_date: today,
            generated_at,
            extraction_success_rate: format!("{}/{}年", succeeded.len(), attempted.len()),
            total_expected_records: succeeded.len() * 12,
            total_valid_months,
            failed_years,
        },
        datasets: datasets
            .into_iter()
            .map(|d| (d.year.to_string(), d))
            .collect(),
    }
}

/// Builds the comprehensive document from the cached yearly workbooks
#[derive(Clone)]
pub struct DatasetService {
    config: Config,
}

impl DatasetService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn report_path(&self, year: i32) -> PathBuf {
        self.config.data_dir.join(report_file_name(year))
    }

    /// Extract one year from its cached workbook
    #[instrument(skip(self))]
    pub fn process_year(&self, year: i32) -> Result<YearDataset, ExtractionError> {
        let path = self.report_path(year);
        if !path.exists() {
            return Err(ExtractionError::SourceUnavailable(path));
        }

        let mut workbook = ReportWorkbook::open(&path)?;
        extract_year(
            &mut workbook,
            &path.to_string_lossy(),
            year,
            &self.config.thresholds,
            Utc::now().date_naive(),
        )
    }

    /// Process every year; failures are logged and skipped
    ///
    /// This is synchronous, caller should use spawn_blocking.
    #[instrument(skip(self, years), fields(years = years.len()))]
    pub fn build_document(&self, years: &[i32]) -> ComprehensiveDocument {
        let mut datasets = Vec::new();

        for &year in years {
            match self.process_year(year) {
                Ok(dataset) => {
                    info!(
                        "✓ {}年: occupancy avg {:?}%, {} valid months",
                        year, dataset.annual_summary.occupancy_avg_pct, dataset.valid_months
                    );
                    datasets.push(dataset);
                }
                Err(ExtractionError::SourceUnavailable(path)) => {
                    warn!("{}年: report file not found at {}, skipping", year, path.display());
                }
                Err(e) => {
                    error!("{}年: extraction failed: {}", year, e);
                }
            }
        }

        info!("Extracted {}/{} years", datasets.len(), years.len());
        assemble_document(datasets, years, &self.config.ir_library_url, Utc::now())
    }

    /// Run `build_document` on the blocking thread pool
    pub async fn build_document_blocking(
        &self,
        years: Vec<i32>,
    ) -> Result<ComprehensiveDocument, ExtractionError> {
        let service = self.clone();
        let document = tokio::task::spawn_blocking(move || service.build_document(&years)).await?;
        Ok(document)
    }
}
