// End-to-end extraction tests: generated workbooks in a temporary data
// directory, processed through DatasetService

mod common;

use common::{legacy_2016_sheets, metric_row, write_workbook, Number, Text};
use hotel_kpi_tracker::config::Config;
use hotel_kpi_tracker::dataset::{ComprehensiveDocument, SpecialNote};
use hotel_kpi_tracker::importers::downloader::report_file_name;
use hotel_kpi_tracker::kpi::Era;
use hotel_kpi_tracker::services::{DatasetService, ExtractionError};
use std::path::Path;

fn service_for(dir: &Path) -> DatasetService {
    DatasetService::new(Config {
        data_dir: dir.to_path_buf(),
        ..Config::default()
    })
}

#[test]
fn test_legacy_2016_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_workbook(&dir.path().join(report_file_name(2016)), &legacy_2016_sheets()).unwrap();

    let dataset = service_for(dir.path()).process_year(2016).unwrap();

    assert_eq!(dataset.era, Era::Legacy);
    assert_eq!(dataset.sheet_used, "HMJ5ホテル");
    assert_eq!(dataset.valid_months, 12);
    assert_eq!(dataset.monthly_data.month(1).occupancy_pct, Some(55.0));
    assert_eq!(dataset.monthly_data.month(7).occupancy_pct, Some(85.0));
    assert_eq!(dataset.monthly_data.month(12).occupancy_pct, Some(60.0));
    assert_eq!(dataset.monthly_data.month(3).adr_jpy, Some(12000));
    assert_eq!(dataset.monthly_data.month(3).revpar_jpy, Some(8400));

    let summary = &dataset.annual_summary;
    assert_eq!(summary.occupancy_avg_pct, Some(70.0));
    assert_eq!(summary.adr_avg_jpy, Some(12000));
    assert_eq!(summary.revpar_avg_jpy, Some(8400));
    assert_eq!(summary.sales_total_annual_mil_jpy, Some(18000));
    assert!(dataset.special_notes.is_empty());
}

#[test]
fn test_per_property_2021_averages_hotels() {
    let dir = tempfile::tempdir().unwrap();
    write_workbook(
        &dir.path().join(report_file_name(2021)),
        &[
            ("ご利用上の注意", vec![vec![Text("注意")]]),
            (
                "HMJ 5ホテル",
                vec![
                    vec![Text("物件番号"), Number(1.0)],
                    metric_row("客室稼働率", "2021年", &[0.60, 0.30]),
                    metric_row("", "2020年", &[0.10, 0.10]),
                    metric_row("ADR（円）", "2021年", &[10000.0, 9000.0]),
                    metric_row("売上高合計（百万円）", "2021年", &[300.0, 200.0]),
                    vec![Text("物件番号"), Number(2.0)],
                    metric_row("客室稼働率", "2021年", &[0.80, 0.50]),
                    metric_row("ADR（円）", "2021年", &[14000.0, 500.0]),
                    metric_row("売上高合計（百万円）", "2021年", &[500.0, 100.0]),
                ],
            ),
        ],
    )
    .unwrap();

    let dataset = service_for(dir.path()).process_year(2021).unwrap();

    assert_eq!(dataset.era, Era::PerProperty);
    assert_eq!(dataset.valid_months, 2);
    let january = dataset.monthly_data.month(1);
    assert_eq!(january.occupancy_pct, Some(70.0));
    assert_eq!(january.adr_jpy, Some(12000));
    assert_eq!(january.sales_total_mil_jpy, Some(800));
    // 500 yen is outside the plausible rate range and is dropped
    assert_eq!(dataset.monthly_data.month(2).adr_jpy, Some(9000));
    assert_eq!(dataset.monthly_data.month(2).occupancy_pct, Some(40.0));
    assert_eq!(dataset.special_notes, vec![SpecialNote::Pandemic]);
}

#[test]
fn test_pre_aggregated_2024() {
    let dir = tempfile::tempdir().unwrap();
    write_workbook(
        &dir.path().join(report_file_name(2024)),
        &[
            ("HMJ", vec![metric_row("客室稼働率", "2024年", &[10.0])]),
            (
                "変動賃料等導入28ホテル",
                vec![
                    metric_row("客室稼働率", "2024年", &[0.812, 85.5]),
                    metric_row("", "2023年", &[0.70, 0.70]),
                    metric_row("RevPAR（円）", "2024年", &[17000.0, 18000.0]),
                ],
            ),
        ],
    )
    .unwrap();

    let dataset = service_for(dir.path()).process_year(2024).unwrap();

    assert_eq!(dataset.era, Era::PreAggregated);
    assert_eq!(dataset.sheet_used, "変動賃料等導入28ホテル");
    assert_eq!(dataset.monthly_data.month(1).occupancy_pct, Some(81.2));
    assert_eq!(dataset.monthly_data.month(2).occupancy_pct, Some(85.5));
    assert_eq!(dataset.annual_summary.revpar_avg_jpy, Some(17500));
    assert_eq!(dataset.special_notes, vec![SpecialNote::InboundRecovery]);
}

#[test]
fn test_zero_signal_year_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_workbook(
        &dir.path().join(report_file_name(2017)),
        &legacy_2016_sheets(),
    )
    .unwrap();

    match service_for(dir.path()).process_year(2017) {
        Err(ExtractionError::ZeroSignal { year, sheet }) => {
            assert_eq!(year, 2017);
            assert_eq!(sheet, "HMJ5ホテル");
        }
        other => panic!("Expected ZeroSignal, got {other:?}"),
    }
}

#[test]
fn test_corrupt_file_is_workbook_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(report_file_name(2018)), b"not a workbook").unwrap();

    assert!(matches!(
        service_for(dir.path()).process_year(2018),
        Err(ExtractionError::Workbook(_))
    ));
}

#[tokio::test]
async fn test_build_document_skips_failures() {
    let dir = tempfile::tempdir().unwrap();
    write_workbook(&dir.path().join(report_file_name(2016)), &legacy_2016_sheets()).unwrap();
    std::fs::write(dir.path().join(report_file_name(2018)), b"broken").unwrap();

    let document = service_for(dir.path())
        .build_document_blocking(vec![2015, 2016, 2018])
        .await
        .unwrap();

    assert_eq!(document.datasets.len(), 1);
    assert!(document.datasets.contains_key("2016"));
    assert_eq!(document.coverage_period.start_year, Some(2016));
    assert_eq!(document.coverage_period.end_year, Some(2016));
    assert_eq!(document.metadata.failed_years, vec![2015, 2018]);
    assert_eq!(document.metadata.extraction_success_rate, "1/3年");
    assert_eq!(document.metadata.total_expected_records, 12);
    assert_eq!(document.metadata.total_valid_months, 12);
}

#[test]
fn test_document_json_shape() {
    let dir = tempfile::tempdir().unwrap();
    write_workbook(&dir.path().join(report_file_name(2016)), &legacy_2016_sheets()).unwrap();

    let document = service_for(dir.path()).build_document(&[2016]);
    let json = serde_json::to_value(&document).unwrap();

    assert_eq!(json["schema_version"], "4.0");
    let months = &json["datasets"]["2016"]["monthly_data"];
    assert_eq!(months.as_object().unwrap().len(), 12);
    assert_eq!(months["01"]["occupancy_pct"], 55.0);
    // Missing metrics are explicit nulls
    assert!(months["01"]["sales_fnb_mil_jpy"].is_null());
    assert_eq!(json["datasets"]["2016"]["era"], "legacy");

    let restored: ComprehensiveDocument = serde_json::from_value(json).unwrap();
    assert_eq!(restored, document);
}

#[test]
fn test_empty_document_has_null_coverage() {
    let dir = tempfile::tempdir().unwrap();
    let document = service_for(dir.path()).build_document(&[2015, 2016]);

    let json = serde_json::to_value(&document).unwrap();
    assert!(json["coverage_period"]["start_year"].is_null());
    assert!(json["coverage_period"]["end_year"].is_null());
    assert_eq!(json["coverage_period"]["total_years"], 0);
    assert_eq!(json["data_definitions"]["geographical_regions"][0], "北海道");
}
