// Tests for ReportDownloader
// Uses mockito for HTTP mocking

use hotel_kpi_tracker::importers::downloader::{report_file_name, DownloadError};
use hotel_kpi_tracker::importers::ReportDownloader;
use mockito::Server;
use std::time::Duration;

fn create_test_downloader(data_dir: &std::path::Path, max_retries: usize) -> ReportDownloader {
    ReportDownloader::with_settings(data_dir, Duration::from_secs(5), "test-agent", max_retries)
}

#[tokio::test]
async fn test_download_report_success() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();

    let mock = server
        .mock("GET", "/file/term-2016.xlsx")
        .with_status(200)
        .with_header(
            "content-type",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        )
        .with_body(b"fake excel data")
        .create_async()
        .await;

    let downloader = create_test_downloader(dir.path(), 0);
    let url = format!("{}/file/term-2016.xlsx", server.url());
    let path = downloader.download_report(2016, &url).await.unwrap();

    assert_eq!(path, dir.path().join(report_file_name(2016)));
    assert_eq!(std::fs::read(&path).unwrap(), b"fake excel data");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_cached_report_not_downloaded_again() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(report_file_name(2017)), b"cached").unwrap();

    let mock = server
        .mock("GET", "/file/term-2017.xlsx")
        .with_status(200)
        .with_body(b"fresh")
        .expect(0)
        .create_async()
        .await;

    let downloader = create_test_downloader(dir.path(), 0);
    let url = format!("{}/file/term-2017.xlsx", server.url());
    let path = downloader.download_report(2017, &url).await.unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), b"cached");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_download_report_404() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();

    // 404 is not retried
    let mock = server
        .mock("GET", "/file/missing.xlsx")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let downloader = create_test_downloader(dir.path(), 3);
    let url = format!("{}/file/missing.xlsx", server.url());
    let result = downloader.download_report(2099, &url).await;

    match result.unwrap_err() {
        DownloadError::NotFound(msg) => {
            assert!(msg.contains("jhr_2099_hotel_performance.xlsx"));
            assert!(msg.contains("not found"));
        }
        other => panic!("Expected NotFound error, got {other:?}"),
    }
    assert!(!dir.path().join(report_file_name(2099)).exists());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_download_report_server_error() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();

    let mock = server
        .mock("GET", "/file/term-2023.xlsx")
        .with_status(500)
        .create_async()
        .await;

    let downloader = create_test_downloader(dir.path(), 0);
    let url = format!("{}/file/term-2023.xlsx", server.url());
    let result = downloader.download_report(2023, &url).await;

    match result.unwrap_err() {
        DownloadError::ServerError(msg) => {
            assert!(msg.contains("500"));
            assert!(msg.contains("jhr_2023_hotel_performance.xlsx"));
        }
        other => panic!("Expected ServerError, got {other:?}"),
    }
    assert!(!dir.path().join(report_file_name(2023)).exists());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();

    let mock = server
        .mock("GET", "/file/term-2022.xlsx")
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let downloader = create_test_downloader(dir.path(), 2);
    let url = format!("{}/file/term-2022.xlsx", server.url());
    let result = downloader.download_report(2022, &url).await;

    assert!(matches!(result, Err(DownloadError::ServerError(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_download_report_connection_refused() {
    let dir = tempfile::tempdir().unwrap();
    let downloader = create_test_downloader(dir.path(), 0);

    let result = downloader
        .download_report(2016, "http://127.0.0.1:1/file.xlsx")
        .await;

    assert!(matches!(result, Err(DownloadError::HttpError(_))));
}

#[tokio::test]
async fn test_unexpected_status_not_retried() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();

    let mock = server
        .mock("GET", "/file/term-2021.xlsx")
        .with_status(304)
        .expect(1)
        .create_async()
        .await;

    let downloader = create_test_downloader(dir.path(), 2);
    let url = format!("{}/file/term-2021.xlsx", server.url());
    let result = downloader.download_report(2021, &url).await;

    match result.unwrap_err() {
        DownloadError::UnexpectedStatus(msg) => assert!(msg.contains("304")),
        other => panic!("Expected UnexpectedStatus, got {other:?}"),
    }
    assert!(!dir.path().join(report_file_name(2021)).exists());

    mock.assert_async().await;
}
