//! Report acquisition: downloading the yearly workbooks and loading their sheets

pub mod downloader;
pub mod workbook_loader;

// Re-export commonly used items
pub use downloader::{DownloadError, ReportDownloader};
pub use workbook_loader::ReportWorkbook;
