pub mod config;
pub mod dataset;
pub mod fetch_error;
pub mod importers;
pub mod kpi;
pub mod report;
pub mod report_link_fetcher;
pub mod services;
pub mod utils;
