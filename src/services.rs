pub mod dataset_service;

pub use dataset_service::{extract_year, DatasetService, ExtractionError};
