//! Shared utility functions for the hotel KPI tracker

/// Two-digit month key used throughout the output document
///
/// # Examples
///
/// ```
/// use hotel_kpi_tracker::utils::month_key;
///
/// assert_eq!(month_key(1), "01");
/// assert_eq!(month_key(12), "12");
/// ```
pub fn month_key(month: u32) -> String {
    format!("{month:02}")
}

/// Round half away from zero to the given number of decimals
///
/// # Examples
///
/// ```
/// use hotel_kpi_tracker::utils::round_to;
///
/// assert_eq!(round_to(65.349, 1), 65.3);
/// assert_eq!(round_to(0.653 * 100.0, 1), 65.3);
/// assert_eq!(round_to(12345.5, 0), 12346.0);
/// ```
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Arithmetic mean, None for an empty input
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
