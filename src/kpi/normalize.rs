/// Per-cell value normalization shared by every era
///
/// The thresholds are heuristics tuned to the published reports, so they live in
/// a struct that configuration can override.
use serde::{Deserialize, Serialize};

use super::metric::MetricKind;
use crate::utils::round_to;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractionThresholds {
    /// Occupancy cells above this value are already percentages; at or below it
    /// they are fractions of one
    pub occupancy_percent_threshold: f64,
    /// Lower bound for a plausible ADR/RevPAR in yen
    pub rate_min_jpy: f64,
    /// Upper bound for a plausible ADR/RevPAR in yen
    pub rate_max_jpy: f64,
}

impl Default for ExtractionThresholds {
    fn default() -> Self {
        Self {
            occupancy_percent_threshold: 1.0,
            rate_min_jpy: 1_000.0,
            rate_max_jpy: 100_000.0,
        }
    }
}

impl ExtractionThresholds {
    /// Occupancy as a fraction of one, or None when outside [0, 1]
    pub fn occupancy_fraction(&self, raw: f64) -> Option<f64> {
        let fraction = if raw > self.occupancy_percent_threshold {
            raw / 100.0
        } else {
            raw
        };
        (0.0..=1.0).contains(&fraction).then_some(fraction)
    }

    /// Occupancy in percent points with one decimal, or None when implausible
    pub fn occupancy_percent(&self, raw: f64) -> Option<f64> {
        self.occupancy_fraction(raw)
            .map(|fraction| round_to(fraction * 100.0, 1))
    }

    pub fn accept_rate(&self, raw: f64) -> Option<f64> {
        (self.rate_min_jpy..=self.rate_max_jpy)
            .contains(&raw)
            .then_some(raw)
    }

    pub fn accept_sales(&self, raw: f64) -> Option<f64> {
        (raw > 0.0).then_some(raw)
    }

    /// Normalize a raw cell value for `kind`; None means the cell is rejected
    pub fn normalize(&self, kind: MetricKind, raw: f64) -> Option<f64> {
        match kind {
            MetricKind::OccupancyPct => self.occupancy_percent(raw),
            k if k.is_rate() => self.accept_rate(raw),
            _ => self.accept_sales(raw),
        }
    }
}
