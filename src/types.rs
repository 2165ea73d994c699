use serde::{Deserialize, Serialize};

/// Min, max, mean and sample standard deviation of a value series.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Stats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

/// Totals for one batch handed to the `FeatureProcessor`.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct BatchSummary {
    pub flow_count: u64,
    pub total_packets: u64,
    pub total_bytes: u64,
    // First to last packet of the whole batch
    pub duration_us: u64,
    pub packets_per_second: f64,
    pub bytes_per_second: f64,
}
