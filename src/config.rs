use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

pub const SUBFLOW_TIMEOUT_US: i64 = 1_000_000; // 1 second
pub const ACTIVITY_TIMEOUT_US: i64 = 1_000_000; // 1 second
pub const BULK_TIMEOUT_US: i64 = 1_000_000; // 1 second
pub const BULK_THRESHOLD: u32 = 4; // Minimum packets for bulk transfer
pub const DEFAULT_WORKERS: usize = 4;

/// Thresholds for the gap-based features plus the worker count of the
/// parallel processor. Defaults reproduce CICFlowMeter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub subflow_timeout_us: i64,
    pub activity_timeout_us: i64,
    pub bulk_timeout_us: i64,
    pub bulk_threshold: u32,
    pub workers: usize,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            subflow_timeout_us: SUBFLOW_TIMEOUT_US,
            activity_timeout_us: ACTIVITY_TIMEOUT_US,
            bulk_timeout_us: BULK_TIMEOUT_US,
            bulk_threshold: BULK_THRESHOLD,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl FlowConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: FlowConfig = serde_json::from_str(s).context("parse flow config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("read flow config {}", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> Result<()> {
        // A bulk needs at least two packets to have a duration
        if self.bulk_threshold < 2 {
            return Err(anyhow!("bulk_threshold must be at least 2, got {}", self.bulk_threshold));
        }
        if self.workers == 0 {
            return Err(anyhow!("workers must be at least 1"));
        }
        for (name, value) in [
            ("subflow_timeout_us", self.subflow_timeout_us),
            ("activity_timeout_us", self.activity_timeout_us),
            ("bulk_timeout_us", self.bulk_timeout_us),
        ] {
            if value < 0 {
                return Err(anyhow!("{name} must not be negative, got {value}"));
            }
        }
        Ok(())
    }
}
