//! The per-flow feature passes.
//!
//! Each pass is an `impl FlowFeatures` method that reads the time-sorted packet
//! slice of one flow and writes its own disjoint set of fields. Passes listed
//! after `compute_counts` and `compute_basic` may read what those two wrote.

mod bulk;
mod flags;
mod iat;
mod packet_len;
mod segments;
mod volume;

use std::time::Duration;

use super::flow::FlowFeatures;
use crate::capture::PacketInfo;
use crate::config::FlowConfig;

/// Runs every pass over one flow. `packets` must be sorted by timestamp.
pub fn compute_features(packets: &[PacketInfo], config: &FlowConfig) -> FlowFeatures {
    let mut f = FlowFeatures::default();
    f.compute_basic(packets);
    f.compute_counts(packets);
    f.compute_packet_len(packets);
    f.compute_iat(packets);
    f.compute_flags(packets);
    f.compute_rates(packets);
    f.compute_ratio();
    f.compute_bulk(packets, config);
    f.compute_subflow(packets, config);
    f.compute_active_idle(packets, config);
    f.compute_init_win(packets);
    f
}

// Zero if the two are out of order
#[inline]
fn elapsed(earlier: &PacketInfo, later: &PacketInfo) -> Duration {
    later
        .timestamp
        .signed_duration_since(earlier.timestamp)
        .to_std()
        .unwrap_or_default()
}

#[inline]
fn micros(d: Duration) -> f64 {
    d.as_micros() as f64
}
