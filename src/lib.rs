//! Per-flow traffic features compatible with CICFlowMeter.
//!
//! Frames are decoded into [`RawPacket`]s, given a direction inside their flow
//! by [`assign_directions`], then reduced to one [`FlowFeatures`] record per
//! flow by [`process_packets`] or the threaded [`FeatureProcessor`].

pub mod capture;
pub mod config;
pub mod export;
pub mod processor;
pub mod types;

#[cfg(test)]
mod testutil;

pub use capture::{assign_directions, decode_frame, decode_frames, PacketInfo, RawPacket, TcpFlags};
pub use config::FlowConfig;
pub use export::{feature_matrix, COLUMN_NAMES, FEATURE_COUNT};
pub use processor::{
    process_packets, process_packets_with, FeatureProcessor, FlowDirection, FlowFeatures, FlowKey,
    FlowWithKey,
};
pub use types::{BatchSummary, Stats};
