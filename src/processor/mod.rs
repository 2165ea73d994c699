pub mod feature_processor;
pub mod features;
mod engine;
mod flow;
mod stats;

pub use engine::{process_packets, process_packets_with};
pub use feature_processor::FeatureProcessor;
pub use features::compute_features;
pub use flow::{FlowDirection, FlowFeatures, FlowKey, FlowWithKey};
pub use stats::{min_max_mean_std, variance};
