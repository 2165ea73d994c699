use anyhow::Result;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, trace};

use super::features::compute_features;
use super::flow::{FlowKey, FlowWithKey};
use crate::capture::PacketInfo;
use crate::config::FlowConfig;

// Packets keep their input order inside each group
pub fn group_by_flow(packets: &[PacketInfo]) -> HashMap<FlowKey, Vec<PacketInfo>> {
    let mut flows: HashMap<FlowKey, Vec<PacketInfo>> = HashMap::new();
    for pkt in packets {
        match flows.entry(pkt.flow_key()) {
            Entry::Occupied(e) => e.into_mut().push(pkt.clone()),
            Entry::Vacant(e) => {
                e.insert(vec![pkt.clone()]);
            }
        }
    }
    flows
}

pub fn compute_flow(key: FlowKey, mut packets: Vec<PacketInfo>, config: &FlowConfig) -> FlowWithKey {
    // Stable: packets sharing a timestamp stay in input order
    packets.sort_by_key(|p| p.timestamp);
    let features = compute_features(&packets, config);
    trace!(flow = ?key, packets = packets.len(), duration_us = features.flow_duration_us, "flow computed");
    FlowWithKey { key, features }
}

/// Computes one feature record per flow found in `packets`, using the
/// default thresholds.
pub fn process_packets(packets: &[PacketInfo]) -> Vec<FlowWithKey> {
    compute_all(packets, &FlowConfig::default())
}

/// Same as `process_packets` with custom thresholds. Fails if `config` does
/// not pass `FlowConfig::validate`.
pub fn process_packets_with(packets: &[PacketInfo], config: &FlowConfig) -> Result<Vec<FlowWithKey>> {
    config.validate()?;
    Ok(compute_all(packets, config))
}

// Records come back sorted by flow key
fn compute_all(packets: &[PacketInfo], config: &FlowConfig) -> Vec<FlowWithKey> {
    if packets.is_empty() {
        return Vec::new();
    }
    let flows = group_by_flow(packets);
    let mut out: Vec<FlowWithKey> = flows
        .into_iter()
        .map(|(key, flow_packets)| compute_flow(key, flow_packets, config))
        .collect();
    out.sort_by(|a, b| a.key.cmp(&b.key));
    debug!(packets = packets.len(), flows = out.len(), "computed flow features");
    out
}
