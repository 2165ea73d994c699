use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

use super::packet::{PacketInfo, RawPacket};
use crate::processor::{FlowDirection, FlowKey};

/// Assigns a direction to every packet of an undirected batch.
///
/// The sender of the earliest packet of each flow is the forward endpoint.
/// Every output packet carries the flow's canonical 5-tuple instead of its own
/// source and destination. Output is grouped by flow, time-ordered inside
/// each flow.
pub fn assign_directions(packets: &[RawPacket]) -> Vec<PacketInfo> {
    if packets.is_empty() {
        return Vec::new();
    }

    let mut flows: HashMap<FlowKey, Vec<&RawPacket>> = HashMap::new();
    for pkt in packets {
        match flows.entry(pkt.flow_key()) {
            Entry::Occupied(e) => e.into_mut().push(pkt),
            Entry::Vacant(e) => {
                e.insert(vec![pkt]);
            }
        }
    }

    let mut keys: Vec<FlowKey> = flows.keys().copied().collect();
    keys.sort();
    let flow_count = keys.len();

    let mut out = Vec::with_capacity(packets.len());
    for key in keys {
        let Some(mut group) = flows.remove(&key) else {
            continue;
        };
        // Stable: on a tied earliest timestamp the first packet in the input wins
        group.sort_by_key(|p| p.timestamp);
        let Some(first) = group.first() else {
            continue;
        };
        let forward = (first.src_ip, first.src_port);

        for p in group {
            let direction = if (p.src_ip, p.src_port) == forward {
                FlowDirection::Forward
            } else {
                FlowDirection::Backward
            };
            out.push(PacketInfo {
                timestamp: p.timestamp,
                direction,
                header_len: p.header_len,
                payload_len: p.payload_len,
                tcp_window: p.tcp_window,
                src_ip: key.src_ip,
                dst_ip: key.dst_ip,
                src_port: key.src_port,
                dst_port: key.dst_port,
                protocol: key.protocol,
                flags: p.flags,
            });
        }
    }
    debug!(packets = out.len(), flows = flow_count, "assigned packet directions");
    out
}
