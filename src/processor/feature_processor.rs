use anyhow::{anyhow, Result};
use crossbeam_channel::unbounded;
use tracing::{debug, info};

use super::engine;
use super::flow::{FlowKey, FlowWithKey};
use crate::capture::PacketInfo;
use crate::config::FlowConfig;
use crate::types::BatchSummary;

/// Runs the per-flow feature computation over a pool of worker threads.
///
/// Flows are independent, so each worker takes whole flows off a shared queue.
/// The output is the same as `process_packets_with` on the same input.
pub struct FeatureProcessor {
    config: FlowConfig,
}

impl FeatureProcessor {
    pub fn new(config: FlowConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, packets: &[PacketInfo]) -> Result<(Vec<FlowWithKey>, BatchSummary)> {
        self.config.validate()?;
        let groups = engine::group_by_flow(packets);
        let flow_count = groups.len();
        let workers = self.config.workers.min(flow_count.max(1));

        let (work_tx, work_rx) = unbounded::<(FlowKey, Vec<PacketInfo>)>();
        let (result_tx, result_rx) = unbounded::<FlowWithKey>();
        for group in groups {
            work_tx.send(group).map_err(|_| anyhow!("flow work queue closed"))?;
        }
        // Workers stop once the queue is drained
        drop(work_tx);

        let config = &self.config;
        crossbeam::thread::scope(|s| {
            for id in 0..workers {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                s.spawn(move |_| {
                    let mut done = 0usize;
                    while let Ok((key, flow_packets)) = work_rx.recv() {
                        if result_tx.send(engine::compute_flow(key, flow_packets, config)).is_err() {
                            break;
                        }
                        done += 1;
                    }
                    debug!(worker = id, flows = done, "feature worker finished");
                });
            }
        })
        .map_err(|_| anyhow!("feature worker panicked"))?;
        drop(result_tx);

        let mut flows: Vec<FlowWithKey> = result_rx.iter().collect();
        if flows.len() != flow_count {
            return Err(anyhow!("expected {flow_count} flows, workers returned {}", flows.len()));
        }
        flows.sort_by(|a, b| a.key.cmp(&b.key));

        let summary = summarize(packets, flows.len());
        info!(
            flows = summary.flow_count,
            packets = summary.total_packets,
            bytes = summary.total_bytes,
            duration_us = summary.duration_us,
            workers,
            "feature batch done"
        );
        Ok((flows, summary))
    }
}

impl Default for FeatureProcessor {
    fn default() -> Self {
        Self::new(FlowConfig::default())
    }
}

// Payload bytes only, rates stay 0 for a zero-length batch
fn summarize(packets: &[PacketInfo], flow_count: usize) -> BatchSummary {
    let total_bytes: u64 = packets.iter().map(|p| p.payload_len as u64).sum();
    let first = packets.iter().map(|p| p.timestamp).min();
    let last = packets.iter().map(|p| p.timestamp).max();
    let duration_us = match (first, last) {
        (Some(first), Some(last)) => last
            .signed_duration_since(first)
            .to_std()
            .unwrap_or_default()
            .as_micros() as u64,
        _ => 0,
    };

    let mut summary = BatchSummary {
        flow_count: flow_count as u64,
        total_packets: packets.len() as u64,
        total_bytes,
        duration_us,
        ..BatchSummary::default()
    };
    let seconds = duration_us as f64 / 1_000_000.0;
    if seconds > 0.0 {
        summary.packets_per_second = summary.total_packets as f64 / seconds;
        summary.bytes_per_second = summary.total_bytes as f64 / seconds;
    }
    summary
}
