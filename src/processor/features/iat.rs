use std::time::Duration;

use super::{elapsed, micros};
use crate::capture::PacketInfo;
use crate::processor::flow::{FlowDirection, FlowFeatures};
use crate::types::Stats;

// Gaps in microseconds plus their raw sum. Other-direction packets in between are skipped
fn iat_for_direction(packets: &[PacketInfo], direction: FlowDirection) -> (Vec<f64>, Duration) {
    let same: Vec<&PacketInfo> = packets.iter().filter(|p| p.direction == direction).collect();
    let mut total = Duration::ZERO;
    let deltas: Vec<f64> = same
        .windows(2)
        .map(|pair| {
            let d = elapsed(pair[0], pair[1]);
            total += d;
            micros(d)
        })
        .collect();
    (deltas, total)
}

impl FlowFeatures {
    /// Writes `flow_iat`, `fwd_iat`, `bwd_iat` (microseconds) and the raw
    /// `fwd_iat_total` / `bwd_iat_total`. Flows with fewer than two packets,
    /// and directions with fewer than two packets, keep zeros.
    pub(crate) fn compute_iat(&mut self, packets: &[PacketInfo]) {
        if packets.len() < 2 {
            return;
        }
        let flow_deltas: Vec<f64> = packets
            .windows(2)
            .map(|pair| micros(elapsed(&pair[0], &pair[1])))
            .collect();
        self.flow_iat = Stats::from_values(&flow_deltas);

        let (fwd_deltas, fwd_total) = iat_for_direction(packets, FlowDirection::Forward);
        if !fwd_deltas.is_empty() {
            self.fwd_iat_total = fwd_total;
            self.fwd_iat = Stats::from_values(&fwd_deltas);
        }
        let (bwd_deltas, bwd_total) = iat_for_direction(packets, FlowDirection::Backward);
        if !bwd_deltas.is_empty() {
            self.bwd_iat_total = bwd_total;
            self.bwd_iat = Stats::from_values(&bwd_deltas);
        }
    }
}
