use crate::capture::PacketInfo;
use crate::processor::flow::FlowFeatures;
use crate::processor::stats::variance;
use crate::types::Stats;

impl FlowFeatures {
    /// Writes the payload length statistics: `{fwd,bwd}_packet_len`,
    /// `{fwd,bwd}_segment_size_avg`, `packet_len` with its `min/max/mean/std/var`
    /// companions, and `avg_packet_size`.
    ///
    /// The flow-wide series holds the first packet's payload twice, as
    /// CICFlowMeter's flow length statistics do. `avg_packet_size` sums that
    /// series but divides by the real packet count. The per-direction series
    /// hold each packet once.
    pub(crate) fn compute_packet_len(&mut self, packets: &[PacketInfo]) {
        let Some(first) = packets.first() else {
            return;
        };
        let first_len = first.payload_len as f64;

        let mut all_lengths = Vec::with_capacity(packets.len() + 1);
        all_lengths.push(first_len);
        let mut fwd_lengths = Vec::new();
        let mut bwd_lengths = Vec::new();
        for p in packets {
            let len = p.payload_len as f64;
            all_lengths.push(len);
            if p.is_forward() {
                fwd_lengths.push(len);
            } else {
                bwd_lengths.push(len);
            }
        }

        if !fwd_lengths.is_empty() {
            self.fwd_packet_len = Stats::from_values(&fwd_lengths);
            self.fwd_segment_size_avg = self.fwd_packet_len.mean;
        }
        if !bwd_lengths.is_empty() {
            self.bwd_packet_len = Stats::from_values(&bwd_lengths);
            self.bwd_segment_size_avg = self.bwd_packet_len.mean;
        }

        self.packet_len = Stats::from_values(&all_lengths);
        self.packet_len_var = variance(&all_lengths);
        self.min_packet_len = self.packet_len.min as u32;
        self.max_packet_len = self.packet_len.max as u32;
        self.packet_len_mean = self.packet_len.mean;
        self.packet_len_std = self.packet_len.std;

        let flow_sum: f64 = all_lengths.iter().sum();
        self.avg_packet_size = flow_sum / packets.len() as f64;
    }
}
