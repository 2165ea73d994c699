use crate::capture::PacketInfo;
use crate::config::FlowConfig;
use crate::processor::flow::FlowFeatures;
use crate::types::Stats;

impl FlowFeatures {
    /// Writes `subflow_{fwd,bwd}_{packets,bytes}`. Needs `compute_counts` first.
    ///
    /// The divisor is the number of gaps longer than `subflow_timeout_us`, not
    /// the number of segments those gaps produce. Without any such gap all four
    /// fields stay 0.
    pub(crate) fn compute_subflow(&mut self, packets: &[PacketInfo], config: &FlowConfig) {
        if packets.len() < 2 {
            return;
        }
        let gaps = packets
            .windows(2)
            .filter(|pair| pair[1].micros() - pair[0].micros() > config.subflow_timeout_us)
            .count();
        if gaps == 0 {
            return;
        }
        let gaps = gaps as f64;
        self.subflow_fwd_packets = self.total_fwd_packets as f64 / gaps;
        self.subflow_fwd_bytes = self.total_fwd_bytes as f64 / gaps;
        self.subflow_bwd_packets = self.total_bwd_packets as f64 / gaps;
        self.subflow_bwd_bytes = self.total_bwd_bytes as f64 / gaps;
    }

    pub(crate) fn compute_active_idle(&mut self, packets: &[PacketInfo], config: &FlowConfig) {
        if packets.len() < 2 {
            return;
        }
        let mut active_durations = Vec::new();
        let mut idle_durations = Vec::new();
        let mut start_active = packets[0].micros();
        let mut end_active = start_active;

        for p in &packets[1..] {
            let ts = p.micros();
            let gap = ts - end_active;
            if gap > config.activity_timeout_us {
                if end_active - start_active > 0 {
                    active_durations.push((end_active - start_active) as f64);
                }
                idle_durations.push(gap as f64);
                start_active = ts;
            }
            end_active = ts;
        }
        if end_active - start_active > 0 {
            active_durations.push((end_active - start_active) as f64);
        }

        if !active_durations.is_empty() {
            self.active = Stats::from_values(&active_durations);
        }
        if !idle_durations.is_empty() {
            self.idle = Stats::from_values(&idle_durations);
        }
    }
}
