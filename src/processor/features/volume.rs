use super::elapsed;
use crate::capture::PacketInfo;
use crate::processor::flow::FlowFeatures;

impl FlowFeatures {
    /// Writes `flow_duration_us`, `flow_bytes_per_sec` and `flow_packets_per_sec`.
    ///
    /// Rates stay 0 when the flow has zero duration, as CICFlowMeter reports them.
    pub(crate) fn compute_basic(&mut self, packets: &[PacketInfo]) {
        let (Some(first), Some(last)) = (packets.first(), packets.last()) else {
            return;
        };
        self.flow_duration_us = elapsed(first, last).as_micros() as u64;

        // Payload only, headers excluded
        let total_bytes: u64 = packets.iter().map(|p| p.payload_len as u64).sum();

        let duration_seconds = (self.flow_duration_us as f64) / 1_000_000.0;
        if duration_seconds > 0.0 {
            self.flow_bytes_per_sec = (total_bytes as f64) / duration_seconds;
            self.flow_packets_per_sec = (packets.len() as f64) / duration_seconds;
        }
    }

    pub(crate) fn compute_counts(&mut self, packets: &[PacketInfo]) {
        for p in packets {
            if p.is_forward() {
                self.total_fwd_packets += 1;
                self.total_fwd_bytes += p.payload_len as u64;
            } else {
                self.total_bwd_packets += 1;
                self.total_bwd_bytes += p.payload_len as u64;
            }
        }
    }

    // Needs compute_basic and compute_counts first
    pub(crate) fn compute_rates(&mut self, packets: &[PacketInfo]) {
        let duration_seconds = (self.flow_duration_us as f64) / 1_000_000.0;
        if duration_seconds > 0.0 {
            self.fwd_packets_per_sec = (self.total_fwd_packets as f64) / duration_seconds;
            self.bwd_packets_per_sec = (self.total_bwd_packets as f64) / duration_seconds;
        }

        // Smallest transport header among forward packets
        let mut seg_size_min: Option<u32> = None;
        for p in packets.iter().filter(|p| p.is_forward()) {
            if p.payload_len >= 1 {
                self.fwd_act_data_packets += 1;
            }
            seg_size_min = match seg_size_min {
                Some(min) if p.header_len >= min => Some(min),
                _ => Some(p.header_len),
            };
        }
        self.fwd_seg_size_min = seg_size_min.unwrap_or(0);
    }

    pub(crate) fn compute_ratio(&mut self) {
        // Integer division, as CICFlowMeter does
        if self.total_fwd_packets > 0 {
            self.down_up_ratio = (self.total_bwd_packets / self.total_fwd_packets) as f64;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::capture::PacketInfo;
    use crate::processor::FlowFeatures;
    use crate::testutil::{bwd, fwd};

    fn basic_and_counts(packets: &[PacketInfo]) -> FlowFeatures {
        let mut f = FlowFeatures::default();
        f.compute_basic(packets);
        f.compute_counts(packets);
        f
    }

    #[test]
    fn duration_and_rates() {
        let packets = [fwd(0, 100), bwd(500, 300), fwd(2000, 100)];
        let f = basic_and_counts(&packets);
        assert_eq!(f.flow_duration_us, 2_000_000);
        assert_eq!(f.flow_bytes_per_sec, 250.0);
        assert_eq!(f.flow_packets_per_sec, 1.5);
    }

    #[test]
    fn zero_duration_leaves_rates_at_zero() {
        let f = basic_and_counts(&[fwd(0, 100)]);
        assert_eq!(f.flow_duration_us, 0);
        assert_eq!(f.flow_bytes_per_sec, 0.0);
        assert_eq!(f.flow_packets_per_sec, 0.0);

        let f = basic_and_counts(&[fwd(7, 100), bwd(7, 50), fwd(7, 1)]);
        assert_eq!(f.flow_duration_us, 0);
        assert_eq!(f.flow_bytes_per_sec, 0.0);
        assert_eq!(f.flow_packets_per_sec, 0.0);
    }

    #[test]
    fn empty_input_keeps_everything_zero() {
        let mut f = basic_and_counts(&[]);
        f.compute_rates(&[]);
        f.compute_ratio();
        assert_eq!(f, FlowFeatures::default());
    }

    #[test]
    fn counts_use_payload_only() {
        let mut packets = vec![fwd(0, 100), fwd(1000, 200), bwd(2000, 300), bwd(3000, 50)];
        for p in &mut packets {
            p.header_len = 40;
        }
        let f = basic_and_counts(&packets);
        assert_eq!((f.total_fwd_packets, f.total_bwd_packets), (2, 2));
        assert_eq!((f.total_fwd_bytes, f.total_bwd_bytes), (300, 350));
    }

    #[test]
    fn per_direction_rates_and_forward_segments() {
        let mut packets = vec![fwd(0, 0), bwd(100, 10), fwd(200, 5), fwd(1000, 7)];
        packets[0].header_len = 32;
        packets[2].header_len = 20;
        packets[3].header_len = 20;
        packets[1].header_len = 8;
        let mut f = basic_and_counts(&packets);
        f.compute_rates(&packets);
        assert_eq!(f.fwd_packets_per_sec, 3.0);
        assert_eq!(f.bwd_packets_per_sec, 1.0);
        assert_eq!(f.fwd_act_data_packets, 2);
        // backward header of 8 must not count
        assert_eq!(f.fwd_seg_size_min, 20);
    }

    #[test]
    fn no_forward_packets_leaves_forward_fields_zero() {
        let mut packets = vec![bwd(0, 10), bwd(100, 10)];
        packets[0].header_len = 20;
        let mut f = basic_and_counts(&packets);
        f.compute_rates(&packets);
        f.compute_ratio();
        assert_eq!(f.fwd_packets_per_sec, 0.0);
        assert_eq!(f.fwd_act_data_packets, 0);
        assert_eq!(f.fwd_seg_size_min, 0);
        assert_eq!(f.down_up_ratio, 0.0);
        assert_eq!(f.bwd_packets_per_sec, 20.0);
    }

    #[test]
    fn ratio_truncates() {
        let packets = [fwd(0, 1), fwd(1, 1), bwd(2, 1), bwd(3, 1), bwd(4, 1)];
        let mut f = basic_and_counts(&packets);
        f.compute_ratio();
        assert_eq!(f.down_up_ratio, 1.0);

        let packets = [fwd(0, 1), fwd(1, 1), fwd(2, 1), bwd(3, 1)];
        let mut f = basic_and_counts(&packets);
        f.compute_ratio();
        assert_eq!(f.down_up_ratio, 0.0);
    }
}
