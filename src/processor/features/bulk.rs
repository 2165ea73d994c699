use crate::capture::PacketInfo;
use crate::config::FlowConfig;
use crate::processor::flow::FlowFeatures;

// One per direction, timestamps in absolute microseconds
#[derive(Debug, Default)]
struct BulkState {
    // Start of the current run, `None` when no run is open
    start: Option<i64>,
    last_ts: i64,
    packet_count_help: u32,
    size_help: u64,

    bulk_count: u64,
    packet_total: u64,
    size_total: u64,
    duration_us: i64,
}

impl BulkState {
    fn update(&mut self, ts: i64, size: u64, last_other_ts: Option<i64>, config: &FlowConfig) {
        // The other side spoke after this run started, whatever its payload
        if last_other_ts > self.start {
            self.start = None;
        }
        if size == 0 {
            return;
        }

        let start = match self.start {
            Some(start) if ts - self.last_ts <= config.bulk_timeout_us => start,
            _ => {
                self.start = Some(ts);
                self.last_ts = ts;
                self.packet_count_help = 1;
                self.size_help = size;
                return;
            }
        };

        self.packet_count_help += 1;
        self.size_help += size;
        if self.packet_count_help == config.bulk_threshold {
            self.bulk_count += 1;
            self.packet_total += config.bulk_threshold as u64;
            self.size_total += self.size_help;
            self.duration_us += ts - start;
        } else if self.packet_count_help > config.bulk_threshold {
            self.packet_total += 1;
            self.size_total += size;
            self.duration_us += ts - self.last_ts;
        }
        self.last_ts = ts;
    }

    // (bytes per bulk, packets per bulk, bytes/s)
    fn averages(&self) -> (f64, f64, f64) {
        if self.bulk_count == 0 {
            return (0.0, 0.0, 0.0);
        }
        let n_bulk = self.bulk_count as f64;
        let rate = if self.duration_us > 0 {
            self.size_total as f64 / (self.duration_us as f64 / 1_000_000.0)
        } else {
            0.0
        };
        (self.size_total as f64 / n_bulk, self.packet_total as f64 / n_bulk, rate)
    }
}

impl FlowFeatures {
    /// Writes `{fwd,bwd}_bytes_bulk_avg`, `{fwd,bwd}_packet_bulk_avg` and
    /// `{fwd,bwd}_bulk_rate_avg`.
    ///
    /// A bulk is a run of at least `bulk_threshold` same-direction packets with
    /// payload, each within `bulk_timeout_us` of the previous one and with no
    /// packet of the other direction since the run started.
    pub(crate) fn compute_bulk(&mut self, packets: &[PacketInfo], config: &FlowConfig) {
        let mut fwd = BulkState::default();
        let mut bwd = BulkState::default();
        let mut last_fwd_ts: Option<i64> = None;
        let mut last_bwd_ts: Option<i64> = None;

        for p in packets {
            let ts = p.micros();
            let size = p.payload_len as u64;
            if p.is_forward() {
                fwd.update(ts, size, last_bwd_ts, config);
                last_fwd_ts = Some(ts);
            } else {
                bwd.update(ts, size, last_fwd_ts, config);
                last_bwd_ts = Some(ts);
            }
        }

        (self.fwd_bytes_bulk_avg, self.fwd_packet_bulk_avg, self.fwd_bulk_rate_avg) = fwd.averages();
        (self.bwd_bytes_bulk_avg, self.bwd_packet_bulk_avg, self.bwd_bulk_rate_avg) = bwd.averages();
    }
}
