use ndarray::Array2;

use crate::processor::{FlowFeatures, FlowKey, FlowWithKey};

pub const FEATURE_COUNT: usize = 76;

/// CICFlowMeter CSV column names, in CSV order. The duplicated
/// "Fwd Header Length" column is left out.
pub const COLUMN_NAMES: [&str; FEATURE_COUNT] = [
    "Flow Duration",
    "Total Fwd Packet",
    "Total Bwd packets",
    "Total Length of Fwd Packet",
    "Total Length of Bwd Packet",
    "Fwd Packet Length Max",
    "Fwd Packet Length Min",
    "Fwd Packet Length Mean",
    "Fwd Packet Length Std",
    "Bwd Packet Length Max",
    "Bwd Packet Length Min",
    "Bwd Packet Length Mean",
    "Bwd Packet Length Std",
    "Flow Bytes/s",
    "Flow Packets/s",
    "Flow IAT Mean",
    "Flow IAT Std",
    "Flow IAT Max",
    "Flow IAT Min",
    "Fwd IAT Total",
    "Fwd IAT Mean",
    "Fwd IAT Std",
    "Fwd IAT Max",
    "Fwd IAT Min",
    "Bwd IAT Total",
    "Bwd IAT Mean",
    "Bwd IAT Std",
    "Bwd IAT Max",
    "Bwd IAT Min",
    "Fwd PSH Flags",
    "Bwd PSH Flags",
    "Fwd URG Flags",
    "Bwd URG Flags",
    "Fwd Header Length",
    "Bwd Header Length",
    "Fwd Packets/s",
    "Bwd Packets/s",
    "Packet Length Min",
    "Packet Length Max",
    "Packet Length Mean",
    "Packet Length Std",
    "Packet Length Variance",
    "FIN Flag Count",
    "SYN Flag Count",
    "RST Flag Count",
    "PSH Flag Count",
    "ACK Flag Count",
    "URG Flag Count",
    "CWR Flag Count",
    "ECE Flag Count",
    "Down/Up Ratio",
    "Average Packet Size",
    "Fwd Segment Size Avg",
    "Bwd Segment Size Avg",
    "Fwd Bytes/Bulk Avg",
    "Fwd Packet/Bulk Avg",
    "Fwd Bulk Rate Avg",
    "Bwd Bytes/Bulk Avg",
    "Bwd Packet/Bulk Avg",
    "Bwd Bulk Rate Avg",
    "Subflow Fwd Packets",
    "Subflow Fwd Bytes",
    "Subflow Bwd Packets",
    "Subflow Bwd Bytes",
    "FWD Init Win Bytes",
    "Bwd Init Win Bytes",
    "Fwd Act Data Pkts",
    "Fwd Seg Size Min",
    "Active Mean",
    "Active Std",
    "Active Max",
    "Active Min",
    "Idle Mean",
    "Idle Std",
    "Idle Max",
    "Idle Min",
];

impl FlowKey {
    /// `src-dst-sport-dport-proto`, the identifier CICFlowMeter prints per row.
    pub fn flow_id(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            self.src_ip, self.dst_ip, self.src_port, self.dst_port, self.protocol
        )
    }
}

impl FlowFeatures {
    /// Values in `COLUMN_NAMES` order. Times are microseconds.
    pub fn feature_vector(&self) -> [f64; FEATURE_COUNT] {
        let mut out = [0f64; FEATURE_COUNT];
        out[0] = self.flow_duration_us as f64;
        out[1] = self.total_fwd_packets as f64;
        out[2] = self.total_bwd_packets as f64;
        out[3] = self.total_fwd_bytes as f64;
        out[4] = self.total_bwd_bytes as f64;
        out[5] = self.fwd_packet_len.max;
        out[6] = self.fwd_packet_len.min;
        out[7] = self.fwd_packet_len.mean;
        out[8] = self.fwd_packet_len.std;
        out[9] = self.bwd_packet_len.max;
        out[10] = self.bwd_packet_len.min;
        out[11] = self.bwd_packet_len.mean;
        out[12] = self.bwd_packet_len.std;
        out[13] = self.flow_bytes_per_sec;
        out[14] = self.flow_packets_per_sec;
        out[15] = self.flow_iat.mean;
        out[16] = self.flow_iat.std;
        out[17] = self.flow_iat.max;
        out[18] = self.flow_iat.min;
        out[19] = self.fwd_iat_total.as_micros() as f64;
        out[20] = self.fwd_iat.mean;
        out[21] = self.fwd_iat.std;
        out[22] = self.fwd_iat.max;
        out[23] = self.fwd_iat.min;
        out[24] = self.bwd_iat_total.as_micros() as f64;
        out[25] = self.bwd_iat.mean;
        out[26] = self.bwd_iat.std;
        out[27] = self.bwd_iat.max;
        out[28] = self.bwd_iat.min;
        out[29] = self.fwd_psh_flags as f64;
        out[30] = self.bwd_psh_flags as f64;
        out[31] = self.fwd_urg_flags as f64;
        out[32] = self.bwd_urg_flags as f64;
        out[33] = self.fwd_header_len as f64;
        out[34] = self.bwd_header_len as f64;
        out[35] = self.fwd_packets_per_sec;
        out[36] = self.bwd_packets_per_sec;
        out[37] = self.min_packet_len as f64;
        out[38] = self.max_packet_len as f64;
        out[39] = self.packet_len_mean;
        out[40] = self.packet_len_std;
        out[41] = self.packet_len_var;
        out[42] = self.fin_flag_count as f64;
        out[43] = self.syn_flag_count as f64;
        out[44] = self.rst_flag_count as f64;
        out[45] = self.psh_flag_count as f64;
        out[46] = self.ack_flag_count as f64;
        out[47] = self.urg_flag_count as f64;
        out[48] = self.cwr_flag_count as f64;
        out[49] = self.ece_flag_count as f64;
        out[50] = self.down_up_ratio;
        out[51] = self.avg_packet_size;
        out[52] = self.fwd_segment_size_avg;
        out[53] = self.bwd_segment_size_avg;
        out[54] = self.fwd_bytes_bulk_avg;
        out[55] = self.fwd_packet_bulk_avg;
        out[56] = self.fwd_bulk_rate_avg;
        out[57] = self.bwd_bytes_bulk_avg;
        out[58] = self.bwd_packet_bulk_avg;
        out[59] = self.bwd_bulk_rate_avg;
        out[60] = self.subflow_fwd_packets;
        out[61] = self.subflow_fwd_bytes;
        out[62] = self.subflow_bwd_packets;
        out[63] = self.subflow_bwd_bytes;
        out[64] = self.fwd_init_win_bytes as f64;
        out[65] = self.bwd_init_win_bytes as f64;
        out[66] = self.fwd_act_data_packets as f64;
        out[67] = self.fwd_seg_size_min as f64;
        out[68] = self.active.mean;
        out[69] = self.active.std;
        out[70] = self.active.max;
        out[71] = self.active.min;
        out[72] = self.idle.mean;
        out[73] = self.idle.std;
        out[74] = self.idle.max;
        out[75] = self.idle.min;
        out
    }

    pub fn named_values(&self) -> Vec<(&'static str, f64)> {
        COLUMN_NAMES.iter().copied().zip(self.feature_vector()).collect()
    }
}

#[inline]
fn as_f32(v: f64) -> f32 {
    let f = v as f32;
    if f.is_finite() { f } else { 0.0 }
}

/// One row per flow, one column per `COLUMN_NAMES` entry.
pub fn feature_matrix(flows: &[FlowWithKey]) -> Array2<f32> {
    let mut matrix = Array2::<f32>::zeros((flows.len(), FEATURE_COUNT));
    for (mut row, flow) in matrix.rows_mut().into_iter().zip(flows) {
        for (cell, v) in row.iter_mut().zip(flow.features.feature_vector()) {
            *cell = as_f32(v);
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::process_packets;
    use crate::testutil::{bwd, fwd, ipv4};
    use std::collections::HashSet;

    #[test]
    fn column_names_are_unique() {
        let unique: HashSet<_> = COLUMN_NAMES.iter().collect();
        assert_eq!(unique.len(), FEATURE_COUNT);
        assert_eq!(COLUMN_NAMES[0], "Flow Duration");
        assert_eq!(COLUMN_NAMES[FEATURE_COUNT - 1], "Idle Min");
    }

    #[test]
    fn vector_follows_column_order() {
        let packets = [fwd(0, 100), bwd(500, 300), fwd(2000, 50), bwd(4000, 10)];
        let flows = process_packets(&packets);
        let f = &flows[0].features;
        let named = f.named_values();
        let value = |name: &str| named.iter().find(|(n, _)| *n == name).map(|(_, v)| *v).unwrap();

        assert_eq!(value("Flow Duration"), 4_000_000.0);
        assert_eq!(value("Total Length of Bwd Packet"), 310.0);
        assert_eq!(value("Fwd Packet Length Max"), 100.0);
        assert_eq!(value("Fwd IAT Total"), 2_000_000.0);
        assert_eq!(value("Bwd IAT Total"), 3_500_000.0);
        assert_eq!(value("Down/Up Ratio"), 1.0);
        assert_eq!(value("Idle Max"), f.idle.max);
        assert_eq!(value("Active Mean"), f.active.mean);
    }

    #[test]
    fn flow_id_format() {
        let key = FlowKey::new(ipv4(10, 0, 0, 2), ipv4(10, 0, 0, 1), 443, 51000, 6);
        assert_eq!(key.flow_id(), "10.0.0.1-10.0.0.2-51000-443-6");
    }

    #[test]
    fn matrix_rows_match_flows() {
        let mut other = fwd(0, 10);
        other.src_ip = ipv4(9, 9, 9, 9);
        let flows = process_packets(&[fwd(0, 100), bwd(1, 200), other]);
        let m = feature_matrix(&flows);
        assert_eq!(m.dim(), (2, FEATURE_COUNT));
        for (row, flow) in m.rows().into_iter().zip(&flows) {
            assert_eq!(row[0], flow.features.flow_duration_us as f32);
            assert_eq!(row[1], flow.features.total_fwd_packets as f32);
        }
    }

    #[test]
    fn non_finite_values_become_zero() {
        assert_eq!(as_f32(f64::NAN), 0.0);
        assert_eq!(as_f32(f64::INFINITY), 0.0);
        assert_eq!(as_f32(1e300), 0.0);
        assert_eq!(as_f32(1.5), 1.5);
    }
}
