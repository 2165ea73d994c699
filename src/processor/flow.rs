use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::io::{Cursor, Write};
use std::net::IpAddr;
use std::time::Duration;

use crate::types::Stats;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlowKey {
    pub src_ip: IpAddr,
    pub dst_ip: IpAddr,
    pub src_port: u16,
    pub dst_port: u16,
    pub protocol: u8,
}

impl FlowKey {
    /// Builds the canonical key: the textually smaller IP becomes the source,
    /// and when both IPs match the smaller port does. The protocol never takes
    /// part in the ordering.
    pub fn new(src_ip: IpAddr, dst_ip: IpAddr, src_port: u16, dst_port: u16, protocol: u8) -> Self {
        // Normalize flow key so both directions map to the same entry
        let swap = match cmp_ip_text(&src_ip, &dst_ip) {
            Ordering::Greater => true,
            Ordering::Equal => src_port > dst_port,
            Ordering::Less => false,
        };
        if swap {
            Self {
                src_ip: dst_ip,
                dst_ip: src_ip,
                src_port: dst_port,
                dst_port: src_port,
                protocol,
            }
        } else {
            Self { src_ip, dst_ip, src_port, dst_port, protocol }
        }
    }
}

// Longest textual IPv6 form, e.g. "ffff:ffff:ffff:ffff:ffff:ffff:255.255.255.255"
const MAX_IP_TEXT: usize = 45;

fn ip_text<'a>(ip: &IpAddr, buf: &'a mut [u8; MAX_IP_TEXT]) -> &'a [u8] {
    let len = {
        let mut cursor = Cursor::new(&mut buf[..]);
        // Cannot overflow, see MAX_IP_TEXT
        let _ = write!(cursor, "{ip}");
        cursor.position() as usize
    };
    &buf[..len]
}

// Same order as comparing `to_string()` forms, without allocating
fn cmp_ip_text(a: &IpAddr, b: &IpAddr) -> Ordering {
    let mut a_buf = [0u8; MAX_IP_TEXT];
    let mut b_buf = [0u8; MAX_IP_TEXT];
    ip_text(a, &mut a_buf).cmp(ip_text(b, &mut b_buf))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowDirection { Forward, Backward }

/// One fixed-shape feature record per flow.
///
/// Every field is written by exactly one pass in `processor::features`; a field
/// that no pass touches keeps its zero value, which is meaningful output (for
/// instance all `bwd_*` fields of a one-sided flow).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowFeatures {
    // Basic duration/rate
    pub flow_duration_us: u64,
    pub flow_bytes_per_sec: f64,
    pub flow_packets_per_sec: f64,

    // Packet counts and payload totals
    pub total_fwd_packets: u64,
    pub total_bwd_packets: u64,
    pub total_fwd_bytes: u64,
    pub total_bwd_bytes: u64,

    // Payload length statistics
    pub fwd_packet_len: Stats,
    pub bwd_packet_len: Stats,
    pub packet_len: Stats,
    pub min_packet_len: u32,
    pub max_packet_len: u32,
    pub packet_len_mean: f64,
    pub packet_len_std: f64,
    pub packet_len_var: f64,
    pub avg_packet_size: f64,
    pub fwd_segment_size_avg: f64,
    pub bwd_segment_size_avg: f64,

    // Inter-arrival times, stats in microseconds
    pub flow_iat: Stats,
    pub fwd_iat: Stats,
    pub bwd_iat: Stats,
    pub fwd_iat_total: Duration,
    pub bwd_iat_total: Duration,

    // Direction specific flags and header bytes
    pub fwd_psh_flags: u32,
    pub bwd_psh_flags: u32,
    pub fwd_urg_flags: u32,
    pub bwd_urg_flags: u32,
    pub fwd_header_len: u64,
    pub bwd_header_len: u64,

    // Flag counts
    pub fin_flag_count: u32,
    pub syn_flag_count: u32,
    pub rst_flag_count: u32,
    pub psh_flag_count: u32,
    pub ack_flag_count: u32,
    pub urg_flag_count: u32,
    pub cwr_flag_count: u32,
    pub ece_flag_count: u32,

    // Packet rate
    pub fwd_packets_per_sec: f64,
    pub bwd_packets_per_sec: f64,
    pub fwd_act_data_packets: u32,
    pub fwd_seg_size_min: u32,

    pub down_up_ratio: f64,

    // FWD/BWD bulk features
    pub fwd_bytes_bulk_avg: f64,
    pub fwd_packet_bulk_avg: f64,
    pub fwd_bulk_rate_avg: f64,
    pub bwd_bytes_bulk_avg: f64,
    pub bwd_packet_bulk_avg: f64,
    pub bwd_bulk_rate_avg: f64,

    // Subflow features
    pub subflow_fwd_packets: f64,
    pub subflow_fwd_bytes: f64,
    pub subflow_bwd_packets: f64,
    pub subflow_bwd_bytes: f64,

    // Active/Idle durations in microseconds
    pub active: Stats,
    pub idle: Stats,

    // Window features
    pub fwd_init_win_bytes: u32,
    pub bwd_init_win_bytes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowWithKey {
    pub key: FlowKey,
    pub features: FlowFeatures,
}
