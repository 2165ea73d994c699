use chrono::{DateTime, Duration, TimeZone, Utc};
use std::net::{IpAddr, Ipv4Addr};

use crate::capture::{PacketInfo, RawPacket, TcpFlags};
use crate::processor::FlowDirection;

pub fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

pub fn at_ms(ms: i64) -> DateTime<Utc> {
    base() + Duration::milliseconds(ms)
}

pub fn ipv4(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(a, b, c, d))
}

// Directed packet on 1.1.1.1:1 <-> 2.2.2.2:2 over TCP.
pub fn pkt(ms: i64, direction: FlowDirection, payload_len: u32) -> PacketInfo {
    PacketInfo {
        timestamp: at_ms(ms),
        direction,
        header_len: 0,
        payload_len,
        tcp_window: 0,
        src_ip: ipv4(1, 1, 1, 1),
        dst_ip: ipv4(2, 2, 2, 2),
        src_port: 1,
        dst_port: 2,
        protocol: 6,
        flags: TcpFlags::default(),
    }
}

pub fn fwd(ms: i64, payload_len: u32) -> PacketInfo {
    pkt(ms, FlowDirection::Forward, payload_len)
}

pub fn bwd(ms: i64, payload_len: u32) -> PacketInfo {
    pkt(ms, FlowDirection::Backward, payload_len)
}

// Undirected TCP packet from `src:sport` to `dst:dport`.
pub fn raw(ms: i64, src: IpAddr, sport: u16, dst: IpAddr, dport: u16) -> RawPacket {
    RawPacket {
        timestamp: at_ms(ms),
        header_len: 20,
        payload_len: 0,
        tcp_window: 0,
        src_ip: src,
        dst_ip: dst,
        src_port: sport,
        dst_port: dport,
        protocol: 6,
        flags: TcpFlags::default(),
    }
}
