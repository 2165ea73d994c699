use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::processor::{FlowDirection, FlowKey};

/// The eight TCP control flags. All false for non-TCP packets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TcpFlags {
    pub fin: bool,
    pub syn: bool,
    pub rst: bool,
    pub psh: bool,
    pub ack: bool,
    pub urg: bool,
    pub ece: bool,
    pub cwr: bool,
}

impl TcpFlags {
    /// Decodes the flag byte of a TCP header (FIN is bit 0, CWR bit 7).
    pub fn from_bits(bits: u8) -> Self {
        Self {
            fin: bits & 0x01 != 0,
            syn: bits & 0x02 != 0,
            rst: bits & 0x04 != 0,
            psh: bits & 0x08 != 0,
            ack: bits & 0x10 != 0,
            urg: bits & 0x20 != 0,
            ece: bits & 0x40 != 0,
            cwr: bits & 0x80 != 0,
        }
    }
}

/// A decoded packet as seen on the wire, before any direction is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPacket {
    pub timestamp: DateTime<Utc>,
    pub header_len: u32,
    pub payload_len: u32,
    pub tcp_window: u16,
    pub src_ip: IpAddr,
    pub dst_ip: IpAddr,
    pub src_port: u16,
    pub dst_port: u16,
    pub protocol: u8,
    pub flags: TcpFlags,
}

impl RawPacket {
    pub fn flow_key(&self) -> FlowKey {
        FlowKey::new(self.src_ip, self.dst_ip, self.src_port, self.dst_port, self.protocol)
    }
}

/// A packet with its direction inside the flow already assigned. Lengths are
/// transport header and transport payload bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketInfo {
    pub timestamp: DateTime<Utc>,
    pub direction: FlowDirection,
    pub header_len: u32,
    pub payload_len: u32,
    pub tcp_window: u16,
    pub src_ip: IpAddr,
    pub dst_ip: IpAddr,
    pub src_port: u16,
    pub dst_port: u16,
    pub protocol: u8,
    pub flags: TcpFlags,
}

impl PacketInfo {
    pub fn flow_key(&self) -> FlowKey {
        FlowKey::new(self.src_ip, self.dst_ip, self.src_port, self.dst_port, self.protocol)
    }

    #[inline]
    pub fn is_forward(&self) -> bool {
        self.direction == FlowDirection::Forward
    }

    // Whole microseconds since the epoch
    #[inline]
    pub fn micros(&self) -> i64 {
        self.timestamp.timestamp_micros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_flag_bits() {
        let flags = TcpFlags { syn: true, ack: true, ..TcpFlags::default() };
        assert_eq!(TcpFlags::from_bits(0x12), flags);
        let all = TcpFlags::from_bits(0xff);
        assert!(all.fin && all.syn && all.rst && all.psh && all.ack && all.urg && all.ece && all.cwr);
        assert_eq!(TcpFlags::from_bits(0), TcpFlags::default());
    }

    #[test]
    fn cwr_and_ece_use_the_high_bits() {
        let flags = TcpFlags::from_bits(0xc0);
        assert!(flags.cwr && flags.ece);
        assert!(!flags.fin && !flags.urg);
    }
}
