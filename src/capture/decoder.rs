use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use etherparse::{NetHeaders, PacketHeaders, TransportHeader};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tracing::{debug, warn};

use super::packet::{RawPacket, TcpFlags};

const UDP_HEADER_LEN: u32 = 8;

/// Converts a pcap-style (seconds, microseconds) timestamp.
pub fn timestamp_from_parts(secs: i64, usecs: u32) -> Result<DateTime<Utc>> {
    if usecs >= 1_000_000 {
        return Err(anyhow!("microsecond part out of range: {usecs}"));
    }
    DateTime::from_timestamp(secs, usecs * 1_000)
        .ok_or_else(|| anyhow!("timestamp out of range: {secs}.{usecs:06}"))
}

/// Decodes one Ethernet II frame carrying TCP or UDP over IPv4 or IPv6.
///
/// `header_len` is the transport header only. `payload_len` is derived from
/// the IP length fields, so Ethernet padding never counts as payload.
pub fn decode_frame(timestamp: DateTime<Utc>, frame: &[u8]) -> Result<RawPacket> {
    let parsed = PacketHeaders::from_ethernet_slice(frame).context("parse ethernet frame")?;

    // Bytes after the IP header and its extensions
    let (src_ip, dst_ip, ip_payload_len) = match &parsed.net {
        Some(NetHeaders::Ipv4(ipv4, exts)) => (
            IpAddr::V4(Ipv4Addr::from(ipv4.source)),
            IpAddr::V4(Ipv4Addr::from(ipv4.destination)),
            (ipv4.total_len as u32)
                .saturating_sub(ipv4.header_len() as u32)
                .saturating_sub(exts.header_len() as u32),
        ),
        Some(NetHeaders::Ipv6(ipv6, exts)) => (
            IpAddr::V6(Ipv6Addr::from(ipv6.source)),
            IpAddr::V6(Ipv6Addr::from(ipv6.destination)),
            (ipv6.payload_length as u32).saturating_sub(exts.header_len() as u32),
        ),
        _ => return Err(anyhow!("not an IP packet")),
    };

    let (src_port, dst_port, flags, tcp_window, header_len, protocol) = match &parsed.transport {
        Some(TransportHeader::Tcp(tcp)) => {
            let flags = TcpFlags {
                fin: tcp.fin,
                syn: tcp.syn,
                rst: tcp.rst,
                psh: tcp.psh,
                ack: tcp.ack,
                urg: tcp.urg,
                ece: tcp.ece,
                cwr: tcp.cwr,
            };
            (
                tcp.source_port,
                tcp.destination_port,
                flags,
                tcp.window_size,
                tcp.data_offset() as u32 * 4,
                6,
            )
        }
        Some(TransportHeader::Udp(udp)) => (
            udp.source_port,
            udp.destination_port,
            TcpFlags::default(),
            0,
            UDP_HEADER_LEN,
            17,
        ),
        _ => return Err(anyhow!("not a TCP or UDP packet")),
    };

    Ok(RawPacket {
        timestamp,
        header_len,
        payload_len: ip_payload_len.saturating_sub(header_len),
        tcp_window,
        src_ip,
        dst_ip,
        src_port,
        dst_port,
        protocol,
        flags,
    })
}

/// Decodes a batch of timestamped frames, skipping the ones that are not
/// TCP/UDP over IP.
pub fn decode_frames<'a, I>(frames: I) -> Vec<RawPacket>
where
    I: IntoIterator<Item = (DateTime<Utc>, &'a [u8])>,
{
    let mut out = Vec::new();
    let mut skipped = 0usize;
    for (timestamp, frame) in frames {
        match decode_frame(timestamp, frame) {
            Ok(pkt) => out.push(pkt),
            Err(e) => {
                skipped += 1;
                debug!(%timestamp, len = frame.len(), "skipping frame: {e:#}");
            }
        }
    }
    if skipped > 0 {
        warn!(decoded = out.len(), skipped, "some frames could not be decoded");
    }
    out
}
