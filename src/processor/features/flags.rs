use crate::capture::PacketInfo;
use crate::processor::flow::FlowFeatures;

impl FlowFeatures {
    /// Writes the eight `*_flag_count` fields, `{fwd,bwd}_{psh,urg}_flags` and
    /// `{fwd,bwd}_header_len`. A packet with several flags set bumps each counter.
    pub(crate) fn compute_flags(&mut self, packets: &[PacketInfo]) {
        for p in packets {
            let flags = &p.flags;
            if p.is_forward() {
                if flags.psh { self.fwd_psh_flags += 1; }
                if flags.urg { self.fwd_urg_flags += 1; }
                self.fwd_header_len += p.header_len as u64;
            } else {
                if flags.psh { self.bwd_psh_flags += 1; }
                if flags.urg { self.bwd_urg_flags += 1; }
                self.bwd_header_len += p.header_len as u64;
            }
            if flags.fin { self.fin_flag_count += 1; }
            if flags.syn { self.syn_flag_count += 1; }
            if flags.rst { self.rst_flag_count += 1; }
            if flags.psh { self.psh_flag_count += 1; }
            if flags.ack { self.ack_flag_count += 1; }
            if flags.urg { self.urg_flag_count += 1; }
            if flags.cwr { self.cwr_flag_count += 1; }
            if flags.ece { self.ece_flag_count += 1; }
        }
    }

    pub(crate) fn compute_init_win(&mut self, packets: &[PacketInfo]) {
        // First forward packet, but the last backward one
        if let Some(p) = packets.iter().find(|p| p.is_forward()) {
            self.fwd_init_win_bytes = p.tcp_window as u32;
        }
        if let Some(p) = packets.iter().rev().find(|p| !p.is_forward()) {
            self.bwd_init_win_bytes = p.tcp_window as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::capture::TcpFlags;
    use crate::processor::FlowFeatures;
    use crate::testutil::{bwd, fwd};

    #[test]
    fn counts_every_flag_and_direction() {
        let mut syn = fwd(0, 0);
        syn.flags = TcpFlags { syn: true, ..TcpFlags::default() };
        syn.header_len = 40;
        let mut syn_ack = bwd(1, 0);
        syn_ack.flags = TcpFlags { syn: true, ack: true, ..TcpFlags::default() };
        syn_ack.header_len = 40;
        let mut push = fwd(2, 100);
        push.flags = TcpFlags::from_bits(0x38); // PSH | ACK | URG
        push.header_len = 32;
        let mut fin = bwd(3, 0);
        fin.flags = TcpFlags { fin: true, ack: true, cwr: true, ece: true, psh: true, ..TcpFlags::default() };
        fin.header_len = 20;

        let mut f = FlowFeatures::default();
        f.compute_flags(&[syn, syn_ack, push, fin]);

        assert_eq!(f.syn_flag_count, 2);
        assert_eq!(f.ack_flag_count, 3);
        assert_eq!(f.fin_flag_count, 1);
        assert_eq!(f.psh_flag_count, 2);
        assert_eq!(f.urg_flag_count, 1);
        assert_eq!(f.cwr_flag_count, 1);
        assert_eq!(f.ece_flag_count, 1);
        assert_eq!(f.rst_flag_count, 0);
        assert_eq!((f.fwd_psh_flags, f.bwd_psh_flags), (1, 1));
        assert_eq!((f.fwd_urg_flags, f.bwd_urg_flags), (1, 0));
        assert_eq!((f.fwd_header_len, f.bwd_header_len), (72, 60));
    }

    #[test]
    fn init_window_takes_first_forward_and_last_backward() {
        let mut packets = vec![bwd(0, 0), fwd(1, 0), fwd(2, 0), bwd(3, 0), bwd(4, 0)];
        for (p, win) in packets.iter_mut().zip([100u16, 8192, 4096, 300, 65535]) {
            p.tcp_window = win;
        }
        let mut f = FlowFeatures::default();
        f.compute_init_win(&packets);
        assert_eq!(f.fwd_init_win_bytes, 8192);
        assert_eq!(f.bwd_init_win_bytes, 65535);
    }

    #[test]
    fn init_window_zero_without_that_direction() {
        let mut only_fwd = fwd(0, 0);
        only_fwd.tcp_window = 1024;
        let mut f = FlowFeatures::default();
        f.compute_init_win(&[only_fwd]);
        assert_eq!(f.fwd_init_win_bytes, 1024);
        assert_eq!(f.bwd_init_win_bytes, 0);
    }
}
