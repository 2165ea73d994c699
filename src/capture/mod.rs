pub mod decoder;
pub mod direction;
mod packet;

pub use decoder::{decode_frame, decode_frames, timestamp_from_parts};
pub use direction::assign_directions;
pub use packet::{PacketInfo, RawPacket, TcpFlags};
