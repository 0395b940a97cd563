//! Packet framing for raw TCP reads
//!
//! Clients either terminate packets with `\n` or send exactly one packet per
//! write with no terminator. The framer serves both: complete lines are
//! always packets, and until a peer has sent its first newline, whatever is
//! left at the end of a read is taken as a packet too. Once a newline has been
//! seen, a trailing fragment is buffered until its terminator arrives.

/// Longest packet kept in the buffer before it is flushed as-is
pub const MAX_PACKET_LEN: usize = 1024;

/// Per-connection framing state
#[derive(Debug, Default)]
pub struct PacketFramer {
    pending: Vec<u8>,
    newline_delimited: bool,
}

impl PacketFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the peer has terminated a packet with `\n`
    pub fn is_newline_delimited(&self) -> bool {
        self.newline_delimited
    }

    /// Feed one read's worth of bytes, returning every packet it completes
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut packets = Vec::new();
        self.pending.extend_from_slice(chunk);

        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            self.newline_delimited = true;
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            push_packet(&mut packets, &line);
        }

        if !self.newline_delimited || self.pending.len() >= MAX_PACKET_LEN {
            let rest = std::mem::take(&mut self.pending);
            push_packet(&mut packets, &rest);
        }
        packets
    }

    /// Flush a trailing fragment when the peer closes
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.pending);
        let mut packets = Vec::new();
        push_packet(&mut packets, &rest);
        packets.pop()
    }
}

fn push_packet(packets: &mut Vec<String>, raw: &[u8]) {
    let text = String::from_utf8_lossy(raw);
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        packets.push(trimmed.to_string());
    }
}
