//! Streaming CRC-32 over the gzip/Ethernet polynomial (reflected form).

use std::sync::LazyLock;

/// Byte-at-a-time table for polynomial 0xEDB88320, one entry per 8-bit
/// message. Built once; shared read-only by every stream.
static CRC_TABLE: LazyLock<[u32; 256]> = LazyLock::new(|| {
    let mut table = [0u32; 256];
    for (n, entry) in table.iter_mut().enumerate() {
        let mut c = n as u32;
        for _ in 0..8 {
            c = if c & 1 != 0 { (c >> 1) ^ 0xEDB8_8320 } else { c >> 1 };
        }
        *entry = c;
    }
    table
});

/// Incremental CRC-32 accumulator.
///
/// The accumulator is bit-inverted at initialization and again at read-out,
/// so the public value of an empty stream is zero.
#[derive(Clone, Debug)]
pub struct Crc32 {
    crc: u32,
}

impl Crc32 {
    pub fn new() -> Self {
        Self { crc: 0xFFFF_FFFF }
    }

    /// Fold one byte into the checksum
    #[inline]
    pub fn update_byte(&mut self, byte: u8) {
        let index = ((self.crc ^ byte as u32) & 0xFF) as usize;
        self.crc = (self.crc >> 8) ^ CRC_TABLE[index];
    }

    /// Fold a byte sequence into the checksum
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.update_byte(byte);
        }
    }

    /// The public checksum value for everything fed so far
    pub fn value(&self) -> u32 {
        !self.crc
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}
