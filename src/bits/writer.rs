use crate::error::Result;
use std::io::Write;

/// Bit-level writer for DEFLATE output.
///
/// Bits accumulate LSB-first into a one-byte queue and are written through
/// to the underlying stream as each byte fills. Canonical Huffman codes are
/// the one exception to the LSB-first rule: the standard packs them with the
/// most-significant bit of the code first, via [`BitWriter::write_bits_rev`].
pub struct BitWriter<W: Write> {
    inner: W,
    /// Byte currently being assembled
    bit_buf: u8,
    /// Next bit position within `bit_buf`, always in 0..8
    bit_pos: u8,
    /// Total bytes written to the underlying stream
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, bit_buf: 0, bit_pos: 0, bytes_written: 0 }
    }

    fn put_byte(&mut self, byte: u8) -> Result<()> {
        self.inner.write_all(&[byte])?;
        self.bytes_written += 1;
        Ok(())
    }

    /// Write the low `n` bits of `value`, LSB first
    pub fn write_bits(&mut self, value: u32, n: u8) -> Result<()> {
        debug_assert!(n <= 24);
        for m in 0..n {
            self.bit_buf |= (((value >> m) & 1) as u8) << self.bit_pos;
            self.bit_pos += 1;
            if self.bit_pos == 8 {
                let byte = self.bit_buf;
                self.put_byte(byte)?;
                self.bit_buf = 0;
                self.bit_pos = 0;
            }
        }
        Ok(())
    }

    /// Write the low `n` bits of `value` with the most-significant bit of
    /// the field first. Used only for canonical Huffman codes.
    pub fn write_bits_rev(&mut self, value: u32, n: u8) -> Result<()> {
        debug_assert!(n <= 24);
        for m in (0..n).rev() {
            self.bit_buf |= (((value >> m) & 1) as u8) << self.bit_pos;
            self.bit_pos += 1;
            if self.bit_pos == 8 {
                let byte = self.bit_buf;
                self.put_byte(byte)?;
                self.bit_buf = 0;
                self.bit_pos = 0;
            }
        }
        Ok(())
    }

    /// Pad the final partial byte with one-bits until byte-aligned
    pub fn flush_bits(&mut self) -> Result<()> {
        if self.bit_pos > 0 {
            let n = 8 - self.bit_pos;
            self.write_bits(0xFF, n)?;
        }
        Ok(())
    }

    /// Write a whole byte; routed through the bit queue when unaligned
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        if self.bit_pos == 0 {
            self.put_byte(byte)
        } else {
            self.write_bits(byte as u32, 8)
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if self.bit_pos == 0 {
            self.inner.write_all(bytes)?;
            self.bytes_written += bytes.len() as u64;
            Ok(())
        } else {
            for &b in bytes {
                self.write_bits(b as u32, 8)?;
            }
            Ok(())
        }
    }

    /// Write a 16-bit value little-endian
    pub fn write_u16_le(&mut self, value: u16) -> Result<()> {
        self.write_byte(value as u8)?;
        self.write_byte((value >> 8) as u8)
    }

    /// Write a 32-bit value little-endian
    pub fn write_u32_le(&mut self, value: u32) -> Result<()> {
        for shift in [0, 8, 16, 24] {
            self.write_byte((value >> shift) as u8)?;
        }
        Ok(())
    }

    /// Bits queued past the last byte boundary, in 0..8
    pub fn bit_position(&self) -> u8 {
        self.bit_pos
    }

    /// Total bytes written to the underlying stream
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Hand back the underlying stream. Queued bits are dropped; call
    /// [`BitWriter::flush_bits`] first.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_bits_lsb_first() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0b011, 3).unwrap();
        writer.write_bits(0b11010, 5).unwrap();
        assert_eq!(writer.into_inner(), vec![0xD3]);
    }

    #[test]
    fn test_write_bits_cross_byte() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0xFFF, 12).unwrap();
        writer.flush_bits().unwrap();
        // high nibble of the second byte is one-padding
        assert_eq!(writer.into_inner(), vec![0xFF, 0xFF]);
    }

    #[test]
    fn test_write_bits_rev() {
        let mut writer = BitWriter::new(Vec::new());
        // 0b1100 emitted MSB-first lands as 0011 in stream order
        writer.write_bits_rev(0b1100, 4).unwrap();
        writer.write_bits(0, 4).unwrap();
        assert_eq!(writer.into_inner(), vec![0b0000_0011]);
    }

    #[test]
    fn test_flush_pads_with_ones() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0, 3).unwrap();
        writer.flush_bits().unwrap();
        assert_eq!(writer.into_inner(), vec![0b1111_1000]);
    }

    #[test]
    fn test_flush_when_aligned_is_noop() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_byte(0x42).unwrap();
        writer.flush_bits().unwrap();
        assert_eq!(writer.into_inner(), vec![0x42]);
    }

    #[test]
    fn test_byte_level_writes() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_u16_le(0x1234).unwrap();
        writer.write_u32_le(0x12345678).unwrap();
        assert_eq!(writer.bytes_written(), 6);
        assert_eq!(writer.into_inner(), vec![0x34, 0x12, 0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_unaligned_byte_goes_through_queue() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0b1, 1).unwrap();
        writer.write_byte(0xFF).unwrap();
        writer.flush_bits().unwrap();
        let out = writer.into_inner();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], 0xFF);
        assert_eq!(out[1] & 1, 1);
    }
}
