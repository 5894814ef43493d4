use crate::error::{Error, Result};
use std::io::Read;

/// Bit-level reader for DEFLATE streams.
///
/// DEFLATE packs all fields LSB-first within each byte, so bits are handed
/// out from the least-significant end of a one-byte queue. Byte-oriented
/// reads are little-endian and implicitly drop any queued bits.
pub struct BitReader<R: Read> {
    inner: R,
    /// Byte currently being consumed bit by bit
    bit_buf: u8,
    /// Next bit position within `bit_buf`, always in 0..8
    bit_pos: u8,
    /// Total bytes consumed from the underlying stream
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, bit_buf: 0, bit_pos: 0, bytes_read: 0 }
    }

    fn fetch_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Err(Error::UnexpectedEof),
                Ok(_) => {
                    self.bytes_read += 1;
                    return Ok(byte[0]);
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }

    /// Read `n` bits (0-24) in LSB-first order
    pub fn read_bits(&mut self, n: u8) -> Result<u32> {
        debug_assert!(n <= 24);
        let mut value = 0u32;
        for m in 0..n {
            if self.bit_pos == 0 {
                self.bit_buf = self.fetch_byte()?;
            }
            value |= (((self.bit_buf >> self.bit_pos) & 1) as u32) << m;
            self.bit_pos = (self.bit_pos + 1) & 7;
        }
        Ok(value)
    }

    /// Read a single bit
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Discard any queued bits so the next read starts on a byte boundary
    pub fn align_to_byte(&mut self) {
        self.bit_buf = 0;
        self.bit_pos = 0;
    }

    /// Read a whole byte (aligns first)
    pub fn read_byte(&mut self) -> Result<u8> {
        self.align_to_byte();
        self.fetch_byte()
    }

    /// Read a 16-bit little-endian value (aligns first)
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let lo = self.read_byte()? as u16;
        let hi = self.fetch_byte()? as u16;
        Ok(lo | (hi << 8))
    }

    /// Read a 32-bit little-endian value (aligns first)
    pub fn read_u32_le(&mut self) -> Result<u32> {
        self.align_to_byte();
        let mut value = 0u32;
        for shift in [0, 8, 16, 24] {
            value |= (self.fetch_byte()? as u32) << shift;
        }
        Ok(value)
    }

    /// Fill `buf` exactly; end of stream mid-way is an error (aligns first)
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.align_to_byte();
        for b in buf.iter_mut() {
            *b = self.fetch_byte()?;
        }
        Ok(())
    }

    /// Fill as much of `buf` as the stream provides, returning the count.
    /// Zero means end of stream. Used by the compressor to pull input
    /// chunks; tolerates short reads and interrupts.
    pub fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.align_to_byte();
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => {
                    filled += n;
                    self.bytes_read += n as u64;
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }
        Ok(filled)
    }

    /// Total bytes consumed from the underlying stream
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bits_lsb_first() {
        // 0xD3 = 11010011: LSB-first the low three bits are 011
        let data = [0xD3u8, 0xAA];
        let mut reader = BitReader::new(data.as_slice());
        assert_eq!(reader.read_bits(3).unwrap(), 0b011);
        assert_eq!(reader.read_bits(5).unwrap(), 0b11010);
        assert_eq!(reader.read_bits(8).unwrap(), 0xAA);
    }

    #[test]
    fn test_read_bits_cross_byte() {
        let data = [0xFFu8, 0x00];
        let mut reader = BitReader::new(data.as_slice());
        assert_eq!(reader.read_bits(12).unwrap(), 0x0FF);
    }

    #[test]
    fn test_read_bit() {
        let data = [0b1011_0001u8];
        let mut reader = BitReader::new(data.as_slice());
        let bits: Vec<bool> = (0..8).map(|_| reader.read_bit().unwrap()).collect();
        assert_eq!(bits, [true, false, false, false, true, true, false, true]);
    }

    #[test]
    fn test_align_discards_partial_byte() {
        let data = [0xFFu8, 0xAB];
        let mut reader = BitReader::new(data.as_slice());
        reader.read_bits(3).unwrap();
        reader.align_to_byte();
        assert_eq!(reader.read_bits(8).unwrap(), 0xAB);
    }

    #[test]
    fn test_byte_level_reads() {
        let data = [0x34u8, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut reader = BitReader::new(data.as_slice());
        assert_eq!(reader.read_u16_le().unwrap(), 0x1234);
        assert_eq!(reader.read_u32_le().unwrap(), 0x12345678);
        assert_eq!(reader.bytes_read(), 6);
    }

    #[test]
    fn test_eof_is_an_error() {
        let data = [0x01u8];
        let mut reader = BitReader::new(data.as_slice());
        reader.read_bits(8).unwrap();
        assert!(matches!(reader.read_bits(1), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_read_chunk_partial() {
        let data = [1u8, 2, 3];
        let mut reader = BitReader::new(data.as_slice());
        let mut buf = [0u8; 8];
        assert_eq!(reader.read_chunk(&mut buf).unwrap(), 3);
        assert_eq!(reader.read_chunk(&mut buf).unwrap(), 0);
    }
}
