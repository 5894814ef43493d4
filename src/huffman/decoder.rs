use crate::bits::BitReader;
use crate::error::{Error, Result};
use std::io::Read;

/// Decodes canonical Huffman codes one bit at a time.
///
/// Per code length the table stores the smallest (first) canonical code,
/// the number of codes, and where that length's symbols start in a single
/// list sorted by (length, symbol). A partial code of `n` bits is a hit
/// when it falls inside the `n`-bit range; canonical codes guarantee the
/// ranges are disjoint across lengths.
pub struct CanonicalDecoder {
    max_bits: u8,
    counts: [u32; 16],
    first_code: [u32; 16],
    first_index: [usize; 16],
    symbols: Vec<u16>,
}

impl CanonicalDecoder {
    pub fn from_lengths(lengths: &[u8]) -> Self {
        let mut counts = [0u32; 16];
        let mut max_bits = 0u8;
        for &len in lengths {
            if len > 0 {
                counts[len as usize] += 1;
                max_bits = max_bits.max(len);
            }
        }

        let mut first_code = [0u32; 16];
        let mut first_index = [0usize; 16];
        let mut code = 0u32;
        let mut index = 0usize;
        for bits in 1..16 {
            code = (code + counts[bits - 1]) << 1;
            first_code[bits] = code;
            first_index[bits] = index;
            index += counts[bits] as usize;
        }

        // symbols sorted by (length, symbol); symbol order within a length
        // falls out of the outer scan being in length order
        let mut symbols = Vec::with_capacity(index);
        for bits in 1..16u8 {
            for (sym, &len) in lengths.iter().enumerate() {
                if len == bits {
                    symbols.push(sym as u16);
                }
            }
        }

        Self { max_bits, counts, first_code, first_index, symbols }
    }

    /// Read bits MSB-first until they form a code, and return its symbol.
    /// Fails with [`Error::UndecodableSymbol`] once more bits than the
    /// longest code have been consumed without a hit.
    pub fn decode<R: Read>(&self, reader: &mut BitReader<R>) -> Result<u16> {
        let mut code = 0u32;
        for bits in 1..=self.max_bits as usize {
            code = (code << 1) | reader.read_bits(1)?;
            let count = self.counts[bits];
            if count > 0 && code >= self.first_code[bits] && code - self.first_code[bits] < count {
                let offset = (code - self.first_code[bits]) as usize;
                return Ok(self.symbols[self.first_index[bits] + offset]);
            }
        }
        Err(Error::UndecodableSymbol { max_bits: self.max_bits })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BitWriter;
    use crate::huffman::fixed::fixed_literal_lengths;
    use crate::huffman::CodeTable;

    fn encode_symbols(table: &CodeTable, symbols: &[usize]) -> Vec<u8> {
        let mut writer = BitWriter::new(Vec::new());
        for &sym in symbols {
            writer.write_bits_rev(table.code(sym), table.length(sym)).unwrap();
        }
        writer.flush_bits().unwrap();
        writer.into_inner()
    }

    #[test]
    fn test_decode_two_symbol_code() {
        let decoder = CanonicalDecoder::from_lengths(&[1, 1]);
        // stream 0b...10 decodes LSB-first as symbol 0 then symbol 1
        let data = [0b0000_0010u8];
        let mut reader = BitReader::new(data.as_slice());
        assert_eq!(decoder.decode(&mut reader).unwrap(), 0);
        assert_eq!(decoder.decode(&mut reader).unwrap(), 1);
    }

    #[test]
    fn test_decode_inverts_encode() {
        let lengths = [3u8, 3, 3, 3, 3, 2, 4, 4];
        let table = CodeTable::from_lengths(&lengths);
        let decoder = CanonicalDecoder::from_lengths(&lengths);
        let symbols = [5usize, 0, 7, 3, 6, 5, 1];
        let data = encode_symbols(&table, &symbols);
        let mut reader = BitReader::new(data.as_slice());
        for &sym in &symbols {
            assert_eq!(decoder.decode(&mut reader).unwrap(), sym as u16);
        }
    }

    #[test]
    fn test_decode_fixed_literal_codes() {
        let lengths = fixed_literal_lengths();
        let table = CodeTable::from_lengths(&lengths);
        let decoder = CanonicalDecoder::from_lengths(&lengths);
        let symbols = [0usize, 143, 144, 255, 256, 279, 280, 287, 65];
        let data = encode_symbols(&table, &symbols);
        let mut reader = BitReader::new(data.as_slice());
        for &sym in &symbols {
            assert_eq!(decoder.decode(&mut reader).unwrap(), sym as u16);
        }
    }

    #[test]
    fn test_undecodable_bits_are_an_error() {
        // only codes 0 and 10 exist; 11... never resolves
        let decoder = CanonicalDecoder::from_lengths(&[1, 2]);
        let data = [0xFFu8];
        let mut reader = BitReader::new(data.as_slice());
        assert!(matches!(
            decoder.decode(&mut reader),
            Err(Error::UndecodableSymbol { max_bits: 2 })
        ));
    }
}
