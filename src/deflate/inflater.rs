use super::symbols::{distance_for, length_for, CODE_LENGTH_ORDER};
use crate::bits::{BitReader, BitWriter};
use crate::crc32::Crc32;
use crate::error::{Error, Result};
use crate::huffman::fixed::{fixed_distance_lengths, fixed_literal_lengths};
use crate::huffman::{
    CanonicalDecoder, CODE_LENGTH_ALPHABET, DISTANCE_ALPHABET, END_OF_BLOCK, LITERAL_ALPHABET,
};
use crate::lz::{SlidingWindow, WINDOW_SIZE};
use crate::ProgressSink;
use std::io::{Read, Write};

/// DEFLATE decompressor. The history window persists across blocks, so a
/// back-reference may reach into any earlier block of the stream.
pub struct Inflater {
    crc: Crc32,
    window: SlidingWindow,
    literal: CanonicalDecoder,
    distance: CanonicalDecoder,
}

impl Inflater {
    pub fn new() -> Self {
        Self {
            crc: Crc32::new(),
            window: SlidingWindow::new(WINDOW_SIZE),
            literal: CanonicalDecoder::from_lengths(&[]),
            distance: CanonicalDecoder::from_lengths(&[]),
        }
    }

    /// CRC-32 of all output produced so far
    pub fn crc_value(&self) -> u32 {
        self.crc.value()
    }

    /// Decompress blocks from `input` to `output` until the block with
    /// BFINAL set has been consumed, returning the number of bytes
    /// produced. Trailing bits of the last byte are left unread; the
    /// caller byte-aligns before reading whatever follows.
    pub fn process<R: Read, W: Write>(
        &mut self,
        input: &mut BitReader<R>,
        output: &mut BitWriter<W>,
        mut progress: Option<&mut dyn ProgressSink>,
    ) -> Result<u64> {
        let mut total = 0u64;
        loop {
            let is_final = input.read_bit()?;
            let btype = input.read_bits(2)?;
            let produced = match btype {
                0 => self.stored_block(input, output)?,
                1 => {
                    self.literal = CanonicalDecoder::from_lengths(&fixed_literal_lengths());
                    self.distance = CanonicalDecoder::from_lengths(&fixed_distance_lengths());
                    self.huffman_block(input, output)?
                }
                2 => {
                    self.read_dynamic_tables(input)?;
                    self.huffman_block(input, output)?
                }
                t => return Err(Error::InvalidBlockType(t as u8)),
            };
            total += produced as u64;
            if let Some(sink) = progress.as_mut() {
                sink.bytes_processed(total);
            }
            if is_final {
                break;
            }
        }
        Ok(total)
    }

    fn stored_block<R: Read, W: Write>(
        &mut self,
        input: &mut BitReader<R>,
        output: &mut BitWriter<W>,
    ) -> Result<usize> {
        let len = input.read_u16_le()?;
        let nlen = input.read_u16_le()?;
        if len != !nlen {
            return Err(Error::StoredLengthMismatch { len, nlen });
        }
        let mut buf = vec![0u8; len as usize];
        input.read_exact(&mut buf)?;
        self.crc.update(&buf);
        self.window.extend(&buf);
        output.write_bytes(&buf)?;
        Ok(len as usize)
    }

    /// Parse the dynamic block header: code counts, the code-length code,
    /// then the run-length-encoded literal and distance code lengths
    fn read_dynamic_tables<R: Read>(&mut self, input: &mut BitReader<R>) -> Result<()> {
        let hlit = 257 + input.read_bits(5)? as usize;
        let hdist = 1 + input.read_bits(5)? as usize;
        let hclen = 4 + input.read_bits(4)? as usize;
        if hlit > LITERAL_ALPHABET {
            return Err(Error::InvalidCodeCount(hlit));
        }
        if hdist > DISTANCE_ALPHABET {
            return Err(Error::InvalidCodeCount(hdist));
        }

        let mut cl_lengths = [0u8; CODE_LENGTH_ALPHABET];
        for &sym in CODE_LENGTH_ORDER.iter().take(hclen) {
            cl_lengths[sym] = input.read_bits(3)? as u8;
        }
        let cl_decoder = CanonicalDecoder::from_lengths(&cl_lengths);

        let mut lengths: Vec<u8> = Vec::with_capacity(hlit + hdist);
        while lengths.len() < hlit + hdist {
            let sym = cl_decoder.decode(input)?;
            let (fill, repeat) = match sym {
                0..=15 => {
                    lengths.push(sym as u8);
                    continue;
                }
                16 => {
                    let Some(&prev) = lengths.last() else {
                        return Err(Error::InvalidCodeLengthRepeat);
                    };
                    (prev, 3 + input.read_bits(2)? as usize)
                }
                17 => (0, 3 + input.read_bits(3)? as usize),
                _ => (0, 11 + input.read_bits(7)? as usize),
            };
            if lengths.len() + repeat > hlit + hdist {
                return Err(Error::InvalidCodeLengthRepeat);
            }
            for _ in 0..repeat {
                lengths.push(fill);
            }
        }

        self.literal = CanonicalDecoder::from_lengths(&lengths[..hlit]);
        self.distance = CanonicalDecoder::from_lengths(&lengths[hlit..]);
        Ok(())
    }

    fn huffman_block<R: Read, W: Write>(
        &mut self,
        input: &mut BitReader<R>,
        output: &mut BitWriter<W>,
    ) -> Result<usize> {
        let mut produced = 0usize;
        loop {
            let sym = self.literal.decode(input)?;
            if sym == END_OF_BLOCK {
                return Ok(produced);
            }
            if sym < 256 {
                let byte = sym as u8;
                self.crc.update_byte(byte);
                self.window.push(byte);
                output.write_byte(byte)?;
                produced += 1;
                continue;
            }

            let (base, extra_bits) = length_for(sym).ok_or(Error::InvalidLengthCode(sym))?;
            let length = base as u32 + input.read_bits(extra_bits)?;
            let dist_sym = self.distance.decode(input)?;
            let (dist_base, dist_bits) =
                distance_for(dist_sym).ok_or(Error::InvalidDistanceCode(dist_sym))?;
            let distance = dist_base as u32 + input.read_bits(dist_bits)?;

            if distance as usize > self.window.len() {
                return Err(Error::InvalidBackReference {
                    distance: distance as u16,
                    available: self.window.len(),
                });
            }
            let bytes = self.window.copy_from_history(distance as usize, length as usize);
            self.crc.update(&bytes);
            self.window.extend(&bytes);
            output.write_bytes(&bytes)?;
            produced += bytes.len();
        }
    }
}

impl Default for Inflater {
    fn default() -> Self {
        Self::new()
    }
}
