use super::symbols::{distance_symbol, length_symbol, CODE_LENGTH_ORDER};
use super::tokens::{FrequencyTable, Token};
use super::CHUNK_SIZE;
use crate::bits::{BitReader, BitWriter};
use crate::crc32::Crc32;
use crate::error::Result;
use crate::huffman::{
    pack_code_lengths, CodeTable, END_OF_BLOCK, FIXED_DISTANCE, FIXED_LITERAL, MAX_CODE_BITS,
    MAX_CODE_LENGTH_BITS,
};
use crate::lz::{SlidingWindow, WINDOW_SIZE};
use crate::{BlockMode, CodecConfig, ProgressSink};
use std::io::{Read, Write};

/// An encoded block held back until we know whether another block follows.
///
/// The block's bits were laid down from a byte-aligned start; `rem` is the
/// number of significant bits in the last byte (0 meaning the block ends
/// byte-aligned). Replaying through the output writer re-packs the bits at
/// whatever alignment the stream has reached.
struct PendingBlock {
    data: Vec<u8>,
    rem: u8,
}

/// DEFLATE compressor. Consumes input in 32 KiB chunks, each chunk
/// becoming one block, and buffers one encoded block so the final block
/// can carry the BFINAL bit.
pub struct Deflater {
    mode: BlockMode,
    lz77: bool,
    crc: Crc32,
    window: SlidingWindow,
    pending: Option<PendingBlock>,
}

impl Deflater {
    pub fn new(config: &CodecConfig) -> Self {
        Self {
            mode: config.mode,
            lz77: config.lz77,
            crc: Crc32::new(),
            window: SlidingWindow::new(WINDOW_SIZE),
            pending: None,
        }
    }

    /// CRC-32 of all input consumed so far
    pub fn crc_value(&self) -> u32 {
        self.crc.value()
    }

    /// Compress `input` to `output` until end of stream, returning the
    /// number of uncompressed bytes consumed. Empty input still produces
    /// one (empty) block so the stream stays well-formed. The output is
    /// left byte-aligned.
    pub fn process<R: Read, W: Write>(
        &mut self,
        input: &mut BitReader<R>,
        output: &mut BitWriter<W>,
        mut progress: Option<&mut dyn ProgressSink>,
    ) -> Result<u64> {
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut total = 0u64;
        loop {
            let n = input.read_chunk(&mut buf)?;
            if n == 0 {
                break;
            }
            let chunk = &buf[..n];
            if let Some(block) = self.pending.take() {
                self.write_block(output, &block, false)?;
            }
            self.crc.update(chunk);
            total += n as u64;
            self.pending = Some(self.encode_block(chunk)?);
            if let Some(sink) = progress.as_mut() {
                sink.bytes_processed(total);
            }
        }

        let last = match self.pending.take() {
            Some(block) => block,
            None => self.encode_block(&[])?,
        };
        self.write_block(output, &last, true)?;
        output.flush_bits()?;
        Ok(total)
    }

    fn encode_block(&mut self, chunk: &[u8]) -> Result<PendingBlock> {
        match self.mode {
            BlockMode::Stored => self.encode_stored(chunk),
            BlockMode::Fixed | BlockMode::Dynamic => self.encode_huffman(chunk),
        }
    }

    fn encode_stored(&mut self, chunk: &[u8]) -> Result<PendingBlock> {
        let mut w = BitWriter::new(Vec::new());
        w.write_u16_le(chunk.len() as u16)?;
        w.write_u16_le(!(chunk.len() as u16))?;
        w.write_bytes(chunk)?;
        self.window.extend(chunk);
        Ok(PendingBlock { data: w.into_inner(), rem: 0 })
    }

    fn encode_huffman(&mut self, chunk: &[u8]) -> Result<PendingBlock> {
        let mut tokens = Vec::new();
        let mut freq = FrequencyTable::new();
        let mut i = 0;
        while i < chunk.len() {
            let found = if self.lz77 { self.window.find_match(chunk, i) } else { None };
            let token = match found {
                Some(m) => {
                    self.window.extend(&chunk[i..i + m.length as usize]);
                    i += m.length as usize;
                    Token::Reference(m)
                }
                None => {
                    self.window.push(chunk[i]);
                    i += 1;
                    Token::Literal(chunk[i - 1])
                }
            };
            freq.record(token);
            tokens.push(token);
        }
        freq.end_block();

        let dynamic = (self.mode == BlockMode::Dynamic).then(|| {
            (
                CodeTable::from_frequencies(&freq.literal, MAX_CODE_BITS),
                CodeTable::from_frequencies(&freq.distance, MAX_CODE_BITS),
            )
        });
        let (lit, dist): (&CodeTable, &CodeTable) = match &dynamic {
            Some((lit, dist)) => (lit, dist),
            None => (&*FIXED_LITERAL, &*FIXED_DISTANCE),
        };

        let mut w = BitWriter::new(Vec::new());
        if dynamic.is_some() {
            write_dynamic_header(&mut w, lit, dist)?;
        }
        for token in tokens {
            match token {
                Token::Literal(byte) => {
                    let sym = byte as usize;
                    w.write_bits_rev(lit.code(sym), lit.length(sym))?;
                }
                Token::Reference(m) => {
                    let (sym, extra, bits) = length_symbol(m.length);
                    w.write_bits_rev(lit.code(sym as usize), lit.length(sym as usize))?;
                    w.write_bits(extra as u32, bits)?;
                    let (sym, extra, bits) = distance_symbol(m.distance);
                    w.write_bits_rev(dist.code(sym as usize), dist.length(sym as usize))?;
                    w.write_bits(extra as u32, bits)?;
                }
            }
        }
        let eob = END_OF_BLOCK as usize;
        w.write_bits_rev(lit.code(eob), lit.length(eob))?;

        let rem = w.bit_position();
        w.flush_bits()?;
        Ok(PendingBlock { data: w.into_inner(), rem })
    }

    /// Emit the three header bits and replay the buffered block. Stored
    /// blocks byte-align right after the header; Huffman block bodies are
    /// re-packed bit by bit unless both sides happen to be aligned.
    fn write_block<W: Write>(
        &self,
        out: &mut BitWriter<W>,
        block: &PendingBlock,
        is_final: bool,
    ) -> Result<()> {
        out.write_bits(is_final as u32, 1)?;
        out.write_bits(self.mode.type_code(), 2)?;
        if self.mode == BlockMode::Stored {
            out.flush_bits()?;
        }

        if out.bit_position() == 0 && block.rem == 0 {
            return out.write_bytes(&block.data);
        }
        let Some((&last, body)) = block.data.split_last() else {
            return Ok(());
        };
        for &byte in body {
            out.write_bits(byte as u32, 8)?;
        }
        let n = if block.rem == 0 { 8 } else { block.rem };
        out.write_bits(last as u32, n)
    }
}

fn write_dynamic_header<W: Write>(
    w: &mut BitWriter<W>,
    lit: &CodeTable,
    dist: &CodeTable,
) -> Result<()> {
    // full alphabet sizes: HLIT=29 (286 codes), HDIST=29 (30), HCLEN=15 (19)
    w.write_bits(29, 5)?;
    w.write_bits(29, 5)?;
    w.write_bits(15, 4)?;

    let pairs = pack_code_lengths(lit.lengths(), dist.lengths());
    let mut cl_freq = [0u32; 19];
    for &(sym, _) in &pairs {
        cl_freq[sym as usize] += 1;
    }
    let cl = CodeTable::from_frequencies(&cl_freq, MAX_CODE_LENGTH_BITS);

    for &sym in &CODE_LENGTH_ORDER {
        w.write_bits(cl.length(sym) as u32, 3)?;
    }
    for &(sym, extra) in &pairs {
        w.write_bits_rev(cl.code(sym as usize), cl.length(sym as usize))?;
        match sym {
            16 => w.write_bits(extra as u32, 2)?,
            17 => w.write_bits(extra as u32, 3)?,
            18 => w.write_bits(extra as u32, 7)?,
            _ => {}
        }
    }
    Ok(())
}
