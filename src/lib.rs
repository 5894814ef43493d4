pub mod bits;
pub mod crc32;
pub mod deflate;
pub mod error;
pub mod gzip;
pub mod huffman;
pub mod lz;

pub use deflate::{Deflater, Inflater};
pub use error::{Error, Result};
pub use gzip::{GzipCodec, StreamReport};

/// Block encoding strategy for the compressor.
///
/// Maps directly onto the two-bit BTYPE field of a DEFLATE block header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlockMode {
    /// Raw stored blocks, no entropy coding
    Stored,
    /// The fixed Huffman tables from RFC 1951 section 3.2.6
    Fixed,
    /// Per-block dynamic Huffman tables
    #[default]
    Dynamic,
}

impl BlockMode {
    /// The BTYPE field value for this mode
    pub fn type_code(self) -> u32 {
        match self {
            BlockMode::Stored => 0,
            BlockMode::Fixed => 1,
            BlockMode::Dynamic => 2,
        }
    }
}

/// Configuration for one compress or decompress stream.
///
/// Each `GzipCodec` owns its configuration, so independent streams can run
/// concurrently with different settings.
#[derive(Clone, Debug)]
pub struct CodecConfig {
    /// Block encoding strategy
    pub mode: BlockMode,
    /// Search the sliding window for back-references; disable to emit
    /// literals only
    pub lz77: bool,
    /// File name recorded in the gzip header, if any
    pub filename: Option<String>,
}

impl CodecConfig {
    pub fn new(mode: BlockMode) -> Self {
        Self { mode, lz77: true, filename: None }
    }

    pub fn with_filename(mut self, name: impl Into<String>) -> Self {
        self.filename = Some(name.into());
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::new(BlockMode::Dynamic)
    }
}

/// Observer for bytes-processed callbacks during block processing.
///
/// Purely observational: the codec behaves identically whether or not a sink
/// is attached.
pub trait ProgressSink {
    /// Called with the total number of input bytes consumed so far
    fn bytes_processed(&mut self, total: u64);
}

impl<F: FnMut(u64)> ProgressSink for F {
    fn bytes_processed(&mut self, total: u64) {
        self(total)
    }
}
