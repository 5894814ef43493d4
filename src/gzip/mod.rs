pub mod header;

pub use header::{GzipHeader, GzipTrailer};

use crate::bits::{BitReader, BitWriter};
use crate::deflate::{Deflater, Inflater};
use crate::error::{Error, Result};
use crate::{CodecConfig, ProgressSink};
use std::fmt;
use std::io::{Read, Write};

/// Byte counts for one completed (de)compression pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamReport {
    pub uncompressed: u64,
    pub compressed: u64,
}

impl StreamReport {
    /// Compressed size as a fraction of the uncompressed size
    pub fn ratio(&self) -> f64 {
        if self.uncompressed == 0 {
            return 0.0;
        }
        self.compressed as f64 / self.uncompressed as f64
    }
}

impl fmt::Display for StreamReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.compressed <= self.uncompressed {
            let saved = self.uncompressed - self.compressed;
            let percent = if self.uncompressed > 0 {
                saved as f64 * 100.0 / self.uncompressed as f64
            } else {
                0.0
            };
            write!(f, "Size reduced by {saved} bytes ({percent:.1}% total saving)")
        } else {
            write!(f, "Size increased by {} bytes", self.compressed - self.uncompressed)
        }
    }
}

/// Gzip member framing around the DEFLATE engines: header, compressed
/// payload, then CRC-32 and size trailer.
pub struct GzipCodec {
    config: CodecConfig,
}

impl GzipCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Compress `input` into a single gzip member written to `output`
    pub fn compress<R: Read, W: Write>(
        &self,
        input: R,
        output: W,
        progress: Option<&mut dyn ProgressSink>,
    ) -> Result<StreamReport> {
        let mut reader = BitReader::new(input);
        let mut writer = BitWriter::new(output);

        header::write_header(&mut writer, self.config.filename.as_deref())?;
        let mut deflater = Deflater::new(&self.config);
        let size = deflater.process(&mut reader, &mut writer, progress)?;
        writer.write_u32_le(deflater.crc_value())?;
        writer.write_u32_le(size as u32)?;

        let compressed = writer.bytes_written();
        writer.into_inner().flush()?;
        Ok(StreamReport { uncompressed: size, compressed })
    }

    /// Decompress a single gzip member from `input` to `output`,
    /// verifying the trailer. The size is checked before the checksum so
    /// a truncated stream reports as a size problem, not a CRC one.
    pub fn decompress<R: Read, W: Write>(
        &self,
        input: R,
        output: W,
        progress: Option<&mut dyn ProgressSink>,
    ) -> Result<StreamReport> {
        let mut reader = BitReader::new(input);
        let mut writer = BitWriter::new(output);

        header::read_header(&mut reader)?;
        let mut inflater = Inflater::new();
        let size = inflater.process(&mut reader, &mut writer, progress)?;
        reader.align_to_byte();
        let trailer = GzipTrailer::read(&mut reader)?;

        if trailer.size != size as u32 {
            return Err(Error::SizeMismatch { expected: trailer.size, found: size as u32 });
        }
        if trailer.crc != inflater.crc_value() {
            return Err(Error::ChecksumMismatch {
                expected: trailer.crc,
                found: inflater.crc_value(),
            });
        }

        let compressed = reader.bytes_read();
        writer.into_inner().flush()?;
        Ok(StreamReport { uncompressed: size, compressed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlockMode;

    #[test]
    fn test_codec_roundtrip_carries_filename() {
        let config = CodecConfig::new(BlockMode::Dynamic).with_filename("notes.txt");
        let codec = GzipCodec::new(config);
        let data = b"the quick brown fox jumps over the lazy dog";

        let mut member = Vec::new();
        let report = codec.compress(data.as_slice(), &mut member, None).unwrap();
        assert_eq!(report.uncompressed, data.len() as u64);
        assert_eq!(report.compressed, member.len() as u64);

        let mut reader = BitReader::new(member.as_slice());
        let parsed = header::read_header(&mut reader).unwrap();
        assert_eq!(parsed.filename.as_deref(), Some("notes.txt"));

        let mut out = Vec::new();
        let report = codec.decompress(member.as_slice(), &mut out, None).unwrap();
        assert_eq!(out, data);
        assert_eq!(report.uncompressed, data.len() as u64);
    }

    #[test]
    fn test_report_formatting() {
        let reduced = StreamReport { uncompressed: 100, compressed: 25 };
        assert_eq!(reduced.to_string(), "Size reduced by 75 bytes (75.0% total saving)");
        assert_eq!(reduced.ratio(), 0.25);

        let grew = StreamReport { uncompressed: 10, compressed: 15 };
        assert_eq!(grew.to_string(), "Size increased by 5 bytes");

        let empty = StreamReport { uncompressed: 0, compressed: 20 };
        assert_eq!(empty.to_string(), "Size increased by 20 bytes");
    }
}
