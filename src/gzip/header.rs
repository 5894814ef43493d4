use crate::bits::{BitReader, BitWriter};
use crate::error::{Error, Result};
use std::io::{Read, Write};

pub const MAGIC: [u8; 2] = [0x1f, 0x8b];
pub const METHOD_DEFLATE: u8 = 8;

pub const FTEXT: u8 = 1 << 0;
pub const FHCRC: u8 = 1 << 1;
pub const FEXTRA: u8 = 1 << 2;
pub const FNAME: u8 = 1 << 3;
pub const FCOMMENT: u8 = 1 << 4;

/// Optional fields we refuse to parse. FTEXT is a hint and carries no
/// payload, so it passes through.
const UNSUPPORTED: u8 = FHCRC | FEXTRA | FCOMMENT;

/// Parsed member header
pub struct GzipHeader {
    pub flags: u8,
    pub filename: Option<String>,
}

/// Member trailer: CRC-32 and size (mod 2^32) of the uncompressed data
pub struct GzipTrailer {
    pub crc: u32,
    pub size: u32,
}

/// Write a member header. MTIME, XFL and OS are left zero; the original
/// filename travels when one is known.
pub fn write_header<W: Write>(out: &mut BitWriter<W>, filename: Option<&str>) -> Result<()> {
    out.write_bytes(&MAGIC)?;
    out.write_byte(METHOD_DEFLATE)?;
    out.write_byte(if filename.is_some() { FNAME } else { 0 })?;
    out.write_bytes(&[0u8; 6])?;
    if let Some(name) = filename {
        out.write_bytes(name.as_bytes())?;
        out.write_byte(0)?;
    }
    Ok(())
}

/// Read and validate a member header, stopping before any compressed
/// data. Flags we cannot skip safely fail up front rather than after a
/// doomed decompression pass.
pub fn read_header<R: Read>(input: &mut BitReader<R>) -> Result<GzipHeader> {
    let m0 = input.read_byte()?;
    let m1 = input.read_byte()?;
    if [m0, m1] != MAGIC {
        return Err(Error::InvalidMagic(u16::from_be_bytes([m0, m1])));
    }
    let method = input.read_byte()?;
    if method != METHOD_DEFLATE {
        return Err(Error::UnsupportedMethod(method));
    }
    let flags = input.read_byte()?;
    if flags & UNSUPPORTED != 0 {
        return Err(Error::UnsupportedFlags(flags));
    }
    // MTIME, XFL, OS carry no information we act on
    let mut reserved = [0u8; 6];
    input.read_exact(&mut reserved)?;

    let filename = if flags & FNAME != 0 {
        let mut name = Vec::new();
        loop {
            let byte = input.read_byte()?;
            if byte == 0 {
                break;
            }
            name.push(byte);
        }
        Some(String::from_utf8_lossy(&name).into_owned())
    } else {
        None
    };

    Ok(GzipHeader { flags, filename })
}

impl GzipTrailer {
    /// Read the trailer; the caller must have byte-aligned the reader
    pub fn read<R: Read>(input: &mut BitReader<R>) -> Result<Self> {
        let crc = input.read_u32_le()?;
        let size = input.read_u32_le()?;
        Ok(Self { crc, size })
    }
}
