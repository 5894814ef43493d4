use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected end of input")]
    UnexpectedEof,

    // Container errors
    #[error("Invalid gzip magic bytes: expected 0x1f8b, got 0x{0:04x}")]
    InvalidMagic(u16),

    #[error("Unsupported compression method: {0} (only DEFLATE/8 supported)")]
    UnsupportedMethod(u8),

    #[error("Unsupported gzip flags: 0x{0:02x} (FEXTRA/FCOMMENT/FHCRC not supported)")]
    UnsupportedFlags(u8),

    // DEFLATE stream errors
    #[error("Invalid DEFLATE block type: {0}")]
    InvalidBlockType(u8),

    #[error("Stored block length mismatch: LEN={len}, NLEN={nlen}")]
    StoredLengthMismatch { len: u16, nlen: u16 },

    #[error("No Huffman code matches the input within {max_bits} bits")]
    UndecodableSymbol { max_bits: u8 },

    #[error("Declared code count {0} exceeds the alphabet size")]
    InvalidCodeCount(usize),

    #[error("Invalid code length repeat: no previous length or run past the declared count")]
    InvalidCodeLengthRepeat,

    #[error("Invalid length code: {0}")]
    InvalidLengthCode(u16),

    #[error("Invalid distance code: {0}")]
    InvalidDistanceCode(u16),

    #[error("Back-reference distance {distance} exceeds window history {available}")]
    InvalidBackReference { distance: u16, available: usize },

    // Trailer errors
    #[error("CRC32 mismatch: expected 0x{expected:08x}, got 0x{found:08x}")]
    ChecksumMismatch { expected: u32, found: u32 },

    #[error("Size mismatch: expected {expected} bytes, got {found}")]
    SizeMismatch { expected: u32, found: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
