pub mod builder;
pub mod decoder;
pub mod fixed;

pub use builder::{pack_code_lengths, CodeTable};
pub use decoder::CanonicalDecoder;
pub use fixed::{FIXED_DISTANCE, FIXED_LITERAL};

/// Longest code the literal/length and distance alphabets allow
pub const MAX_CODE_BITS: u8 = 15;

/// Longest code in the code-length alphabet (its lengths travel in 3 bits)
pub const MAX_CODE_LENGTH_BITS: u8 = 7;

/// Literal/length alphabet size: 256 literals, end-of-block, 29 length codes
pub const LITERAL_ALPHABET: usize = 286;

/// Distance alphabet size
pub const DISTANCE_ALPHABET: usize = 30;

/// Code-length alphabet size (symbols 0-15 plus repeat codes 16-18)
pub const CODE_LENGTH_ALPHABET: usize = 19;

/// Symbol terminating every compressed block
pub const END_OF_BLOCK: u16 = 256;
