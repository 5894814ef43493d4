pub mod deflater;
pub mod inflater;
pub mod symbols;
pub mod tokens;

pub use deflater::Deflater;
pub use inflater::Inflater;

/// Input chunk size; each chunk becomes one DEFLATE block
pub const CHUNK_SIZE: usize = 32 * 1024;
