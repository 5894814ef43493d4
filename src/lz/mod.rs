pub mod window;

pub use window::{Match, SlidingWindow};

/// Shortest back-reference worth emitting
pub const MIN_MATCH: usize = 3;

/// Longest back-reference DEFLATE can express
pub const MAX_MATCH: usize = 258;

/// History capacity used by both encoder and decoder. The wire format does
/// not transmit the window size, so the two sides must agree a priori.
pub const WINDOW_SIZE: usize = 32 * 1024;
