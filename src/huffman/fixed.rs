use super::builder::CodeTable;
use std::sync::LazyLock;

/// Code lengths of the fixed literal/length code (BTYPE=01). The alphabet
/// is padded to 288 entries; codes 286-287 never appear in valid streams
/// but participate in canonical assignment.
pub fn fixed_literal_lengths() -> [u8; 288] {
    let mut lengths = [8u8; 288];
    for len in lengths.iter_mut().take(256).skip(144) {
        *len = 9;
    }
    for len in lengths.iter_mut().take(280).skip(256) {
        *len = 7;
    }
    lengths
}

/// Code lengths of the fixed distance code: five bits for all 32 entries
/// (30 real distance codes plus two reserved)
pub fn fixed_distance_lengths() -> [u8; 32] {
    [5u8; 32]
}

pub static FIXED_LITERAL: LazyLock<CodeTable> =
    LazyLock::new(|| CodeTable::from_lengths(&fixed_literal_lengths()));

pub static FIXED_DISTANCE: LazyLock<CodeTable> =
    LazyLock::new(|| CodeTable::from_lengths(&fixed_distance_lengths()));
