//! Length and distance symbol tables (RFC 1951 section 3.2.5) and the
//! mappings between raw match values and (symbol, extra bits) pairs.

/// Base match length for length codes 257-285, indexed by `code - 257`
pub const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];

/// Extra bits carried by each length code
pub const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Base distance for distance codes 0-29
pub const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Extra bits carried by each distance code
pub const DISTANCE_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Transmission order of code lengths in the dynamic block header
pub const CODE_LENGTH_ORDER: [usize; 19] =
    [16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15];

/// Map a match length (3-258) to `(symbol, extra_value, extra_bits)`
pub fn length_symbol(length: u16) -> (u16, u16, u8) {
    debug_assert!((3..=258).contains(&length));
    // 258 has its own zero-extra code despite falling in code 284's range
    if length == 258 {
        return (285, 0, 0);
    }
    let mut idx = 0;
    for (i, &base) in LENGTH_BASE.iter().enumerate() {
        if base > length {
            break;
        }
        idx = i;
    }
    (257 + idx as u16, length - LENGTH_BASE[idx], LENGTH_EXTRA[idx])
}

/// Map a match distance (1-32768) to `(symbol, extra_value, extra_bits)`
pub fn distance_symbol(distance: u16) -> (u16, u16, u8) {
    debug_assert!(distance >= 1);
    let mut idx = 0;
    for (i, &base) in DISTANCE_BASE.iter().enumerate() {
        if base > distance {
            break;
        }
        idx = i;
    }
    (idx as u16, distance - DISTANCE_BASE[idx], DISTANCE_EXTRA[idx])
}

/// Base length and extra-bit count for a decoded length code, or `None`
/// when the code is outside 257-285
pub fn length_for(code: u16) -> Option<(u16, u8)> {
    let idx = code.checked_sub(257)? as usize;
    if idx >= LENGTH_BASE.len() {
        return None;
    }
    Some((LENGTH_BASE[idx], LENGTH_EXTRA[idx]))
}

/// Base distance and extra-bit count for a decoded distance code, or
/// `None` when the code is outside 0-29
pub fn distance_for(code: u16) -> Option<(u16, u8)> {
    let idx = code as usize;
    if idx >= DISTANCE_BASE.len() {
        return None;
    }
    Some((DISTANCE_BASE[idx], DISTANCE_EXTRA[idx]))
}
