use super::symbols::{distance_symbol, length_symbol};
use crate::huffman::{DISTANCE_ALPHABET, END_OF_BLOCK, LITERAL_ALPHABET};
use crate::lz::Match;

/// One unit of LZ77 output: a raw byte or a back-reference
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    Literal(u8),
    Reference(Match),
}

/// Symbol frequency counts for one block, feeding the dynamic Huffman
/// table builder
pub struct FrequencyTable {
    pub literal: [u32; LITERAL_ALPHABET],
    pub distance: [u32; DISTANCE_ALPHABET],
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self { literal: [0; LITERAL_ALPHABET], distance: [0; DISTANCE_ALPHABET] }
    }

    pub fn record(&mut self, token: Token) {
        match token {
            Token::Literal(byte) => self.literal[byte as usize] += 1,
            Token::Reference(m) => {
                let (len_sym, _, _) = length_symbol(m.length);
                let (dist_sym, _, _) = distance_symbol(m.distance);
                self.literal[len_sym as usize] += 1;
                self.distance[dist_sym as usize] += 1;
            }
        }
    }

    /// Every block ends with the end-of-block symbol
    pub fn end_block(&mut self) {
        self.literal[END_OF_BLOCK as usize] += 1;
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}
