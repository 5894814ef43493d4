use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Canonical Huffman code for one alphabet: per-symbol code bits and
/// lengths. Length zero means the symbol is absent from the code.
pub struct CodeTable {
    codes: Vec<u32>,
    lengths: Vec<u8>,
}

impl CodeTable {
    /// Build a length-limited code from symbol frequencies. Symbols with
    /// zero frequency get no code. Always produces a valid table: the
    /// Huffman depths are clamped to `max_bits` and the Kraft sum repaired
    /// so the code stays prefix-free.
    pub fn from_frequencies(freq: &[u32], max_bits: u8) -> Self {
        let mut lengths = tree_depths(freq);
        rebalance(&mut lengths, freq, max_bits);
        Self::from_lengths(&lengths)
    }

    /// Assign canonical code values to a length vector: codes of equal
    /// length are consecutive integers in symbol order, and each length
    /// class starts just past the previous class shifted left one bit.
    pub fn from_lengths(lengths: &[u8]) -> Self {
        let mut count = [0u32; 16];
        for &len in lengths {
            if len > 0 {
                count[len as usize] += 1;
            }
        }

        let mut next = [0u32; 16];
        let mut code = 0u32;
        for bits in 1..16 {
            code = (code + count[bits - 1]) << 1;
            next[bits] = code;
        }

        let mut codes = vec![0u32; lengths.len()];
        for (sym, &len) in lengths.iter().enumerate() {
            if len > 0 {
                codes[sym] = next[len as usize];
                next[len as usize] += 1;
            }
        }
        Self { codes, lengths: lengths.to_vec() }
    }

    pub fn code(&self, symbol: usize) -> u32 {
        self.codes[symbol]
    }

    pub fn length(&self, symbol: usize) -> u8 {
        self.lengths[symbol]
    }

    pub fn lengths(&self) -> &[u8] {
        &self.lengths
    }
}

/// Unconstrained Huffman depths via pairwise merging of the two lightest
/// subtrees. Ties break on node index, so leaves beat internal nodes of
/// equal weight and the result is deterministic.
fn tree_depths(freq: &[u32]) -> Vec<u8> {
    let used: Vec<usize> = freq
        .iter()
        .enumerate()
        .filter(|&(_, &f)| f > 0)
        .map(|(sym, _)| sym)
        .collect();

    let mut lengths = vec![0u8; freq.len()];
    match used.len() {
        0 => return lengths,
        1 => {
            // a lone symbol still needs one bit on the wire
            lengths[used[0]] = 1;
            return lengths;
        }
        _ => {}
    }

    // leaves occupy parent[0..used.len()], internal nodes append after
    let mut parent: Vec<usize> = vec![usize::MAX; used.len()];
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = used
        .iter()
        .enumerate()
        .map(|(node, &sym)| Reverse((freq[sym] as u64, node)))
        .collect();

    loop {
        let (Some(Reverse((wa, a))), Some(Reverse((wb, b)))) = (heap.pop(), heap.pop()) else {
            break;
        };
        let node = parent.len();
        parent.push(usize::MAX);
        parent[a] = node;
        parent[b] = node;
        heap.push(Reverse((wa + wb, node)));
    }

    for (leaf, &sym) in used.iter().enumerate() {
        let mut depth = 0u8;
        let mut node = leaf;
        while parent[node] != usize::MAX {
            node = parent[node];
            depth += 1;
        }
        lengths[sym] = depth;
    }
    lengths
}

/// Clamp code lengths to `max_bits` and repair the Kraft sum to exactly
/// `2^max_bits` so the canonical code is complete and prefix-free.
///
/// Clamping makes the code overfull, so first some codes below the limit
/// are deepened (longest first, rare symbols preferred); overshoot is then
/// returned by shortening deep codes whose gain still fits. A single-symbol
/// code keeps its one-bit length and stays intentionally incomplete.
fn rebalance(lengths: &mut [u8], freq: &[u32], max_bits: u8) {
    let full = 1u64 << max_bits;
    for len in lengths.iter_mut() {
        if *len > max_bits {
            *len = max_bits;
        }
    }

    let mut kraft: u64 = lengths
        .iter()
        .filter(|&&len| len > 0)
        .map(|&len| 1u64 << (max_bits - len))
        .sum();

    while kraft > full {
        let mut pick: Option<usize> = None;
        for (sym, &len) in lengths.iter().enumerate() {
            if len == 0 || len >= max_bits {
                continue;
            }
            let better = match pick {
                None => true,
                Some(p) => len > lengths[p] || (len == lengths[p] && freq[sym] < freq[p]),
            };
            if better {
                pick = Some(sym);
            }
        }
        let Some(sym) = pick else { break };
        kraft -= 1u64 << (max_bits - lengths[sym] - 1);
        lengths[sym] += 1;
    }

    while kraft < full {
        let mut pick: Option<usize> = None;
        for (sym, &len) in lengths.iter().enumerate() {
            if len <= 1 || (1u64 << (max_bits - len)) > full - kraft {
                continue;
            }
            let better = match pick {
                None => true,
                Some(p) => len > lengths[p] || (len == lengths[p] && freq[sym] > freq[p]),
            };
            if better {
                pick = Some(sym);
            }
        }
        let Some(sym) = pick else { break };
        kraft += 1u64 << (max_bits - lengths[sym]);
        lengths[sym] -= 1;
    }
}

/// Run-length encode the concatenated literal and distance code lengths
/// using the code-length alphabet: 16 repeats the previous length 3-6
/// times, 17 covers 3-10 zeros, 18 covers 11-138 zeros. Returns
/// `(symbol, repeat_payload)` pairs; the payload's bit width depends on
/// the symbol and is applied by the block writer.
pub fn pack_code_lengths(literal: &[u8], distance: &[u8]) -> Vec<(u8, u8)> {
    let mut all = Vec::with_capacity(literal.len() + distance.len());
    all.extend_from_slice(literal);
    all.extend_from_slice(distance);

    let mut out = Vec::new();
    let mut i = 0;
    while i < all.len() {
        let value = all[i];
        let mut run = 1;
        while i + run < all.len() && all[i + run] == value {
            run += 1;
        }
        if value == 0 {
            let mut left = run;
            while left >= 11 {
                let n = left.min(138);
                out.push((18, (n - 11) as u8));
                left -= n;
            }
            if left >= 3 {
                out.push((17, (left - 3) as u8));
                left = 0;
            }
            for _ in 0..left {
                out.push((0, 0));
            }
        } else {
            out.push((value, 0));
            let mut left = run - 1;
            while left >= 3 {
                let n = left.min(6);
                out.push((16, (n - 3) as u8));
                left -= n;
            }
            for _ in 0..left {
                out.push((value, 0));
            }
        }
        i += run;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kraft_sum(lengths: &[u8], max_bits: u8) -> u64 {
        lengths
            .iter()
            .filter(|&&len| len > 0)
            .map(|&len| 1u64 << (max_bits - len))
            .sum()
    }

    #[test]
    fn test_two_symbols_get_one_bit_each() {
        let table = CodeTable::from_frequencies(&[7, 3], 15);
        assert_eq!(table.length(0), 1);
        assert_eq!(table.length(1), 1);
        assert_eq!(table.code(0), 0);
        assert_eq!(table.code(1), 1);
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let table = CodeTable::from_frequencies(&[0, 0, 42, 0], 15);
        assert_eq!(table.length(2), 1);
        assert_eq!(table.code(2), 0);
        assert_eq!(table.length(0), 0);
    }

    #[test]
    fn test_empty_alphabet() {
        let table = CodeTable::from_frequencies(&[0; 8], 15);
        assert!(table.lengths().iter().all(|&len| len == 0));
    }

    #[test]
    fn test_skewed_frequencies() {
        let table = CodeTable::from_frequencies(&[100, 1, 1], 15);
        assert_eq!(table.length(0), 1);
        assert_eq!(table.length(1), 2);
        assert_eq!(table.length(2), 2);
        assert_eq!(table.code(0), 0b0);
        assert_eq!(table.code(1), 0b10);
        assert_eq!(table.code(2), 0b11);
    }

    #[test]
    fn test_fibonacci_frequencies_respect_limit() {
        // unconstrained depths would reach 20 bits here
        let mut freq = vec![1u32, 1];
        for i in 2..21 {
            freq.push(freq[i - 1] + freq[i - 2]);
        }
        let table = CodeTable::from_frequencies(&freq, 15);
        assert!(table.lengths().iter().all(|&len| len > 0 && len <= 15));
        assert_eq!(kraft_sum(table.lengths(), 15), 1 << 15);
    }

    #[test]
    fn test_limit_applies_to_short_alphabets() {
        let mut freq = vec![1u32, 1];
        for i in 2..12 {
            freq.push(freq[i - 1] + freq[i - 2]);
        }
        let table = CodeTable::from_frequencies(&freq, 7);
        assert!(table.lengths().iter().all(|&len| len > 0 && len <= 7));
        assert_eq!(kraft_sum(table.lengths(), 7), 1 << 7);
    }

    #[test]
    fn test_canonical_codes_are_prefix_free() {
        let freq: Vec<u32> = (1..=40).map(|i| i * i).collect();
        let table = CodeTable::from_frequencies(&freq, 15);
        for a in 0..freq.len() {
            for b in 0..freq.len() {
                if a == b {
                    continue;
                }
                let (la, lb) = (table.length(a), table.length(b));
                if la <= lb {
                    // code a must not be a prefix of code b
                    assert_ne!(table.code(a), table.code(b) >> (lb - la));
                }
            }
        }
    }

    #[test]
    fn test_from_lengths_canonical_assignment() {
        // lengths 2,1,3,3 -> canonical: sym1=0, sym0=10, sym2=110, sym3=111
        let table = CodeTable::from_lengths(&[2, 1, 3, 3]);
        assert_eq!(table.code(1), 0b0);
        assert_eq!(table.code(0), 0b10);
        assert_eq!(table.code(2), 0b110);
        assert_eq!(table.code(3), 0b111);
    }

    #[test]
    fn test_pack_short_zero_run() {
        assert_eq!(pack_code_lengths(&[5, 0, 0, 6], &[]), vec![(5, 0), (0, 0), (0, 0), (6, 0)]);
    }

    #[test]
    fn test_pack_zero_runs() {
        assert_eq!(pack_code_lengths(&[0; 7], &[]), vec![(17, 4)]);
        assert_eq!(pack_code_lengths(&[0; 30], &[]), vec![(18, 19)]);
        assert_eq!(pack_code_lengths(&[0; 139], &[]), vec![(18, 127), (0, 0)]);
    }

    #[test]
    fn test_pack_repeat_previous() {
        assert_eq!(pack_code_lengths(&[8, 8, 8, 8, 8], &[]), vec![(8, 0), (16, 1)]);
        assert_eq!(
            pack_code_lengths(&[8; 12], &[]),
            vec![(8, 0), (16, 3), (16, 2)]
        );
    }

    #[test]
    fn test_pack_run_crosses_alphabet_boundary() {
        // trailing literal zeros merge with leading distance zeros
        assert_eq!(pack_code_lengths(&[9, 0, 0], &[0, 0, 0, 0]), vec![(9, 0), (17, 3)]);
    }
}
