use super::{MAX_MATCH, MIN_MATCH};

/// A back-reference: copy `length` bytes from `distance` bytes back in the
/// output produced so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    /// Distance back into the history, 1..=32768
    pub distance: u16,
    /// Bytes to copy, 3..=258
    pub length: u16,
}

/// Fixed-capacity circular history buffer shared by the LZ77 match finder
/// and the decoder's back-reference replay.
pub struct SlidingWindow {
    buf: Box<[u8]>,
    mask: usize,
    /// Write cursor
    pos: usize,
    /// Bytes of valid history, capped at capacity
    size: usize,
}

impl SlidingWindow {
    /// Capacity must be a power of two
    pub fn new(capacity: usize) -> Self {
        assert!(capacity.is_power_of_two(), "window capacity must be a power of two");
        Self { buf: vec![0u8; capacity].into_boxed_slice(), mask: capacity - 1, pos: 0, size: 0 }
    }

    /// Append one byte, overwriting the oldest when full
    pub fn push(&mut self, byte: u8) {
        self.buf[self.pos] = byte;
        self.pos = (self.pos + 1) & self.mask;
        if self.size < self.buf.len() {
            self.size += 1;
        }
    }

    /// Append a byte sequence
    pub fn extend(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push(b);
        }
    }

    /// Bytes of valid history
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Find a back-reference for `data[offset..]`.
    ///
    /// Scans distances starting at 1 (most recent) and returns the first
    /// one matching at least three bytes, extended greedily up to 258 bytes
    /// or the end of `data`. The window index wraps past the live write
    /// cursor, so a match may reference bytes that are part of its own
    /// replayed output (self-overlapping copy for runs). This is
    /// nearest-match search, not globally-longest-match search.
    pub fn find_match(&self, data: &[u8], offset: usize) -> Option<Match> {
        if self.size == 0 {
            return None;
        }

        for dist in 1..=self.size {
            let start = self.pos.wrapping_sub(dist) & self.mask;
            let mut x = start;
            let mut y = offset;
            let mut length = 0;
            while length < MAX_MATCH && y < data.len() {
                if self.buf[x] != data[y] {
                    break;
                }
                length += 1;
                x = (x + 1) & self.mask;
                if x == self.pos {
                    // wrapped past the cursor: replay from the match start
                    x = start;
                }
                y += 1;
            }
            if length >= MIN_MATCH {
                return Some(Match { distance: dist as u16, length: length as u16 });
            }
        }
        None
    }

    /// Replay `length` bytes starting `distance` positions back from the
    /// cursor, with the same wrap-past-cursor rule as [`find_match`].
    ///
    /// The caller is responsible for checking `distance <= len()`.
    ///
    /// [`find_match`]: SlidingWindow::find_match
    pub fn copy_from_history(&self, distance: usize, length: usize) -> Vec<u8> {
        let start = self.pos.wrapping_sub(distance) & self.mask;
        let mut out = Vec::with_capacity(length);
        let mut x = start;
        for _ in 0..length {
            out.push(self.buf[x]);
            x = (x + 1) & self.mask;
            if x == self.pos {
                x = start;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run the encoder's scan loop over `input`, rendering literals as-is
    /// and matches as `<distance,length>`.
    fn tokenize(input: &[u8]) -> String {
        let mut window = SlidingWindow::new(32 * 1024);
        let mut out = String::new();
        let mut i = 0;
        while i < input.len() {
            match window.find_match(input, i) {
                Some(m) => {
                    window.extend(&input[i..i + m.length as usize]);
                    out.push_str(&format!("<{},{}>", m.distance, m.length));
                    i += m.length as usize;
                }
                None => {
                    window.push(input[i]);
                    out.push(input[i] as char);
                    i += 1;
                }
            }
        }
        out
    }

    #[test]
    fn test_tokenize_nearest_match() {
        assert_eq!(tokenize(b"abcdefghijAabcdefBCDdefEFG"), "abcdefghijA<11,6>BCD<6,3>EFG");
    }

    #[test]
    fn test_tokenize_overlapping_match() {
        assert_eq!(tokenize(b"abcdebcdef"), "abcde<4,4>f");
    }

    #[test]
    fn test_tokenize_run_extends_past_cursor() {
        // the match replays its own output: 20 bytes at distance 5
        assert_eq!(tokenize(b"abcde bcde bcde bcde bcde 123"), "abcde <5,20>123");
        assert_eq!(tokenize(b"Blah blah blah blah blah!"), "Blah b<5,18>!");
    }

    #[test]
    fn test_tokenize_multiple_references() {
        assert_eq!(
            tokenize(b"This is a string with multiple strings within it"),
            "This <3,3>a string with multiple<21,7>s<22,5>in it"
        );
        assert_eq!(tokenize(b"These blah is blah blah blah!"), "These blah is<8,6><5,9>!");
    }

    #[test]
    fn test_tokenize_long_run_splits_at_max_match() {
        let mut input = Vec::from(&b"abcdefghij"[..]);
        for _ in 0..25 {
            input.extend_from_slice(b"0123456789");
        }
        input.extend_from_slice(b"0123abcdefg");
        // the 254-byte run splits into a maximal 244-byte piece (258 caps
        // nothing here; data runs out) and the tail matches further back
        assert_eq!(tokenize(&input), "abcdefghij0123456789<10,244><264,7>");
    }

    #[test]
    fn test_empty_window_has_no_match() {
        let window = SlidingWindow::new(1024);
        assert_eq!(window.find_match(b"aaaa", 0), None);
    }

    #[test]
    fn test_short_tail_is_not_a_match() {
        let mut window = SlidingWindow::new(1024);
        window.extend(b"ab");
        // only two bytes can match: below MIN_MATCH
        assert_eq!(window.find_match(b"ab", 0), None);
    }

    #[test]
    fn test_copy_from_history_overlapping() {
        let mut window = SlidingWindow::new(1024);
        window.extend(b"xyz");
        // distance 3, length 8 replays xyzxyzxy
        assert_eq!(window.copy_from_history(3, 8), b"xyzxyzxy");
    }

    #[test]
    fn test_wraparound_at_capacity() {
        let mut window = SlidingWindow::new(8);
        window.extend(b"abcdefgh");
        window.extend(b"ij");
        // oldest two bytes were overwritten
        assert_eq!(window.len(), 8);
        assert_eq!(window.copy_from_history(8, 3), b"cde");
    }
}
