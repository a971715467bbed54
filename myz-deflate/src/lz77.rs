//! LZ77 match finding for DEFLATE.
//!
//! Repeated sequences are replaced by `(length, distance)` back-references
//! into the previous 32 KiB. Candidates are found through hash chains keyed
//! on three-byte prefixes; a match is deferred by one byte when the next
//! position offers a longer one (lazy matching).

/// Maximum back-reference distance (32 KiB).
pub const WINDOW_SIZE: usize = 32768;

/// Minimum match length.
pub const MIN_MATCH: usize = 3;

/// Maximum match length.
pub const MAX_MATCH: usize = 258;

const HASH_BITS: u32 = 15;
const HASH_SIZE: usize = 1 << HASH_BITS;
const WINDOW_MASK: usize = WINDOW_SIZE - 1;
const NIL: usize = usize::MAX;

/// Candidates examined per position.
const MAX_CHAIN: usize = 128;

/// Matches at least this long are taken without a lazy look-ahead.
const LAZY_THRESHOLD: usize = 32;

/// Stop searching once a match this long is found.
const NICE_LENGTH: usize = 128;

/// A token produced by LZ77 compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lz77Token {
    /// A literal byte.
    Literal(u8),
    /// A back-reference to previously seen data.
    Match {
        /// Number of bytes to copy (3-258).
        length: u16,
        /// Distance back into the window (1-32768).
        distance: u16,
    },
}

/// LZ77 encoder over a whole input buffer.
#[derive(Debug, Clone)]
pub struct Lz77Encoder {
    max_chain: usize,
    lazy: bool,
}

/// Hash chain state for one compression run.
struct Chains {
    head: Vec<usize>,
    prev: Vec<usize>,
}

impl Chains {
    fn new() -> Self {
        Self {
            head: vec![NIL; HASH_SIZE],
            prev: vec![NIL; WINDOW_SIZE],
        }
    }

    #[inline]
    fn hash(data: &[u8], pos: usize) -> usize {
        let key = u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], 0]);
        (key.wrapping_mul(0x1E35_A7BD) >> (32 - HASH_BITS)) as usize
    }

    fn insert(&mut self, data: &[u8], pos: usize) {
        if pos + MIN_MATCH > data.len() {
            return;
        }
        let h = Self::hash(data, pos);
        self.prev[pos & WINDOW_MASK] = self.head[h];
        self.head[h] = pos;
    }
}

impl Lz77Encoder {
    /// Create an encoder with the default search effort.
    pub fn new() -> Self {
        Self {
            max_chain: MAX_CHAIN,
            lazy: true,
        }
    }

    /// Split `data` into literals and back-references.
    pub fn compress(&self, data: &[u8]) -> Vec<Lz77Token> {
        let mut tokens = Vec::with_capacity(data.len() / 2 + 1);
        let mut chains = Chains::new();
        let mut pos = 0;

        while pos < data.len() {
            let found = self.longest_match(data, pos, &chains);
            chains.insert(data, pos);

            let Some((length, distance)) = found else {
                tokens.push(Lz77Token::Literal(data[pos]));
                pos += 1;
                continue;
            };

            if self.lazy && length < LAZY_THRESHOLD {
                if let Some((next_length, _)) = self.longest_match(data, pos + 1, &chains) {
                    if next_length > length {
                        tokens.push(Lz77Token::Literal(data[pos]));
                        pos += 1;
                        continue;
                    }
                }
            }

            tokens.push(Lz77Token::Match {
                length: length as u16,
                distance: distance as u16,
            });
            for p in pos + 1..pos + length {
                chains.insert(data, p);
            }
            pos += length;
        }

        tokens
    }

    /// Longest earlier occurrence of the bytes at `pos`, as `(length, distance)`.
    fn longest_match(&self, data: &[u8], pos: usize, chains: &Chains) -> Option<(usize, usize)> {
        if pos + MIN_MATCH > data.len() {
            return None;
        }

        let max_len = MAX_MATCH.min(data.len() - pos);
        let mut best_len = MIN_MATCH - 1;
        let mut best_dist = 0;

        let mut candidate = chains.head[Chains::hash(data, pos)];
        let mut steps = 0;

        while candidate != NIL && steps < self.max_chain {
            let distance = pos - candidate;
            if distance > WINDOW_SIZE {
                break;
            }

            // Cheap reject before the full comparison.
            if data[candidate + best_len] == data[pos + best_len] {
                let len = common_prefix(data, candidate, pos, max_len);
                if len > best_len {
                    best_len = len;
                    best_dist = distance;
                    if len >= NICE_LENGTH.min(max_len) {
                        break;
                    }
                }
            }

            let next = chains.prev[candidate & WINDOW_MASK];
            if next == NIL || next >= candidate {
                break;
            }
            candidate = next;
            steps += 1;
        }

        (best_len >= MIN_MATCH).then_some((best_len, best_dist))
    }
}

impl Default for Lz77Encoder {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn common_prefix(data: &[u8], a: usize, b: usize, max_len: usize) -> usize {
    data[a..a + max_len]
        .iter()
        .zip(&data[b..b + max_len])
        .take_while(|(x, y)| x == y)
        .count()
}

/// Expand tokens back into bytes. Used to check the match finder.
#[cfg(test)]
pub(crate) fn expand(tokens: &[Lz77Token]) -> Vec<u8> {
    let mut out = Vec::new();
    for token in tokens {
        match *token {
            Lz77Token::Literal(byte) => out.push(byte),
            Lz77Token::Match { length, distance } => {
                let start = out.len() - distance as usize;
                for i in 0..length as usize {
                    out.push(out[start + i]);
                }
            }
        }
    }
    out
}
