//! Symbol frequency counting.

use treehuff_core::{BitRead, Result, Symbol, ALPHABET_SIZE, BITS_PER_WORD, PSEUDO_EOF};

/// Occurrence counts for every symbol of the alphabet.
///
/// The end marker always has a count of exactly 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: Box<[u64; ALPHABET_SIZE]>,
}

impl FrequencyTable {
    /// Create a table with only the end marker counted.
    pub fn new() -> Self {
        let mut counts = Box::new([0u64; ALPHABET_SIZE]);
        counts[PSEUDO_EOF as usize] = 1;
        Self { counts }
    }

    /// Count every 8-bit symbol until the reader is exhausted.
    ///
    /// The reader is left at its end; rewind it before a second pass.
    pub fn count<R: BitRead + ?Sized>(input: &mut R) -> Result<Self> {
        let mut table = Self::new();
        while let Some(value) = input.read_bits(BITS_PER_WORD)? {
            table.counts[value as usize] += 1;
        }
        Ok(table)
    }

    /// Count the bytes of an in-memory buffer.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        for &byte in data {
            table.counts[byte as usize] += 1;
        }
        table
    }

    /// Build a table from explicit counts.
    ///
    /// Symbols past the alphabet are ignored. The end marker is still forced
    /// to 1 unless `counts` covers it, in which case the given value is kept.
    pub fn from_counts(counts: &[u64]) -> Self {
        let mut table = Self::new();
        let n = counts.len().min(ALPHABET_SIZE);
        table.counts[..n].copy_from_slice(&counts[..n]);
        table
    }

    /// Count for one symbol.
    #[inline]
    pub fn count_of(&self, symbol: Symbol) -> u64 {
        self.counts.get(symbol as usize).copied().unwrap_or(0)
    }

    /// All counts, indexed by symbol.
    #[inline]
    pub fn counts(&self) -> &[u64] {
        &self.counts[..]
    }

    /// Number of literal bytes counted (end marker excluded).
    pub fn total(&self) -> u64 {
        self.counts[..PSEUDO_EOF as usize].iter().sum()
    }

    /// Number of symbols with a nonzero count.
    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Iterate over `(symbol, count)` for nonzero counts, in symbol order.
    pub fn nonzero(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(s, &c)| (s as Symbol, c))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}
