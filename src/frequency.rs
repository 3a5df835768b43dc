use std::io::Read;

/// Byte value reserved as the end-of-text marker.
pub const SENTINEL: u8 = 0;

pub const ALPHABET_SIZE: usize = 256;

/// Occurrence counts for every byte value.
///
/// The sentinel entry is pinned to 1 whenever a table is counted from input,
/// so every tree built from it has exactly one end-of-text leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [usize; ALPHABET_SIZE],
}

impl FrequencyTable {
    pub fn empty() -> Self {
        FrequencyTable {
            counts: [0; ALPHABET_SIZE],
        }
    }

    /// Count every byte of `bytes`, then force the sentinel count to 1.
    ///
    /// Real NUL bytes are counted and then overwritten: they share the
    /// sentinel's leaf.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut table = bytes.iter().fold(Self::empty(), |mut acc, &byte| {
            acc.counts[byte as usize] += 1;
            acc
        });
        table.counts[SENTINEL as usize] = 1;
        table
    }

    /// Drain `reader` and count it. Returns the bytes read alongside the table
    /// since the source can't be rewound for the encoding pass.
    pub fn count<R: Read>(mut reader: R) -> std::io::Result<(Self, Vec<u8>)> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok((Self::from_bytes(&data), data))
    }

    pub fn get(&self, symbol: u8) -> usize {
        self.counts[symbol as usize]
    }

    pub fn set(&mut self, symbol: u8, frequency: usize) {
        self.counts[symbol as usize] = frequency;
    }

    /// `(symbol, frequency)` for every nonzero entry, ascending by symbol.
    pub fn present(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        (0..=u8::MAX)
            .map(move |symbol| (symbol, self.get(symbol)))
            .filter(|&(_, frequency)| frequency > 0)
    }

    /// Sum of all counts, or `None` if it does not fit in a `usize`.
    pub fn total(&self) -> Option<usize> {
        self.counts
            .iter()
            .try_fold(0usize, |acc, &count| acc.checked_add(count))
    }

    pub fn has_sentinel(&self) -> bool {
        self.get(SENTINEL) > 0
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::empty()
    }
}
