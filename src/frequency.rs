//! Byte frequency analysis

use std::collections::BTreeMap;
use std::io::{self, BufRead};

/// Occurrence count per byte value, iterated in ascending byte order.
///
/// Bytes that never occur are absent rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteFrequencyMap {
    counts: BTreeMap<u8, u64>,
}

impl ByteFrequencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every byte until end of stream.
    pub fn from_reader<R: BufRead>(mut reader: R) -> io::Result<Self> {
        let mut table = [0u64; 256];
        loop {
            let chunk = reader.fill_buf()?;
            if chunk.is_empty() {
                break;
            }
            for &b in chunk {
                table[b as usize] += 1;
            }
            let n = chunk.len();
            reader.consume(n);
        }
        Ok(Self::from_table(&table))
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut freq = Self::new();
        for &b in data {
            freq.record(b);
        }
        freq
    }

    fn from_table(table: &[u64; 256]) -> Self {
        let counts = table
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(byte, &count)| (byte as u8, count))
            .collect();
        Self { counts }
    }

    pub fn record(&mut self, byte: u8) {
        *self.counts.entry(byte).or_insert(0) += 1;
    }

    #[cfg(test)]
    pub(crate) fn get(&self, byte: u8) -> Option<u64> {
        self.counts.get(&byte).copied()
    }

    /// Number of distinct byte values seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().map(|(&b, &c)| (b, c))
    }

    /// Shannon entropy in bits per byte.
    pub fn entropy_bits(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let len = total as f64;
        let mut entropy = 0.0;
        for &count in self.counts.values() {
            let p = count as f64 / len;
            entropy -= p * p.log2();
        }
        entropy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_counts_and_order() {
        let freq = ByteFrequencyMap::from_bytes(b"CABBAA");
        let pairs: Vec<_> = freq.iter().collect();
        assert_eq!(pairs, vec![(b'A', 3), (b'B', 2), (b'C', 1)]);
        assert_eq!(freq.total(), 6);
        assert_eq!(freq.get(b'Z'), None);
    }

    #[test]
    fn test_reader_matches_bytes() {
        let data: Vec<u8> = (0..=255u8).cycle().take(3000).collect();
        let from_reader = ByteFrequencyMap::from_reader(Cursor::new(&data)).unwrap();
        assert_eq!(from_reader, ByteFrequencyMap::from_bytes(&data));
        assert_eq!(from_reader.len(), 256);
    }

    #[test]
    fn test_empty_input() {
        let freq = ByteFrequencyMap::from_reader(Cursor::new(Vec::new())).unwrap();
        assert!(freq.is_empty());
        assert_eq!(freq.entropy_bits(), 0.0);
    }

    #[test]
    fn test_entropy() {
        let uniform = ByteFrequencyMap::from_bytes(&[42u8; 100]);
        assert!(uniform.entropy_bits() < 0.01, "single symbol should have ~0 entropy");

        let two = ByteFrequencyMap::from_bytes(b"abababab");
        assert!((two.entropy_bits() - 1.0).abs() < 1e-9);
    }
}
