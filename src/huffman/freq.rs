//! Byte frequency counting.

use std::io::Read;

use crate::error::{Error, Result};
use crate::huffman::{Symbol, WeightedSymbol};

/// Occurrence counts for each of the 256 byte values, plus the implicit
/// end-of-stream symbol with weight 1.
///
/// Built once per compress call from a single linear pass over the input,
/// or reconstructed from a stream header on the decompress side.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    counts: [u64; 256],
    total: u64,
}

impl FrequencyTable {
    /// Counts byte occurrences across the whole input.
    ///
    /// Fails with [`Error::EmptyInput`] if the input yields zero bytes,
    /// distinct from "file not found", which is the caller's concern.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut counts = [0u64; 256];
        let mut total = 0u64;

        let mut buf = [0u8; 8192];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            for &byte in &buf[..n] {
                counts[byte as usize] += 1;
            }
            total += n as u64;
        }

        if total == 0 {
            return Err(Error::EmptyInput("input contained no bytes".to_string()));
        }
        Ok(FrequencyTable { counts, total })
    }

    /// Rebuilds a table from explicit per-byte counts, as parsed from a
    /// stream header. The end-of-stream symbol is implicit and never part
    /// of `counts`.
    pub fn from_counts(counts: [u64; 256]) -> Result<Self> {
        let total: u64 = counts.iter().sum();
        if total == 0 {
            return Err(Error::CorruptStream(
                "header carried no symbol frequencies".to_string(),
            ));
        }
        Ok(FrequencyTable { counts, total })
    }

    /// Occurrence count for one byte value.
    pub fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Total number of bytes observed.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct byte values observed.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Observed `(byte, count)` pairs in ascending byte order. This is the
    /// header serialization order; Eof is excluded.
    pub fn observed(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(b, &c)| (b as u8, c))
    }

    /// One weighted symbol per observed byte in ascending byte order, then
    /// the end-of-stream symbol with weight 1, always, independent of the
    /// data. This insertion order is part of the deterministic-tree
    /// contract.
    pub fn weighted_symbols(&self) -> Vec<WeightedSymbol> {
        let mut symbols: Vec<WeightedSymbol> = self
            .observed()
            .map(|(byte, count)| WeightedSymbol::new(Symbol::Byte(byte), count))
            .collect();
        symbols.push(WeightedSymbol::new(Symbol::Eof, 1));
        symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_each_byte() {
        let table = FrequencyTable::from_reader(&b"aabccc"[..]).unwrap();
        assert_eq!(table.count(b'a'), 2);
        assert_eq!(table.count(b'b'), 1);
        assert_eq!(table.count(b'c'), 3);
        assert_eq!(table.count(b'z'), 0);
        assert_eq!(table.total(), 6);
        assert_eq!(table.distinct(), 3);
    }

    #[test]
    fn test_empty_input_rejected() {
        let result = FrequencyTable::from_reader(&b""[..]);
        assert!(matches!(result, Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_eof_always_injected_last() {
        let table = FrequencyTable::from_reader(&b"ba"[..]).unwrap();
        let symbols = table.weighted_symbols();
        assert_eq!(symbols.len(), 3);
        assert_eq!(symbols[0].symbol(), Symbol::Byte(b'a'));
        assert_eq!(symbols[1].symbol(), Symbol::Byte(b'b'));
        assert_eq!(symbols[2].symbol(), Symbol::Eof);
        assert_eq!(symbols[2].weight(), 1);
    }

    #[test]
    fn test_from_counts_round_trips_observed() {
        let original = FrequencyTable::from_reader(&b"mississippi"[..]).unwrap();
        let mut counts = [0u64; 256];
        for (byte, count) in original.observed() {
            counts[byte as usize] = count;
        }
        let rebuilt = FrequencyTable::from_counts(counts).unwrap();
        assert_eq!(rebuilt.weighted_symbols(), original.weighted_symbols());
    }

    #[test]
    fn test_from_counts_rejects_all_zero() {
        let result = FrequencyTable::from_counts([0u64; 256]);
        assert!(matches!(result, Err(Error::CorruptStream(_))));
    }
}
