//! Bit unpacking and incremental code matching.

use std::io::Read;

use bitvec::prelude::*;

use crate::error::{Error, Result};
use crate::huffman::{CodeTable, Symbol};

/// Consumes a compressed byte stream one byte at a time and recovers
/// symbols by matching buffered bits against a code table.
///
/// Each pulled byte is expanded into a working buffer, most-significant
/// bit first to match the writer. Growing prefixes of the buffer (length 1,
/// 2, 3, …) are tested against the table's inverse mapping; prefix-freedom
/// guarantees the first match is the only correct one. The matched prefix
/// is drained and scanning restarts at the front of what remains.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    source: R,
    buffer: BitVec<u8, Msb0>,
}

impl<R: Read> BitReader<R> {
    /// Wraps a byte source.
    pub fn new(source: R) -> Self {
        BitReader {
            source,
            buffer: BitVec::new(),
        }
    }

    /// Decodes the next symbol.
    ///
    /// Fails with [`Error::CorruptStream`] when the buffered bits exceed
    /// the table's longest code without matching anything (mismatched
    /// table), or when the source is exhausted mid-code (truncated stream).
    /// The caller stops at [`Symbol::Eof`]; leftover buffered bits are the
    /// writer's zero padding and are simply discarded with the reader.
    pub fn read_symbol(&mut self, table: &CodeTable) -> Result<Symbol> {
        loop {
            let limit = self.buffer.len().min(table.max_code_len());
            for len in 1..=limit {
                if let Some(symbol) = table.lookup(&self.buffer[..len]) {
                    self.buffer.drain(..len);
                    return Ok(symbol);
                }
            }

            if self.buffer.len() >= table.max_code_len() && table.max_code_len() > 0 {
                return Err(Error::CorruptStream(
                    "buffered bits match no code in the table".to_string(),
                ));
            }

            if !self.pull_byte()? {
                return Err(Error::CorruptStream(
                    "input ended before the end-of-stream marker".to_string(),
                ));
            }
        }
    }

    fn pull_byte(&mut self) -> Result<bool> {
        let mut byte = [0u8; 1];
        loop {
            match self.source.read(&mut byte) {
                Ok(0) => return Ok(false),
                Ok(_) => break,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.buffer.extend_from_bitslice(byte[0].view_bits::<Msb0>());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::{FrequencyTable, HuffmanNode};
    use crate::io::BitWriter;

    fn table_for(data: &[u8]) -> CodeTable {
        let freqs = FrequencyTable::from_reader(data).unwrap();
        let root = HuffmanNode::build(freqs.weighted_symbols()).unwrap();
        CodeTable::from_tree(&root).unwrap()
    }

    fn encode(data: &[u8], table: &CodeTable) -> Vec<u8> {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        for &byte in data {
            writer.write_bits(table.code_for(Symbol::Byte(byte)).unwrap()).unwrap();
        }
        writer.write_bits(table.code_for(Symbol::Eof).unwrap()).unwrap();
        writer.finish().unwrap();
        out
    }

    #[test]
    fn test_reads_symbols_until_eof_marker() {
        let data = b"compressed bits";
        let table = table_for(data);
        let stream = encode(data, &table);

        let mut reader = BitReader::new(&stream[..]);
        let mut decoded = Vec::new();
        loop {
            match reader.read_symbol(&table).unwrap() {
                Symbol::Eof => break,
                Symbol::Byte(b) => decoded.push(b),
            }
        }
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_truncated_stream_is_corrupt() {
        let data = b"some payload long enough to truncate";
        let table = table_for(data);
        let stream = encode(data, &table);

        // Drop the tail so the Eof code can never complete.
        let mut reader = BitReader::new(&stream[..stream.len() / 2]);
        let result = loop {
            match reader.read_symbol(&table) {
                Ok(Symbol::Eof) => break Ok(()),
                Ok(_) => continue,
                Err(e) => break Err(e),
            }
        };
        assert!(matches!(result, Err(Error::CorruptStream(_))));
    }

    #[test]
    fn test_mismatched_table_is_corrupt() {
        // An incomplete table leaves bit patterns with no code. Scanning
        // past its longest code without a match must fail, not loop.
        let sparse = CodeTable::from_codes([
            (Symbol::Byte(b'a'), bitvec![u8, Msb0; 0]),
        ])
        .unwrap();

        let stream = [0b1000_0000u8];
        let mut reader = BitReader::new(&stream[..]);
        let result = reader.read_symbol(&sparse);
        assert!(matches!(result, Err(Error::CorruptStream(_))));
    }

    #[test]
    fn test_trailing_padding_left_in_buffer() {
        let data = &[b'a'; 3];
        let table = table_for(data);
        let stream = encode(data, &table);
        assert_eq!(stream.len(), 1); // 3 data bits + 1 eof bit + 4 pad bits

        let mut reader = BitReader::new(&stream[..]);
        for _ in 0..3 {
            assert_eq!(reader.read_symbol(&table).unwrap(), Symbol::Byte(b'a'));
        }
        assert_eq!(reader.read_symbol(&table).unwrap(), Symbol::Eof);
    }
}
