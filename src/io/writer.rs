//! Bit packing into a byte sink.

use std::io::Write;

use bitvec::prelude::*;

use crate::error::Result;

/// Packs single bits into bytes, most-significant bit first, and emits each
/// completed byte to the sink.
///
/// [`BitWriter::finish`] must be called to emit a trailing partial byte;
/// dropping the writer without it loses up to 7 pending bits.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    sink: W,
    buffer: u8,
    pending: u32,
    written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Wraps a byte sink.
    pub fn new(sink: W) -> Self {
        BitWriter {
            sink,
            buffer: 0,
            pending: 0,
            written: 0,
        }
    }

    /// Appends one bit. Every 8 accumulated bits are flushed as one byte
    /// and the accumulator resets to empty.
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.buffer = (self.buffer << 1) | u8::from(bit);
        self.pending += 1;
        if self.pending == 8 {
            self.flush_byte()?;
        }
        Ok(())
    }

    /// Appends a whole code.
    pub fn write_bits(&mut self, bits: &BitSlice<u8, Msb0>) -> Result<()> {
        for bit in bits.iter().by_vals() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Bytes emitted so far (excludes pending bits).
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Number of bits accumulated toward the next byte, 0..=7.
    pub fn pending_bits(&self) -> u32 {
        self.pending
    }

    /// Emits the final partial byte, right-padded with zero bits, but only
    /// if at least one bit is pending. An empty accumulator emits nothing:
    /// writing a stray byte here would corrupt the stream.
    ///
    /// Flushes the sink and returns the total bytes emitted.
    pub fn finish(mut self) -> Result<u64> {
        if self.pending > 0 {
            self.buffer <<= 8 - self.pending;
            self.flush_byte()?;
        }
        self.sink.flush()?;
        Ok(self.written)
    }

    fn flush_byte(&mut self) -> Result<()> {
        self.sink.write_all(&[self.buffer])?;
        self.buffer = 0;
        self.pending = 0;
        self.written += 1;
        Ok(())
    }
}
