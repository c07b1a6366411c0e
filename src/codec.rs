//! Compress/decompress orchestration and the on-disk stream format.
//!
//! A compressed stream is self-contained:
//!
//! ```text
//! magic    4 bytes   b"HUF1"
//! count    u32 LE    distinct source byte values (1..=256)
//! entries  count x   byte (u8) then frequency (u64 LE), ascending bytes
//! payload            MSB-first concatenated codes, Eof code last,
//!                    final byte right-padded with zero bits
//! ```
//!
//! The header stores observed byte frequencies only, never the
//! end-of-stream symbol, which the decoder re-injects with weight 1. Tree
//! construction is deterministic (fixed insertion order, stable heap
//! tie-break, first-popped-goes-left), so rebuilding from the header yields
//! the exact code table the encoder used and decompression needs nothing
//! held in memory from a prior compress call.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::huffman::{code_table_for, CodeTable, FrequencyTable, Symbol};
use crate::io::{BitReader, BitWriter};

/// Leading magic of every compressed stream.
const MAGIC: [u8; 4] = *b"HUF1";

/// Well-known compress output path, relative to the working directory.
pub const COMPRESSED_OUTPUT: &str = "compressed.huff";

/// Well-known decompress output path, relative to the working directory.
pub const DECOMPRESSED_OUTPUT: &str = "decompressed.bin";

/// Closed status set for callers that want no error detail (the GUI/CLI
/// surface). Mid-stream failures map to `NotFound`, matching the original
/// catch-all; use the `*_file` functions for the full error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The source could not be read, or the operation failed mid-stream.
    NotFound,
    /// The source contained zero bytes; nothing was written.
    Empty,
    /// The output artifact was written.
    Success,
}

/// Outcome of a successful compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressSummary {
    /// Source bytes consumed.
    pub bytes_read: u64,
    /// Compressed bytes written, header included.
    pub bytes_written: u64,
}

/// Outcome of a successful decompression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressSummary {
    /// Decoded bytes written.
    pub bytes_written: u64,
}

/// Compresses `input` into the well-known output location.
pub fn compress<P: AsRef<Path>>(input: P) -> Status {
    match compress_file(input.as_ref(), Path::new(COMPRESSED_OUTPUT)) {
        Ok(_) => Status::Success,
        Err(e) => status_of(&e),
    }
}

/// Decompresses `input` into the well-known output location.
pub fn decompress<P: AsRef<Path>>(input: P) -> Status {
    match decompress_file(input.as_ref(), Path::new(DECOMPRESSED_OUTPUT)) {
        Ok(_) => Status::Success,
        Err(e) => status_of(&e),
    }
}

fn status_of(error: &Error) -> Status {
    match error {
        Error::EmptyInput(_) => Status::Empty,
        _ => Status::NotFound,
    }
}

/// Compresses one file.
///
/// Two passes over the source: a frequency count, then the encode pass that
/// re-reads each byte, writes its code, and appends the Eof code before
/// finishing the bit writer. The output file is not created until the
/// source has been counted, so an empty source leaves no artifact behind.
pub fn compress_file(input: &Path, output: &Path) -> Result<CompressSummary> {
    let frequencies = FrequencyTable::from_reader(BufReader::new(open_source(input)?))
        .map_err(|e| match e {
            Error::EmptyInput(_) => Error::EmptyInput(input.display().to_string()),
            other => other,
        })?;
    let codes = code_table_for(&frequencies)?;
    debug!(
        "{}: {} bytes, {} distinct symbols, longest code {} bits",
        input.display(),
        frequencies.total(),
        frequencies.distinct(),
        codes.max_code_len()
    );

    let mut sink = BufWriter::new(File::create(output)?);
    let header_bytes = write_header(&mut sink, &frequencies)?;

    let source = BufReader::new(open_source(input)?);
    let mut writer = BitWriter::new(sink);
    for byte in source.bytes() {
        let byte = byte?;
        let code = codes.code_for(Symbol::Byte(byte)).ok_or_else(|| {
            Error::CorruptStream(format!(
                "byte 0x{byte:02x} has no code; source changed between passes"
            ))
        })?;
        writer.write_bits(code)?;
    }
    let eof = codes
        .code_for(Symbol::Eof)
        .ok_or_else(|| Error::AmbiguousCode("table lacks the end-of-stream code".to_string()))?;
    writer.write_bits(eof)?;
    let payload_bytes = writer.finish()?;

    debug!(
        "{}: wrote {} header + {} payload bytes",
        output.display(),
        header_bytes,
        payload_bytes
    );
    Ok(CompressSummary {
        bytes_read: frequencies.total(),
        bytes_written: header_bytes + payload_bytes,
    })
}

/// Decompresses one file produced by [`compress_file`].
///
/// Reads the header, rebuilds the code table, then streams symbols through
/// a [`BitReader`] until the end-of-stream marker.
pub fn decompress_file(input: &Path, output: &Path) -> Result<DecompressSummary> {
    let mut source = BufReader::new(open_source(input)?);
    let frequencies = read_header(&mut source)?;
    let codes = code_table_for(&frequencies)?;
    debug!(
        "{}: header restored {} distinct symbols",
        input.display(),
        frequencies.distinct()
    );

    let sink = BufWriter::new(File::create(output)?);
    let bytes_written = decode_stream(source, sink, &codes)?;
    debug!("{}: decoded {} bytes", output.display(), bytes_written);
    Ok(DecompressSummary { bytes_written })
}

/// Decompresses with an explicitly supplied code table instead of the
/// stream header: the in-process variant for callers that kept the table
/// from a prior compress call. The table is validated defensively; the
/// source must be a bare payload with no header.
pub fn decompress_with_table(
    input: &Path,
    output: &Path,
    codes: &CodeTable,
) -> Result<DecompressSummary> {
    codes.validate()?;
    let source = BufReader::new(open_source(input)?);
    let sink = BufWriter::new(File::create(output)?);
    let bytes_written = decode_stream(source, sink, codes)?;
    Ok(DecompressSummary { bytes_written })
}

/// Compresses a byte slice into a self-contained stream.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let frequencies = FrequencyTable::from_reader(data)?;
    let codes = code_table_for(&frequencies)?;

    let mut out = Vec::new();
    write_header(&mut out, &frequencies)?;
    let mut writer = BitWriter::new(&mut out);
    for &byte in data {
        let code = codes.code_for(Symbol::Byte(byte)).ok_or_else(|| {
            Error::AmbiguousCode(format!("byte 0x{byte:02x} missing from the table"))
        })?;
        writer.write_bits(code)?;
    }
    let eof = codes
        .code_for(Symbol::Eof)
        .ok_or_else(|| Error::AmbiguousCode("table lacks the end-of-stream code".to_string()))?;
    writer.write_bits(eof)?;
    writer.finish()?;
    Ok(out)
}

/// Decompresses a self-contained stream produced by [`compress_bytes`].
pub fn decompress_bytes(stream: &[u8]) -> Result<Vec<u8>> {
    let mut source = stream;
    let frequencies = read_header(&mut source)?;
    let codes = code_table_for(&frequencies)?;

    let mut out = Vec::new();
    decode_stream(source, &mut out, &codes)?;
    Ok(out)
}

fn decode_stream<R: Read, W: Write>(source: R, mut sink: W, codes: &CodeTable) -> Result<u64> {
    let mut reader = BitReader::new(source);
    let mut bytes_written = 0u64;
    loop {
        match reader.read_symbol(codes)? {
            Symbol::Eof => break,
            Symbol::Byte(byte) => {
                sink.write_all(&[byte])?;
                bytes_written += 1;
            }
        }
    }
    sink.flush()?;
    Ok(bytes_written)
}

fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(path.display().to_string())
        } else {
            Error::Io(e)
        }
    })
}

fn write_header<W: Write>(sink: &mut W, frequencies: &FrequencyTable) -> Result<u64> {
    sink.write_all(&MAGIC)?;
    sink.write_all(&(frequencies.distinct() as u32).to_le_bytes())?;
    let mut written = (MAGIC.len() + 4) as u64;
    for (byte, count) in frequencies.observed() {
        sink.write_all(&[byte])?;
        sink.write_all(&count.to_le_bytes())?;
        written += 9;
    }
    Ok(written)
}

fn read_header<R: Read>(source: &mut R) -> Result<FrequencyTable> {
    let mut magic = [0u8; 4];
    read_header_bytes(source, &mut magic)?;
    if magic != MAGIC {
        return Err(Error::CorruptStream("bad magic".to_string()));
    }

    let mut count_bytes = [0u8; 4];
    read_header_bytes(source, &mut count_bytes)?;
    let count = u32::from_le_bytes(count_bytes);
    if count == 0 || count > 256 {
        return Err(Error::CorruptStream(format!(
            "implausible symbol count {count}"
        )));
    }

    let mut counts = [0u64; 256];
    let mut previous: Option<u8> = None;
    for _ in 0..count {
        let mut byte = [0u8; 1];
        read_header_bytes(source, &mut byte)?;
        let mut freq_bytes = [0u8; 8];
        read_header_bytes(source, &mut freq_bytes)?;
        let frequency = u64::from_le_bytes(freq_bytes);

        if previous.is_some_and(|p| p >= byte[0]) {
            return Err(Error::CorruptStream(
                "header entries out of order".to_string(),
            ));
        }
        if frequency == 0 {
            return Err(Error::CorruptStream(format!(
                "zero frequency for byte 0x{:02x}",
                byte[0]
            )));
        }
        counts[byte[0] as usize] = frequency;
        previous = Some(byte[0]);
    }
    FrequencyTable::from_counts(counts)
}

fn read_header_bytes<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<()> {
    source.read_exact(buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::CorruptStream("truncated header".to_string())
        } else {
            Error::Io(e)
        }
    })
}
