//! Static Huffman coding file compressor.
//!
//! This crate implements a byte-stream compressor/decompressor built on
//! classic single-pass Huffman coding:
//! - Frequency counting over the 256 possible byte values plus a reserved
//!   end-of-stream symbol
//! - Optimal prefix-free code construction via a binary min-heap
//! - Bit-level packing and unpacking of the encoded stream
//! - A self-contained stream format whose header carries the frequency
//!   table, so compression and decompression can run as separate processes
//!
//! Operations are synchronous and single-threaded. Each compress or
//! decompress call owns its frequency table, tree and code table; nothing
//! is shared across calls, so compressing many files concurrently just
//! means one call per file.
//!
//! # Examples
//!
//! ```no_run
//! use huffpack::codec;
//! use std::path::Path;
//!
//! let summary = codec::compress_file(Path::new("input.txt"), Path::new("input.huff"))?;
//! println!("wrote {} bytes", summary.bytes_written);
//! codec::decompress_file(Path::new("input.huff"), Path::new("restored.txt"))?;
//! # Ok::<(), huffpack::Error>(())
//! ```

pub mod codec;
pub mod error;
pub mod filter;
pub mod heap;
pub mod huffman;
pub mod io;

pub use codec::{compress, decompress, compress_file, decompress_file, Status};
pub use error::{Error, Result};
pub use huffman::{CodeTable, FrequencyTable, HuffmanNode, Symbol, WeightedSymbol};
pub use io::{BitReader, BitWriter};
