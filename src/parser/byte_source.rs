//! Byte source abstractions for the tokenizer.
//!
//! This module provides the [ByteSource] trait and implementations for
//! different ways of accessing byte data during parsing.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

// =#========================================================================#=
// BYTE SOURCE (Trait)
// =#========================================================================#=
/// Trait defining the interface for byte sources used by the
/// [Tokenizer](crate::parser::Tokenizer).
///
/// This trait abstracts over different ways of accessing byte data:
/// - In-memory bytes ([InMemoryByteSource])
/// - Buffered reading from any reader, e.g. a file ([BufferedByteSource])
///
/// Sources only move forward; a tokenizer consumes its source once.
pub trait ByteSource {
    /// Peek at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Ok(Some(u8))` - The current byte if available
    /// * `Ok(None)` - If at end of data (EOF)
    fn peek(&mut self) -> std::io::Result<Option<u8>>;

    /// Get the current byte and advance the position (consume it).
    ///
    /// # Returns
    /// * `Ok(Some(u8))` - The current byte if available
    /// * `Ok(None)` - If at end of data (EOF)
    fn next_byte(&mut self) -> std::io::Result<Option<u8>>;

    /// Returns the number of bytes consumed so far.
    fn position(&self) -> usize;
}

// =#========================================================================#=
// IN MEMORY BYTE SOURCE
// =#========================================================================#=
/// An in-memory byte source that owns its data.
///
/// This is the most efficient byte source for input that fits into memory,
/// and the one used for parsing strings.
pub struct InMemoryByteSource {
    /// The owned byte data being parsed
    input: Vec<u8>,
    /// Current position in the data
    pos: usize,
}

impl InMemoryByteSource {
    /// Creates a new in-memory byte source from a Vec of bytes.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { input: bytes, pos: 0 }
    }

    /// Creates a new in-memory byte source by copying a string.
    pub fn from_str(input: &str) -> Self {
        Self::from_vec(input.as_bytes().to_vec())
    }
}

impl ByteSource for InMemoryByteSource {
    #[inline(always)]
    fn peek(&mut self) -> std::io::Result<Option<u8>> {
        Ok(self.input.get(self.pos).copied())
    }

    #[inline(always)]
    fn next_byte(&mut self) -> std::io::Result<Option<u8>> {
        let byte = self.input.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }

    #[inline]
    fn position(&self) -> usize {
        self.pos
    }
}

// =#========================================================================#=
// BUFFERED BYTE SOURCE
// =#========================================================================#=
/// A buffered byte source streaming from any reader.
///
/// Uses [BufReader] so large inputs never have to be held in memory at once.
/// Read errors are passed on to the caller.
pub struct BufferedByteSource<R: Read> {
    /// Underlying reader, handles getting chunks from the input
    reader: BufReader<R>,
    /// Current absolute position in the stream
    pos: usize,
}

impl<R: Read> BufferedByteSource<R> {
    /// Wraps a reader into a buffered byte source.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            pos: 0,
        }
    }
}

impl BufferedByteSource<File> {
    /// Creates a new buffered byte source from a file path.
    ///
    /// # Arguments
    /// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> ByteSource for BufferedByteSource<R> {
    fn peek(&mut self) -> std::io::Result<Option<u8>> {
        let buf = self.reader.fill_buf()?;
        Ok(buf.first().copied())
    }

    fn next_byte(&mut self) -> std::io::Result<Option<u8>> {
        let byte = self.peek()?;
        if byte.is_some() {
            self.reader.consume(1);
            self.pos += 1;
        }
        Ok(byte)
    }

    fn position(&self) -> usize {
        self.pos
    }
}
