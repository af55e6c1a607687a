//! Growable output buffer with backpatching support.

use byteorder::{ByteOrder, LittleEndian};
use std::io::{self, Write};

use crate::error::{Error, Result};

/// Append-only byte buffer that allows rewriting already written size fields
///
/// ```
/// use flat_archive::ByteSink;
///
/// let mut sink = ByteSink::new();
/// let size_at = sink.reserve_u32();
/// sink.append(b"abc");
/// sink.overwrite_u32(size_at, 3);
/// sink.pad_to_4();
///
/// assert_eq!(sink.as_slice(), &[3, 0, 0, 0, b'a', b'b', b'c', 0]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct ByteSink {
    buffer: Vec<u8>,
}

impl ByteSink {
    pub fn new() -> ByteSink {
        ByteSink::default()
    }

    /// Append raw bytes to the end of the buffer.
    pub fn append(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Append a zeroed 4 byte placeholder and return its offset.
    pub fn reserve_u32(&mut self) -> usize {
        let offset = self.len();
        self.append(&[0u8; 4]);
        offset
    }

    /// Rewrite 4 bytes at a previously written position.
    ///
    /// # Panics
    ///
    /// Panics if `offset + 4` is past the end of the written data.
    pub fn overwrite_u32(&mut self, offset: usize, value: u32) {
        assert!(
            offset + 4 <= self.len(),
            "backpatch at {offset} is outside of the {} written bytes",
            self.len()
        );
        LittleEndian::write_u32(&mut self.buffer[offset..offset + 4], value);
    }

    /// Append zero bytes until the length is a multiple of 4.
    pub fn pad_to_4(&mut self) {
        while self.buffer.len() % 4 != 0 {
            self.buffer.push(0);
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

impl Write for ByteSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Convert a byte count into the 4 byte size used by the format.
pub(crate) fn size_u32(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::SizeOverflow(len))
}
