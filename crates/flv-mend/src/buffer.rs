//! Whole-file byte buffer with bounds-checked big-endian accessors.
//!
//! The entire FLV file is resident in memory for the lifetime of a repair
//! pass. Tags never copy payload data; they address ranges of this buffer by
//! absolute offset, and the repair passes patch timestamp and duration bytes
//! in place before the buffer is written back out.

use std::io;
use std::path::Path;

use byteorder::{BigEndian, ByteOrder};
use bytes::BytesMut;
use tokio::fs;

/// Mutable, fully resident file contents.
///
/// All reads are bounds-checked and return `None` past the end of the buffer;
/// the parser turns short reads into scan termination rather than panics.
#[derive(Debug, Clone, Default)]
pub struct FileBuffer {
    data: BytesMut,
}

impl FileBuffer {
    pub fn new(data: impl AsRef<[u8]>) -> Self {
        Self {
            data: BytesMut::from(data.as_ref()),
        }
    }

    /// Reads the whole file at `path` into a fresh buffer.
    pub async fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let contents = fs::read(path).await?;
        Ok(Self::new(contents))
    }

    /// Writes the buffer contents to `path`, creating or overwriting it.
    pub async fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, &self.data).await
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Byte range `[start, end)`, or `None` if it falls outside the buffer.
    pub fn slice(&self, start: usize, end: usize) -> Option<&[u8]> {
        self.data.get(start..end)
    }

    pub fn read_u8(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    pub fn read_u24_be(&self, offset: usize) -> Option<u32> {
        self.slice(offset, offset.checked_add(3)?)
            .map(BigEndian::read_u24)
    }

    pub fn read_u32_be(&self, offset: usize) -> Option<u32> {
        self.slice(offset, offset.checked_add(4)?)
            .map(BigEndian::read_u32)
    }

    /// Patches a single byte in place. Returns false if out of range.
    pub fn write_u8(&mut self, offset: usize, value: u8) -> bool {
        match self.data.get_mut(offset) {
            Some(byte) => {
                *byte = value;
                true
            }
            None => false,
        }
    }

    /// Patches the low 24 bits of `value` in place, big-endian.
    pub fn write_u24_be(&mut self, offset: usize, value: u32) -> bool {
        match offset
            .checked_add(3)
            .and_then(|end| self.data.get_mut(offset..end))
        {
            Some(dst) => {
                BigEndian::write_u24(dst, value & 0x00FF_FFFF);
                true
            }
            None => false,
        }
    }

    /// Patches an 8-byte IEEE 754 double in place, big-endian.
    pub fn write_f64_be(&mut self, offset: usize, value: f64) -> bool {
        match offset
            .checked_add(8)
            .and_then(|end| self.data.get_mut(offset..end))
        {
            Some(dst) => {
                BigEndian::write_f64(dst, value);
                true
            }
            None => false,
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
