use std::fmt::Display;

use bytes::Bytes;

use crate::buffer::FileBuffer;
use crate::error::FlvError;

/// Size of the fixed FLV file header.
pub const FLV_HEADER_SIZE: usize = 9;

/// A parsed header field together with where it came from.
///
/// The offset and raw bytes are kept for diagnostics and round-tripping; the
/// header itself is never rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderField<T> {
    pub value: T,
    pub offset: usize,
    pub raw: Bytes,
}

// The FLV header, 9 bytes in total:
// "FLV" signature, version, audio/video flags, then the 4-byte header size.
#[derive(Debug, Clone, PartialEq)]
pub struct FlvHeader {
    pub signature: HeaderField<String>,
    pub version: HeaderField<u8>,
    pub flags: HeaderField<u8>,
    pub header_size: HeaderField<u32>,
}

impl FlvHeader {
    /// Parses the 9-byte header at the start of the buffer.
    ///
    /// A buffer shorter than 9 bytes or a signature other than `FLV` is a
    /// hard error: without a header there is nothing to repair. The declared
    /// header size is recorded but not validated; the tag stream is always
    /// scanned from byte 9, which is what every real-world encoder produces.
    pub fn parse(buf: &FileBuffer) -> Result<Self, FlvError> {
        let signature_bytes = buf.slice(0, 3).ok_or(FlvError::InvalidHeader)?;
        if signature_bytes != b"FLV" {
            return Err(FlvError::InvalidHeader);
        }
        let signature = HeaderField {
            value: String::from_utf8_lossy(signature_bytes).into_owned(),
            offset: 0,
            raw: Bytes::copy_from_slice(signature_bytes),
        };

        let version = HeaderField {
            value: buf.read_u8(3).ok_or(FlvError::InvalidHeader)?,
            offset: 3,
            raw: Bytes::copy_from_slice(buf.slice(3, 4).ok_or(FlvError::InvalidHeader)?),
        };

        let flags = HeaderField {
            value: buf.read_u8(4).ok_or(FlvError::InvalidHeader)?,
            offset: 4,
            raw: Bytes::copy_from_slice(buf.slice(4, 5).ok_or(FlvError::InvalidHeader)?),
        };

        let header_size = HeaderField {
            value: buf.read_u32_be(5).ok_or(FlvError::InvalidHeader)?,
            offset: 5,
            raw: Bytes::copy_from_slice(buf.slice(5, 9).ok_or(FlvError::InvalidHeader)?),
        };

        Ok(FlvHeader {
            signature,
            version,
            flags,
            header_size,
        })
    }

    pub fn has_audio(&self) -> bool {
        self.flags.value & 0b0000_0100 != 0
    }

    pub fn has_video(&self) -> bool {
        self.flags.value & 0b0000_0001 != 0
    }
}

impl Display for FlvHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FLV v{} (audio: {}, video: {}, header size: {})",
            self.version.value,
            self.has_audio(),
            self.has_video(),
            self.header_size.value
        )
    }
}
