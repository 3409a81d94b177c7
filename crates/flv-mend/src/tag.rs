//! FLV tag model.
//!
//! A tag occupies a contiguous byte range in the file buffer: the 4-byte
//! previous-tag-size field, an 11-byte tag header (type, payload size,
//! 24-bit timestamp plus 8-bit extension, stream id), then the payload.
//! Tags own no payload bytes; they carry offsets into the shared
//! [`FileBuffer`] and a cached, mutable timestamp that the repair passes
//! rewrite and [`Tag::apply_timestamp`] serializes back.
//!
//! Defined by video_file_format_spec_v10.pdf (Annex E.4.1 - FLV Tag).

use crate::buffer::FileBuffer;
use crate::script::ScriptMetadata;

/// The previous-tag-size field preceding every tag header.
pub const FLV_PREVIOUS_TAG_SIZE: usize = 4;
/// The fixed tag header that follows it.
pub const FLV_TAG_HEADER_SIZE: usize = 11;

/// Tag type discriminator, byte 0 of the tag header.
///
/// Any other value terminates the scan; encrypted and extension tag types
/// are deliberately not modeled.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagType {
    Audio = 8,
    Video = 9,
    Script = 18,
}

impl TagType {
    pub fn classify(value: u8) -> Option<TagType> {
        match value {
            8 => Some(TagType::Audio),
            9 => Some(TagType::Video),
            18 => Some(TagType::Script),
            _ => None,
        }
    }
}

/// One tag addressed by its byte range in the file buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub tag_type: TagType,
    /// Offset of the leading previous-tag-size field.
    pub offset: usize,
    pub payload_size: u32,
    /// Current timestamp in the container's millisecond units. Starts as
    /// the declared value; the timeline repair pass may overwrite it.
    pub timestamp: u32,
    /// Arena index of the preceding tag in file order.
    pub previous: Option<usize>,
    /// Decoded metadata, script tags only.
    pub metadata: Option<ScriptMetadata>,
}

impl Tag {
    /// Reads the tag starting at `offset` (the previous-tag-size field).
    ///
    /// Returns `None` when the 15 leading bytes cannot be read or the
    /// declared payload runs past the end of the buffer; the caller treats
    /// that as scan truncation.
    pub fn read(
        buf: &FileBuffer,
        offset: usize,
        tag_type: TagType,
        previous: Option<usize>,
    ) -> Option<Tag> {
        let header = offset + FLV_PREVIOUS_TAG_SIZE;
        let payload_size = buf.read_u24_be(header + 1)?;
        // 24-bit timestamp with the extension byte as bits 24..32
        let timestamp =
            buf.read_u24_be(header + 4)? | (u32::from(buf.read_u8(header + 7)?) << 24);

        let payload_start = header + FLV_TAG_HEADER_SIZE;
        let payload_end = payload_start.checked_add(payload_size as usize)?;
        if payload_end > buf.len() {
            return None;
        }

        let metadata = match tag_type {
            TagType::Script => ScriptMetadata::parse(buf, payload_start, payload_size as usize),
            _ => None,
        };

        Some(Tag {
            tag_type,
            offset,
            payload_size,
            timestamp,
            previous,
            metadata,
        })
    }

    /// Total bytes the scan advances past this tag, including the leading
    /// previous-tag-size field.
    pub fn total_len(&self) -> usize {
        FLV_PREVIOUS_TAG_SIZE + FLV_TAG_HEADER_SIZE + self.payload_size as usize
    }

    pub fn payload_start(&self) -> usize {
        self.offset + FLV_PREVIOUS_TAG_SIZE + FLV_TAG_HEADER_SIZE
    }

    /// Serializes the current timestamp back into the tag header bytes.
    pub fn apply_timestamp(&self, buf: &mut FileBuffer) {
        let header = self.offset + FLV_PREVIOUS_TAG_SIZE;
        buf.write_u24_be(header + 4, self.timestamp);
        buf.write_u8(header + 7, (self.timestamp >> 24) as u8);
    }
}
