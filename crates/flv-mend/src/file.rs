//! Container scan: header plus the full tag walk.
//!
//! The scan is deliberately best-effort. Anything that stops it mid-stream
//! (truncation, an unrecognized tag type) terminates the walk with whatever
//! was collected so far instead of failing the run; partial files still get
//! partially repaired. Only a missing or non-FLV header is a hard error.

use tracing::debug;

use crate::buffer::FileBuffer;
use crate::error::FlvError;
use crate::header::{FLV_HEADER_SIZE, FlvHeader};
use crate::tag::{FLV_PREVIOUS_TAG_SIZE, Tag, TagType};

/// Why the tag walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEnd {
    /// Fewer than 5 bytes remained past the last tag.
    EndOfStream,
    /// A discriminator byte that is not audio, video or script data.
    /// Unknown types end the stream, they are never skipped over.
    UnknownTagType(u8),
    /// A tag header or declared payload ran past the end of the buffer.
    Truncated,
}

/// The parsed container model.
///
/// `tags` is the arena in file order; `script`, `video` and `audio` are
/// index lists into it, each tag appearing in exactly one of them. The model
/// is rebuilt from scratch on every parse.
#[derive(Debug)]
pub struct FlvFile {
    pub header: FlvHeader,
    pub tags: Vec<Tag>,
    pub script: Vec<usize>,
    pub video: Vec<usize>,
    pub audio: Vec<usize>,
    pub scan_end: ScanEnd,
}

impl FlvFile {
    /// Walks the buffer from offset 0: header first, then tags until the
    /// stream ends.
    pub fn parse(buf: &FileBuffer) -> Result<Self, FlvError> {
        let header = FlvHeader::parse(buf)?;

        let mut file = FlvFile {
            header,
            tags: Vec::new(),
            script: Vec::new(),
            video: Vec::new(),
            audio: Vec::new(),
            scan_end: ScanEnd::EndOfStream,
        };

        let mut cursor = FLV_HEADER_SIZE;
        loop {
            // Classifying the next tag needs the previous-tag-size field
            // plus the type byte; fewer remaining bytes is a clean end of
            // stream, not truncation.
            let Some(discriminator) = buf.read_u8(cursor + FLV_PREVIOUS_TAG_SIZE) else {
                file.scan_end = ScanEnd::EndOfStream;
                break;
            };
            let tag_type = match TagType::classify(discriminator) {
                Some(tag_type) => tag_type,
                None => {
                    file.scan_end = ScanEnd::UnknownTagType(discriminator);
                    break;
                }
            };

            let previous = file.tags.len().checked_sub(1);
            let tag = match Tag::read(buf, cursor, tag_type, previous) {
                Some(tag) => tag,
                None => {
                    file.scan_end = ScanEnd::Truncated;
                    break;
                }
            };

            cursor += tag.total_len();
            let index = file.tags.len();
            match tag_type {
                TagType::Audio => file.audio.push(index),
                TagType::Video => file.video.push(index),
                TagType::Script => file.script.push(index),
            }
            file.tags.push(tag);
        }

        debug!(
            tags = file.tags.len(),
            audio = file.audio.len(),
            video = file.video.len(),
            script = file.script.len(),
            scan_end = ?file.scan_end,
            "container scan complete"
        );

        Ok(file)
    }
}
