//! Metadata view over a script tag's AMF0 payload.
//!
//! Script tags (usually a single `onMetaData` at the start of the file)
//! carry the declared framerate and duration. The duration is the one value
//! the duration repair pass writes back; since AMF0 numbers are fixed-width
//! doubles it is patched in place without disturbing the tag layout.

use tracing::trace;

use crate::amf0;
use crate::buffer::FileBuffer;

/// Result of a duration write-back attempt.
///
/// `needs_update` is true when the payload has no numeric `duration` key to
/// patch: carrying the value would require re-encoding the tag and re-laying
/// out the file, which this tool does not do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationUpdate {
    pub needs_update: bool,
}

/// Decoded `onMetaData` values for one script tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptMetadata {
    pub name: String,
    pub framerate: Option<f64>,
    pub duration: Option<f64>,
    /// Absolute file offset of the duration number's 8-byte body.
    duration_offset: Option<usize>,
}

impl ScriptMetadata {
    /// Decodes the payload at `[payload_start, payload_start + payload_len)`.
    ///
    /// Returns `None` when the payload is not a walkable metadata object;
    /// the tag itself stays valid, it just carries no usable metadata.
    pub fn parse(buf: &FileBuffer, payload_start: usize, payload_len: usize) -> Option<Self> {
        let payload = buf.slice(payload_start, payload_start.checked_add(payload_len)?)?;
        let values = amf0::read_metadata(payload)?;
        trace!(
            name = %values.name,
            framerate = ?values.framerate,
            duration = ?values.duration.map(|slot| slot.value),
            "decoded script metadata"
        );
        Some(Self {
            name: values.name,
            framerate: values.framerate,
            duration: values.duration.map(|slot| slot.value),
            duration_offset: values.duration.map(|slot| payload_start + slot.value_offset),
        })
    }

    /// Writes a new duration into the payload, fixed-width and in place.
    pub fn set_duration(&mut self, buf: &mut FileBuffer, value: f64) -> DurationUpdate {
        match self.duration_offset {
            Some(offset) if buf.write_f64_be(offset, value) => {
                self.duration = Some(value);
                DurationUpdate {
                    needs_update: false,
                }
            }
            _ => DurationUpdate { needs_update: true },
        }
    }
}
