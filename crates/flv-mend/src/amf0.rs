//! Minimal AMF0 reader for `onMetaData` script payloads.
//!
//! Only the subset the repair passes need is implemented: decoding the
//! payload name, walking the top-level property map, and recording where the
//! `framerate` and `duration` numbers live so they can be read and (for
//! duration) patched in place. Numbers are always 8-byte IEEE 754 doubles,
//! so an in-place patch can never change the encoded size of the tag.
//!
//! Markers are defined in amf0_spec_121207.pdf section 2.1.

use byteorder::{BigEndian, ByteOrder};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive as _;

/// AMF0 marker types, the subset that appears in metadata payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum Amf0Marker {
    Number = 0x00,
    Boolean = 0x01,
    String = 0x02,
    Object = 0x03,
    Null = 0x05,
    Undefined = 0x06,
    EcmaArray = 0x08,
    ObjectEnd = 0x09,
    StrictArray = 0x0a,
    Date = 0x0b,
    LongString = 0x0c,
}

/// A numeric property value and the offset of its 8-byte body within the
/// walked payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberSlot {
    pub value: f64,
    pub value_offset: usize,
}

/// The metadata values the repair passes care about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataValues {
    pub name: String,
    pub framerate: Option<f64>,
    pub duration: Option<NumberSlot>,
}

/// Decodes a script tag payload: a short string name followed by one
/// Object or EcmaArray of properties.
///
/// Returns `None` for payloads that do not follow that shape, or that use a
/// marker this subset does not understand. Metadata decoding is best-effort
/// like the rest of the scan; a payload we cannot walk simply yields no
/// framerate or duration.
pub fn read_metadata(payload: &[u8]) -> Option<MetadataValues> {
    let mut walker = Amf0Walker::new(payload);

    if walker.read_marker()? != Amf0Marker::String {
        return None;
    }
    let name = walker.read_short_string()?;

    let mut values = MetadataValues {
        name,
        framerate: None,
        duration: None,
    };

    match walker.read_marker()? {
        Amf0Marker::Object => walker.walk_properties(Some(&mut values))?,
        Amf0Marker::EcmaArray => {
            // Declared element count, unreliable in practice; the property
            // list is terminated by an object-end marker regardless.
            walker.read_u32()?;
            walker.walk_properties(Some(&mut values))?;
        }
        _ => return None,
    }

    Some(values)
}

/// Positional reader over an AMF0 byte sequence.
struct Amf0Walker<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Amf0Walker<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, count: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(count)?;
        let bytes = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take(1).map(|b| b[0])
    }

    fn read_u16(&mut self) -> Option<u16> {
        self.take(2).map(BigEndian::read_u16)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take(4).map(BigEndian::read_u32)
    }

    fn read_marker(&mut self) -> Option<Amf0Marker> {
        Amf0Marker::from_u8(self.read_u8()?)
    }

    /// A length-prefixed (u16) string.
    fn read_short_string(&mut self) -> Option<String> {
        let len = self.read_u16()? as usize;
        let bytes = self.take(len)?;
        Some(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Walks a property list up to its object-end marker.
    ///
    /// Top-level numeric properties are recorded into `values`; nested
    /// objects and arrays are recursed into with recording disabled so an
    /// inner `duration` key cannot shadow the real one.
    fn walk_properties(&mut self, mut values: Option<&mut MetadataValues>) -> Option<()> {
        loop {
            let key = self.read_short_string()?;
            if key.is_empty() {
                // An empty key is only valid directly before object-end.
                return match self.read_marker()? {
                    Amf0Marker::ObjectEnd => Some(()),
                    _ => None,
                };
            }

            let marker = self.read_marker()?;
            if marker == Amf0Marker::Number {
                let value_offset = self.pos;
                let value = BigEndian::read_f64(self.take(8)?);
                if let Some(values) = values.as_deref_mut() {
                    match key.as_str() {
                        "framerate" => values.framerate = Some(value),
                        "duration" => {
                            values.duration = Some(NumberSlot {
                                value,
                                value_offset,
                            })
                        }
                        _ => {}
                    }
                }
            } else {
                self.skip_value(marker)?;
            }
        }
    }

    /// Advances past one value of the given marker type.
    fn skip_value(&mut self, marker: Amf0Marker) -> Option<()> {
        match marker {
            Amf0Marker::Number => {
                self.take(8)?;
            }
            Amf0Marker::Boolean => {
                self.take(1)?;
            }
            Amf0Marker::String => {
                let len = self.read_u16()? as usize;
                self.take(len)?;
            }
            Amf0Marker::LongString => {
                let len = self.read_u32()? as usize;
                self.take(len)?;
            }
            Amf0Marker::Null | Amf0Marker::Undefined | Amf0Marker::ObjectEnd => {}
            Amf0Marker::Date => {
                // f64 epoch millis plus a reserved i16 timezone
                self.take(10)?;
            }
            Amf0Marker::Object => {
                self.walk_properties(None)?;
            }
            Amf0Marker::EcmaArray => {
                self.read_u32()?;
                self.walk_properties(None)?;
            }
            Amf0Marker::StrictArray => {
                let count = self.read_u32()?;
                for _ in 0..count {
                    let marker = self.read_marker()?;
                    self.skip_value(marker)?;
                }
            }
        }
        Some(())
    }
}
