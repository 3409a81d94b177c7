//! Builders for synthetic FLV buffers shared across the test suite.

use crate::amf0::Amf0Marker;
use crate::tag::TagType;

/// Initializes tracing for tests, writing to the test output capture.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A typed `onMetaData` property for the payload builder.
pub enum MetaProp<'a> {
    Number(&'a str, f64),
    Bool(&'a str, bool),
    String(&'a str, &'a str),
}

/// The 9-byte file header.
pub fn flv_header_bytes(has_audio: bool, has_video: bool) -> Vec<u8> {
    let mut flags = 0u8;
    if has_audio {
        flags |= 0b0000_0100;
    }
    if has_video {
        flags |= 0b0000_0001;
    }
    let mut bytes = b"FLV".to_vec();
    bytes.push(0x01);
    bytes.push(flags);
    bytes.extend_from_slice(&9u32.to_be_bytes());
    bytes
}

/// Appends one tag: previous-tag-size field, 11-byte header, payload.
pub fn push_tag(out: &mut Vec<u8>, tag_type: u8, timestamp: u32, payload: &[u8]) {
    // Previous-tag-size value is only used for backward traversal; the
    // scanner never reads it, so zero is fine here.
    out.extend_from_slice(&0u32.to_be_bytes());
    out.push(tag_type);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes()[1..]);
    out.extend_from_slice(&(timestamp & 0x00FF_FFFF).to_be_bytes()[1..]);
    out.push((timestamp >> 24) as u8);
    out.extend_from_slice(&[0, 0, 0]); // stream id
    out.extend_from_slice(payload);
}

/// An AMF0 `onMetaData` payload carrying the given properties as a single
/// object.
pub fn on_metadata_payload(props: &[MetaProp<'_>]) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.push(Amf0Marker::String as u8);
    payload.extend_from_slice(&(b"onMetaData".len() as u16).to_be_bytes());
    payload.extend_from_slice(b"onMetaData");
    payload.push(Amf0Marker::Object as u8);
    for prop in props {
        match prop {
            MetaProp::Number(key, value) => {
                push_property_key(&mut payload, key);
                payload.push(Amf0Marker::Number as u8);
                payload.extend_from_slice(&value.to_be_bytes());
            }
            MetaProp::Bool(key, value) => {
                push_property_key(&mut payload, key);
                payload.push(Amf0Marker::Boolean as u8);
                payload.push(*value as u8);
            }
            MetaProp::String(key, value) => {
                push_property_key(&mut payload, key);
                payload.push(Amf0Marker::String as u8);
                payload.extend_from_slice(&(value.len() as u16).to_be_bytes());
                payload.extend_from_slice(value.as_bytes());
            }
        }
    }
    payload.extend_from_slice(&[0, 0, Amf0Marker::ObjectEnd as u8]);
    payload
}

fn push_property_key(out: &mut Vec<u8>, key: &str) {
    out.extend_from_slice(&(key.len() as u16).to_be_bytes());
    out.extend_from_slice(key.as_bytes());
}

/// A whole synthetic file: header, optional metadata tag, then video and
/// audio tags interleaved with the given timestamps.
pub fn sample_file(props: &[MetaProp<'_>], video: &[u32], audio: &[u32]) -> Vec<u8> {
    let mut bytes = flv_header_bytes(!audio.is_empty(), !video.is_empty());
    if !props.is_empty() {
        push_tag(&mut bytes, TagType::Script as u8, 0, &on_metadata_payload(props));
    }
    let mut video = video.iter();
    let mut audio = audio.iter();
    loop {
        match (video.next(), audio.next()) {
            (None, None) => break,
            (video_ts, audio_ts) => {
                if let Some(&ts) = video_ts {
                    // 5-byte stand-in for an AVC frame body
                    push_tag(&mut bytes, TagType::Video as u8, ts, &[0x17, 1, 0, 0, 0]);
                }
                if let Some(&ts) = audio_ts {
                    push_tag(&mut bytes, TagType::Audio as u8, ts, &[0xAF, 1, 0]);
                }
            }
        }
    }
    bytes
}
