//! Duration rewrite.
//!
//! Derives a corrected stream duration from the repaired video timeline and
//! the declared framerate, then patches it into the first script tag.

use tracing::{debug, info, warn};

use crate::buffer::FileBuffer;
use crate::file::FlvFile;
use crate::script::DurationUpdate;

/// Framerate assumed when the metadata declares none.
const DEFAULT_FRAMERATE: f64 = 30.0;

/// Outcome of the duration pass, for reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationFix {
    /// Framerate used for the frame-count estimate (declared or default).
    pub framerate: f64,
    pub video_tags: usize,
    /// Corrected duration in seconds.
    pub duration_s: f64,
    /// True when the metadata had no duration field to patch.
    pub needs_update: bool,
}

/// Computes and writes back the corrected duration.
///
/// The duration is the larger of the two available estimates: the last
/// corrected video timestamp (milliseconds to seconds) and the frame count
/// divided by the framerate. A file with no script tag or no video tags is
/// skipped; there is nothing to write or nothing to measure.
pub fn repair_duration(file: &mut FlvFile, buf: &mut FileBuffer) -> Option<DurationFix> {
    let Some(&script_index) = file.script.first() else {
        debug!("no script tag present, skipping duration repair");
        return None;
    };
    let Some(&last_video) = file.video.last() else {
        debug!("no video tags present, skipping duration repair");
        return None;
    };

    let framerate = file.tags[script_index]
        .metadata
        .as_ref()
        .and_then(|metadata| metadata.framerate)
        .unwrap_or(DEFAULT_FRAMERATE);

    let from_timestamp = f64::from(file.tags[last_video].timestamp) / 1000.0;
    let from_frame_count = file.video.len() as f64 / framerate;
    let duration_s = from_timestamp.max(from_frame_count);

    let update = match file.tags[script_index].metadata.as_mut() {
        Some(metadata) => metadata.set_duration(buf, duration_s),
        None => DurationUpdate { needs_update: true },
    };
    if update.needs_update {
        warn!(
            duration_s,
            "metadata carries no duration field to patch, value not written"
        );
    }

    info!(framerate, frames = file.video.len(), duration_s, "duration repaired");

    Some(DurationFix {
        framerate,
        video_tags: file.video.len(),
        duration_s,
        needs_update: update.needs_update,
    })
}
