//! Timeline reconstruction.
//!
//! Rewrites the timestamps of one media collection (audio or video; the two
//! never interact) into a non-decreasing, gap-closed sequence built from
//! inter-frame deltas. Corrupted captures typically carry one of two
//! defects: a timestamp that jumps backwards (segment concatenation) or a
//! garbage second-frame timestamp left over from a mid-stream capture
//! start. Both are absorbed here.

use tracing::debug;

use crate::tag::Tag;

/// Largest believable first inter-frame delta, in the container's
/// millisecond timestamp units. A larger second-frame delta means the
/// declared timestamp is untrustworthy and is rebuilt by look-ahead.
const FIRST_DELTA_LIMIT: i64 = 100;

/// Rewrites the timestamps of the tags selected by `order` (arena indices
/// into `tags`, in file order). Returns how many timestamps changed.
///
/// The pass is a single forward fold; earlier tags are never revisited.
/// The first tag anchors the timeline: it is carried through unmodified and
/// seeds both the running original (`base`) and corrected (`prev`) values.
/// Running the pass again over its own output is a no-op.
pub fn repair_timeline(tags: &mut [Tag], order: &[usize]) -> usize {
    let mut base: i64 = 0;
    let mut prev: i64 = 0;
    let mut first_delta_resolved = false;
    let mut corrected_count = 0;

    for (pos, &index) in order.iter().enumerate() {
        let original = i64::from(tags[index].timestamp);
        if pos == 0 {
            base = original;
            prev = original;
            continue;
        }

        let mut delta = original - base;
        if delta < 0 {
            // The previous declared timestamp was itself garbage and larger
            // than this one; fall back to the raw value as the delta.
            delta = original;
        }
        if !first_delta_resolved {
            // The override is attempted exactly once, at the second tag.
            first_delta_resolved = true;
            if delta > FIRST_DELTA_LIMIT {
                // Second-frame timestamp is untrustworthy; rebuild the delta
                // from the following frame. With no following frame the raw
                // delta stands.
                if let Some(&next) = order.get(pos + 1) {
                    delta = i64::from(tags[next].timestamp) - original;
                }
            }
        }

        base = original;
        let corrected = prev + delta;
        prev = corrected;

        // A negative look-ahead delta can push the fold below zero; the
        // container cannot represent that, so the written value clamps to
        // the u32 range while the fold itself continues in i64 space.
        let corrected = u32::try_from(corrected.max(0)).unwrap_or(u32::MAX);
        if corrected != tags[index].timestamp {
            tags[index].timestamp = corrected;
            corrected_count += 1;
        }
    }

    if corrected_count > 0 {
        debug!(
            tags = order.len(),
            corrected = corrected_count,
            "timeline repaired"
        );
    }
    corrected_count
}
