//! # flv-mend
//!
//! Repairs malformed FLV container files whose tag timestamps are
//! non-monotonic or whose declared duration metadata is wrong, a common
//! artifact of streams captured mid-transmission or concatenated from
//! multiple segments.
//!
//! The file is read fully into memory, scanned into a tag model, and the
//! audio and video timelines are rewritten into non-decreasing sequences
//! before the stream duration is recomputed and a corrected copy written.
//!
//! ```no_run
//! use flv_mend::FlvProcessor;
//!
//! # async fn repair() -> Result<(), flv_mend::FlvError> {
//! let report = FlvProcessor::new("capture.flv").run().await?;
//! println!("corrected {} timestamps", report.timestamps_corrected);
//! # Ok(())
//! # }
//! ```

pub mod amf0;
pub mod buffer;
pub mod error;
pub mod file;
pub mod header;
pub mod processor;
pub mod repair;
pub mod script;
pub mod tag;

#[cfg(test)]
pub(crate) mod test_utils;

pub use buffer::FileBuffer;
pub use error::FlvError;
pub use file::{FlvFile, ScanEnd};
pub use header::FlvHeader;
pub use processor::{FlvProcessor, ProcessorOptions, RepairReport};
pub use tag::{Tag, TagType};
