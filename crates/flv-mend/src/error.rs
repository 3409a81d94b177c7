use thiserror::Error;

/// Hard failures of a repair run.
///
/// Tag-level anomalies (truncation, unknown tag types) are deliberately not
/// errors: the scan ends early and the partial model is still repaired. See
/// [`crate::file::ScanEnd`].
#[derive(Error, Debug)]
pub enum FlvError {
    #[error("invalid FLV header")]
    InvalidHeader,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
