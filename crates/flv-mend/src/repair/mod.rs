//! The two repair passes: timeline reconstruction and duration rewrite.

pub mod duration;
pub mod timeline;

pub use duration::{DurationFix, repair_duration};
pub use timeline::repair_timeline;
