//! The repair orchestrator: load, parse, repair, write back.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::buffer::FileBuffer;
use crate::error::FlvError;
use crate::file::{FlvFile, ScanEnd};
use crate::repair::{DurationFix, repair_duration, repair_timeline};

/// Completion hook invoked after the output file has been written.
pub type CompletionCallback = Box<dyn FnOnce() + Send>;

/// Options for one repair run.
pub struct ProcessorOptions {
    pub input: PathBuf,
    /// Defaults to `<input>.fix.flv`.
    pub output: Option<PathBuf>,
    /// Parse and repair in memory only; write nothing.
    pub no_fix: bool,
    /// Invoked once, after a successful write-back. Never invoked when
    /// `no_fix` is set or when the run fails.
    pub on_complete: Option<CompletionCallback>,
}

impl ProcessorOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            no_fix: false,
            on_complete: None,
        }
    }
}

/// Summary of what a run scanned and changed.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairReport {
    /// Path written, or `None` for a `no_fix` run.
    pub output: Option<PathBuf>,
    pub scan_end: ScanEnd,
    pub audio_tags: usize,
    pub video_tags: usize,
    pub script_tags: usize,
    /// Tags whose timestamp changed, across both media collections.
    pub timestamps_corrected: usize,
    /// `None` when the file had no script tag or no video tags.
    pub duration: Option<DurationFix>,
}

/// Sequences one repair run: load, parse, timeline repair per media type,
/// duration repair, then write-back unless suppressed.
///
/// All mutation happens on the in-memory buffer; the input file is never
/// touched.
pub struct FlvProcessor {
    options: ProcessorOptions,
}

impl FlvProcessor {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self::with_options(ProcessorOptions::new(input))
    }

    pub fn with_options(options: ProcessorOptions) -> Self {
        Self { options }
    }

    /// The path the corrected copy will be written to.
    pub fn output_path(&self) -> PathBuf {
        match &self.options.output {
            Some(path) => path.clone(),
            None => default_output_path(&self.options.input),
        }
    }

    pub async fn run(mut self) -> Result<RepairReport, FlvError> {
        info!(input = %self.options.input.display(), "repairing FLV file");
        let mut buffer = FileBuffer::load(&self.options.input).await?;
        debug!(bytes = buffer.len(), "file resident");

        let mut file = FlvFile::parse(&buffer)?;

        // The two media timelines never interact; order is arbitrary.
        let timestamps_corrected = repair_timeline(&mut file.tags, &file.video)
            + repair_timeline(&mut file.tags, &file.audio);
        let duration = repair_duration(&mut file, &mut buffer);

        let output = if self.options.no_fix {
            debug!("no_fix set, skipping write-back");
            None
        } else {
            for tag in &file.tags {
                tag.apply_timestamp(&mut buffer);
            }
            let path = self.output_path();
            buffer.save(&path).await?;
            info!(output = %path.display(), "corrected copy written");
            if let Some(on_complete) = self.options.on_complete.take() {
                on_complete();
            }
            Some(path)
        };

        Ok(RepairReport {
            output,
            scan_end: file.scan_end,
            audio_tags: file.audio.len(),
            video_tags: file.video.len(),
            script_tags: file.script.len(),
            timestamps_corrected,
            duration,
        })
    }
}

fn default_output_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".fix.flv");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::test_utils::{MetaProp, init_tracing, sample_file};

    fn corrupted_file_bytes() -> Vec<u8> {
        sample_file(
            &[
                MetaProp::Number("duration", 0.0),
                MetaProp::Number("framerate", 30.0),
            ],
            &[0, 5000, 5033],
            &[0, 800, 823],
        )
    }

    #[tokio::test]
    async fn test_end_to_end_repair() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.flv");
        tokio::fs::write(&input, corrupted_file_bytes()).await.unwrap();

        let completed = Arc::new(AtomicBool::new(false));
        let flag = completed.clone();

        let mut options = ProcessorOptions::new(&input);
        options.on_complete = Some(Box::new(move || {
            flag.store(true, Ordering::SeqCst);
        }));
        let report = FlvProcessor::with_options(options).run().await.unwrap();

        assert_eq!(report.video_tags, 3);
        assert_eq!(report.audio_tags, 3);
        assert_eq!(report.scan_end, ScanEnd::EndOfStream);
        // Video: 5000 and 5033 rewritten; audio: 800 and 823 rewritten
        assert_eq!(report.timestamps_corrected, 4);
        assert!(completed.load(Ordering::SeqCst));

        let output = report.output.unwrap();
        assert_eq!(output, PathBuf::from(format!("{}.fix.flv", input.display())));

        // The corrected copy parses back with the repaired timeline
        let buf = FileBuffer::load(&output).await.unwrap();
        let fixed = FlvFile::parse(&buf).unwrap();
        let video: Vec<u32> = fixed.video.iter().map(|&i| fixed.tags[i].timestamp).collect();
        assert_eq!(video, vec![0, 33, 66]);
        let metadata = fixed.tags[fixed.script[0]].metadata.as_ref().unwrap();
        // max(0.066, 3 / 30) = 0.1 s
        assert_eq!(metadata.duration, Some(0.1));

        // The input file is untouched
        let original = tokio::fs::read(&input).await.unwrap();
        assert_eq!(original, corrupted_file_bytes());
    }

    #[tokio::test]
    async fn test_no_fix_writes_nothing() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.flv");
        tokio::fs::write(&input, corrupted_file_bytes()).await.unwrap();

        let mut options = ProcessorOptions::new(&input);
        options.no_fix = true;
        let processor = FlvProcessor::with_options(options);
        let expected_output = processor.output_path();
        let report = processor.run().await.unwrap();

        assert_eq!(report.output, None);
        assert_eq!(report.timestamps_corrected, 4);
        assert!(!tokio::fs::try_exists(&expected_output).await.unwrap());
    }

    #[tokio::test]
    async fn test_explicit_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.flv");
        let output = dir.path().join("mended.flv");
        tokio::fs::write(&input, corrupted_file_bytes()).await.unwrap();

        let mut options = ProcessorOptions::new(&input);
        options.output = Some(output.clone());
        let report = FlvProcessor::with_options(options).run().await.unwrap();

        assert_eq!(report.output, Some(output.clone()));
        assert!(tokio::fs::try_exists(&output).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_input_is_an_io_error() {
        let result = FlvProcessor::new("/nonexistent/input.flv").run().await;
        assert!(matches!(result, Err(FlvError::Io(_))));
    }

    #[tokio::test]
    async fn test_not_an_flv_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("not-flv.bin");
        tokio::fs::write(&input, b"MP4 something").await.unwrap();

        let result = FlvProcessor::new(&input).run().await;
        assert!(matches!(result, Err(FlvError::InvalidHeader)));
    }
}
