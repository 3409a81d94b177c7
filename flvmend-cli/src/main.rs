mod cli;

use anyhow::Context;
use clap::Parser;
use flv_mend::{FlvProcessor, ProcessorOptions, ScanEnd};
use std::process;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::Args;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("repair failed: {e:#}");
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let input = args.input.clone();
    let mut options = ProcessorOptions::new(&args.input);
    options.output = args.output;
    options.no_fix = args.no_fix;

    let report = FlvProcessor::with_options(options)
        .run()
        .await
        .with_context(|| format!("repairing {}", input.display()))?;

    println!(
        "scanned {} tags ({} video, {} audio, {} metadata)",
        report.video_tags + report.audio_tags + report.script_tags,
        report.video_tags,
        report.audio_tags,
        report.script_tags,
    );
    match report.scan_end {
        ScanEnd::EndOfStream => {}
        ScanEnd::UnknownTagType(value) => {
            println!("scan stopped at an unknown tag type ({value}); repaired what was scanned")
        }
        ScanEnd::Truncated => {
            println!("file is truncated mid-tag; repaired what was scanned")
        }
    }
    println!("corrected {} timestamps", report.timestamps_corrected);
    if let Some(duration) = report.duration {
        println!(
            "duration: {:.3} s ({} frames at {} fps)",
            duration.duration_s, duration.video_tags, duration.framerate
        );
    }
    match report.output {
        Some(path) => println!("wrote {}", path.display()),
        None => println!("dry run, nothing written"),
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let default = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt().with_env_filter(filter).with_target(false).init();
}
