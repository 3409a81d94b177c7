use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "flvmend",
    about = "Repair FLV files with broken timestamps or duration metadata",
    version
)]
pub struct Args {
    /// The FLV file to repair
    pub input: PathBuf,

    /// Where to write the corrected copy (default: <input>.fix.flv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Parse and repair in memory only; do not write an output file
    #[arg(long)]
    pub no_fix: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    pub quiet: bool,
}
