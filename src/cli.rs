use std::path::PathBuf;

use clap::{CommandFactory, Parser};

/// Write catalog tempo values into the BPM tags of a music folder.
#[derive(Debug, Parser)]
#[command(name = "bpm-tagger", version, about)]
pub struct Cli {
    /// Path of folder where BPMs must be tagged
    #[arg(long, value_name = "PATH")]
    pub folder: Option<PathBuf>,

    /// Also retag files that already have a BPM
    #[arg(long)]
    pub overwrite: bool,

    /// Print a line for every file written
    #[arg(short, long)]
    pub verbose: bool,
}

/// Usage text shown when no folder was given.
pub fn usage() -> String {
    format!(
        "{}\n\nnote: don't forget to export your SPOTIPY_CLIENT_ID and SPOTIPY_CLIENT_SECRET",
        Cli::command().render_help()
    )
}
