use std::path::PathBuf;

use thiserror::Error;

use crate::library::TagError;

/// Why a file dropped out of the pipeline.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("{0}")]
    Unreadable(TagError),

    #[error("tag has no artist or no title")]
    MissingArtistOrTitle,

    #[error("unable to find {title} - {artist} in the catalog")]
    Unmatched { artist: String, title: String },

    #[error("catalog has no tempo for this track")]
    NoTempo,

    #[error("{0}")]
    WriteFailed(TagError),
}

#[derive(Debug)]
pub struct ItemFailure {
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedFile {
    pub path: PathBuf,
    pub bpm: f64,
}

/// Outcome of one run, in scan order.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Audio files found by the scan.
    pub found: usize,
    /// Files whose tag could be read.
    pub readable: usize,
    /// Readable files that already carried a BPM.
    pub already_tagged: usize,
    /// Files selected for matching.
    pub eligible: usize,
    /// Files with a catalog match.
    pub matched: usize,
    pub tagged: Vec<TaggedFile>,
    pub failures: Vec<ItemFailure>,
}

impl RunReport {
    pub fn write_failures(&self) -> usize {
        self.failures
            .iter()
            .filter(|f| matches!(f.reason, SkipReason::WriteFailed(_)))
            .count()
    }
}
