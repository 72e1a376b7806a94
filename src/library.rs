//! Music library access: finding audio files and reading/writing their tags.

mod model;
mod scan;
mod tags;

pub use model::{AudioFile, Candidate, TagFields};
pub use scan::{ScanError, scan};
pub use tags::{LoftyTagStore, TagError, TagStore, format_bpm, parse_bpm};

#[cfg(test)]
pub(crate) mod testing;
