use std::path::PathBuf;

/// Tag fields the tagger cares about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagFields {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub bpm: Option<f64>,
}

impl TagFields {
    pub fn has_bpm(&self) -> bool {
        self.bpm.is_some()
    }

    /// Build a search candidate when both artist and title are present.
    pub fn candidate(&self) -> Option<Candidate> {
        let artist = self.artist.as_deref().filter(|s| !s.trim().is_empty())?;
        let title = self.title.as_deref().filter(|s| !s.trim().is_empty())?;
        Some(Candidate {
            artist: artist.to_string(),
            title: title.to_string(),
        })
    }
}

/// A scanned file together with the tag fields read from it.
#[derive(Debug, Clone)]
pub struct AudioFile {
    pub path: PathBuf,
    pub tags: TagFields,
}

/// Search key for the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub artist: String,
    pub title: String,
}
