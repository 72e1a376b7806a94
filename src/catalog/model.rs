use std::fmt;

use serde::Deserialize;

/// Opaque catalog track identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    #[cfg(test)]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The subset of a track's audio features the tagger reads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AudioFeatures {
    pub id: TrackId,
    /// Estimated tempo in beats per minute.
    pub tempo: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackPage {
    #[serde(default)]
    pub items: Vec<TrackItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackItem {
    pub id: TrackId,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AudioFeaturesResponse {
    /// One entry per requested id, `null` for ids without analysis.
    pub audio_features: Vec<Option<AudioFeatures>>,
}
