use std::collections::HashMap;

use super::{AudioFeatures, Catalog, CatalogError, TrackId};

/// In-memory catalog that records every search it receives.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    tracks: HashMap<(String, String), TrackId>,
    tempos: HashMap<TrackId, f64>,
    pub searches: Vec<(String, String)>,
    pub feature_requests: Vec<Vec<TrackId>>,
    pub fail_searches: bool,
}

impl FakeCatalog {
    /// A catalog whose searches all fail with a network error.
    pub fn failing() -> Self {
        Self {
            fail_searches: true,
            ..Self::default()
        }
    }

    pub fn with_track(mut self, artist: &str, title: &str, id: &str, tempo: Option<f64>) -> Self {
        let id = TrackId::new(id);
        self.tracks
            .insert((artist.to_string(), title.to_string()), id.clone());
        if let Some(tempo) = tempo {
            self.tempos.insert(id, tempo);
        }
        self
    }
}

impl Catalog for FakeCatalog {
    fn search_track(&mut self, artist: &str, title: &str) -> Result<Option<TrackId>, CatalogError> {
        self.searches.push((artist.to_string(), title.to_string()));
        if self.fail_searches {
            return Err(CatalogError::Network("connection refused".to_string()));
        }
        Ok(self
            .tracks
            .get(&(artist.to_string(), title.to_string()))
            .cloned())
    }

    fn audio_features(
        &mut self,
        ids: &[TrackId],
    ) -> Result<Vec<Option<AudioFeatures>>, CatalogError> {
        self.feature_requests.push(ids.to_vec());
        Ok(ids
            .iter()
            .map(|id| {
                self.tempos.get(id).map(|tempo| AudioFeatures {
                    id: id.clone(),
                    tempo: Some(*tempo),
                })
            })
            .collect())
    }
}
