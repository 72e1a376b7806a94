//! Remote music catalog: track search and tempo lookup.
//!
//! [`Catalog`] is the seam the tagger talks to; [`SpotifyClient`] implements it
//! against the Spotify Web API using a client-credentials token.

use thiserror::Error;

mod auth;
mod client;
mod matcher;
mod model;

pub use client::SpotifyClient;
pub use matcher::{TrackMatch, find_match};
pub use model::{AudioFeatures, TrackId};

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network communication error
    #[error("network error: {0}")]
    Network(String),

    /// Token exchange failed
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Catalog returned an error response
    #[error("catalog API error {0}: {1}")]
    Api(u16, String),

    /// Response body did not have the expected shape
    #[error("unexpected catalog response: {0}")]
    Parse(String),
}

/// Track lookup operations the tagger needs from a catalog.
pub trait Catalog {
    /// Search for at most one track by artist and title.
    fn search_track(&mut self, artist: &str, title: &str) -> Result<Option<TrackId>, CatalogError>;

    /// Fetch audio features for `ids`, one entry per id in the same order.
    fn audio_features(&mut self, ids: &[TrackId])
    -> Result<Vec<Option<AudioFeatures>>, CatalogError>;
}

impl<C: Catalog + ?Sized> Catalog for &mut C {
    fn search_track(&mut self, artist: &str, title: &str) -> Result<Option<TrackId>, CatalogError> {
        (**self).search_track(artist, title)
    }

    fn audio_features(&mut self, ids: &[TrackId])
    -> Result<Vec<Option<AudioFeatures>>, CatalogError> {
        (**self).audio_features(ids)
    }
}

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests;
