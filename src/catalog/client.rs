use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;

use super::auth::ClientCredentialsAuth;
use super::model::{AudioFeatures, AudioFeaturesResponse, SearchResponse, TrackId};
use super::{Catalog, CatalogError};
use crate::config::{CatalogSettings, Credentials};

const USER_AGENT: &str = concat!("bpm-tagger/", env!("CARGO_PKG_VERSION"));

/// The audio-features endpoint accepts at most this many ids per request.
const MAX_FEATURE_IDS: usize = 100;

/// Blocking Spotify Web API client.
pub struct SpotifyClient {
    http: Client,
    api_base_url: String,
    market: Option<String>,
    auth: ClientCredentialsAuth,
}

impl SpotifyClient {
    pub fn new(settings: &CatalogSettings, credentials: Credentials) -> Result<Self, CatalogError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            market: settings.market.clone(),
            auth: ClientCredentialsAuth::new(settings.auth_url.clone(), credentials),
        })
    }

    fn send_get(&mut self, url: &str, params: &[(&str, &str)]) -> Result<Response, CatalogError> {
        let token = self.auth.bearer(&self.http)?.to_string();
        self.http
            .get(url)
            .bearer_auth(token)
            .query(params)
            .send()
            .map_err(|e| CatalogError::Network(e.to_string()))
    }

    fn get_json<T: DeserializeOwned>(
        &mut self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}/{}", self.api_base_url, endpoint);

        tracing::debug!(url = %url, "querying catalog");

        let mut response = self.send_get(&url, params)?;
        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!("access token rejected, requesting a new one");
            self.auth.invalidate();
            response = self.send_get(&url, params)?;
        }

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(CatalogError::Api(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

impl Catalog for SpotifyClient {
    fn search_track(&mut self, artist: &str, title: &str) -> Result<Option<TrackId>, CatalogError> {
        let query = format!("artist:{artist} track:{title}");
        let market = self.market.clone();

        let mut params = vec![("q", query.as_str()), ("type", "track"), ("limit", "1")];
        if let Some(market) = market.as_deref() {
            params.push(("market", market));
        }

        let response: SearchResponse = self.get_json("search", &params)?;
        let hit = response.tracks.items.into_iter().next();

        if let Some(item) = &hit {
            tracing::debug!(%artist, %title, id = %item.id, name = %item.name, "catalog hit");
        }
        Ok(hit.map(|item| item.id))
    }

    fn audio_features(
        &mut self,
        ids: &[TrackId],
    ) -> Result<Vec<Option<AudioFeatures>>, CatalogError> {
        let mut features = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_FEATURE_IDS) {
            let joined = chunk
                .iter()
                .map(TrackId::as_str)
                .collect::<Vec<_>>()
                .join(",");

            let response: AudioFeaturesResponse =
                self.get_json("audio-features", &[("ids", joined.as_str())])?;

            if response.audio_features.len() != chunk.len() {
                return Err(CatalogError::Parse(format!(
                    "asked for {} audio features, got {}",
                    chunk.len(),
                    response.audio_features.len()
                )));
            }
            features.extend(response.audio_features);
        }

        Ok(features)
    }
}
