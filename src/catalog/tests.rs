use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use tiny_http::{Header, Response, Server, StatusCode};

use super::matcher::normalize_title;
use super::model::{AudioFeaturesResponse, SearchResponse};
use super::testing::FakeCatalog;
use super::*;
use crate::config::{CatalogSettings, Credentials};
use crate::library::Candidate;

fn candidate(artist: &str, title: &str) -> Candidate {
    Candidate {
        artist: artist.to_string(),
        title: title.to_string(),
    }
}

#[test]
fn normalize_title_strips_original_mix_marker() {
    assert_eq!(
        normalize_title("Nonexistent Track (Original Mix)").as_deref(),
        Some("Nonexistent Track")
    );
    assert_eq!(
        normalize_title("Opus   (Original Mix)  ").as_deref(),
        Some("Opus")
    );
    assert_eq!(
        normalize_title("Left (Original Mix) Right").as_deref(),
        Some("Left Right")
    );
}

#[test]
fn normalize_title_is_case_sensitive_and_needs_the_marker() {
    assert_eq!(normalize_title("Opus"), None);
    assert_eq!(normalize_title("Opus (original mix)"), None);
    assert_eq!(normalize_title("Opus (Radio Edit)"), None);
}

#[test]
fn find_match_uses_primary_hit_without_retry() {
    let mut catalog = FakeCatalog::default().with_track("Daft Punk", "One More Time", "a1", None);

    let hit = find_match(&mut catalog, &candidate("Daft Punk", "One More Time"))
        .unwrap()
        .unwrap();
    assert_eq!(hit.id, TrackId::new("a1"));
    assert_eq!(hit.matched_title, "One More Time");
    assert_eq!(catalog.searches.len(), 1);
}

#[test]
fn find_match_retries_once_without_original_mix() {
    let mut catalog = FakeCatalog::default().with_track("Eric Prydz", "Opus", "op", None);

    let hit = find_match(&mut catalog, &candidate("Eric Prydz", "Opus (Original Mix)"))
        .unwrap()
        .unwrap();
    assert_eq!(hit.id, TrackId::new("op"));
    assert_eq!(hit.matched_title, "Opus");
    assert_eq!(
        catalog.searches,
        vec![
            ("Eric Prydz".to_string(), "Opus (Original Mix)".to_string()),
            ("Eric Prydz".to_string(), "Opus".to_string()),
        ]
    );
}

#[test]
fn find_match_gives_up_after_failed_retry() {
    let mut catalog = FakeCatalog::default();

    let hit = find_match(
        &mut catalog,
        &candidate("Unknown", "Nonexistent Track (Original Mix)"),
    )
    .unwrap();
    assert!(hit.is_none());
    assert_eq!(catalog.searches.len(), 2);
    assert_eq!(catalog.searches[1].1, "Nonexistent Track");
}

#[test]
fn find_match_does_not_retry_without_marker() {
    let mut catalog = FakeCatalog::default();

    let hit = find_match(&mut catalog, &candidate("Unknown", "Nothing Here")).unwrap();
    assert!(hit.is_none());
    assert_eq!(catalog.searches.len(), 1);
}

#[test]
fn find_match_does_not_retry_with_empty_title() {
    let mut catalog = FakeCatalog::default();

    let hit = find_match(&mut catalog, &candidate("Unknown", "(Original Mix)")).unwrap();
    assert!(hit.is_none());
    assert_eq!(catalog.searches.len(), 1);
}

#[test]
fn find_match_propagates_catalog_errors() {
    let mut catalog = FakeCatalog::failing();

    let err = find_match(&mut catalog, &candidate("A", "B")).unwrap_err();
    assert!(matches!(err, CatalogError::Network(_)));
}

#[test]
fn search_response_takes_first_item_id() {
    let body = r#"{"tracks":{"href":"x","items":[{"id":"4uLU6hMCjMI75M1A2tKUQC","name":"One More Time","uri":"spotify:track:4uLU6hMCjMI75M1A2tKUQC"}],"limit":1,"total":1}}"#;
    let parsed: SearchResponse = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.tracks.items.len(), 1);
    assert_eq!(parsed.tracks.items[0].id.as_str(), "4uLU6hMCjMI75M1A2tKUQC");
    assert_eq!(parsed.tracks.items[0].name, "One More Time");

    let empty: SearchResponse = serde_json::from_str(r#"{"tracks":{"items":[]}}"#).unwrap();
    assert!(empty.tracks.items.is_empty());
}

#[test]
fn audio_features_response_keeps_null_entries() {
    let body = r#"{"audio_features":[{"id":"a","tempo":123.0,"energy":0.9},null]}"#;
    let parsed: AudioFeaturesResponse = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.audio_features.len(), 2);
    assert_eq!(
        parsed.audio_features[0],
        Some(AudioFeatures {
            id: TrackId::new("a"),
            tempo: Some(123.0),
        })
    );
    assert_eq!(parsed.audio_features[1], None);
}

fn json(body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
    Response::from_string(body).with_header(header)
}

fn has_bearer(request: &tiny_http::Request, token: &str) -> bool {
    let expected = format!("Bearer {token}");
    request
        .headers()
        .iter()
        .any(|h| h.field.equiv("Authorization") && h.value.as_str() == expected)
}

/// Serve a minimal imitation of the token, search and audio-features endpoints.
fn spawn_mock_catalog(token_requests: Arc<AtomicUsize>) -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();

    thread::spawn(move || {
        for request in server.incoming_requests() {
            let url = request.url().to_string();
            let response = if url.starts_with("/api/token") {
                token_requests.fetch_add(1, Ordering::SeqCst);
                json(r#"{"access_token":"tok","token_type":"Bearer","expires_in":3600}"#)
            } else if !has_bearer(&request, "tok") {
                json(r#"{"error":{"status":401,"message":"No token provided"}}"#)
                    .with_status_code(StatusCode(401))
            } else if url.starts_with("/v1/search") && url.contains("One+More+Time") {
                json(r#"{"tracks":{"items":[{"id":"omt","name":"One More Time"}]}}"#)
            } else if url.starts_with("/v1/search") {
                json(r#"{"tracks":{"items":[]}}"#)
            } else if url.starts_with("/v1/audio-features") && url.contains("ids=omt") {
                json(r#"{"audio_features":[{"id":"omt","tempo":122.98}]}"#)
            } else {
                json(r#"{"error":{"status":404,"message":"not found"}}"#)
                    .with_status_code(StatusCode(404))
            };
            let _ = request.respond(response);
        }
    });

    format!("http://{addr}")
}

fn client_for(base: &str) -> SpotifyClient {
    let settings = CatalogSettings {
        api_base_url: format!("{base}/v1"),
        auth_url: format!("{base}/api/token"),
        timeout_secs: 5,
        ..CatalogSettings::default()
    };
    let credentials = Credentials {
        client_id: "id".to_string(),
        client_secret: "secret".to_string(),
    };
    SpotifyClient::new(&settings, credentials).unwrap()
}

#[test]
fn spotify_client_searches_and_fetches_tempo() {
    let token_requests = Arc::new(AtomicUsize::new(0));
    let base = spawn_mock_catalog(token_requests.clone());
    let mut client = client_for(&base);

    let hit = client.search_track("Daft Punk", "One More Time").unwrap();
    assert_eq!(hit, Some(TrackId::new("omt")));

    let miss = client.search_track("Unknown", "Nonexistent Track").unwrap();
    assert_eq!(miss, None);

    let features = client.audio_features(&[TrackId::new("omt")]).unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].as_ref().and_then(|f| f.tempo), Some(122.98));

    // The token is fetched once and reused.
    assert_eq!(token_requests.load(Ordering::SeqCst), 1);
}

#[test]
fn spotify_client_surfaces_api_errors() {
    let base = spawn_mock_catalog(Arc::new(AtomicUsize::new(0)));
    let mut client = client_for(&base);

    let err = client.audio_features(&[TrackId::new("missing")]).unwrap_err();
    assert!(matches!(err, CatalogError::Api(404, _)), "got {err:?}");
}
