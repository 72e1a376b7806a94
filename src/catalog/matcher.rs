use std::sync::LazyLock;

use regex::Regex;

use super::model::TrackId;
use super::{Catalog, CatalogError};
use crate::library::Candidate;

static ORIGINAL_MIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\(Original Mix\)\s*").expect("static regex is valid")
});

/// Strip the "(Original Mix)" marker from a title.
///
/// Returns `None` when the title does not contain the marker. Whitespace
/// around each removed marker collapses to a single space.
pub fn normalize_title(title: &str) -> Option<String> {
    if !ORIGINAL_MIX.is_match(title) {
        return None;
    }
    let stripped = ORIGINAL_MIX.replace_all(title, " ");
    Some(stripped.trim().to_string())
}

/// A catalog hit and the title that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMatch {
    pub id: TrackId,
    pub matched_title: String,
}

/// Search for `candidate`, retrying once with a normalized title on a miss.
pub fn find_match<C: Catalog + ?Sized>(
    catalog: &mut C,
    candidate: &Candidate,
) -> Result<Option<TrackMatch>, CatalogError> {
    if let Some(id) = catalog.search_track(&candidate.artist, &candidate.title)? {
        return Ok(Some(TrackMatch {
            id,
            matched_title: candidate.title.clone(),
        }));
    }

    let Some(normalized) = normalize_title(&candidate.title)
        .filter(|t| !t.is_empty() && *t != candidate.title)
    else {
        return Ok(None);
    };

    tracing::debug!(
        artist = %candidate.artist,
        title = %candidate.title,
        retry = %normalized,
        "no hit, retrying with normalized title"
    );

    Ok(catalog
        .search_track(&candidate.artist, &normalized)?
        .map(|id| TrackMatch {
            id,
            matched_title: normalized,
        }))
}
