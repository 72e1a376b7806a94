use std::path::Path;

use lofty::config::WriteOptions;
use lofty::prelude::*;
use lofty::tag::{ItemKey, Tag, TagType};
use thiserror::Error;

use super::model::TagFields;

#[derive(Debug, Error)]
pub enum TagError {
    /// lofty could not open or parse the file.
    #[error("unreadable tag: {0}")]
    Read(String),

    #[error("no tag present")]
    NoTag,

    #[error("file format does not support {0}")]
    Unsupported(String),

    #[error("refusing to write BPM value {0}")]
    InvalidBpm(f64),

    #[error("failed to save tag: {0}")]
    Write(String),
}

/// Reads and writes the tag fields the tagger needs.
pub trait TagStore {
    fn load(&self, path: &Path) -> Result<TagFields, TagError>;

    /// Set the BPM field and persist the tag to disk.
    fn write_bpm(&self, path: &Path, bpm: f64) -> Result<(), TagError>;
}

impl<S: TagStore + ?Sized> TagStore for &S {
    fn load(&self, path: &Path) -> Result<TagFields, TagError> {
        (**self).load(path)
    }

    fn write_bpm(&self, path: &Path, bpm: f64) -> Result<(), TagError> {
        (**self).write_bpm(path, bpm)
    }
}

/// `TagStore` backed by lofty.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagStore;

fn non_empty(v: Option<&str>) -> Option<String> {
    v.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a BPM item. Unparseable or non-positive values count as empty.
pub fn parse_bpm(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Decimal rendering for the free-form BPM item: at most two decimals, no trailing zeros.
pub fn format_bpm(bpm: f64) -> String {
    let s = format!("{bpm:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn read_fields(tag: &Tag) -> TagFields {
    // Bpm keeps decimals; IntegerBpm is what ID3v2 TBPM maps to.
    let bpm = tag
        .get_string(ItemKey::Bpm)
        .and_then(parse_bpm)
        .or_else(|| tag.get_string(ItemKey::IntegerBpm).and_then(parse_bpm));

    TagFields {
        artist: non_empty(tag.get_string(ItemKey::TrackArtist)),
        title: non_empty(tag.get_string(ItemKey::TrackTitle)),
        bpm,
    }
}

/// Store `value` as the tag's BPM. Returns false when the tag type has no BPM item.
fn set_bpm(tag: &mut Tag, value: &str) -> bool {
    let stored = tag.insert_text(ItemKey::IntegerBpm, value.to_string());
    // Vorbis comments carry a single BPM field; writing both keys would duplicate it.
    if tag.tag_type() != TagType::VorbisComments {
        return tag.insert_text(ItemKey::Bpm, value.to_string()) || stored;
    }
    stored
}

/// Artist and title items present on `tag`.
fn identity_items(tag: &Tag) -> Vec<(ItemKey, String)> {
    let mut items = Vec::new();
    if let Some(artist) = tag.get_string(ItemKey::TrackArtist) {
        items.push((ItemKey::TrackArtist, artist.to_string()));
    }
    if let Some(title) = tag.get_string(ItemKey::TrackTitle) {
        items.push((ItemKey::TrackTitle, title.to_string()));
    }
    items
}

impl TagStore for LoftyTagStore {
    fn load(&self, path: &Path) -> Result<TagFields, TagError> {
        let tagged = lofty::read_from_path(path).map_err(|e| TagError::Read(e.to_string()))?;
        let tag = tagged
            .primary_tag()
            .or_else(|| tagged.first_tag())
            .ok_or(TagError::NoTag)?;
        Ok(read_fields(tag))
    }

    fn write_bpm(&self, path: &Path, bpm: f64) -> Result<(), TagError> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(TagError::InvalidBpm(bpm));
        }
        let value = format_bpm(bpm);

        let mut tagged = lofty::read_from_path(path).map_err(|e| TagError::Read(e.to_string()))?;
        let primary = tagged.primary_tag_type();

        // Write into the tag `load` reads from, so artist and title stay with the BPM.
        let source = tagged
            .primary_tag()
            .or_else(|| tagged.first_tag())
            .map(Tag::tag_type);

        let written_to_source = match source {
            Some(tag_type) => tagged
                .tag_mut(tag_type)
                .is_some_and(|tag| set_bpm(tag, &value)),
            None => false,
        };

        let tag_type = match source {
            Some(tag_type) if written_to_source => tag_type,
            _ => {
                // The source tag has no BPM item (RIFF INFO, ID3v1): move to the primary tag.
                let carried = source
                    .and_then(|tag_type| tagged.tag(tag_type))
                    .map(identity_items)
                    .unwrap_or_default();

                if tagged.tag(primary).is_none() {
                    tagged.insert_tag(Tag::new(primary));
                }
                let tag = tagged
                    .tag_mut(primary)
                    .ok_or_else(|| TagError::Unsupported(format!("{primary:?} tags")))?;

                for (key, text) in carried {
                    tag.insert_text(key, text);
                }
                if !set_bpm(tag, &value) {
                    return Err(TagError::Unsupported(format!("BPM in {primary:?} tags")));
                }
                primary
            }
        };

        let tag = tagged
            .tag(tag_type)
            .ok_or_else(|| TagError::Unsupported(format!("{tag_type:?} tags")))?;
        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| TagError::Write(e.to_string()))?;

        tracing::debug!(path = %path.display(), bpm, ?tag_type, "saved BPM");
        Ok(())
    }
}
