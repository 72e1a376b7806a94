use std::path::Path;

use lofty::config::WriteOptions;
use lofty::prelude::*;
use lofty::tag::{ItemKey, Tag, TagType};

/// Write a short silent mono WAV file with no tags.
pub fn write_silent_wav(path: &Path) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for _ in 0..800 {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// Save a `tag_type` tag with artist, title and an optional BPM to `path`.
pub fn tag_file(path: &Path, tag_type: TagType, artist: &str, title: &str, bpm: Option<&str>) {
    let mut tag = Tag::new(tag_type);
    tag.insert_text(ItemKey::TrackArtist, artist.to_string());
    tag.insert_text(ItemKey::TrackTitle, title.to_string());
    if let Some(bpm) = bpm {
        tag.insert_text(ItemKey::IntegerBpm, bpm.to_string());
    }
    tag.save_to_path(path, WriteOptions::default()).unwrap();
}
