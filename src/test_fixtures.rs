//! Audio fixtures shared by unit tests.

use std::fs;
use std::path::Path;

use lofty::config::WriteOptions;
use lofty::prelude::Accessor;
use lofty::tag::{ItemKey, Tag, TagExt, TagType};

pub const PNG_BYTES: [u8; 12] = [
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
];

// MPEG-1 Layer III, 128 kbit/s, 44.1 kHz, joint stereo, no padding
const MPEG_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];
const MPEG_FRAME_LEN: usize = 417;
const MPEG_FRAME_COUNT: usize = 8;

/// Writes a tag-less MP3 made of silent MPEG frames.
pub fn write_silent_mp3(path: &Path) {
    let mut bytes = Vec::with_capacity(MPEG_FRAME_LEN * MPEG_FRAME_COUNT);
    for _ in 0..MPEG_FRAME_COUNT {
        bytes.extend_from_slice(&MPEG_FRAME_HEADER);
        bytes.extend(std::iter::repeat_n(0u8, MPEG_FRAME_LEN - MPEG_FRAME_HEADER.len()));
    }
    fs::write(path, bytes).expect("should write mp3 fixture");
}

/// Writes an ID3v2 tag carrying the given text fields.
pub fn tag_mp3(path: &Path, artist: Option<&str>, album: Option<&str>, album_artist: Option<&str>) {
    let mut tag = Tag::new(TagType::Id3v2);
    if let Some(artist) = artist {
        tag.set_artist(artist.to_string());
    }
    if let Some(album) = album {
        tag.set_album(album.to_string());
    }
    if let Some(album_artist) = album_artist {
        tag.insert_text(ItemKey::AlbumArtist, album_artist.to_string());
    }
    tag.save_to_path(path, WriteOptions::default())
        .expect("should write ID3v2 fixture tag");
}
