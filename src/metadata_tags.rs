//! Tag block reading, cover presence checks and cover embedding.
//!
//! The pipeline only talks to [`TagBackend`]; [`LoftyTagBackend`] is the
//! container-agnostic implementation shipped with the tool. Every public
//! helper below converts backend failures into log lines and plain values so
//! a single broken file never stops a scan.

use std::path::{Path, PathBuf};

use lofty::config::{ParseOptions, WriteOptions};
use lofty::error::LoftyError;
use lofty::file::{AudioFile, TaggedFile, TaggedFileExt};
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::prelude::Accessor;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};
use log::{error, info, warn};

use crate::cover_image::{CoverImage, CoverMime};

const COVER_DESCRIPTION: &str = "Cover";

/// Typed view of the text fields and attachments of one file's tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagBlock {
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub picture_count: usize,
}

impl TagBlock {
    pub fn has_cover(&self) -> bool {
        self.picture_count > 0
    }

    /// Album artist when present, plain artist otherwise.
    pub fn credited_artist(&self) -> Option<&str> {
        self.album_artist.as_deref().or(self.artist.as_deref())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("unable to read tags from {path}: {source}")]
    Open { path: PathBuf, source: LoftyError },
    #[error("no writable tag available for {path}")]
    NoWritableTag { path: PathBuf },
    #[error("unable to write tags to {path}: {source}")]
    Write { path: PathBuf, source: LoftyError },
}

/// Outcome of the cover presence check for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverPresence {
    Present,
    Missing,
    /// The container could not be decoded; the file is never written to.
    Unreadable,
}

/// Capability interface over an audio container's tag structure.
pub trait TagBackend {
    /// Returns `Ok(None)` when the container has no tag header at all.
    fn read_tag_block(&self, path: &Path) -> Result<Option<TagBlock>, TagError>;

    /// Appends a front-cover picture, creating the tag header when absent.
    fn embed_front_cover(&self, path: &Path, image: &CoverImage) -> Result<(), TagError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagBackend;

impl LoftyTagBackend {
    fn open(path: &Path) -> Result<TaggedFile, TagError> {
        let open_error = |source| TagError::Open {
            path: path.to_path_buf(),
            source,
        };
        Probe::open(path)
            .map_err(open_error)?
            .options(ParseOptions::new().read_properties(false))
            .read()
            .map_err(open_error)
    }
}

fn first_non_empty_value<F>(
    primary_tag: Option<&Tag>,
    tags: &[Tag],
    mut extractor: F,
) -> Option<String>
where
    F: FnMut(&Tag) -> Option<String>,
{
    primary_tag
        .into_iter()
        .chain(tags.iter())
        .filter_map(|tag| extractor(tag))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn lofty_mime(mime: CoverMime) -> MimeType {
    match mime {
        CoverMime::Png => MimeType::Png,
        CoverMime::Jpeg => MimeType::Jpeg,
    }
}

impl TagBackend for LoftyTagBackend {
    fn read_tag_block(&self, path: &Path) -> Result<Option<TagBlock>, TagError> {
        let tagged_file = Self::open(path)?;
        let tags = tagged_file.tags();
        if tags.is_empty() {
            return Ok(None);
        }
        let primary_tag = tagged_file.primary_tag();

        let artist = first_non_empty_value(primary_tag, tags, |tag| {
            tag.artist().map(|value| value.into_owned())
        });
        let album = first_non_empty_value(primary_tag, tags, |tag| {
            tag.album().map(|value| value.into_owned())
        });
        let album_artist = first_non_empty_value(primary_tag, tags, |tag| {
            tag.get_string(&ItemKey::AlbumArtist).map(str::to_string)
        });
        let picture_count = tags.iter().map(|tag| tag.pictures().len()).sum();

        Ok(Some(TagBlock {
            artist,
            album,
            album_artist,
            picture_count,
        }))
    }

    fn embed_front_cover(&self, path: &Path, image: &CoverImage) -> Result<(), TagError> {
        let mut tagged_file = Self::open(path)?;
        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }

        let tag = tagged_file
            .tag_mut(tag_type)
            .ok_or_else(|| TagError::NoWritableTag {
                path: path.to_path_buf(),
            })?;
        tag.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            Some(lofty_mime(image.mime())),
            Some(COVER_DESCRIPTION.into()),
            image.data().to_vec(),
        ));

        tagged_file
            .save_to_path(path, WriteOptions::default())
            .map_err(|source| TagError::Write {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Reads `(artist, album)` from a file; album artist wins over artist.
///
/// Unreadable files yield `(None, None)` and a warning.
pub fn read_artist_album(
    backend: &dyn TagBackend,
    path: &Path,
) -> (Option<String>, Option<String>) {
    match backend.read_tag_block(path) {
        Ok(Some(block)) => {
            let artist = block.credited_artist().map(str::to_string);
            (artist, block.album)
        }
        Ok(None) => (None, None),
        Err(err) => {
            warn!("\t\t{err}");
            (None, None)
        }
    }
}

pub fn check_cover_presence(backend: &dyn TagBackend, path: &Path) -> CoverPresence {
    match backend.read_tag_block(path) {
        Ok(Some(block)) if block.has_cover() => CoverPresence::Present,
        Ok(_) => CoverPresence::Missing,
        Err(err) => {
            error!("\t\tUnable to check {}: {}", path.display(), err);
            CoverPresence::Unreadable
        }
    }
}

/// Embeds `image` into `path`, reporting success as a boolean.
pub fn embed_cover(backend: &dyn TagBackend, path: &Path, image: &CoverImage) -> bool {
    match backend.embed_front_cover(path, image) {
        Ok(()) => {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_else(|| path.to_string_lossy());
            info!("\t\tCover stored {file_name}");
            true
        }
        Err(err) => {
            error!("\t\tError storing cover {}: {}", path.display(), err);
            false
        }
    }
}
