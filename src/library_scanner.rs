//! Library walk and per-directory cover pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::album_identity::resolve_album_identity;
use crate::lastfm_client::CoverSource;
use crate::media_file_discovery::{collect_audio_files_in_directory, collect_library_directories};
use crate::metadata_tags::{check_cover_presence, embed_cover, CoverPresence, TagBackend};

/// Outcome counters for one scan invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub processed: usize,
    pub success: usize,
    pub errors: usize,
    pub not_found: usize,
    pub skipped_dirs: usize,
    pub unreadable: usize,
}

impl fmt::Display for ScanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Files:               {}", self.processed)?;
        writeln!(f, "  Files updated:       {}", self.success)?;
        writeln!(f, "  Errors:              {}", self.errors)?;
        writeln!(f, "  No covers:           {}", self.not_found)?;
        writeln!(f, "  Skipped directories: {}", self.skipped_dirs)?;
        write!(f, "  Unreadable files:    {}", self.unreadable)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),
    #[error("Path is no directory: {0}")]
    NotADirectory(PathBuf),
}

/// Wires the tag backend and cover source used for every directory.
pub struct LibraryScanner<'a> {
    tag_backend: &'a dyn TagBackend,
    cover_source: &'a dyn CoverSource,
    audio_extensions: &'a [String],
}

impl<'a> LibraryScanner<'a> {
    pub fn new(
        tag_backend: &'a dyn TagBackend,
        cover_source: &'a dyn CoverSource,
        audio_extensions: &'a [String],
    ) -> Self {
        Self {
            tag_backend,
            cover_source,
            audio_extensions,
        }
    }

    /// Runs the cover pipeline for the audio files directly inside
    /// `directory`, adding its outcome to `stats`.
    pub fn process_directory(&self, directory: &Path, stats: &mut ScanStats) {
        let files = collect_audio_files_in_directory(directory, self.audio_extensions);
        if files.is_empty() {
            return;
        }

        info!(
            "Parsing {} - Found {} audio files",
            directory.display(),
            files.len()
        );

        let mut has_cover = false;
        let mut files_without_cover = Vec::new();
        for file in &files {
            match check_cover_presence(self.tag_backend, file) {
                CoverPresence::Present => has_cover = true,
                CoverPresence::Missing => files_without_cover.push(file.as_path()),
                CoverPresence::Unreadable => stats.unreadable += 1,
            }
        }

        if files_without_cover.is_empty() {
            if has_cover {
                info!("\t\tCover exists, skipping");
                stats.skipped_dirs += 1;
            } else {
                warn!("\t\tNo readable audio files, skipping");
            }
            return;
        }

        info!("\t\tMissing covers: {} files", files_without_cover.len());

        let identity = resolve_album_identity(self.tag_backend, directory, &files);
        let cover = match self.cover_source.fetch_cover(&identity) {
            Ok(cover) => cover,
            Err(err) => {
                error!("\t\t{err}");
                warn!("No cover found for {identity}");
                stats.not_found += files_without_cover.len();
                return;
            }
        };
        debug!(
            "\t\tDownloaded cover: {} bytes, {}",
            cover.len(),
            cover.mime().as_str()
        );

        for file in files_without_cover {
            stats.processed += 1;
            if embed_cover(self.tag_backend, file, &cover) {
                stats.success += 1;
            } else {
                stats.errors += 1;
            }
        }
    }

    /// Walks every directory below `root` in sorted order.
    pub fn scan(&self, root: &Path) -> Result<ScanStats, ScanError> {
        if !root.exists() {
            return Err(ScanError::PathNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        info!("Starting Scan: {}", root.display());
        let mut stats = ScanStats::default();
        for directory in collect_library_directories(root) {
            self.process_directory(&directory, &mut stats);
        }
        Ok(stats)
    }
}
