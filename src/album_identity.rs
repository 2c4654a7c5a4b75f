use std::fmt;
use std::path::{Path, PathBuf};

use log::info;

use crate::metadata_tags::{read_artist_album, TagBackend};

/// The `(artist, album)` pair used as the remote lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumIdentity {
    pub artist: String,
    pub album: String,
}

impl AlbumIdentity {
    pub fn new(artist: impl Into<String>, album: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            album: album.into(),
        }
    }

    /// Parent directory name as artist, directory name as album.
    ///
    /// Only meaningful for libraries laid out as `Artist/Album/track`.
    pub fn from_directory(directory: &Path) -> Self {
        let name_of = |path: Option<&Path>| {
            path.and_then(Path::file_name)
                .map(|name| name.to_string_lossy().trim().to_string())
                .unwrap_or_default()
        };
        Self::new(name_of(directory.parent()), name_of(Some(directory)))
    }
}

impl fmt::Display for AlbumIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' - '{}'", self.artist, self.album)
    }
}

/// First file whose tags carry both artist and album wins; otherwise the
/// directory names are used.
pub fn resolve_album_identity(
    backend: &dyn TagBackend,
    directory: &Path,
    files: &[PathBuf],
) -> AlbumIdentity {
    for file in files {
        if let (Some(artist), Some(album)) = read_artist_album(backend, file) {
            if !artist.is_empty() && !album.is_empty() {
                info!("\t\tGot metadata from tags: Artist='{artist}', Album='{album}'");
                return AlbumIdentity { artist, album };
            }
        }
    }

    let identity = AlbumIdentity::from_directory(directory);
    info!(
        "\t\tGot metadata from directory: Artist='{}', Album='{}'",
        identity.artist, identity.album
    );
    identity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata_tags::LoftyTagBackend;
    use crate::test_fixtures::{tag_mp3, write_silent_mp3};

    #[test]
    fn test_from_directory_uses_trimmed_parent_and_own_name() {
        let identity = AlbumIdentity::from_directory(Path::new("/music/ Radiohead /OK Computer "));
        assert_eq!(identity, AlbumIdentity::new("Radiohead", "OK Computer"));
    }

    #[test]
    fn test_from_directory_at_filesystem_root_yields_empty_artist() {
        let identity = AlbumIdentity::from_directory(Path::new("/Album"));
        assert_eq!(identity, AlbumIdentity::new("", "Album"));
    }

    #[test]
    fn test_resolve_prefers_first_fully_tagged_file() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let album_dir = dir.path().join("Some Artist").join("Some Album");
        std::fs::create_dir_all(&album_dir).expect("album dir should be creatable");

        let partial = album_dir.join("01.mp3");
        let full = album_dir.join("02.mp3");
        let other = album_dir.join("03.mp3");
        for path in [&partial, &full, &other] {
            write_silent_mp3(path);
        }
        tag_mp3(&partial, Some("Only Artist"), None, None);
        tag_mp3(&full, Some("Radiohead"), Some("OK Computer"), None);
        tag_mp3(&other, Some("Someone Else"), Some("Other"), None);

        let identity = resolve_album_identity(
            &LoftyTagBackend,
            &album_dir,
            &[partial, full, other],
        );
        assert_eq!(identity, AlbumIdentity::new("Radiohead", "OK Computer"));
    }

    #[test]
    fn test_resolve_falls_back_to_directory_names() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let album_dir = dir.path().join("Radiohead").join("OK Computer");
        std::fs::create_dir_all(&album_dir).expect("album dir should be creatable");
        let track = album_dir.join("01.mp3");
        write_silent_mp3(&track);
        tag_mp3(&track, None, Some("Album Only"), None);

        let identity = resolve_album_identity(&LoftyTagBackend, &album_dir, &[track]);
        assert_eq!(identity, AlbumIdentity::new("Radiohead", "OK Computer"));
    }
}
