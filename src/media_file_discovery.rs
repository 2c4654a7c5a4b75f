use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

pub fn is_supported_audio_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Lists the audio files placed directly inside `directory`, sorted by path.
pub fn collect_audio_files_in_directory(directory: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("Failed to read directory {}: {}", directory.display(), err);
            return Vec::new();
        }
    };

    let mut tracks = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(
                    "Failed to read a directory entry in {}: {}",
                    directory.display(),
                    err
                );
                continue;
            }
        };

        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                debug!("Failed to inspect {}: {}", path.display(), err);
                continue;
            }
        };

        if file_type.is_file() && is_supported_audio_file(&path, extensions) {
            tracks.push(path);
        }
    }

    tracks.sort_unstable();
    tracks
}

/// Every directory below `root` (the root itself excluded), in lexicographic
/// path order.
pub fn collect_library_directories(root: &Path) -> Vec<PathBuf> {
    let mut directories: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!("Skipping unreadable library entry: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .collect();

    directories.sort_unstable();
    directories
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn extensions() -> Vec<String> {
        vec!["mp3".to_string(), "flac".to_string()]
    }

    #[test]
    fn test_is_supported_audio_file_ignores_case() {
        assert!(is_supported_audio_file(Path::new("a/Track.MP3"), &extensions()));
        assert!(is_supported_audio_file(Path::new("b.flac"), &extensions()));
        assert!(!is_supported_audio_file(Path::new("cover.jpg"), &extensions()));
        assert!(!is_supported_audio_file(Path::new("README"), &extensions()));
    }

    #[test]
    fn test_collect_audio_files_in_directory_is_flat_and_sorted() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let root = dir.path();
        fs::write(root.join("02.mp3"), b"x").expect("fixture should be writable");
        fs::write(root.join("01.mp3"), b"x").expect("fixture should be writable");
        fs::write(root.join("notes.txt"), b"x").expect("fixture should be writable");
        fs::create_dir(root.join("CD2")).expect("subdir should be creatable");
        fs::write(root.join("CD2").join("03.mp3"), b"x").expect("fixture should be writable");

        let files = collect_audio_files_in_directory(root, &extensions());
        assert_eq!(files, vec![root.join("01.mp3"), root.join("02.mp3")]);
    }

    #[test]
    fn test_collect_library_directories_excludes_root_and_sorts() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let root = dir.path();
        fs::create_dir_all(root.join("b").join("y")).expect("dirs should be creatable");
        fs::create_dir_all(root.join("a").join("z")).expect("dirs should be creatable");
        fs::write(root.join("a").join("file.mp3"), b"x").expect("fixture should be writable");

        let directories = collect_library_directories(root);
        assert_eq!(
            directories,
            vec![
                root.join("a"),
                root.join("a").join("z"),
                root.join("b"),
                root.join("b").join("y"),
            ]
        );
    }
}
