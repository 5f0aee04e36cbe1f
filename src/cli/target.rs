//! Resolving the command-line path into the files a session works on.

use crate::session::TargetFileSet;
use std::path::{Path, PathBuf};

/// The path argument can't be used
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("{0} is a folder but album mode is not enabled. Use -a for album mode.")]
    DirectoryWithoutAlbum(PathBuf),

    #[error("Filename is not a valid path: {0}")]
    NotFound(PathBuf),
}

impl TargetError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TargetError::DirectoryWithoutAlbum(_) => 1,
            TargetError::NotFound(_) => 2,
        }
    }
}

/// Check the path argument and build the target set.
///
/// In album mode a file argument means "the album this file is in".
pub fn validate_target(path: &Path, album: bool) -> Result<TargetFileSet, TargetError> {
    if !path.exists() {
        return Err(TargetError::NotFound(path.to_path_buf()));
    }

    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    if !album {
        if path.is_dir() {
            return Err(TargetError::DirectoryWithoutAlbum(path));
        }
        return Ok(TargetFileSet::single(path));
    }

    let dir = if path.is_dir() {
        path
    } else {
        path.parent().map(Path::to_path_buf).unwrap_or(path)
    };
    Ok(TargetFileSet::album(dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_path_exits_with_2() {
        let err = validate_target(Path::new("/definitely/not/here.mp3"), false).unwrap_err();
        assert!(matches!(err, TargetError::NotFound(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_directory_without_album_exits_with_1() {
        let temp = TempDir::new().unwrap();
        let err = validate_target(temp.path(), false).unwrap_err();
        assert!(matches!(err, TargetError::DirectoryWithoutAlbum(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_single_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("track.mp3");
        std::fs::write(&file, b"").unwrap();

        let targets = validate_target(&file, false).unwrap();
        assert!(!targets.is_album());
        assert_eq!(targets.files(), &[file]);
    }

    #[test]
    fn test_album_from_file_uses_its_directory() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.mp3");
        let b = temp.path().join("b.mp3");
        std::fs::write(&a, b"").unwrap();
        std::fs::write(&b, b"").unwrap();

        let targets = validate_target(&b, true).unwrap();
        assert_eq!(targets.album_dir(), Some(temp.path()));
        assert_eq!(targets.files(), &[a, b]);
    }
}
