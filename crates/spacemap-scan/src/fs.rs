//! Filesystem access used by the tree builder.
//!
//! The builder only needs two things from the filesystem: the names inside a
//! directory and the status of each name, read without following symbolic
//! links. Both sit behind traits so alternative sources can be plugged in.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What kind of entry a status query found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory, to be expanded.
    Directory,
    /// Anything else: regular files, symlinks, devices, sockets...
    Other,
}

/// Result of a status query on one directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStatus {
    pub kind: EntryKind,
    /// Size in bytes as reported by the filesystem.
    pub size: i64,
}

impl EntryStatus {
    pub fn directory(size: i64) -> Self {
        Self {
            kind: EntryKind::Directory,
            size,
        }
    }

    pub fn file(size: i64) -> Self {
        Self {
            kind: EntryKind::Other,
            size,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// An open directory.
///
/// Lives from the moment a directory is listed until its entries have been
/// status-queried, then is dropped.
pub trait DirHandle {
    /// Names in the directory, without `.` and `..`, in listing order.
    fn entries(&self) -> &[OsString];

    /// Status of `name` inside this directory. Symbolic links are not followed.
    fn status(&self, name: &OsStr) -> io::Result<EntryStatus>;
}

/// Source of directory listings.
pub trait FileSystem {
    type Dir: DirHandle;

    /// List the directory at `path`.
    fn open_dir(&self, path: &Path) -> io::Result<Self::Dir>;
}

/// The real filesystem via `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

/// Directory listed from the real filesystem.
#[derive(Debug)]
pub struct OsDir {
    path: PathBuf,
    entries: Vec<OsString>,
}

impl FileSystem for OsFileSystem {
    type Dir = OsDir;

    fn open_dir(&self, path: &Path) -> io::Result<OsDir> {
        let entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect::<io::Result<Vec<_>>>()?;

        Ok(OsDir {
            path: path.to_path_buf(),
            entries,
        })
    }
}

impl DirHandle for OsDir {
    fn entries(&self) -> &[OsString] {
        &self.entries
    }

    fn status(&self, name: &OsStr) -> io::Result<EntryStatus> {
        let metadata = fs::symlink_metadata(self.path.join(name))?;
        let size = i64::try_from(metadata.len()).unwrap_or(i64::MAX);
        if metadata.file_type().is_dir() {
            Ok(EntryStatus::directory(size))
        } else {
            Ok(EntryStatus::file(size))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_os_dir_lists_entries_without_dot_entries() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "hello").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();

        let dir = OsFileSystem.open_dir(temp.path()).unwrap();
        let mut names: Vec<_> = dir.entries().iter().map(|n| n.to_string_lossy().into_owned()).collect();
        names.sort();
        assert_eq!(names, vec!["a.txt", "sub"]);
    }

    #[test]
    fn test_os_dir_status() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "hello").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();

        let dir = OsFileSystem.open_dir(temp.path()).unwrap();
        assert_eq!(dir.status(OsStr::new("a.txt")).unwrap(), EntryStatus::file(5));
        assert!(dir.status(OsStr::new("sub")).unwrap().is_dir());

        let err = dir.status(OsStr::new("missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_directory_is_not_followed() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("real")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("link")).unwrap();

        let dir = OsFileSystem.open_dir(temp.path()).unwrap();
        let status = dir.status(OsStr::new("link")).unwrap();
        assert_eq!(status.kind, EntryKind::Other);
    }

    #[test]
    fn test_open_missing_dir_fails() {
        let temp = TempDir::new().unwrap();
        assert!(OsFileSystem.open_dir(&temp.path().join("nope")).is_err());
    }
}
