//! In-memory filesystem for exercising the builder without real mounts or
//! permissions.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};

use spacemap_scan::{DirHandle, EntryStatus, FileSystem};

pub const EACCES: i32 = 13;
pub const ENOENT: i32 = 2;
pub const ENOTDIR: i32 = 20;

#[derive(Debug, Clone)]
enum Entry {
    Dir,
    File(i64),
    /// Directory whose listing is refused.
    DeniedDir,
    /// Entry whose status query fails with the given code.
    Broken(i32),
}

#[derive(Debug, Clone)]
pub struct MemoryFs {
    entries: BTreeMap<PathBuf, Entry>,
}

impl MemoryFs {
    /// A filesystem holding only `/`.
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(PathBuf::from("/"), Entry::Dir);
        Self { entries }
    }

    pub fn dir(mut self, path: &str) -> Self {
        self.entries.insert(PathBuf::from(path), Entry::Dir);
        self
    }

    pub fn file(mut self, path: &str, size: i64) -> Self {
        self.entries.insert(PathBuf::from(path), Entry::File(size));
        self
    }

    pub fn denied_dir(mut self, path: &str) -> Self {
        self.entries.insert(PathBuf::from(path), Entry::DeniedDir);
        self
    }

    pub fn broken(mut self, path: &str, code: i32) -> Self {
        self.entries.insert(PathBuf::from(path), Entry::Broken(code));
        self
    }

    fn status_of(&self, path: &Path) -> io::Result<EntryStatus> {
        match self.entries.get(path) {
            Some(Entry::Dir) | Some(Entry::DeniedDir) => Ok(EntryStatus::directory(4096)),
            Some(Entry::File(size)) => Ok(EntryStatus::file(*size)),
            Some(Entry::Broken(code)) => Err(io::Error::from_raw_os_error(*code)),
            None => Err(io::Error::from_raw_os_error(ENOENT)),
        }
    }
}

pub struct MemoryDir {
    names: Vec<OsString>,
    statuses: BTreeMap<OsString, Result<EntryStatus, i32>>,
}

impl FileSystem for MemoryFs {
    type Dir = MemoryDir;

    fn open_dir(&self, path: &Path) -> io::Result<MemoryDir> {
        match self.entries.get(path) {
            Some(Entry::Dir) => {}
            Some(Entry::DeniedDir) => return Err(io::Error::from_raw_os_error(EACCES)),
            Some(_) => return Err(io::Error::from_raw_os_error(ENOTDIR)),
            None => return Err(io::Error::from_raw_os_error(ENOENT)),
        }

        let mut names = Vec::new();
        let mut statuses = BTreeMap::new();
        for child in self.entries.keys().filter(|p| p.parent() == Some(path)) {
            let Some(name) = child.file_name() else {
                continue;
            };
            let status = self
                .status_of(child)
                .map_err(|e| e.raw_os_error().unwrap_or(ENOENT));
            names.push(name.to_os_string());
            statuses.insert(name.to_os_string(), status);
        }

        Ok(MemoryDir { names, statuses })
    }
}

impl DirHandle for MemoryDir {
    fn entries(&self) -> &[OsString] {
        &self.names
    }

    fn status(&self, name: &OsStr) -> io::Result<EntryStatus> {
        match self.statuses.get(name) {
            Some(Ok(status)) => Ok(*status),
            Some(Err(code)) => Err(io::Error::from_raw_os_error(*code)),
            None => Err(io::Error::from_raw_os_error(ENOENT)),
        }
    }
}
