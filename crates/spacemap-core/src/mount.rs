//! Mounted filesystem snapshot and mount point resolution.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Primary location of the mount table on Linux.
pub const MOUNTINFO_PATH: &str = "/proc/self/mountinfo";

/// Fallback mount table in `/etc/fstab` layout.
pub const MOUNTS_PATH: &str = "/proc/mounts";

/// Source reported for mounts that do not name one.
const NO_SOURCE: &str = "none";

/// One mounted filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountInfo {
    /// Absolute path the filesystem is attached at.
    pub mount_point: String,
    /// Device or other identifier of the mounted filesystem instance.
    pub source: String,
}

impl MountInfo {
    /// Create a mount entry.
    pub fn new(mount_point: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            mount_point: mount_point.into(),
            source: source.into(),
        }
    }

    /// Check whether this mount point covers `path`.
    ///
    /// The prefix has to end on a component boundary, so `/mnt/x` covers
    /// `/mnt/x/` and `/mnt/x/a` but not `/mnt/xy/`.
    pub fn covers(&self, path: &str) -> bool {
        match path.strip_prefix(self.mount_point.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || self.mount_point.ends_with('/'),
            None => false,
        }
    }
}

/// Snapshot of the mounted filesystems, read once per analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountTable {
    mounts: Vec<MountInfo>,
}

impl MountTable {
    /// Create a table from already-known entries.
    pub fn new(mounts: Vec<MountInfo>) -> Self {
        Self { mounts }
    }

    /// Read the system mount table.
    ///
    /// Tries `/proc/self/mountinfo` first and falls back to `/proc/mounts`.
    pub fn load() -> Result<Self, ScanError> {
        match Self::read_from(MOUNTINFO_PATH) {
            Ok(table) => Ok(table),
            Err(ScanError::MountTable { .. }) => Self::read_from(MOUNTS_PATH),
            Err(err) => Err(err),
        }
    }

    /// Read a mount table file, detecting its layout from the content.
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ScanError::mount_table(path, e))?;
        if content.lines().any(|line| line.contains(" - ")) {
            Self::parse_mountinfo(&content)
        } else {
            Self::parse_mounts(&content)
        }
    }

    /// Parse `/proc/self/mountinfo` content.
    pub fn parse_mountinfo(input: &str) -> Result<Self, ScanError> {
        let mut mounts = Vec::new();

        for line in input.lines().filter(|line| !line.trim().is_empty()) {
            let (left, right) = line
                .split_once(" - ")
                .ok_or_else(|| ScanError::invalid_mount_line(line))?;

            let mount_point = left
                .split_whitespace()
                .nth(4)
                .ok_or_else(|| ScanError::invalid_mount_line(line))?;

            let mut right_fields = right.split_whitespace();
            // Filesystem type must be present even though only the source is kept.
            right_fields
                .next()
                .ok_or_else(|| ScanError::invalid_mount_line(line))?;
            let source = right_fields.next().unwrap_or(NO_SOURCE);

            mounts.push(MountInfo::new(
                unescape_mount_field(mount_point),
                unescape_mount_field(source),
            ));
        }

        Ok(Self { mounts })
    }

    /// Parse `/proc/mounts` (fstab layout) content.
    pub fn parse_mounts(input: &str) -> Result<Self, ScanError> {
        let mut mounts = Vec::new();

        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let source = fields
                .next()
                .ok_or_else(|| ScanError::invalid_mount_line(line))?;
            let mount_point = fields
                .next()
                .ok_or_else(|| ScanError::invalid_mount_line(line))?;

            mounts.push(MountInfo::new(
                unescape_mount_field(mount_point),
                unescape_mount_field(source),
            ));
        }

        Ok(Self { mounts })
    }

    /// Find the most specific mount covering `path`.
    ///
    /// Callers pass the path with a trailing separator. The longest matching
    /// mount point wins; on a length tie the first entry is kept.
    pub fn find_mount_for(&self, path: &str) -> Option<&MountInfo> {
        let mut result: Option<&MountInfo> = None;
        for mount in &self.mounts {
            if !mount.covers(path) {
                continue;
            }
            if result.is_none_or(|best| mount.mount_point.len() > best.mount_point.len()) {
                result = Some(mount);
            }
        }
        result
    }

    /// Resolve the mount covering a directory, appending the separator.
    pub fn find_mount_for_dir(&self, dir: &Path) -> Option<&MountInfo> {
        self.find_mount_for(&dir_query(dir))
    }

    /// Check whether `mount` lies outside the filesystem of `root_mount`.
    ///
    /// Both must be entries of this table. A different entry with the same
    /// source (a bind mount of the root's filesystem) does not cross.
    pub fn crosses_boundary(&self, root_mount: &MountInfo, mount: &MountInfo) -> bool {
        !std::ptr::eq(root_mount, mount) && root_mount.source != mount.source
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// Iterate over the entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &MountInfo> {
        self.mounts.iter()
    }
}

impl FromIterator<MountInfo> for MountTable {
    fn from_iter<I: IntoIterator<Item = MountInfo>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Build the lookup key for a directory: its path plus a trailing `/`.
pub fn dir_query(dir: &Path) -> String {
    let mut query = dir.to_string_lossy().into_owned();
    if !query.ends_with('/') {
        query.push('/');
    }
    query
}

/// Decode the octal escapes (`\040` for space) the kernel uses in mount tables.
fn unescape_mount_field(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut output = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] == b'\\'
            && index + 3 < bytes.len()
            && bytes[index + 1..index + 4].iter().all(|b| (b'0'..=b'7').contains(b))
        {
            if let Ok(num) = u8::from_str_radix(&value[index + 1..index + 4], 8) {
                output.push(num);
                index += 4;
                continue;
            }
        }

        output.push(bytes[index]);
        index += 1;
    }

    String::from_utf8_lossy(&output).into_owned()
}
