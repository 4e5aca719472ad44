//! Mount-bounded breadth-first tree construction.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use spacemap_core::{ErrorHistogram, MountTable, TreeNode, TreeStats};

use crate::fs::{DirHandle, FileSystem};
use crate::progress::{ProgressTracker, ScanProgress};

/// Directories expanded between progress events unless configured otherwise.
const DEFAULT_PROGRESS_INTERVAL: u64 = 256;

/// A directory waiting to be expanded.
struct QueueEntry {
    /// Absolute path of the directory.
    path: PathBuf,
    /// Child indices leading from the root to its node.
    route: Vec<usize>,
    depth: u32,
}

/// Populates a root node with everything reachable on the root's filesystem.
///
/// Traversal is breadth-first over an explicit queue, so stack usage does not
/// grow with directory nesting and the visiting order is level by level.
/// Directory areas are left for [`aggregate`](crate::aggregate) to fill in.
pub struct TreeBuilder<'a, F: FileSystem> {
    fs: &'a F,
    mounts: &'a MountTable,
    progress_tx: Option<broadcast::Sender<ScanProgress>>,
    progress_interval: u64,
}

impl<'a, F: FileSystem> TreeBuilder<'a, F> {
    /// Create a builder over a filesystem and a frozen mount snapshot.
    pub fn new(fs: &'a F, mounts: &'a MountTable) -> Self {
        Self {
            fs,
            mounts,
            progress_tx: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Publish a progress snapshot every `interval` expanded directories.
    pub fn with_progress(mut self, tx: broadcast::Sender<ScanProgress>, interval: u64) -> Self {
        self.progress_tx = Some(tx);
        self.progress_interval = interval;
        self
    }

    /// Expand `root` in place and return the failures encountered.
    pub fn build(&self, root: &mut TreeNode) -> ErrorHistogram {
        self.build_with_stats(root).0
    }

    /// Like [`TreeBuilder::build`], also returning traversal statistics.
    pub fn build_with_stats(&self, root: &mut TreeNode) -> (ErrorHistogram, TreeStats) {
        debug_assert!(!root.name().ends_with('/'), "root name must not end with a separator");

        let mut errors = ErrorHistogram::new();
        let mut stats = TreeStats::new();
        let mut tracker = ProgressTracker::new(self.progress_interval);

        let root_path = root_dir_path(root.name());
        let Some(root_mount) = self.mounts.find_mount_for_dir(&root_path) else {
            warn!(root = %root_path.display(), "no mount covers the root, nothing to scan");
            return (errors, stats);
        };
        debug!(
            root = %root_path.display(),
            mount_point = %root_mount.mount_point,
            source = %root_mount.source,
            "resolved root mount"
        );

        let mut queue = VecDeque::new();
        queue.push_back(QueueEntry {
            path: root_path,
            route: Vec::new(),
            depth: 0,
        });

        while let Some(entry) = queue.pop_front() {
            match self.mounts.find_mount_for_dir(&entry.path) {
                Some(mount) if !self.mounts.crosses_boundary(root_mount, mount) => {}
                _ => {
                    trace!(path = %entry.path.display(), "skipping directory on another filesystem");
                    stats.record_pruned_dir();
                    continue;
                }
            }

            let Some(node) = root.descendant_mut(&entry.route) else {
                continue;
            };

            let dir = match self.fs.open_dir(&entry.path) {
                Ok(dir) => dir,
                Err(err) => {
                    debug!(path = %entry.path.display(), error = %err, "cannot list directory");
                    errors.record(&err);
                    stats.record_unreadable_dir();
                    continue;
                }
            };
            stats.record_dir(entry.depth);

            let mut children: Vec<TreeNode> = dir
                .entries()
                .iter()
                .map(|name| TreeNode::new(CompactString::new(name.to_string_lossy())))
                .collect();

            for (index, name) in dir.entries().iter().enumerate() {
                match dir.status(name) {
                    Ok(status) if status.is_dir() => {
                        let mut route = entry.route.clone();
                        route.push(index);
                        queue.push_back(QueueEntry {
                            path: entry.path.join(name),
                            route,
                            depth: entry.depth + 1,
                        });
                    }
                    Ok(status) => {
                        children[index].set_area(status.size);
                        stats.record_file();
                        tracker.record_bytes(status.size);
                    }
                    Err(err) => {
                        debug!(
                            path = %entry.path.join(name).display(),
                            error = %err,
                            "cannot query entry status"
                        );
                        errors.record(&err);
                        stats.record_failed_status();
                    }
                }
            }

            node.set_children(children);
            drop(dir);

            if let Some(tx) = &self.progress_tx {
                if tracker.is_due(stats.total_dirs) {
                    // No subscribers is fine.
                    let _ = tx.send(tracker.snapshot(&stats, errors.total(), &entry.path));
                }
            }
        }

        (errors, stats)
    }
}

/// Directory path for a root node name; the filesystem root is named `""`.
pub(crate) fn root_dir_path(name: &str) -> PathBuf {
    if name.is_empty() {
        PathBuf::from("/")
    } else {
        PathBuf::from(name)
    }
}

/// Root node name for an absolute directory path: no trailing separator.
pub(crate) fn root_node_name(path: &Path) -> CompactString {
    let name = path.to_string_lossy();
    CompactString::new(name.trim_end_matches('/'))
}
