//! One-shot analysis: mount snapshot, build, aggregate, freeze.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::sync::broadcast;
use tracing::info;

use spacemap_core::{MountTable, ScanConfig, ScanError, SpaceTree, TreeNode};

use crate::aggregate::aggregate;
use crate::builder::{TreeBuilder, root_node_name};
use crate::fs::{FileSystem, OsFileSystem};
use crate::progress::ScanProgress;

/// Runs complete analyses and hands out finished trees.
///
/// Every call to [`SpaceScanner::scan`] produces a new tree; nothing is
/// reused between runs.
pub struct SpaceScanner {
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl SpaceScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self { progress_tx }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Analyze the configured root on the real filesystem.
    ///
    /// Fails only when the root cannot be resolved or the mount table cannot
    /// be read. Unreadable entries below the root end up in the tree's
    /// error histogram.
    pub fn scan(&self, config: &ScanConfig) -> Result<SpaceTree, ScanError> {
        let root_path = resolve_root(config)?;

        let mounts = match &config.mount_table {
            Some(path) => MountTable::read_from(path)?,
            None => MountTable::load()?,
        };

        Ok(self.scan_with(&OsFileSystem, &mounts, &root_path, config))
    }

    /// Analyze `root_path` with injected collaborators.
    ///
    /// `root_path` must be absolute.
    pub fn scan_with<F: FileSystem>(
        &self,
        fs: &F,
        mounts: &MountTable,
        root_path: &Path,
        config: &ScanConfig,
    ) -> SpaceTree {
        let start = Instant::now();
        let mut root = TreeNode::new(root_node_name(root_path));

        let (errors, stats) = TreeBuilder::new(fs, mounts)
            .with_progress(self.progress_tx.clone(), config.progress_interval)
            .build_with_stats(&mut root);
        let total = aggregate(&mut root);

        let scan_duration = start.elapsed();
        info!(
            root = %root_path.display(),
            bytes = total,
            files = stats.total_files,
            dirs = stats.total_dirs,
            failures = errors.total(),
            elapsed_ms = scan_duration.as_millis() as u64,
            "analysis finished"
        );

        SpaceTree::new(
            root,
            root_path.to_path_buf(),
            config.clone(),
            errors,
            stats,
            scan_duration,
        )
    }
}

impl Default for SpaceScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn the configured root into the absolute path to scan.
fn resolve_root(config: &ScanConfig) -> Result<PathBuf, ScanError> {
    if config.canonicalize_root {
        return config
            .root
            .canonicalize()
            .map_err(|e| ScanError::io(&config.root, e));
    }
    if !config.root.is_absolute() {
        return Err(ScanError::RelativeRoot {
            path: config.root.clone(),
        });
    }
    Ok(config.root.clone())
}
