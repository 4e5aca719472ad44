//! Finished tree container and statistics.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::Serialize;

use crate::config::ScanConfig;
use crate::histogram::ErrorHistogram;
use crate::node::TreeNode;

/// Summary statistics for one traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    /// Entries stat'ed successfully that were not directories.
    pub total_files: u64,
    /// Directories expanded.
    pub total_dirs: u64,
    /// Directories whose listing failed.
    pub unreadable_dirs: u64,
    /// Entries whose status query failed.
    pub failed_status: u64,
    /// Directories skipped because they live on another filesystem.
    pub pruned_dirs: u64,
    /// Deepest expanded level below the root.
    pub max_depth: u32,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an expanded directory at `depth`.
    pub fn record_dir(&mut self, depth: u32) {
        self.total_dirs += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a non-directory entry.
    pub fn record_file(&mut self) {
        self.total_files += 1;
    }

    pub fn record_unreadable_dir(&mut self) {
        self.unreadable_dirs += 1;
    }

    pub fn record_failed_status(&mut self) {
        self.failed_status += 1;
    }

    pub fn record_pruned_dir(&mut self) {
        self.pruned_dirs += 1;
    }
}

/// Complete, read-only result of one analysis.
///
/// Nodes are only reachable through shared references. The single allowed
/// change is reordering a node's children by area, which the rendering side
/// requests lazily for the nodes it actually shows.
#[derive(Debug, Clone, Serialize)]
pub struct SpaceTree {
    root: TreeNode,

    /// Root path that was analyzed.
    pub root_path: PathBuf,

    /// Failures by error code.
    pub errors: ErrorHistogram,

    /// Traversal statistics.
    pub stats: TreeStats,

    /// When this analysis finished.
    pub scanned_at: SystemTime,

    /// Duration of the analysis.
    pub scan_duration: Duration,

    /// Configuration used.
    pub config: ScanConfig,
}

impl SpaceTree {
    /// Freeze a built and aggregated root into a tree.
    pub fn new(
        root: TreeNode,
        root_path: PathBuf,
        config: ScanConfig,
        errors: ErrorHistogram,
        stats: TreeStats,
        scan_duration: Duration,
    ) -> Self {
        Self {
            root,
            root_path,
            errors,
            stats,
            scanned_at: SystemTime::now(),
            scan_duration,
            config,
        }
    }

    /// Root node.
    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Node reached by following child indices from the root.
    pub fn node_at(&self, route: &[usize]) -> Option<&TreeNode> {
        self.root.descendant(route)
    }

    /// Sort the children of the node at `route` by descending area and
    /// return it.
    pub fn sort_children_at(&mut self, route: &[usize]) -> Option<&TreeNode> {
        let node = self.root.descendant_mut(route)?;
        node.sort_children_descending();
        Some(node)
    }

    /// Absolute path of the node at `route`.
    pub fn path_of(&self, route: &[usize]) -> Option<PathBuf> {
        let mut path = if self.root.name().is_empty() {
            PathBuf::from("/")
        } else {
            PathBuf::from(self.root.name())
        };
        let mut node = &self.root;
        for &index in route {
            node = node.child_at(index)?;
            path.push(node.name());
        }
        Some(path)
    }

    /// Total bytes under the root.
    pub fn total_area(&self) -> i64 {
        self.root.area()
    }

    /// Check if any entry could not be read.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree(root_name: &str) -> SpaceTree {
        let mut root = TreeNode::directory(
            root_name,
            vec![
                TreeNode::leaf("small", 1),
                TreeNode::directory("docs", vec![TreeNode::leaf("a.txt", 3), TreeNode::leaf("b.txt", 9)]),
            ],
        );
        root.descendant_mut(&[1]).unwrap().set_area(12);
        root.set_area(13);
        SpaceTree::new(
            root,
            PathBuf::from(if root_name.is_empty() { "/" } else { root_name }),
            ScanConfig::default(),
            ErrorHistogram::new(),
            TreeStats::new(),
            Duration::ZERO,
        )
    }

    #[test]
    fn test_tree_stats_default() {
        let stats = TreeStats::default();
        assert_eq!(stats.total_files, 0);
        assert_eq!(stats.total_dirs, 0);
        assert_eq!(stats.max_depth, 0);
    }

    #[test]
    fn test_tree_stats_record_dir() {
        let mut stats = TreeStats::new();
        stats.record_dir(0);
        stats.record_dir(3);
        stats.record_dir(1);
        assert_eq!(stats.total_dirs, 3);
        assert_eq!(stats.max_depth, 3);
    }

    #[test]
    fn test_sort_children_at_route() {
        let mut tree = sample_tree("/data");
        assert_eq!(tree.node_at(&[0]).unwrap().name(), "small");

        let root = tree.sort_children_at(&[]).unwrap();
        assert_eq!(root.child_at(0).unwrap().name(), "docs");

        let docs = tree.sort_children_at(&[0]).unwrap();
        assert_eq!(docs.child_at(0).unwrap().name(), "b.txt");
        assert!(tree.sort_children_at(&[7]).is_none());
    }

    #[test]
    fn test_path_of() {
        let tree = sample_tree("/data");
        assert_eq!(tree.path_of(&[]), Some(PathBuf::from("/data")));
        assert_eq!(tree.path_of(&[1, 0]), Some(PathBuf::from("/data/docs/a.txt")));
        assert_eq!(tree.path_of(&[3]), None);

        let tree = sample_tree("");
        assert_eq!(tree.path_of(&[1]), Some(PathBuf::from("/docs")));
    }

    #[test]
    fn test_total_area() {
        let tree = sample_tree("/data");
        assert_eq!(tree.total_area(), 13);
        assert!(!tree.has_errors());
    }
}
