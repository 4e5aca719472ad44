//! Filesystem scanning engine for spacemap.
//!
//! This crate turns a root directory into a [`SpaceTree`]: every file and
//! directory reachable from the root without leaving the root's filesystem,
//! each with the number of bytes it occupies.
//!
//! # Overview
//!
//! - **Breadth-first traversal** over an explicit queue ([`TreeBuilder`])
//! - **Mount boundaries** respected; bind mounts of the root's source are followed
//! - **Bottom-up aggregation** of directory sizes ([`aggregate`])
//! - **Tolerant errors**: unreadable entries are counted in an [`ErrorHistogram`]
//! - **Progress updates** via broadcast channels
//!
//! # Example
//!
//! ```rust,no_run
//! use spacemap_scan::{ScanConfig, SpaceScanner};
//!
//! let config = ScanConfig::new("/home");
//! let scanner = SpaceScanner::new();
//! let mut tree = scanner.scan(&config).unwrap();
//!
//! println!("Total size: {} bytes", tree.total_area());
//! println!("{}", tree.errors.summary());
//!
//! // Children are ordered by size only when asked for.
//! let root = tree.sort_children_at(&[]).unwrap();
//! for child in root.children().unwrap_or_default() {
//!     println!("{} {}", child.area(), child.name());
//! }
//! ```

mod aggregate;
mod builder;
mod fs;
mod progress;
mod scanner;

pub use aggregate::aggregate;
pub use builder::TreeBuilder;
pub use fs::{DirHandle, EntryKind, EntryStatus, FileSystem, OsDir, OsFileSystem};
pub use progress::ScanProgress;
pub use scanner::SpaceScanner;

// Re-export core types for convenience
pub use spacemap_core::{
    ErrorCode, ErrorHistogram, MountInfo, MountTable, ScanConfig, ScanError, SpaceTree,
    TreeNode, TreeStats,
};
