//! Core types for spacemap.
//!
//! This crate provides the data structures shared by the scanner and its
//! consumers: tree nodes, the finished tree, mount snapshots, error
//! histograms and configuration.

mod config;
mod error;
mod histogram;
mod mount;
mod node;
mod tree;

pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::ScanError;
pub use histogram::{ErrorCode, ErrorHistogram};
pub use mount::{MOUNTINFO_PATH, MOUNTS_PATH, MountInfo, MountTable, dir_query};
pub use node::TreeNode;
pub use tree::{SpaceTree, TreeStats};
