//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for one analysis.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to analyze.
    pub root: PathBuf,

    /// Mount table file to read instead of the system one.
    #[builder(default)]
    #[serde(default)]
    pub mount_table: Option<PathBuf>,

    /// Resolve the root to an absolute, symlink-free path before scanning.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub canonicalize_root: bool,

    /// Directories expanded between progress events.
    #[builder(default = "256")]
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

fn default_true() -> bool {
    true
}

fn default_progress_interval() -> u64 {
    256
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        if self.progress_interval == Some(0) {
            return Err("Progress interval must be at least 1".to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for analyzing a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mount_table: None,
            canonicalize_root: true,
            progress_interval: default_progress_interval(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new("/")
    }
}
