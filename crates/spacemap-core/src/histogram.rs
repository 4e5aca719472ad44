//! Per-reason failure counts gathered during a traversal.

use std::collections::BTreeMap;
use std::fmt;
use std::io;

use serde::Serialize;

/// Platform error code identifying why an entry could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ErrorCode(pub i32);

impl ErrorCode {
    /// Code used for failures that carry no platform error number.
    pub const UNKNOWN: ErrorCode = ErrorCode(-1);

    /// Extract the platform code from an I/O error.
    pub fn of(error: &io::Error) -> Self {
        error.raw_os_error().map(Self).unwrap_or(Self::UNKNOWN)
    }

    /// Human-readable reason, e.g. `Permission denied`.
    pub fn description(&self) -> String {
        if *self == Self::UNKNOWN {
            return "Unknown error".to_string();
        }
        let message = io::Error::from_raw_os_error(self.0).to_string();
        let suffix = format!(" (os error {})", self.0);
        match message.strip_suffix(&suffix) {
            Some(reason) => reason.to_string(),
            None => message,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// Mapping from error code to the number of times it was hit.
///
/// This is purely informational: nothing recorded here ever interrupts a
/// traversal. Iteration is in ascending code order so summaries are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorHistogram {
    counts: BTreeMap<ErrorCode, u64>,
}

impl ErrorHistogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of the error's code.
    pub fn record(&mut self, error: &io::Error) {
        self.record_code(ErrorCode::of(error));
    }

    /// Count one occurrence of `code`.
    pub fn record_code(&mut self, code: ErrorCode) {
        *self.counts.entry(code).or_insert(0) += 1;
    }

    /// Occurrences of `code` (0 if never seen).
    pub fn count(&self, code: ErrorCode) -> u64 {
        self.counts.get(&code).copied().unwrap_or(0)
    }

    /// Total number of recorded failures across all codes.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate `(code, count)` pairs in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (ErrorCode, u64)> + '_ {
        self.counts.iter().map(|(code, count)| (*code, *count))
    }

    /// One-line summary suitable for a status bar.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "No errors".to_string();
        }
        let reasons: Vec<String> = self
            .iter()
            .map(|(code, count)| {
                let unit = if count == 1 { "time" } else { "times" };
                format!("{code} ({count} {unit})")
            })
            .collect();
        format!(
            "Some directories were not analyzed: {}",
            reasons.join(", ")
        )
    }
}
