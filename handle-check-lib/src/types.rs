//! Core data types for handle availability scanning.
//!
//! This module defines the main data structures used throughout the library:
//! probe verdicts, per-handle results, scan configuration, and the final
//! scan report.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One platform's verdict for one handle.
///
/// Verdicts are consumed immediately by the verifier and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeVerdict {
    /// The platform reported the handle as unregistered (e.g. HTTP 404).
    Available,

    /// The platform reported the handle as registered (any other status).
    Taken,

    /// The probe could not produce a definitive answer (transport error,
    /// timeout, DNS failure). Treated the same as `Taken` by the verifier:
    /// a handle is only worth keeping if every platform positively
    /// confirmed it free.
    Inconclusive(String),
}

impl ProbeVerdict {
    /// Whether this verdict lets evaluation continue to the next probe.
    pub fn is_available(&self) -> bool {
        matches!(self, ProbeVerdict::Available)
    }
}

/// The joint verdict for one handle across all configured platforms.
///
/// Produced exactly once per handle by
/// [`HandleVerifier::verify`](crate::HandleVerifier::verify).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandleResult {
    /// The handle that was checked (e.g. "abc")
    pub handle: String,

    /// True only if every probe, in order, returned `Available`
    pub available: bool,

    /// The platform whose non-available verdict ended evaluation early
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_by: Option<String>,

    /// How many probes were actually invoked before evaluation stopped
    pub probes_run: usize,

    /// How long the joint check took to complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_duration: Option<Duration>,
}

/// Configuration options for a scan.
///
/// This struct tunes enumeration and pipeline behavior. Platform selection
/// is separate (see [`PlatformSpec`](crate::PlatformSpec)) so probes remain
/// configuration, not code.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Ordered alphabet the handles are drawn from
    /// Default: "abcdefghijklmnopqrstuvwxyz"
    pub alphabet: String,

    /// Fixed handle length
    /// Default: 3
    pub length: u32,

    /// Number of concurrent verifier workers
    /// Default: 10, Range: 1-100
    pub concurrency: usize,

    /// Timeout for each individual probe request
    /// Default: 5 seconds
    pub probe_timeout: Duration,

    /// Capacity of the bounded generation and result queues
    /// Default: 1024
    pub queue_capacity: usize,

    /// First enumeration index to scan (inclusive)
    /// Default: 0
    pub start_index: u64,

    /// Last enumeration index to scan (exclusive); None means the full space
    pub end_index: Option<u64>,

    /// Destination file for jointly available handles
    /// Default: "common_usernames.txt"
    pub output: String,
}

impl Default for ScanConfig {
    /// Create a sensible default configuration.
    ///
    /// These defaults reproduce the reference behavior: the full 3-letter
    /// lowercase space, written to `common_usernames.txt`.
    fn default() -> Self {
        Self {
            alphabet: "abcdefghijklmnopqrstuvwxyz".to_string(),
            length: 3,
            concurrency: 10,
            probe_timeout: Duration::from_secs(5),
            queue_capacity: 1024,
            start_index: 0,
            end_index: None,
            output: "common_usernames.txt".to_string(),
        }
    }
}

impl ScanConfig {
    /// Set the number of concurrent verifier workers.
    ///
    /// Automatically caps concurrency at 100 to prevent resource exhaustion.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 100);
        self
    }

    /// Set the per-probe request timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Set the handle length.
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    /// Set the enumeration alphabet.
    pub fn with_alphabet<A: Into<String>>(mut self, alphabet: A) -> Self {
        self.alphabet = alphabet.into();
        self
    }

    /// Restrict the scan to an index range (for resuming or sharding).
    pub fn with_range(mut self, start: u64, end: Option<u64>) -> Self {
        self.start_index = start;
        self.end_index = end;
        self
    }

    /// Set the output file path.
    pub fn with_output<P: Into<String>>(mut self, output: P) -> Self {
        self.output = output.into();
        self
    }
}

/// Summary of a completed scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Handles that were available on every platform, in aggregation order
    pub available: Vec<String>,

    /// How many handles were fully processed (pass or fail)
    pub processed: u64,

    /// How many handles the scan range covered
    pub total: u64,

    /// Wall-clock duration of the pipeline run
    pub duration: Duration,
}
