//! Platform probe implementations for handle checking.
//!
//! A probe is one platform's availability check: handle in, verdict out.
//! Probes are described by data ([`PlatformSpec`]) and executed over HTTP
//! ([`HttpProbe`]); the [`Probe`] trait is the seam that lets tests
//! substitute scripted probes for real network calls.

use crate::types::ProbeVerdict;
use async_trait::async_trait;

/// One platform's availability check.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Platform name this probe answers for (e.g. "github").
    fn platform(&self) -> &str;

    /// Probe the platform for one handle.
    ///
    /// Must never panic or return an error: transport failures are folded
    /// into [`ProbeVerdict::Inconclusive`] so the pipeline keeps moving.
    async fn check(&self, handle: &str) -> ProbeVerdict;
}

/// Platform descriptor catalog and URL templating
pub mod catalog;

/// HTTP probe execution
pub mod http;

// Re-export commonly used functions and types
pub use catalog::{default_platforms, PlatformSpec, HANDLE_PLACEHOLDER};
pub use http::{build_probe_client, HttpProbe};
