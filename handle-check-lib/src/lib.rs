//! # Handle Check Library
//!
//! A fast, robust library for sweeping short-handle availability across a
//! configurable set of social platforms.
//!
//! The library enumerates every fixed-length handle over an alphabet, probes
//! each platform's profile URL (HTTP 404 means unregistered), and reports
//! the handles that are free everywhere at once. Verification short-circuits
//! on the first platform that rejects a handle, and the whole sweep runs
//! through a bounded-queue pipeline with a configurable worker pool.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use handle_check_lib::{
//!     default_platforms, HandleSpace, HandleVerifier, ProgressTracker, ScanConfig, ScanPipeline,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScanConfig::default();
//!     let verifier = HandleVerifier::from_specs(&default_platforms(), config.probe_timeout)?;
//!     let space = HandleSpace::new(&config.alphabet, config.length)?;
//!     let progress = Arc::new(ProgressTracker::new(space.total()));
//!
//!     let report = ScanPipeline::new(config, verifier).run(progress).await?;
//!     println!("{} handles available everywhere", report.available.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Data-driven probes**: platforms are descriptors, not code
//! - **Short-circuit verification**: the first rejection stops the probe chain
//! - **Bounded pipeline**: backpressured queues, explicit shutdown ordering
//! - **Resumable enumeration**: every handle maps to an integer index
//! - **Injected progress state**: no hidden globals, test-isolated

// Re-export main public API types and functions
// This makes them available as handle_check_lib::TypeName
pub use config::{load_env_config, parse_timeout_string, ConfigManager, DefaultsConfig, EnvConfig, FileConfig};
pub use error::HandleCheckError;
pub use generate::{HandleSpace, Handles};
pub use pipeline::ScanPipeline;
pub use probes::{
    build_probe_client, default_platforms, HttpProbe, PlatformSpec, Probe, HANDLE_PLACEHOLDER,
};
pub use progress::{ProgressSnapshot, ProgressTracker};
pub use sink::write_results;
pub use types::{HandleResult, ProbeVerdict, ScanConfig, ScanReport};
pub use verifier::HandleVerifier;

// Internal modules - these are not part of the public API
mod config;
mod error;
mod generate;
mod pipeline;
mod probes;
mod progress;
mod sink;
mod types;
mod verifier;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, HandleCheckError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
