//! Sweep - Registry Retention Library
//!
//! Sweep is a maintenance client for image-registry HTTP APIs: it walks the
//! server-paginated repository catalog and tag lists, applies a retention
//! policy, and deletes superseded image manifests by digest.
//!
//! # Quick Start
//!
//! ```no_run
//! use libsweep::Sweep;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sweep = Sweep::connect("http://localhost:5000").await?;
//!
//!     // Dry run: report what would be deleted in develop/* repositories.
//!     let summary = sweep.clean("develop", true).await;
//!     for report in &summary.reports {
//!         println!("{}: {} tags to delete", report.repository, report.deleted.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Main Types
//!
//! - [`Sweep`] - Main entry point for maintenance operations
//! - [`SweepBuilder`] - Builder for credentials and configuration
//! - [`RetentionPolicy`] - "keep the newest numeric suffix" tag selection
//! - [`CleanSummary`] / [`RepositoryReport`] - run outcomes
//! - [`Credentials`] - Authentication credentials
//! - [`Digest`] - Content digest validation and handling
//!
//! # Architecture
//!
//! The cursor-following pagination loop ([`paginate`]) is separated from the
//! HTTP client ([`client`]) and from the collections being walked
//! ([`registry`]), so the termination edge cases (malformed continuation
//! links, early stops, transport failures) are testable on their own. The
//! retention policy ([`policy`]) is a pure function over tag names.

#![warn(clippy::all)]

/// Returns the libsweep crate version.
///
/// # Examples
///
/// ```
/// let version = libsweep::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// High-level public API (main entry point)
mod sweep;
pub use sweep::{Sweep, SweepBuilder};

// Re-export commonly used types for convenience
pub use auth::Credentials;
pub use config::Config;
pub use digest::Digest;
pub use error::{Result, SweepError};
pub use policy::RetentionPolicy;
pub use registry::{CleanSummary, Registry, RepositoryReport, TagFailure};

// Low-level implementation modules (hidden from docs but still public)
#[doc(hidden)]
pub mod auth;
#[doc(hidden)]
pub mod client;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod digest;
#[doc(hidden)]
pub mod error;
#[doc(hidden)]
pub mod paginate;
#[doc(hidden)]
pub mod policy;
#[doc(hidden)]
pub mod registry;
