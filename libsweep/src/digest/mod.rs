//! Content digest validation.
//!
//! Tags are mutable pointers; digests are the true deletion targets. This
//! module wraps `oci_spec::image::Digest` so the `Docker-Content-Digest`
//! header value is validated before it is ever used as a deletion key.

use crate::error::{Result, SweepError};
use oci_spec::image::Digest as OciDigest;
use std::fmt;
use std::str::FromStr;


/// Represents a content digest, wrapping the `oci_spec::image::Digest` type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest(OciDigest);

impl Digest {
    /// Returns the digest algorithm (e.g., "sha256").
    pub fn algorithm(&self) -> String {
        self.0.algorithm().to_string()
    }

    /// Returns the hex-encoded digest value without the algorithm prefix.
    pub fn hex(&self) -> &str {
        self.0.digest()
    }
}

impl FromStr for Digest {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self> {
        let oci_digest = OciDigest::from_str(s).map_err(|e| SweepError::Validation {
            message: format!("Invalid digest format: {}", e),
            source: Some(Box::new(e)),
        })?;
        Ok(Digest(oci_digest))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
