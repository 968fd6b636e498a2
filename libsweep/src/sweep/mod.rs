//! High-level API for the sweep library.
//!
//! `Sweep` wires the client, registry, and retention policy together behind
//! a small surface: connect, list, clean. It's the recommended entry point
//! for most users; the lower-level modules stay available for fine-grained
//! control.
//!
//! # Examples
//!
//! ```no_run
//! use libsweep::Sweep;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sweep = Sweep::connect("http://localhost:5000").await?;
//!
//!     let repos = sweep.list_repositories().await;
//!     for repo in &repos {
//!         println!("{}", repo);
//!     }
//!
//!     // Delete everything but the newest tag in each develop/* repository.
//!     let summary = sweep.clean("develop", false).await;
//!     println!("cleaned {} repositories", summary.reports.len());
//!     Ok(())
//! }
//! ```

use crate::auth::Credentials;
use crate::client::Client;
use crate::config::Config;
use crate::error::Result;
use crate::registry::{CleanSummary, Registry, RepositoryReport};

#[cfg(test)]
mod tests;

/// High-level interface for registry maintenance.
#[derive(Debug)]
pub struct Sweep {
    registry: Registry,
    registry_url: String,
}

impl Sweep {
    /// Connects to a registry with default settings and anonymous access.
    ///
    /// Probes the `/v2/` endpoint so that unreachable registries and missing
    /// credentials surface before any walk starts.
    pub async fn connect(registry_url: &str) -> Result<Self> {
        Self::builder(registry_url).build().await
    }

    /// Returns a builder for advanced configuration.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use libsweep::{Credentials, Sweep};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let sweep = Sweep::builder("https://registry.example.com")
    ///     .with_credentials(Credentials::basic("user", "pass"))
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder(registry_url: &str) -> SweepBuilder {
        SweepBuilder::new(registry_url)
    }

    /// Returns the registry URL this instance is connected to.
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// Lists all repositories in the registry catalog (best-effort).
    pub async fn list_repositories(&self) -> Vec<String> {
        self.registry.list_repositories().await
    }

    /// Lists all tags for a repository (best-effort).
    pub async fn list_tags(&self, repository: &str) -> Vec<String> {
        self.registry.list_tags(repository).await
    }

    /// Cleans one repository, returning its report.
    pub async fn clean_repository(&self, repository: &str, dry_run: bool) -> RepositoryReport {
        self.registry.clean_repository(repository, dry_run).await
    }

    /// Runs the retention workflow over every repository matching `prefix`.
    pub async fn clean(&self, prefix: &str, dry_run: bool) -> CleanSummary {
        self.registry.clean(prefix, dry_run).await
    }
}

/// Builder for [`Sweep`] with credentials and configuration.
pub struct SweepBuilder {
    registry_url: String,
    credentials: Option<Credentials>,
    config: Config,
}

impl SweepBuilder {
    /// Creates a builder for the given registry URL.
    pub fn new(registry_url: &str) -> Self {
        Self {
            registry_url: registry_url.to_string(),
            credentials: None,
            config: Config::default(),
        }
    }

    /// Sets the credentials attached to every request.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the configuration (network, pagination, retention).
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Builds the [`Sweep`] instance and verifies the registry speaks the
    /// v2 API.
    pub async fn build(self) -> Result<Sweep> {
        let client = Client::with_config(
            &self.registry_url,
            self.config.client_config(),
            self.credentials,
        )?;
        let registry_url = client.registry_url().to_string();

        client.check_version().await?;

        let registry = Registry::new(client, self.config.retention_policy());
        Ok(Sweep {
            registry,
            registry_url,
        })
    }
}
