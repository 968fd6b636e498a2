//! Registry maintenance operations.
//!
//! This module ties the pagination walk, the retention policy, and the HTTP
//! client together: it lists repositories and tags, filters repositories by
//! name prefix, and deletes the manifests of superseded tags. Every failure
//! below the run itself is isolated: a bad page ends one walk, a bad tag is
//! skipped, and the run always proceeds to the next independent unit of work.

use crate::client::Client;
use crate::paginate::{self, PageFlow};
use crate::policy::RetentionPolicy;
use serde::Serialize;

#[cfg(test)]
mod tests;

/// A tag that could not be deleted, with the reason it was skipped.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagFailure {
    /// The tag that failed.
    pub tag: String,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Outcome of cleaning one repository.
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryReport {
    /// Repository name.
    pub repository: String,
    /// The tag the retention policy kept, if the repository had any tags.
    pub retained: Option<String>,
    /// Tags whose manifests were deleted (or would be, under dry run).
    pub deleted: Vec<String>,
    /// Tags skipped because digest resolution or deletion failed.
    pub failed: Vec<TagFailure>,
    /// Whether deletions were only simulated.
    pub dry_run: bool,
}

/// Outcome of a full clean run across the catalog.
#[derive(Debug, Clone, Serialize, Default)]
pub struct CleanSummary {
    /// Per-repository reports, in catalog order.
    pub reports: Vec<RepositoryReport>,
    /// Repositories skipped because they did not match the name prefix.
    pub skipped: Vec<String>,
}

/// High-level registry maintenance client.
#[derive(Debug)]
pub struct Registry {
    client: Client,
    policy: RetentionPolicy,
}

impl Registry {
    /// Creates a new `Registry` from a configured client and policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use libsweep::client::Client;
    /// use libsweep::policy::RetentionPolicy;
    /// use libsweep::registry::Registry;
    ///
    /// let client = Client::new("http://localhost:5000", None).unwrap();
    /// let registry = Registry::new(client, RetentionPolicy::new());
    /// ```
    pub fn new(client: Client, policy: RetentionPolicy) -> Self {
        Self { client, policy }
    }

    /// Returns a reference to the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Lists all repositories in the registry catalog.
    ///
    /// Walks the paginated catalog, accumulating names page by page.
    /// Accumulation is best-effort: if the walk ends in a failure (bad
    /// status, invalid continuation), the failure is logged and whatever
    /// was accumulated so far is returned.
    pub async fn list_repositories(&self) -> Vec<String> {
        let mut repositories = Vec::new();

        let outcome = paginate::walk(
            |cursor| async move { self.client.fetch_catalog_page(&cursor).await },
            |page| {
                repositories.extend(page.items.iter().cloned());
                PageFlow::Continue
            },
        )
        .await;

        if let Err(e) = outcome {
            tracing::warn!(error = %e, "repository walk ended early");
        }

        repositories
    }

    /// Lists all tags for a repository.
    ///
    /// Same best-effort shape as [`list_repositories`](Self::list_repositories),
    /// scoped to one repository's tag list. A page whose `tags` field is
    /// missing or malformed contributes zero tags rather than ending the walk.
    pub async fn list_tags(&self, repository: &str) -> Vec<String> {
        let mut tags = Vec::new();

        let outcome = paginate::walk(
            |cursor| async move { self.client.fetch_tags_page(repository, &cursor).await },
            |page| {
                tags.extend(page.items.iter().cloned());
                PageFlow::Continue
            },
        )
        .await;

        if let Err(e) = outcome {
            tracing::warn!(repository, error = %e, "tag walk ended early");
        }

        tags
    }

    /// Applies the retention policy to one repository and deletes the
    /// superseded manifests.
    ///
    /// For each tag selected for deletion: resolve its digest with a HEAD
    /// request, then delete by digest. A failure at either step records the
    /// tag and moves on; one bad tag never aborts the batch. With
    /// `dry_run` set, deletions are reported but not issued.
    pub async fn clean_repository(&self, repository: &str, dry_run: bool) -> RepositoryReport {
        let tags = self.list_tags(repository).await;
        let retained = self.policy.retained(&tags);
        let selected = self.policy.select_for_deletion(&tags);

        let mut deleted = Vec::new();
        let mut failed = Vec::new();

        for tag in selected {
            let digest = match self.client.resolve_digest(repository, &tag).await {
                Ok(digest) => digest,
                Err(e) => {
                    tracing::warn!(repository, tag = %tag, error = %e, "skipping tag: digest resolution failed");
                    failed.push(TagFailure {
                        tag,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if dry_run {
                tracing::info!(repository, tag = %tag, digest = %digest, "would delete manifest");
                deleted.push(tag);
                continue;
            }

            match self.client.delete_manifest(repository, &digest).await {
                Ok(()) => {
                    tracing::info!(repository, tag = %tag, digest = %digest, "deleted manifest");
                    deleted.push(tag);
                }
                Err(e) => {
                    tracing::warn!(repository, tag = %tag, error = %e, "manifest delete failed");
                    failed.push(TagFailure {
                        tag,
                        reason: e.to_string(),
                    });
                }
            }
        }

        RepositoryReport {
            repository: repository.to_string(),
            retained,
            deleted,
            failed,
            dry_run,
        }
    }

    /// Runs the full retention workflow across the catalog.
    ///
    /// Repositories whose names do not start with `prefix` are skipped and
    /// recorded; the rest are cleaned one at a time, in catalog order.
    pub async fn clean(&self, prefix: &str, dry_run: bool) -> CleanSummary {
        let mut summary = CleanSummary::default();

        for repository in self.list_repositories().await {
            if !repository.starts_with(prefix) {
                tracing::info!(repository = %repository, prefix, "repository does not match prefix, skipped");
                summary.skipped.push(repository);
                continue;
            }

            let report = self.clean_repository(&repository, dry_run).await;
            tracing::info!(
                repository = %repository,
                deleted = report.deleted.len(),
                failed = report.failed.len(),
                "repository clean done"
            );
            summary.reports.push(report);
        }

        summary
    }
}
