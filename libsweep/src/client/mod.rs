//! HTTP client for registry communication.
//!
//! A thin client built on reqwest covering the four operations the sweep
//! workflow needs: catalog page fetch, tag-list page fetch, manifest digest
//! resolution (HEAD), and manifest deletion (DELETE). Pagination itself
//! lives in [`crate::paginate`]; this module only produces single
//! [`Page`]s and carries the raw continuation header through.

use crate::auth::Credentials;
use crate::digest::Digest;
use crate::error::{Result, SweepError};
use crate::paginate::Page;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::Deserializer;
use std::str::FromStr;
use std::time::Duration;


/// Manifest media type sent on digest resolution and deletion requests.
/// The registry returns the digest of the representation matching this type,
/// so HEAD and DELETE must agree on it.
const MANIFEST_MEDIA_TYPE: &str = "application/vnd.docker.distribution.manifest.v2+json";

/// Body of one catalog page.
#[derive(Debug, Deserialize)]
struct CatalogPageBody {
    /// List of repository names; a missing field means an empty page.
    #[serde(default)]
    repositories: Vec<String>,
}

/// Body of one tag-list page.
///
/// Some registries return `"tags": null` (or omit the field) for a
/// repository with no tags; either shape degrades to zero items for the
/// page instead of failing the walk.
#[derive(Debug, Deserialize)]
struct TagsPageBody {
    #[serde(default, deserialize_with = "string_seq_or_empty")]
    tags: Vec<String>,
}

/// Deserializes a field as a sequence of strings, treating a missing, null,
/// or differently-shaped value as empty.
fn string_seq_or_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_owned))
            .collect(),
        _ => Vec::new(),
    })
}

/// Version information returned by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryVersion {
    /// The Docker-Distribution-API-Version header value, if present.
    /// Typically "registry/2.0" for OCI Distribution Spec v2.
    pub api_version: Option<String>,
}

/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use libsweep::client::ClientConfig;
///
/// let config = ClientConfig::new().with_timeout(60).with_page_size(50);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// Page-size hint (`n` query parameter) for paginated listings
    /// (default: 100)
    pub page_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            page_size: 100,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the page-size hint for paginated listings.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// HTTP client for registry maintenance operations.
#[derive(Debug, Clone)]
pub struct Client {
    /// The underlying HTTP client
    http_client: ReqwestClient,
    /// Base registry URL (e.g., "https://registry.example.com")
    registry_url: String,
    /// Optional credentials attached to every request
    credentials: Option<Credentials>,
    /// Client configuration
    config: ClientConfig,
}

impl Client {
    /// Creates a new client for the specified registry URL with default
    /// configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libsweep::client::Client;
    ///
    /// let client = Client::new("http://localhost:5000", None).unwrap();
    /// ```
    pub fn new(registry_url: &str, credentials: Option<Credentials>) -> Result<Self> {
        Self::with_config(registry_url, ClientConfig::default(), credentials)
    }

    /// Creates a new client with custom configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libsweep::client::{Client, ClientConfig};
    ///
    /// let config = ClientConfig::new().with_timeout(60);
    /// let client = Client::with_config("http://localhost:5000", config, None).unwrap();
    /// ```
    pub fn with_config(
        registry_url: &str,
        config: ClientConfig,
        credentials: Option<Credentials>,
    ) -> Result<Self> {
        let normalized_url = Self::normalize_url(registry_url)?;

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| SweepError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            registry_url: normalized_url,
            credentials,
            config,
        })
    }

    /// Normalizes a registry URL by ensuring it has a scheme and removing
    /// trailing slashes.
    fn normalize_url(url: &str) -> Result<String> {
        let url = url.trim();

        if url.is_empty() {
            return Err(SweepError::validation("Registry URL cannot be empty"));
        }

        let url = if !url.starts_with("http://") && !url.starts_with("https://") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };

        Ok(url.trim_end_matches('/').to_string())
    }

    /// Returns the base registry URL.
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// Returns the configured page-size hint.
    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    /// Builds a request with the Authorization header attached when
    /// credentials are present.
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut request = self.http_client.request(method, url);
        if let Some(creds) = &self.credentials
            && let Some(auth_header) = creds.to_header_value()
        {
            request = request.header("Authorization", auth_header);
        }
        request
    }

    /// Checks that the registry speaks the v2 distribution API.
    ///
    /// Performs a GET request to the `/v2/` endpoint and returns version
    /// information from the response headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry is unreachable, requires missing
    /// credentials, or does not support the v2 API.
    pub async fn check_version(&self) -> Result<RegistryVersion> {
        let url = format!("{}/v2/", self.registry_url);

        let response = self
            .request(Method::GET, &url)
            .send()
            .await
            .map_err(|e| Self::translate_reqwest_error(e, &self.registry_url))?;

        let api_version = response
            .headers()
            .get("Docker-Distribution-API-Version")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let status = response.status();
        if !status.is_success() {
            return Err(SweepError::from_status(status, &url));
        }

        Ok(RegistryVersion { api_version })
    }

    /// Fetches one page of the repository catalog.
    ///
    /// Performs `GET /v2/_catalog?n={page_size}[&last={cursor}]`. An empty
    /// cursor starts from the beginning of the catalog. The returned
    /// [`Page`] carries the HTTP status and the raw `Link` header; a
    /// non-success status yields a page with no items rather than an error,
    /// leaving the terminal decision to the pagination walk.
    pub async fn fetch_catalog_page(&self, cursor: &str) -> Result<Page> {
        let url = self.paged_url("/v2/_catalog", cursor);
        self.get_page(&url, |bytes| {
            let body: CatalogPageBody = serde_json::from_slice(bytes).map_err(|e| {
                SweepError::validation_with_source("Failed to parse catalog response", e)
            })?;
            Ok(body.repositories)
        })
        .await
    }

    /// Fetches one page of a repository's tag list.
    ///
    /// Performs `GET /v2/{repository}/tags/list?n={page_size}[&last={cursor}]`.
    /// A missing or malformed `tags` field is treated as zero tags for the
    /// page rather than failing the whole walk.
    pub async fn fetch_tags_page(&self, repository: &str, cursor: &str) -> Result<Page> {
        let url = self.paged_url(&format!("/v2/{}/tags/list", repository), cursor);
        self.get_page(&url, |bytes| {
            let body: TagsPageBody = serde_json::from_slice(bytes).map_err(|e| {
                SweepError::validation_with_source("Failed to parse tags response", e)
            })?;
            Ok(body.tags)
        })
        .await
    }

    /// Resolves a tag to its manifest digest.
    ///
    /// Performs a HEAD request to `/v2/{repository}/manifests/{tag}` and
    /// reads the `Docker-Content-Digest` response header. The digest, not
    /// the tag, is the deletion key: tags are mutable pointers while digests
    /// are content-addressed.
    ///
    /// # Errors
    ///
    /// Returns an error if the status is not 200, if the digest header is
    /// missing, or if the header value is not a valid digest.
    pub async fn resolve_digest(&self, repository: &str, tag: &str) -> Result<Digest> {
        let url = format!("{}/v2/{}/manifests/{}", self.registry_url, repository, tag);

        let response = self
            .request(Method::HEAD, &url)
            .header("Accept", MANIFEST_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| Self::translate_reqwest_error(e, &self.registry_url))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SweepError::from_status(
                status,
                &format!("digest resolution for {}:{}", repository, tag),
            ));
        }

        let raw = response
            .headers()
            .get("Docker-Content-Digest")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                SweepError::validation(format!(
                    "Response for {}:{} missing Docker-Content-Digest header",
                    repository, tag
                ))
            })?;

        Digest::from_str(raw)
    }

    /// Deletes a manifest by digest.
    ///
    /// Performs a DELETE request to `/v2/{repository}/manifests/{digest}`.
    /// The registry acknowledges deletion with 202 Accepted; any other
    /// status is a failure for this manifest and is not retried, since the
    /// failure cause is unknown.
    pub async fn delete_manifest(&self, repository: &str, digest: &Digest) -> Result<()> {
        let url = format!(
            "{}/v2/{}/manifests/{}",
            self.registry_url, repository, digest
        );

        let response = self
            .request(Method::DELETE, &url)
            .header("Accept", MANIFEST_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| Self::translate_reqwest_error(e, &self.registry_url))?;

        let status = response.status();
        if status != StatusCode::ACCEPTED {
            return Err(SweepError::from_status(
                status,
                &format!("manifest delete for {}@{}", repository, digest),
            ));
        }

        Ok(())
    }

    /// Builds a paginated listing URL with the page-size hint and, when the
    /// cursor is non-empty, the `last` resume parameter.
    fn paged_url(&self, path: &str, cursor: &str) -> String {
        let mut url = format!(
            "{}{}?n={}",
            self.registry_url, path, self.config.page_size
        );
        if !cursor.is_empty() {
            url.push_str("&last=");
            url.push_str(cursor);
        }
        url
    }

    /// Performs a GET for one listing page, decoding the body with `parse`
    /// only on success statuses.
    async fn get_page<P>(&self, url: &str, parse: P) -> Result<Page>
    where
        P: FnOnce(&[u8]) -> Result<Vec<String>>,
    {
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|e| Self::translate_reqwest_error(e, &self.registry_url))?;

        let status = response.status();
        let link = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let items = if status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(|e| SweepError::network_with_source("Failed to read page body", e))?;
            parse(&body)?
        } else {
            Vec::new()
        };

        Ok(Page {
            status,
            items,
            link,
        })
    }

    /// Translates a reqwest error into a SweepError.
    fn translate_reqwest_error(error: reqwest::Error, registry_url: &str) -> SweepError {
        if error.is_timeout() {
            SweepError::network(format!("Request to {} timed out", registry_url))
        } else if error.is_connect() {
            SweepError::network_with_source(
                format!("Failed to connect to registry at {}", registry_url),
                error,
            )
        } else if error.is_request() {
            SweepError::network_with_source(
                format!("Failed to send request to {}", registry_url),
                error,
            )
        } else {
            SweepError::network_with_source(
                format!("Network error communicating with {}", registry_url),
                error,
            )
        }
    }
}
