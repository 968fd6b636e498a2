//! Cursor-based pagination over server-paginated collections.
//!
//! The registry paginates its catalog and tag listings with an opaque
//! continuation cursor carried in a `Link` response header. This module
//! separates "how to fetch a page" from "how to consume it" so the same
//! termination and cursor logic serves both the repository walk and the
//! tag walk, and so the termination edge cases (malformed cursor, early
//! stop, transport failure) are testable without any specific collection.

use crate::error::{Result, SweepError};
use reqwest::StatusCode;
use std::future::Future;


/// Opaque resume point in a paginated collection. The empty string means
/// "start from the beginning"; the client never interprets the contents.
pub type Cursor = String;

/// Result of fetching one page of a collection walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// HTTP status of the fetch.
    pub status: StatusCode,
    /// Ordered items decoded from the page body (repository or tag names).
    pub items: Vec<String>,
    /// Raw continuation (`Link`) header value, if the response carried one.
    pub link: Option<String>,
}

/// Verdict returned by a page consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFlow {
    /// Keep following the cursor chain.
    Continue,
    /// End the walk early without error.
    Stop,
}

/// Extracts the next cursor from a continuation link header value.
///
/// The header has the form `<url>; rel="next"`; the cursor is the `last`
/// query parameter of that URL. Returns `None` when the header carries no
/// extractable, non-empty cursor, which callers must treat as a protocol
/// violation rather than the end of the collection.
///
/// # Examples
///
/// ```
/// use libsweep::paginate::next_cursor;
///
/// let link = r#"</v2/_catalog?n=100&last=repo99>; rel="next""#;
/// assert_eq!(next_cursor(link), Some("repo99".to_string()));
/// assert_eq!(next_cursor(r#"</v2/_catalog?n=100>; rel="next""#), None);
/// ```
pub fn next_cursor(link: &str) -> Option<Cursor> {
    for link_part in link.split(',') {
        let link_part = link_part.trim();

        if !(link_part.contains("rel=\"next\"") || link_part.contains("rel='next'")) {
            continue;
        }

        // Extract URL between < and >
        let start = link_part.find('<')?;
        let end = link_part.find('>')?;
        let target = &link_part[start + 1..end];

        // The target is usually a relative path, so parse the query string
        // directly rather than requiring an absolute URL.
        let (_, query) = target.split_once('?')?;
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key == "last" && !value.is_empty() {
                return Some(value.into_owned());
            }
        }
        return None;
    }

    None
}

/// Follows a cursor chain, fetching and consuming pages until the chain ends.
///
/// Starts from the empty cursor. Each iteration fetches a page, checks its
/// status, hands it to `consume`, then extracts the next cursor from the
/// page's continuation link:
///
/// - a transport error or non-success page status ends the walk with that
///   failure;
/// - `consume` returning [`PageFlow::Stop`] ends the walk successfully;
/// - a page without a continuation link means the collection is exhausted;
/// - a continuation link without an extractable cursor is a protocol
///   violation ([`SweepError::InvalidContinuation`]); the walk never loops
///   forever and never silently stops.
///
/// The walk is strictly sequential: each fetch depends on the cursor from
/// the previous page.
pub async fn walk<F, Fut, C>(mut fetch: F, mut consume: C) -> Result<()>
where
    F: FnMut(Cursor) -> Fut,
    Fut: Future<Output = Result<Page>>,
    C: FnMut(&Page) -> PageFlow,
{
    let mut cursor = Cursor::new();

    loop {
        tracing::debug!(cursor = %cursor, "fetching page");
        let page = fetch(cursor).await?;

        if !page.status.is_success() {
            return Err(SweepError::from_status(page.status, "page fetch"));
        }

        if let PageFlow::Stop = consume(&page) {
            return Ok(());
        }

        let Some(link) = page.link else {
            return Ok(());
        };

        match next_cursor(&link) {
            Some(next) => cursor = next,
            None => return Err(SweepError::invalid_continuation(link)),
        }
    }
}
