//! Tag retention policy.
//!
//! A minimal "keep the newest, delete the rest" rule. "Newest" means the
//! greatest integer suffix after the last separator, and nothing smarter:
//! a tag with no separator or a non-numeric suffix keys to 0, so tags like
//! `latest` sort ahead of any numbered tag and become deletion-eligible.
//! This is intentionally naive and unsuitable for arbitrary tagging
//! schemes; callers choosing this policy are choosing that tradeoff.


/// Default field separator for the ordering key.
pub const DEFAULT_SEPARATOR: char = '-';

/// Orders a repository's tags and selects the subset to delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPolicy {
    separator: char,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
        }
    }
}

impl RetentionPolicy {
    /// Creates a policy with the default `'-'` separator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a policy with a custom separator character.
    pub fn with_separator(separator: char) -> Self {
        Self { separator }
    }

    /// Computes the ordering key for a tag.
    ///
    /// The tag is split on the separator; with fewer than two fields the
    /// key is 0, otherwise the last field is parsed as an integer, with
    /// parse failures also keying to 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use libsweep::policy::RetentionPolicy;
    ///
    /// let policy = RetentionPolicy::new();
    /// assert_eq!(policy.sort_key("v-10"), 10);
    /// assert_eq!(policy.sort_key("latest"), 0);
    /// assert_eq!(policy.sort_key("v-beta"), 0);
    /// ```
    pub fn sort_key(&self, tag: &str) -> i64 {
        let fields: Vec<&str> = tag.split(self.separator).collect();
        if fields.len() < 2 {
            return 0;
        }
        fields.last().and_then(|f| f.parse().ok()).unwrap_or(0)
    }

    /// Selects the tags to delete, retaining only the one that sorts last.
    ///
    /// Tags are stably sorted ascending by [`sort_key`](Self::sort_key) and
    /// all but the last are returned, in sorted order. Ties keep their
    /// original relative order, so with all-equal keys the most recently
    /// listed tag survives. Zero or one tag yields an empty deletion set.
    ///
    /// # Examples
    ///
    /// ```
    /// use libsweep::policy::RetentionPolicy;
    ///
    /// let policy = RetentionPolicy::new();
    /// let tags: Vec<String> = ["v-1", "v-2", "v-10"].iter().map(|s| s.to_string()).collect();
    /// assert_eq!(policy.select_for_deletion(&tags), vec!["v-1", "v-2"]);
    /// ```
    pub fn select_for_deletion(&self, tags: &[String]) -> Vec<String> {
        let mut sorted = tags.to_vec();
        sorted.sort_by_key(|tag| self.sort_key(tag));
        sorted.pop();
        sorted
    }

    /// Returns the tag the policy retains, if any.
    pub fn retained(&self, tags: &[String]) -> Option<String> {
        let mut sorted = tags.to_vec();
        sorted.sort_by_key(|tag| self.sort_key(tag));
        sorted.pop()
    }
}
