//! The search-result input record and its boundary validation.
//!
//! Records arrive from an external search collaborator as loosely-shaped data.
//! Validation happens once, here, at the boundary: required fields must be
//! non-empty and the url must parse. Everything downstream can then rely on
//! the record's shape instead of defending against missing values.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::InputError;

/// One raw search result, as delivered by the search collaborator.
///
/// `title`, `url`, `domain`, and `snippet` are required; `score`,
/// `timestamp`, and `metadata` are optional extras that tracking ignores
/// but carries through serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub domain: String,
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl SearchResult {
    /// Build a result with just the required fields (tests and callers that
    /// have no score/metadata to attach).
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        domain: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            domain: domain.into(),
            snippet: snippet.into(),
            score: None,
            timestamp: None,
            metadata: None,
        }
    }

    /// Validate the record at the store boundary.
    ///
    /// Returns the parsed [`Url`] on success so callers don't parse twice.
    /// Rejection is a soft failure: no node is created, the caller decides
    /// whether to surface it.
    pub fn validate(&self) -> Result<Url, InputError> {
        if self.title.trim().is_empty() {
            return Err(InputError::MissingField { field: "title" });
        }
        if self.url.trim().is_empty() {
            return Err(InputError::MissingField { field: "url" });
        }
        if self.domain.trim().is_empty() {
            return Err(InputError::MissingField { field: "domain" });
        }
        if self.snippet.trim().is_empty() {
            return Err(InputError::MissingField { field: "snippet" });
        }
        Url::parse(&self.url).map_err(|_| InputError::InvalidUrl {
            url: self.url.clone(),
        })
    }

    /// Title and snippet concatenated and lowercased, the haystack every
    /// keyword heuristic scans.
    pub fn text(&self) -> String {
        let mut text = String::with_capacity(self.title.len() + self.snippet.len() + 1);
        text.push_str(&self.title);
        text.push(' ');
        text.push_str(&self.snippet);
        text.to_lowercase()
    }
}
