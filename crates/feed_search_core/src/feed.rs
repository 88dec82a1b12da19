use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag selecting which matcher handles a feed. Tags are matched exactly, so
/// `"RSS"` is kept as `Other("RSS")` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FeedType {
    Rss,
    /// Any tag without a dedicated variant, kept verbatim.
    Other(String),
}

impl From<String> for FeedType {
    fn from(tag: String) -> Self {
        if tag == "rss" {
            FeedType::Rss
        } else {
            FeedType::Other(tag)
        }
    }
}

impl From<&str> for FeedType {
    fn from(tag: &str) -> Self {
        FeedType::from(tag.to_string())
    }
}

impl From<FeedType> for String {
    fn from(feed_type: FeedType) -> Self {
        feed_type.to_string()
    }
}

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedType::Rss => write!(f, "rss"),
            FeedType::Other(tag) => write!(f, "{tag}"),
        }
    }
}

/// A named, typed data source. The on-disk form uses the `site`/`link`/`type` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    #[serde(rename = "site")]
    pub name: String,
    #[serde(rename = "link")]
    pub uri: String,
    #[serde(rename = "type")]
    pub feed_type: FeedType,
}

impl Feed {
    pub fn new(name: impl Into<String>, uri: impl Into<String>, feed_type: FeedType) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            feed_type,
        }
    }
}

/// One unit of matched content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub field: String,
    pub content: String,
}

impl SearchResult {
    pub fn new(field: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            content: content.into(),
        }
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:\n{}\n", self.field, self.content)
    }
}
