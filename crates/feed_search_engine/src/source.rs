use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use feed_search_core::Feed;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedLoadError {
    #[error("failed to read feed list {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse feed list {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("feed list unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the ordered list of feeds a session searches.
pub trait FeedSource: Send + Sync {
    fn retrieve_feeds(&self) -> Result<Vec<Feed>, FeedLoadError>;
}

/// Reads a JSON array of `{"site", "link", "type"}` objects from disk on every call.
#[derive(Debug, Clone)]
pub struct JsonFileFeedSource {
    path: PathBuf,
}

impl JsonFileFeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeedSource for JsonFileFeedSource {
    fn retrieve_feeds(&self) -> Result<Vec<Feed>, FeedLoadError> {
        let content = fs::read_to_string(&self.path).map_err(|source| FeedLoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| FeedLoadError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-memory feed list.
#[derive(Debug, Clone, Default)]
pub struct StaticFeedSource {
    feeds: Vec<Feed>,
}

impl StaticFeedSource {
    pub fn new(feeds: Vec<Feed>) -> Self {
        Self { feeds }
    }
}

impl FeedSource for StaticFeedSource {
    fn retrieve_feeds(&self) -> Result<Vec<Feed>, FeedLoadError> {
        Ok(self.feeds.clone())
    }
}
