use thiserror::Error;

use crate::{Feed, SearchResult};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("invalid search pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("failed to read feed {uri}: {message}")]
    Source { uri: String, message: String },
    #[error("failed to parse feed {uri}: {message}")]
    Parse { uri: String, message: String },
}

/// Knows how to search one kind of feed.
///
/// An empty result list means "no matches" and is not an error. Implementations
/// are shared across worker threads and must not mutate shared state.
pub trait Matcher: Send + Sync {
    fn search(&self, feed: &Feed, search_term: &str) -> Result<Vec<SearchResult>, MatchError>;
}

/// Fallback for feed types without a registered matcher. Never matches anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMatcher;

impl Matcher for DefaultMatcher {
    fn search(&self, _feed: &Feed, _search_term: &str) -> Result<Vec<SearchResult>, MatchError> {
        Ok(Vec::new())
    }
}
