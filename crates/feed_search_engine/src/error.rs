use std::io;

use feed_search_core::RegistryError;
use thiserror::Error;

use crate::FeedLoadError;

/// Errors that end a session. Per-feed matcher failures never show up here.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search term must not be empty")]
    EmptySearchTerm,
    #[error(transparent)]
    FeedLoad(#[from] FeedLoadError),
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to start matcher runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
