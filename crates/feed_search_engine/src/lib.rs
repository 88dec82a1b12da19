//! Feed search engine: concurrent dispatch, feed sources, result sinks and the RSS matcher.
mod decode;
mod dispatch;
mod error;
mod fetch;
mod rss;
mod sink;
mod source;
mod types;

pub use decode::{decode_feed, DecodeError, DecodedFeed};
pub use dispatch::{Dispatcher, SessionSummary};
pub use error::{SearchError, SetupError};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use rss::{parse_rss, plain_text, RssChannel, RssDocument, RssItem, RssMatcher, RssParseError};
pub use sink::{LogResultSink, ResultSink, SinkError, WriterSink};
pub use source::{FeedLoadError, FeedSource, JsonFileFeedSource, StaticFeedSource};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};

use feed_search_core::{FeedType, MatcherRegistry};

/// Builds the registry with every matcher this crate ships.
pub fn default_registry(settings: FetchSettings) -> Result<MatcherRegistry, SetupError> {
    let mut builder = MatcherRegistry::builder();
    builder.register(FeedType::Rss, RssMatcher::new(settings)?)?;
    Ok(builder.build())
}
