use std::io;

use feed_search_core::{Feed, MatchError, Matcher, SearchResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use scraper::Html;
use thiserror::Error;

use crate::{decode_feed, FetchSettings, Fetcher, ReqwestFetcher};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RssDocument {
    pub channel: RssChannel,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RssChannel {
    pub title: String,
    pub description: String,
    pub link: String,
    pub items: Vec<RssItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RssItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub pub_date: String,
}

#[derive(Debug, Error)]
pub enum RssParseError {
    #[error("malformed xml: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("document has no <channel> element")]
    MissingChannel,
}

/// Parses an RSS 2.0 document.
///
/// Elements are matched on their qualified name, so extensions such as
/// `media:title` or `atom:link` never shadow the plain RSS elements. When an
/// element repeats, the first value is kept.
pub fn parse_rss(xml: &str) -> Result<RssDocument, RssParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut text = String::new();
    let mut channel: Option<RssChannel> = None;
    let mut item: Option<RssItem> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                match (path.last().map(Vec::as_slice), name.as_slice()) {
                    (Some(b"rss"), b"channel") if channel.is_none() => {
                        channel = Some(RssChannel::default());
                    }
                    (Some(b"channel"), b"item") => item = Some(RssItem::default()),
                    _ => {}
                }
                path.push(name);
                text.clear();
            }
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::End(e) => {
                path.pop();
                let name = e.name();
                match (path.last().map(Vec::as_slice), name.as_ref()) {
                    (Some(b"channel"), b"item") => {
                        if let (Some(channel), Some(item)) = (channel.as_mut(), item.take()) {
                            channel.items.push(item);
                        }
                    }
                    (Some(b"item"), field) => {
                        if let Some(item) = item.as_mut() {
                            let slot = match field {
                                b"title" => Some(&mut item.title),
                                b"description" => Some(&mut item.description),
                                b"link" => Some(&mut item.link),
                                b"pubDate" => Some(&mut item.pub_date),
                                _ => None,
                            };
                            fill_once(slot, &text);
                        }
                    }
                    (Some(b"channel"), field) => {
                        if let Some(channel) = channel.as_mut() {
                            let slot = match field {
                                b"title" => Some(&mut channel.title),
                                b"description" => Some(&mut channel.description),
                                b"link" => Some(&mut channel.link),
                                _ => None,
                            };
                            fill_once(slot, &text);
                        }
                    }
                    _ => {}
                }
                text.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    channel
        .map(|channel| RssDocument { channel })
        .ok_or(RssParseError::MissingChannel)
}

fn fill_once(slot: Option<&mut String>, text: &str) {
    if let Some(slot) = slot {
        if slot.is_empty() {
            *slot = text.trim().to_string();
        }
    }
}

/// Strips markup from an item description and collapses whitespace.
pub fn plain_text(fragment: &str) -> String {
    let text = if fragment.contains('<') {
        Html::parse_fragment(fragment)
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        fragment.to_string()
    };
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl RssDocument {
    /// Returns a `Title` and/or `Description` result per item matching `pattern`,
    /// in document order.
    pub fn matches(&self, pattern: &Regex) -> Vec<SearchResult> {
        let mut results = Vec::new();
        for item in &self.channel.items {
            let title = item.title.trim();
            if pattern.is_match(title) {
                results.push(SearchResult::new("Title", title));
            }
            let description = plain_text(&item.description);
            if pattern.is_match(&description) {
                results.push(SearchResult::new("Description", description));
            }
        }
        results
    }
}

/// Searches RSS 2.0 documents fetched over HTTP. The search term is a regular expression.
pub struct RssMatcher {
    fetcher: Box<dyn Fetcher>,
    runtime: tokio::runtime::Runtime,
}

impl RssMatcher {
    pub fn new(settings: FetchSettings) -> io::Result<Self> {
        Self::with_fetcher(ReqwestFetcher::new(settings))
    }

    pub fn with_fetcher(fetcher: impl Fetcher + 'static) -> io::Result<Self> {
        Ok(Self {
            fetcher: Box::new(fetcher),
            runtime: tokio::runtime::Runtime::new()?,
        })
    }

    fn retrieve(&self, feed: &Feed) -> Result<RssDocument, MatchError> {
        let output = self
            .runtime
            .block_on(self.fetcher.fetch(&feed.uri))
            .map_err(|err| MatchError::Source {
                uri: feed.uri.clone(),
                message: err.to_string(),
            })?;
        let decoded = decode_feed(&output.bytes, output.metadata.content_type.as_deref())
            .map_err(|err| MatchError::Parse {
                uri: feed.uri.clone(),
                message: err.to_string(),
            })?;
        parse_rss(&decoded.text).map_err(|err| MatchError::Parse {
            uri: feed.uri.clone(),
            message: err.to_string(),
        })
    }
}

impl Matcher for RssMatcher {
    fn search(&self, feed: &Feed, search_term: &str) -> Result<Vec<SearchResult>, MatchError> {
        let pattern = Regex::new(search_term).map_err(|err| MatchError::InvalidPattern {
            pattern: search_term.to_string(),
            message: err.to_string(),
        })?;
        let document = self.retrieve(feed)?;
        Ok(document.matches(&pattern))
    }
}
