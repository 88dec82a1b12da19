use feed_search_core::{Feed, FeedType, MatchError, Matcher, SearchResult};
use feed_search_engine::{
    parse_rss, plain_text, FetchError, FetchMetadata, FetchOutput, FetchSettings, Fetcher,
    RssItem, RssMatcher, RssParseError,
};
use pretty_assertions::assert_eq;
use regex::Regex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WORLD_NEWS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
<channel>
  <title>World News</title>
  <link>http://news.example/</link>
  <description>Top stories</description>
  <item>
    <title>President signs budget</title>
    <link>http://news.example/1</link>
    <description><![CDATA[<p>The <b>president</b> signed the budget on Tuesday.</p>]]></description>
    <pubDate>Tue, 10 Jun 2025 04:00:00 GMT</pubDate>
  </item>
  <item>
    <title>Markets rally</title>
    <description>Stocks closed higher.</description>
  </item>
  <item>
    <title>Election season begins</title>
    <description>Candidates meet the president of the league &amp; fans.</description>
  </item>
</channel>
</rss>"#;

/// Serves a fixed body without touching the network.
struct StaticFetcher {
    body: Vec<u8>,
    content_type: Option<&'static str>,
}

#[async_trait::async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        Ok(FetchOutput {
            bytes: self.body.clone(),
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url: url.to_string(),
                redirect_count: 0,
                content_type: self.content_type.map(str::to_string),
                byte_len: self.body.len() as u64,
            },
        })
    }
}

/// Starts a mock server hosting `body` at `/rss`. The returned runtime must outlive the server.
fn serve(status: u16, body: &str) -> (tokio::runtime::Runtime, MockServer) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss"))
            .respond_with(
                ResponseTemplate::new(status).set_body_raw(body.to_string(), "application/rss+xml"),
            )
            .mount(&server)
            .await;
        server
    });
    (runtime, server)
}

fn rss_feed(uri: String) -> Feed {
    Feed::new("world", uri, FeedType::Rss)
}

#[test]
fn parses_channel_and_items() {
    let document = parse_rss(WORLD_NEWS).unwrap();
    assert_eq!(document.channel.title, "World News");
    assert_eq!(document.channel.link, "http://news.example/");
    assert_eq!(document.channel.description, "Top stories");
    assert_eq!(document.channel.items.len(), 3);

    let first = &document.channel.items[0];
    assert_eq!(first.title, "President signs budget");
    assert_eq!(first.link, "http://news.example/1");
    assert_eq!(first.pub_date, "Tue, 10 Jun 2025 04:00:00 GMT");
    assert!(first.description.contains("<b>president</b>"));

    assert_eq!(document.channel.items[1].link, "");
}

#[test]
fn namespaced_elements_do_not_shadow_plain_ones() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/" xmlns:atom="http://www.w3.org/2005/Atom">
<channel>
  <title>Politics</title>
  <atom:link href="http://news.example/politics.rss" rel="self" type="application/rss+xml"/>
  <link>http://news.example/politics</link>
  <atom:link>http://news.example/alternate</atom:link>
  <item>
    <media:title>Photo: podium</media:title>
    <title>President addresses the nation</title>
    <media:description>Caption text</media:description>
    <description>The president spoke for an hour.</description>
    <atom:link href="http://news.example/amp/1"/>
    <link>http://news.example/1</link>
    <media:group><media:title>Nested</media:title></media:group>
  </item>
</channel>
</rss>"#;

    let document = parse_rss(xml).unwrap();

    assert_eq!(document.channel.title, "Politics");
    assert_eq!(document.channel.link, "http://news.example/politics");
    assert_eq!(
        document.channel.items,
        vec![RssItem {
            title: "President addresses the nation".into(),
            description: "The president spoke for an hour.".into(),
            link: "http://news.example/1".into(),
            pub_date: String::new(),
        }]
    );
    assert_eq!(
        document.matches(&Regex::new("[Pp]resident").unwrap()),
        vec![
            SearchResult::new("Title", "President addresses the nation"),
            SearchResult::new("Description", "The president spoke for an hour."),
        ]
    );
}

#[test]
fn repeated_item_elements_keep_the_first_value() {
    let xml = "<rss><channel><item><title>first</title><title>second</title></item></channel></rss>";
    let document = parse_rss(xml).unwrap();
    assert_eq!(document.channel.items[0].title, "first");
}

#[test]
fn document_without_channel_is_an_error() {
    let err = parse_rss("<feed><entry><title>atom</title></entry></feed>").unwrap_err();
    assert!(matches!(err, RssParseError::MissingChannel), "{err:?}");
}

#[test]
fn malformed_xml_is_an_error() {
    assert!(parse_rss("<rss><channel><item><title>oops</channel></rss>").is_err());
}

#[test]
fn plain_text_strips_markup_and_collapses_whitespace() {
    assert_eq!(
        plain_text("<p>The <b>president</b>\n   spoke.</p>"),
        "The president spoke."
    );
    assert_eq!(plain_text("  already   plain "), "already plain");
}

#[test]
fn matches_titles_and_descriptions_in_document_order() {
    let document = parse_rss(WORLD_NEWS).unwrap();

    let results = document.matches(&Regex::new("(?i)president").unwrap());
    assert_eq!(
        results,
        vec![
            SearchResult::new("Title", "President signs budget"),
            SearchResult::new("Description", "The president signed the budget on Tuesday."),
            SearchResult::new(
                "Description",
                "Candidates meet the president of the league & fans."
            ),
        ]
    );

    assert!(document.matches(&Regex::new("weather").unwrap()).is_empty());
}

#[test]
fn rss_matcher_searches_served_feed() {
    let (_runtime, server) = serve(200, WORLD_NEWS);
    let matcher = RssMatcher::new(FetchSettings::default()).unwrap();

    let results = matcher
        .search(&rss_feed(format!("{}/rss", server.uri())), "Election")
        .unwrap();

    assert_eq!(
        results,
        vec![SearchResult::new("Title", "Election season begins")]
    );
}

#[test]
fn rss_matcher_reports_http_errors() {
    let (_runtime, server) = serve(404, "");
    let matcher = RssMatcher::new(FetchSettings::default()).unwrap();
    let uri = format!("{}/rss", server.uri());

    let err = matcher.search(&rss_feed(uri.clone()), "president").unwrap_err();

    match err {
        MatchError::Source { uri: failed, message } => {
            assert_eq!(failed, uri);
            assert!(message.contains("http status 404"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rss_matcher_reports_unparseable_documents() {
    let (_runtime, server) = serve(200, "<rss><channel><item></rss>");
    let matcher = RssMatcher::new(FetchSettings::default()).unwrap();

    let err = matcher
        .search(&rss_feed(format!("{}/rss", server.uri())), "president")
        .unwrap_err();

    assert!(matches!(err, MatchError::Parse { .. }), "{err:?}");
}

#[test]
fn rss_matcher_rejects_invalid_pattern_before_fetching() {
    let matcher = RssMatcher::with_fetcher(StaticFetcher {
        body: WORLD_NEWS.as_bytes().to_vec(),
        content_type: None,
    })
    .unwrap();

    let err = matcher
        .search(&rss_feed("http://news.example/rss".into()), "(unclosed")
        .unwrap_err();

    assert!(matches!(err, MatchError::InvalidPattern { .. }), "{err:?}");
}

#[test]
fn rss_matcher_honours_declared_encoding() {
    let mut body = br#"<?xml version="1.0" encoding="ISO-8859-1"?>
<rss version="2.0"><channel><title>Le Monde</title>
<item><title>Le pr"#
        .to_vec();
    body.push(0xe9); // é in latin-1
    body.extend_from_slice(b"sident parle</title></item></channel></rss>");

    let matcher = RssMatcher::with_fetcher(StaticFetcher {
        body,
        content_type: Some("application/xml"),
    })
    .unwrap();

    let results = matcher
        .search(&rss_feed("http://lemonde.example/rss".into()), "président")
        .unwrap();

    assert_eq!(
        results,
        vec![SearchResult::new("Title", "Le président parle")]
    );
}

#[test]
fn rss_matcher_fails_on_missing_uri() {
    let matcher = RssMatcher::new(FetchSettings::default()).unwrap();

    let err = matcher.search(&rss_feed(String::new()), "president").unwrap_err();

    assert!(matches!(err, MatchError::Source { .. }), "{err:?}");
}
