use std::sync::mpsc::{self, SyncSender};
use std::thread::{self, ScopedJoinHandle};

use feed_search_core::{Feed, Matcher, MatcherRegistry, SearchResult, SessionState};
use search_logging::{search_debug, search_error, search_info, search_warn};

use crate::{FeedSource, ResultSink, SearchError};

/// Tally of one completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub feeds: usize,
    pub results: usize,
    pub failed_feeds: usize,
    pub sink_failures: usize,
    pub state: SessionState,
}

enum WorkerOutcome {
    Completed { sent: usize },
    Failed,
}

/// Fans a search out to one worker thread per feed and drains their results.
pub struct Dispatcher {
    registry: MatcherRegistry,
    source: Box<dyn FeedSource>,
}

impl Dispatcher {
    pub fn new(registry: MatcherRegistry, source: impl FeedSource + 'static) -> Self {
        Self {
            registry,
            source: Box::new(source),
        }
    }

    pub fn registry(&self) -> &MatcherRegistry {
        &self.registry
    }

    /// Runs one search session.
    ///
    /// Results are handed to `sink` in arrival order. Only an empty term or a
    /// feed list that cannot be loaded fails the session; matcher errors are
    /// logged and the feed contributes nothing.
    ///
    /// There is no timeout: a matcher that never returns keeps the session open.
    pub fn run(
        &self,
        search_term: &str,
        sink: &mut dyn ResultSink,
    ) -> Result<SessionSummary, SearchError> {
        if search_term.is_empty() {
            return Err(SearchError::EmptySearchTerm);
        }

        let mut session = Session::default();
        let feeds = match self.source.retrieve_feeds() {
            Ok(feeds) => feeds,
            Err(err) => {
                session.enter(SessionState::Failed);
                search_error!("Failed to load feeds: {}", err);
                return Err(err.into());
            }
        };
        session.enter(SessionState::FeedsLoaded);
        search_info!(
            "Searching {} feeds for {:?}",
            feeds.len(),
            search_term
        );

        let mut summary = SessionSummary {
            feeds: feeds.len(),
            results: 0,
            failed_feeds: 0,
            sink_failures: 0,
            state: SessionState::Idle,
        };

        // Zero capacity: every send waits for the receive below.
        let (result_tx, result_rx) = mpsc::sync_channel::<SearchResult>(0);
        let feeds = feeds.as_slice();

        thread::scope(|scope| {
            session.enter(SessionState::Dispatching);
            let workers: Vec<_> = feeds
                .iter()
                .map(|feed| {
                    let matcher = self.registry.lookup(&feed.feed_type);
                    let result_tx = result_tx.clone();
                    scope.spawn(move || search_feed(matcher, feed, search_term, result_tx))
                })
                .collect();

            // Owns the last sender, so the channel closes only after every worker is done.
            let coordinator = scope.spawn(move || {
                let failed = await_workers(feeds, workers);
                drop(result_tx);
                failed
            });

            session.enter(SessionState::Draining);
            for result in result_rx {
                summary.results += 1;
                if let Err(err) = sink.display(&result) {
                    summary.sink_failures += 1;
                    search_error!("Failed to display result: {}", err);
                }
            }

            match coordinator.join() {
                Ok(failed) => summary.failed_feeds = failed,
                Err(_) => search_error!("Worker coordinator panicked"),
            }
        });

        session.enter(SessionState::Done);
        summary.state = session.state;
        search_info!(
            "Search finished: {} results from {} feeds ({} failed)",
            summary.results,
            summary.feeds,
            summary.failed_feeds
        );
        Ok(summary)
    }
}

fn search_feed(
    matcher: &dyn Matcher,
    feed: &Feed,
    search_term: &str,
    result_tx: SyncSender<SearchResult>,
) -> WorkerOutcome {
    let results = match matcher.search(feed, search_term) {
        Ok(results) => results,
        Err(err) => {
            search_warn!("Feed {} failed: {}", feed.name, err);
            return WorkerOutcome::Failed;
        }
    };

    let mut sent = 0;
    for result in results {
        if result_tx.send(result).is_err() {
            search_warn!("Result receiver closed while feed {} was sending", feed.name);
            break;
        }
        sent += 1;
    }
    WorkerOutcome::Completed { sent }
}

/// Joins every worker and returns how many of them failed. A panicking matcher counts as failed.
fn await_workers(feeds: &[Feed], workers: Vec<ScopedJoinHandle<'_, WorkerOutcome>>) -> usize {
    let mut failed = 0;
    for (feed, worker) in feeds.iter().zip(workers) {
        match worker.join() {
            Ok(WorkerOutcome::Completed { sent }) => {
                search_debug!("Feed {} completed with {} results", feed.name, sent);
            }
            Ok(WorkerOutcome::Failed) => failed += 1,
            Err(_) => {
                search_error!("Matcher for feed {} panicked", feed.name);
                failed += 1;
            }
        }
    }
    failed
}

#[derive(Default)]
struct Session {
    state: SessionState,
}

impl Session {
    fn enter(&mut self, next: SessionState) {
        match self.state.advance(next) {
            Ok(state) => {
                search_debug!("Session {:?} -> {:?}", self.state, state);
                self.state = state;
            }
            Err(err) => search_error!("{}", err),
        }
    }
}
