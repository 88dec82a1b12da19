use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::{DefaultMatcher, FeedType, Matcher};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("matcher already registered for feed type {0}")]
    DuplicateMatcher(FeedType),
}

/// Collects matchers during startup. Call [`MatcherRegistryBuilder::build`] to
/// freeze the set before dispatching any search.
#[derive(Default)]
pub struct MatcherRegistryBuilder {
    matchers: HashMap<FeedType, Box<dyn Matcher>>,
}

impl MatcherRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `matcher` for `feed_type`.
    ///
    /// A second registration for the same type is rejected and the first one
    /// stays in effect.
    pub fn register(
        &mut self,
        feed_type: FeedType,
        matcher: impl Matcher + 'static,
    ) -> Result<&mut Self, RegistryError> {
        if self.matchers.contains_key(&feed_type) {
            return Err(RegistryError::DuplicateMatcher(feed_type));
        }
        self.matchers.insert(feed_type, Box::new(matcher));
        Ok(self)
    }

    pub fn build(self) -> MatcherRegistry {
        MatcherRegistry {
            matchers: self.matchers,
            fallback: DefaultMatcher,
        }
    }
}

/// Read-only mapping from feed type to matcher.
///
/// There is no way to mutate a built registry, so lookups from many worker
/// threads need no locking.
pub struct MatcherRegistry {
    matchers: HashMap<FeedType, Box<dyn Matcher>>,
    fallback: DefaultMatcher,
}

impl MatcherRegistry {
    pub fn builder() -> MatcherRegistryBuilder {
        MatcherRegistryBuilder::new()
    }

    /// Returns the matcher for `feed_type`, or the no-op [`DefaultMatcher`].
    pub fn lookup(&self, feed_type: &FeedType) -> &dyn Matcher {
        match self.matchers.get(feed_type) {
            Some(matcher) => matcher.as_ref(),
            None => &self.fallback,
        }
    }

    pub fn is_registered(&self, feed_type: &FeedType) -> bool {
        self.matchers.contains_key(feed_type)
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl fmt::Debug for MatcherRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<String> = self.matchers.keys().map(ToString::to_string).collect();
        types.sort();
        f.debug_struct("MatcherRegistry")
            .field("feed_types", &types)
            .finish()
    }
}
