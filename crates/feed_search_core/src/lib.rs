//! Feed search core: data model, matcher capability and the frozen matcher registry.
mod feed;
mod matcher;
mod registry;
mod session;

pub use feed::{Feed, FeedType, SearchResult};
pub use matcher::{DefaultMatcher, MatchError, Matcher};
pub use registry::{MatcherRegistry, MatcherRegistryBuilder, RegistryError};
pub use session::{InvalidTransition, SessionState};
