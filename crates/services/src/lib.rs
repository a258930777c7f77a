//! # services
//!
//! The client-side social engine: reaction tracking, comment threads, feed
//! aggregation, collection status, friendships, messaging, publishing and
//! notifications. Every component consumes the collaborator through the
//! `domains::SocialApi` port and holds its own state behind a mutex that is
//! never locked across a remote call.

pub mod collection;
pub mod comments;
pub mod feed;
pub mod friends;
pub mod messages;
pub mod notifications;
pub mod publishing;
pub mod reactions;
pub mod session;

pub use collection::CollectionTracker;
pub use comments::CommentThreads;
pub use feed::{FeedAggregator, HomeFeed, SECTION_WIDTH};
pub use friends::{Friendships, SearchResult};
pub use messages::{DateGroup, Delivery, LocalMessage, MessageThreads};
pub use notifications::Notifications;
pub use publishing::Publisher;
pub use reactions::ReactionTracker;
pub use session::Session;
