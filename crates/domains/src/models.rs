//! # Domain Models
//!
//! The entities of the hanami client engine. Content identifiers are the
//! collaborator's integer ids; timestamps are UTC and converted to local
//! time only at display boundaries.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Error, Result};

/// The genre tags the platform accepts on forum posts.
pub static VALID_TAGS: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    BTreeSet::from([
        "Action",
        "Adventure",
        "Comedy",
        "Drama",
        "Fantasy",
        "Horror",
        "Mystery",
        "Romance",
        "Sci-Fi",
        "Slice of Life",
        "Sports",
        "Supernatural",
        "General",
    ])
});

/// Which table a reaction or comment hangs off. News items take neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Review,
    Post,
}

/// A (kind, id) handle for content that can be reacted to or commented on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentRef {
    pub kind: ContentKind,
    pub id: i64,
}

impl ContentRef {
    pub fn review(id: i64) -> Self {
        Self { kind: ContentKind::Review, id }
    }

    pub fn post(id: i64) -> Self {
        Self { kind: ContentKind::Post, id }
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ContentKind::Review => write!(f, "review/{}", self.id),
            ContentKind::Post => write!(f, "post/{}", self.id),
        }
    }
}

/// A like or dislike vote. Mutually exclusive per user per item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Like,
    Dislike,
}

/// Per-(user, item) reaction flags, persisted client-side and scoped to the
/// authenticated session. Setting one side clears the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionState {
    pub liked: bool,
    pub disliked: bool,
}

impl ReactionState {
    pub fn is_active(&self, kind: ReactionKind) -> bool {
        match kind {
            ReactionKind::Like => self.liked,
            ReactionKind::Dislike => self.disliked,
        }
    }

    /// Applies a confirmed reaction, enforcing mutual exclusion.
    pub fn apply(&mut self, kind: ReactionKind) {
        match kind {
            ReactionKind::Like => {
                self.liked = true;
                self.disliked = false;
            }
            ReactionKind::Dislike => {
                self.disliked = true;
                self.liked = false;
            }
        }
    }
}

/// Authoritative counters, always sourced from the collaborator response —
/// never computed locally, to avoid drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub likes: u32,
    pub dislikes: u32,
}

impl ReactionCounts {
    /// The popularity score used by feed sorting.
    pub fn net(&self) -> i64 {
        i64::from(self.likes) - i64::from(self.dislikes)
    }
}

/// A catalog review with a 1–10 rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub author: String,
    pub catalog_id: i64,
    pub catalog_title: String,
    pub rating: u8,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub counts: ReactionCounts,
}

/// A forum post. Tags are non-empty by policy and drawn from [`VALID_TAGS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumPost {
    pub id: i64,
    pub author: String,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub counts: ReactionCounts,
}

/// A staff-authored news entry. Not reactable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    pub author: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Heterogeneous feed content. Pattern-match exhaustively when rendering
/// or sorting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentItem {
    Review(Review),
    Post(ForumPost),
    News(NewsItem),
}

impl ContentItem {
    pub fn id(&self) -> i64 {
        match self {
            ContentItem::Review(r) => r.id,
            ContentItem::Post(p) => p.id,
            ContentItem::News(n) => n.id,
        }
    }

    pub fn author(&self) -> &str {
        match self {
            ContentItem::Review(r) => &r.author,
            ContentItem::Post(p) => &p.author,
            ContentItem::News(n) => &n.author,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            ContentItem::Review(r) => r.created_at,
            ContentItem::Post(p) => p.created_at,
            ContentItem::News(n) => n.created_at,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            ContentItem::Review(r) => &r.body,
            ContentItem::Post(p) => &p.body,
            ContentItem::News(n) => &n.body,
        }
    }

    /// News carries no counters and scores zero.
    pub fn counts(&self) -> ReactionCounts {
        match self {
            ContentItem::Review(r) => r.counts,
            ContentItem::Post(p) => p.counts,
            ContentItem::News(_) => ReactionCounts::default(),
        }
    }

    /// Popularity score: likes minus dislikes.
    pub fn score(&self) -> i64 {
        self.counts().net()
    }

    /// The reactable handle, if this variant takes reactions at all.
    pub fn content_ref(&self) -> Option<ContentRef> {
        match self {
            ContentItem::Review(r) => Some(ContentRef::review(r.id)),
            ContentItem::Post(p) => Some(ContentRef::post(p.id)),
            ContentItem::News(_) => None,
        }
    }
}

/// A comment under a review or forum post. Insertion order, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// What a moderation report points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSubject {
    Comment(i64),
    Review(i64),
}

/// The fixed watch-state enumeration. At most one per (user, catalog item).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionStatus {
    Favorites,
    Watching,
    Completed,
    Dropped,
    #[serde(rename = "Plan to Watch")]
    PlanToWatch,
}

impl fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CollectionStatus::Favorites => "Favorites",
            CollectionStatus::Watching => "Watching",
            CollectionStatus::Completed => "Completed",
            CollectionStatus::Dropped => "Dropped",
            CollectionStatus::PlanToWatch => "Plan to Watch",
        };
        f.write_str(name)
    }
}

/// An incoming friend request; the receiver is always the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendRequest {
    pub id: i64,
    pub sender: String,
}

/// How to settle a pending friend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestAction {
    Accept,
    Reject,
}

/// Relationship of the current user to another, as the search UI needs it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    #[default]
    None,
    /// We sent a request that has not been answered.
    Pending,
    /// They sent us a request that we have not answered.
    Requested,
    Friends,
}

/// A bare user search hit from the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserHit {
    pub id: i64,
    pub username: String,
}

/// A confirmed direct message on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

/// Thread identity: the unordered pair of participant usernames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey {
    low: String,
    high: String,
}

impl ConversationKey {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// The participant that is not `me`.
    pub fn peer<'a>(&'a self, me: &str) -> &'a str {
        if self.low == me {
            &self.high
        } else {
            &self.low
        }
    }

    pub fn participants(&self) -> (&str, &str) {
        (&self.low, &self.high)
    }
}

/// A user notification, newest first in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// A catalog card row for the home feed sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub title: String,
    pub score: Option<f32>,
    pub year: Option<u16>,
    pub image_url: Option<String>,
}

/// One content source feeding the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum FeedSource {
    /// Reviews, optionally narrowed to one catalog item.
    Reviews { catalog_id: Option<i64> },
    /// Forum posts, optionally narrowed to one tag.
    Posts { tag: Option<String> },
    News,
}

/// Feed ordering policy. Both sorts are stable so refreshes do not reflow
/// tied items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Descending creation timestamp.
    Recent,
    /// Descending likes minus dislikes.
    Popular,
}

/// One paginated, sorted view over merged content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
}

/// A display slot in a fixed-width home section. Padding is a presentation
/// contract only and is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "slot", rename_all = "snake_case")]
pub enum Slot<T> {
    Filled(T),
    Placeholder,
}

impl<T> Slot<T> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Slot::Placeholder)
    }
}

/// The bounded section queries backing the home feed, as returned by the
/// collaborator in one round-trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomeSections {
    pub top_rated: Vec<CatalogEntry>,
    pub most_popular: Vec<CatalogEntry>,
    pub recent_reviews: Vec<Review>,
    pub recent_posts: Vec<ForumPost>,
}

/// A validated review submission. Construction is the validation boundary:
/// a draft that exists is a draft that may go on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewDraft {
    pub catalog_id: i64,
    pub text: String,
    pub rating: u8,
}

impl ReviewDraft {
    pub fn new(catalog_id: i64, text: impl Into<String>, rating: u8) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::Validation("review text cannot be empty".into()));
        }
        if !(1..=10).contains(&rating) {
            return Err(Error::Validation(format!(
                "rating must be between 1 and 10, got {rating}"
            )));
        }
        Ok(Self { catalog_id, text, rating })
    }
}

/// A validated forum post submission. At least one tag, all from the
/// platform genre set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

impl PostDraft {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<Self> {
        let title = title.into();
        let body = body.into();
        if title.trim().is_empty() {
            return Err(Error::Validation("post title cannot be empty".into()));
        }
        if body.trim().is_empty() {
            return Err(Error::Validation("post body cannot be empty".into()));
        }
        if tags.is_empty() {
            return Err(Error::Validation("at least one genre tag is required".into()));
        }
        if let Some(bad) = tags.iter().find(|t| !VALID_TAGS.contains(t.as_str())) {
            return Err(Error::Validation(format!("unknown genre tag: {bad}")));
        }
        Ok(Self { title, body, tags })
    }
}
