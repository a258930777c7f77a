//! # Port: the remote collaborator
//!
//! The engine consumes the platform backend through this trait — a typed
//! RPC boundary, not an HTTP contract. Adapters implement it; every service
//! component takes it as `Arc<dyn SocialApi>`.
//!
//! All calls carry the ambient session credential; that is the adapter's
//! concern, not the caller's.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    CollectionStatus, Comment, ContentItem, ContentRef, FeedSource, FriendRequest, HomeSections,
    Message, NewsItem, Notification, PostDraft, ReactionCounts, ReactionKind, ReportSubject,
    RequestAction, ReviewDraft, UserHit,
};

/// Request/response contract with the platform backend.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SocialApi: Send + Sync {
    // Reactions
    /// Records a like or dislike and returns the authoritative counters.
    async fn react(&self, target: ContentRef, kind: ReactionKind) -> Result<ReactionCounts>;

    // Comment threads
    async fn list_comments(&self, target: ContentRef) -> Result<Vec<Comment>>;
    /// Returns the stored comment with its authoritative id and timestamp.
    async fn post_comment(&self, target: ContentRef, text: &str) -> Result<Comment>;
    async fn report(&self, subject: ReportSubject) -> Result<String>;

    // Feed sources
    /// One bounded batch per source; the aggregator merges and paginates.
    async fn fetch_source(&self, source: &FeedSource) -> Result<Vec<ContentItem>>;
    async fn fetch_home(&self) -> Result<HomeSections>;
    async fn fetch_news(&self, limit: u32) -> Result<Vec<NewsItem>>;

    // Publishing
    async fn submit_review(&self, draft: &ReviewDraft) -> Result<String>;
    async fn create_post(&self, draft: &PostDraft) -> Result<String>;

    // Collection
    async fn set_collection_status(
        &self,
        catalog_id: i64,
        status: CollectionStatus,
    ) -> Result<String>;

    // Friendships
    async fn send_friend_request(&self, target: &str) -> Result<String>;
    async fn list_friend_requests(&self) -> Result<Vec<FriendRequest>>;
    /// Settles a pending request addressed to the current user.
    async fn respond_friend_request(&self, request_id: i64, action: RequestAction) -> Result<()>;
    async fn list_friends(&self) -> Result<Vec<String>>;
    async fn search_users(&self, query: &str) -> Result<Vec<UserHit>>;

    // Messaging
    async fn list_conversation(&self, peer: &str) -> Result<Vec<Message>>;
    async fn send_message(&self, peer: &str, text: &str) -> Result<()>;

    // Notifications
    async fn list_notifications(&self) -> Result<Vec<Notification>>;
    async fn mark_notifications_read(&self) -> Result<()>;
}
