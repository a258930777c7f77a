//! # Comment Thread Manager
//!
//! Append-only comment lists per content item, lazily loaded and cached by
//! item handle. Posting appends the server-returned comment (authoritative
//! id and timestamp), never the client draft.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use domains::{Comment, ContentRef, Error, ReportSubject, Result, SocialApi};
use tracing::{debug, warn};

pub struct CommentThreads {
    api: Arc<dyn SocialApi>,
    /// Explicit cache entity keyed by item handle. Invalidated on demand,
    /// kept current on own posts by appending the confirmed comment.
    cache: Mutex<HashMap<ContentRef, Vec<Comment>>>,
}

impl CommentThreads {
    pub fn new(api: Arc<dyn SocialApi>) -> Self {
        Self { api, cache: Mutex::new(HashMap::new()) }
    }

    /// Loads the thread for `target`, oldest first. Idempotent: a second
    /// call for an already-loaded thread answers from the cache without a
    /// remote call.
    pub async fn load_comments(&self, target: ContentRef) -> Result<Vec<Comment>> {
        if let Some(cached) = self.cached(target) {
            debug!(item = %target, "comment thread served from cache");
            return Ok(cached);
        }
        let comments = self.api.list_comments(target).await?;
        let mut cache = self.cache.lock().expect("comment cache poisoned");
        cache.insert(target, comments.clone());
        Ok(comments)
    }

    /// Posts a comment and appends the stored form to the cached thread,
    /// preserving insertion order. Blank text is rejected locally and never
    /// reaches the network.
    pub async fn post_comment(&self, target: ContentRef, text: &str) -> Result<Comment> {
        if text.trim().is_empty() {
            return Err(Error::Validation("comment cannot be empty".into()));
        }
        let comment = self.api.post_comment(target, text).await?;
        let mut cache = self.cache.lock().expect("comment cache poisoned");
        if let Some(thread) = cache.get_mut(&target) {
            thread.push(comment.clone());
        }
        Ok(comment)
    }

    /// Fire-and-forget moderation report. Failure is surfaced to the user
    /// and never retried automatically.
    pub async fn report(&self, subject: ReportSubject) -> Result<String> {
        match self.api.report(subject).await {
            Ok(message) => Ok(message),
            Err(err) => {
                warn!(?subject, %err, "report failed");
                Err(err)
            }
        }
    }

    pub fn is_loaded(&self, target: ContentRef) -> bool {
        self.cache.lock().expect("comment cache poisoned").contains_key(&target)
    }

    /// Drops the cached thread so the next load refetches.
    pub fn invalidate(&self, target: ContentRef) {
        self.cache.lock().expect("comment cache poisoned").remove(&target);
    }

    fn cached(&self, target: ContentRef) -> Option<Vec<Comment>> {
        self.cache.lock().expect("comment cache poisoned").get(&target).cloned()
    }
}
