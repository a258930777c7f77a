//! # Friend Relationship State Machine
//!
//! None → RequestSent → Friends (accept) or back to None (reject). Only one
//! pending request may exist per unordered user pair, and invalid
//! transitions fail with a domain error before any remote call.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use domains::{
    Error, FriendRequest, RelationshipStatus, RequestAction, Result, SocialApi, UserHit,
};
use tracing::{debug, warn};

use crate::session::Session;

#[derive(Default)]
struct FriendState {
    friends: BTreeSet<String>,
    /// Usernames we sent a request to that has not been answered.
    pending_sent: BTreeSet<String>,
    /// Requests addressed to the current user.
    pending_received: Vec<FriendRequest>,
}

/// A search hit annotated with the current relationship, so the UI can
/// never offer "Add Friend" for a non-None pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub id: i64,
    pub username: String,
    pub status: RelationshipStatus,
}

pub struct Friendships {
    api: Arc<dyn SocialApi>,
    session: Session,
    inner: Mutex<FriendState>,
}

impl Friendships {
    pub fn new(api: Arc<dyn SocialApi>, session: Session) -> Self {
        Self { api, session, inner: Mutex::new(FriendState::default()) }
    }

    /// Reloads the friend list and the pending request inbox.
    pub async fn refresh(&self) -> Result<()> {
        let (friends, requests) =
            futures::join!(self.api.list_friends(), self.api.list_friend_requests());
        let friends = friends?;
        let requests = requests?;

        let mut state = self.inner.lock().expect("friend state poisoned");
        state.friends = friends.into_iter().collect();
        state.pending_received = requests;
        Ok(())
    }

    /// Sends a friend request. Valid only from the `None` state: requests
    /// to oneself, to an existing friend, or to a pair with a pending
    /// request fail locally without touching the network.
    pub async fn send_request(&self, target: &str) -> Result<String> {
        if target == self.session.username {
            return Err(Error::Validation("you cannot friend yourself".into()));
        }
        {
            let state = self.inner.lock().expect("friend state poisoned");
            if state.friends.contains(target) {
                return Err(Error::Conflict(format!("already friends with {target}")));
            }
            if state.pending_sent.contains(target) {
                return Err(Error::Conflict(format!("friend request to {target} already sent")));
            }
            if state.pending_received.iter().any(|r| r.sender == target) {
                return Err(Error::Conflict(format!("{target} already sent you a request")));
            }
        }

        let message = self.api.send_friend_request(target).await?;
        let mut state = self.inner.lock().expect("friend state poisoned");
        state.pending_sent.insert(target.to_string());
        debug!(user = %self.session.username, target, "friend request sent");
        Ok(message)
    }

    /// Accepts or rejects a pending request addressed to the current user.
    /// The request leaves the pending list regardless of which way it was
    /// settled; accepting also records the friendship.
    pub async fn respond(&self, request_id: i64, action: RequestAction) -> Result<()> {
        let sender = {
            let state = self.inner.lock().expect("friend state poisoned");
            state
                .pending_received
                .iter()
                .find(|r| r.id == request_id)
                .map(|r| r.sender.clone())
                .ok_or_else(|| Error::NotFound(format!("friend request {request_id}")))?
        };

        self.api.respond_friend_request(request_id, action).await?;

        let mut state = self.inner.lock().expect("friend state poisoned");
        state.pending_received.retain(|r| r.id != request_id);
        if action == RequestAction::Accept {
            state.friends.insert(sender.clone());
            debug!(user = %self.session.username, friend = %sender, "friend request accepted");
        } else {
            debug!(user = %self.session.username, sender = %sender, "friend request rejected");
        }
        Ok(())
    }

    /// Searches users and annotates each hit with the relationship status
    /// known to this client.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let hits = match self.api.search_users(query).await {
            Ok(hits) => hits,
            Err(err) => {
                warn!(query, %err, "user search failed");
                return Err(err);
            }
        };
        Ok(hits
            .into_iter()
            .map(|UserHit { id, username }| {
                let status = self.status_of(&username);
                SearchResult { id, username, status }
            })
            .collect())
    }

    /// Relationship of the current user to `username`, from local state.
    pub fn status_of(&self, username: &str) -> RelationshipStatus {
        let state = self.inner.lock().expect("friend state poisoned");
        if state.friends.contains(username) {
            RelationshipStatus::Friends
        } else if state.pending_sent.contains(username) {
            RelationshipStatus::Pending
        } else if state.pending_received.iter().any(|r| r.sender == username) {
            RelationshipStatus::Requested
        } else {
            RelationshipStatus::None
        }
    }

    pub fn friends(&self) -> Vec<String> {
        let state = self.inner.lock().expect("friend state poisoned");
        state.friends.iter().cloned().collect()
    }

    pub fn pending_requests(&self) -> Vec<FriendRequest> {
        let state = self.inner.lock().expect("friend state poisoned");
        state.pending_received.clone()
    }
}
