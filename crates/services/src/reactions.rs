//! # Reaction Tracker
//!
//! Mutual-exclusion like/dislike state per content item. Local flags and
//! counters update only after the collaborator confirms the write; counts
//! always come from the server response, never from local arithmetic, so
//! the optimistic and authoritative views cannot drift.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use domains::{ContentRef, Error, ReactionCounts, ReactionKind, ReactionState, Result, SocialApi};
use tracing::{debug, warn};

use crate::session::Session;

#[derive(Default)]
struct ReactionMap {
    /// itemId -> ReactionState, scoped to the session, cleared on logout.
    flags: HashMap<ContentRef, ReactionState>,
    /// Last counters confirmed by the collaborator.
    counts: HashMap<ContentRef, ReactionCounts>,
    /// Items with an unsettled reaction request. One per item at a time;
    /// different items may be in flight concurrently.
    in_flight: HashSet<ContentRef>,
}

pub struct ReactionTracker {
    api: Arc<dyn SocialApi>,
    session: Session,
    inner: Mutex<ReactionMap>,
}

impl ReactionTracker {
    pub fn new(api: Arc<dyn SocialApi>, session: Session) -> Self {
        Self { api, session, inner: Mutex::new(ReactionMap::default()) }
    }

    /// Records a reaction and returns the authoritative counters.
    ///
    /// Reapplying the active kind is an idempotent no-op that issues no
    /// remote call. Switching kinds clears the opposite counter server-side
    /// within the same operation. On any remote failure no local state
    /// changes and the error is surfaced to the caller.
    pub async fn react(&self, target: ContentRef, kind: ReactionKind) -> Result<ReactionCounts> {
        {
            let mut map = self.inner.lock().expect("reaction state poisoned");
            if map.in_flight.contains(&target) {
                return Err(Error::InFlight(target.id));
            }
            let state = map.flags.get(&target).copied().unwrap_or_default();
            if state.is_active(kind) {
                debug!(user = %self.session.username, item = %target, ?kind,
                       "reaction already active, skipping remote call");
                return Ok(map.counts.get(&target).copied().unwrap_or_default());
            }
            map.in_flight.insert(target);
        }

        let outcome = self.api.react(target, kind).await;

        let mut map = self.inner.lock().expect("reaction state poisoned");
        map.in_flight.remove(&target);
        match outcome {
            Ok(counts) => {
                map.flags.entry(target).or_default().apply(kind);
                map.counts.insert(target, counts);
                debug!(user = %self.session.username, item = %target, ?kind,
                       likes = counts.likes, dislikes = counts.dislikes, "reaction confirmed");
                Ok(counts)
            }
            Err(err) => {
                warn!(item = %target, ?kind, %err, "reaction failed, state unchanged");
                Err(err)
            }
        }
    }

    /// Seeds counters from a feed load so the no-op path can answer with
    /// the latest known numbers.
    pub fn prime(&self, target: ContentRef, counts: ReactionCounts) {
        let mut map = self.inner.lock().expect("reaction state poisoned");
        map.counts.insert(target, counts);
    }

    pub fn state(&self, target: ContentRef) -> ReactionState {
        let map = self.inner.lock().expect("reaction state poisoned");
        map.flags.get(&target).copied().unwrap_or_default()
    }

    pub fn counts(&self, target: ContentRef) -> Option<ReactionCounts> {
        let map = self.inner.lock().expect("reaction state poisoned");
        map.counts.get(&target).copied()
    }

    /// The persistable flag map. The host stores this across sessions and
    /// feeds it back through [`restore`](Self::restore) at login.
    pub fn snapshot(&self) -> HashMap<ContentRef, ReactionState> {
        let map = self.inner.lock().expect("reaction state poisoned");
        map.flags.clone()
    }

    pub fn restore(&self, flags: HashMap<ContentRef, ReactionState>) {
        let mut map = self.inner.lock().expect("reaction state poisoned");
        map.flags = flags;
    }

    /// Invalidates all per-user reaction state. Called on logout.
    pub fn clear(&self) {
        let mut map = self.inner.lock().expect("reaction state poisoned");
        map.flags.clear();
        map.counts.clear();
    }
}
