//! # Message Thread Manager
//!
//! Ordered, date-grouped conversation logs with optimistic send. This is
//! the one optimistic path in the engine: a sent message appears
//! immediately as `Pending`, then settles to `Sent` or `Failed`. Failed
//! sends stay visible and can be retried explicitly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, NaiveDate, Utc};
use domains::{ConversationKey, Error, Message, Result, SocialApi};
use tracing::{debug, warn};

use crate::session::Session;

/// Delivery state of a locally known message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Optimistically appended; the remote write has not settled.
    Pending,
    Sent,
    /// The remote write failed; the bubble keeps a retry affordance.
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalMessage {
    pub local_id: u64,
    pub sender: String,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    pub delivery: Delivery,
}

/// One calendar date (local time) worth of messages, ascending by
/// timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub messages: Vec<LocalMessage>,
}

#[derive(Default)]
struct ThreadMap {
    threads: HashMap<ConversationKey, Vec<LocalMessage>>,
    next_local_id: u64,
}

pub struct MessageThreads {
    api: Arc<dyn SocialApi>,
    session: Session,
    inner: Mutex<ThreadMap>,
}

impl MessageThreads {
    pub fn new(api: Arc<dyn SocialApi>, session: Session) -> Self {
        Self { api, session, inner: Mutex::new(ThreadMap::default()) }
    }

    fn key(&self, peer: &str) -> ConversationKey {
        ConversationKey::new(self.session.username.clone(), peer)
    }

    /// Fetches the confirmed history for a conversation, replacing the
    /// local copy but keeping unconfirmed (pending/failed) local sends.
    pub async fn load_thread(&self, peer: &str) -> Result<Vec<LocalMessage>> {
        let history = self.api.list_conversation(peer).await?;

        let mut map = self.inner.lock().expect("thread state poisoned");
        let key = self.key(peer);
        let unconfirmed: Vec<LocalMessage> = map
            .threads
            .remove(&key)
            .unwrap_or_default()
            .into_iter()
            .filter(|m| m.delivery != Delivery::Sent)
            .collect();

        let mut thread: Vec<LocalMessage> = history
            .into_iter()
            .map(|Message { sender, text, sent_at }| {
                map.next_local_id += 1;
                LocalMessage {
                    local_id: map.next_local_id,
                    sender,
                    text,
                    sent_at,
                    delivery: Delivery::Sent,
                }
            })
            .collect();
        thread.extend(unconfirmed);

        map.threads.insert(key.clone(), thread.clone());
        Ok(thread)
    }

    /// Optimistically appends and sends a message. The bubble exists before
    /// the remote write settles; on failure it is marked `Failed` (and the
    /// error surfaced) rather than silently kept as sent.
    pub async fn send(&self, peer: &str, text: &str) -> Result<u64> {
        if text.trim().is_empty() {
            return Err(Error::Validation("message cannot be empty".into()));
        }

        let key = self.key(peer);
        let local_id = {
            let mut map = self.inner.lock().expect("thread state poisoned");
            map.next_local_id += 1;
            let local_id = map.next_local_id;
            map.threads.entry(key.clone()).or_default().push(LocalMessage {
                local_id,
                sender: self.session.username.clone(),
                text: text.to_string(),
                sent_at: Utc::now(),
                delivery: Delivery::Pending,
            });
            local_id
        };

        match self.api.send_message(peer, text).await {
            Ok(()) => {
                self.mark(&key, local_id, Delivery::Sent);
                debug!(peer, local_id, "message confirmed");
                Ok(local_id)
            }
            Err(err) => {
                self.mark(&key, local_id, Delivery::Failed);
                warn!(peer, local_id, %err, "message send failed, marked for retry");
                Err(err)
            }
        }
    }

    /// Retries a failed send in place. The message keeps its position and
    /// local id; only its delivery state changes.
    pub async fn retry(&self, peer: &str, local_id: u64) -> Result<()> {
        let key = self.key(peer);
        let text = {
            let mut map = self.inner.lock().expect("thread state poisoned");
            let thread = map
                .threads
                .get_mut(&key)
                .ok_or_else(|| Error::NotFound(format!("conversation with {peer}")))?;
            let msg = thread
                .iter_mut()
                .find(|m| m.local_id == local_id && m.delivery == Delivery::Failed)
                .ok_or_else(|| Error::NotFound(format!("failed message {local_id}")))?;
            msg.delivery = Delivery::Pending;
            msg.text.clone()
        };

        match self.api.send_message(peer, &text).await {
            Ok(()) => {
                self.mark(&key, local_id, Delivery::Sent);
                Ok(())
            }
            Err(err) => {
                self.mark(&key, local_id, Delivery::Failed);
                Err(err)
            }
        }
    }

    pub fn thread(&self, peer: &str) -> Vec<LocalMessage> {
        let map = self.inner.lock().expect("thread state poisoned");
        map.threads.get(&self.key(peer)).cloned().unwrap_or_default()
    }

    /// The display form: grouped by calendar date in local time, dates
    /// ascending, each group internally ascending by timestamp.
    pub fn grouped(&self, peer: &str) -> Vec<DateGroup> {
        let mut messages = self.thread(peer);
        messages.sort_by_key(|m| m.sent_at);

        let mut groups: Vec<DateGroup> = Vec::new();
        for message in messages {
            let date = message.sent_at.with_timezone(&Local).date_naive();
            match groups.last_mut() {
                Some(group) if group.date == date => group.messages.push(message),
                _ => groups.push(DateGroup { date, messages: vec![message] }),
            }
        }
        groups
    }

    fn mark(&self, key: &ConversationKey, local_id: u64, delivery: Delivery) {
        let mut map = self.inner.lock().expect("thread state poisoned");
        if let Some(msg) = map
            .threads
            .get_mut(key)
            .and_then(|t| t.iter_mut().find(|m| m.local_id == local_id))
        {
            msg.delivery = delivery;
        }
    }
}
