//! User notifications: list newest-first, count unread, mark all read.
//! Local copies flip to read only after the remote write succeeds.

use std::cmp::Reverse;
use std::sync::{Arc, Mutex};

use domains::{Notification, Result, SocialApi};

pub struct Notifications {
    api: Arc<dyn SocialApi>,
    items: Mutex<Vec<Notification>>,
}

impl Notifications {
    pub fn new(api: Arc<dyn SocialApi>) -> Self {
        Self { api, items: Mutex::new(Vec::new()) }
    }

    /// Reloads the notification list, newest first.
    pub async fn refresh(&self) -> Result<Vec<Notification>> {
        let mut fetched = self.api.list_notifications().await?;
        fetched.sort_by_key(|n| Reverse(n.created_at));
        let mut items = self.items.lock().expect("notification state poisoned");
        *items = fetched.clone();
        Ok(fetched)
    }

    pub fn unread(&self) -> usize {
        let items = self.items.lock().expect("notification state poisoned");
        items.iter().filter(|n| !n.is_read).count()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.items.lock().expect("notification state poisoned").clone()
    }

    pub async fn mark_all_read(&self) -> Result<()> {
        self.api.mark_notifications_read().await?;
        let mut items = self.items.lock().expect("notification state poisoned");
        for item in items.iter_mut() {
            item.is_read = true;
        }
        Ok(())
    }
}
