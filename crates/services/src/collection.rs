//! # Collection/Status Tracker
//!
//! One categorical watch-state per (user, catalog item). Setting a status
//! overwrites the previous one, never duplicates; re-selecting the active
//! status is a harmless round-trip.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use domains::{CollectionStatus, Result, SocialApi};
use tracing::debug;

pub struct CollectionTracker {
    api: Arc<dyn SocialApi>,
    statuses: Mutex<HashMap<i64, CollectionStatus>>,
}

impl CollectionTracker {
    pub fn new(api: Arc<dyn SocialApi>) -> Self {
        Self { api, statuses: Mutex::new(HashMap::new()) }
    }

    /// Sets the status for a catalog item, overwriting any previous one.
    /// The remote write always happens, even when the status is unchanged;
    /// the collaborator treats that as an update, not a duplicate.
    pub async fn set_status(&self, catalog_id: i64, status: CollectionStatus) -> Result<String> {
        let message = self.api.set_collection_status(catalog_id, status).await?;
        let mut statuses = self.statuses.lock().expect("collection state poisoned");
        statuses.insert(catalog_id, status);
        debug!(catalog_id, %status, "collection status confirmed");
        Ok(message)
    }

    /// Last confirmed status, if any.
    pub fn status(&self, catalog_id: i64) -> Option<CollectionStatus> {
        self.statuses.lock().expect("collection state poisoned").get(&catalog_id).copied()
    }
}
