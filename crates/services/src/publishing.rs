//! Review and forum post submission. Drafts validate on construction
//! (rating bounds, non-blank text, genre tags), so anything that reaches
//! this component may go straight on the wire.

use std::sync::Arc;

use domains::{PostDraft, Result, ReviewDraft, SocialApi};
use tracing::debug;

pub struct Publisher {
    api: Arc<dyn SocialApi>,
}

impl Publisher {
    pub fn new(api: Arc<dyn SocialApi>) -> Self {
        Self { api }
    }

    /// Submits a review; the collaborator creates or updates the user's
    /// review for that catalog item and says which it did.
    pub async fn submit_review(&self, draft: &ReviewDraft) -> Result<String> {
        let message = self.api.submit_review(draft).await?;
        debug!(catalog_id = draft.catalog_id, rating = draft.rating, "review submitted");
        Ok(message)
    }

    pub async fn create_post(&self, draft: &PostDraft) -> Result<String> {
        let message = self.api.create_post(draft).await?;
        debug!(title = %draft.title, tags = ?draft.tags, "forum post created");
        Ok(message)
    }
}
