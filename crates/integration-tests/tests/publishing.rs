//! Review and forum post publishing through the collaborator port.

mod support;

use std::sync::Arc;

use domains::{Error, MockSocialApi, PostDraft, ReviewDraft};
use services::Publisher;

#[tokio::test]
async fn the_collaborator_message_is_surfaced_verbatim() {
    let mut api = MockSocialApi::new();
    api.expect_submit_review()
        .times(1)
        .returning(|_| Ok("Review updated.".into()));

    let publisher = Publisher::new(Arc::new(api));
    let draft = ReviewDraft::new(42, "patient and understated", 9).unwrap();
    assert_eq!(publisher.submit_review(&draft).await.unwrap(), "Review updated.");
}

#[tokio::test]
async fn a_domain_rejection_comes_back_unwrapped() {
    let mut api = MockSocialApi::new();
    api.expect_create_post()
        .times(1)
        .returning(|_| Err(Error::Rejected("You are posting too quickly.".into())));

    let publisher = Publisher::new(Arc::new(api));
    let draft =
        PostDraft::new("weekly thread", "what are you watching", vec!["General".into()])
            .unwrap();
    let err = publisher.create_post(&draft).await.unwrap_err();
    assert!(matches!(err, Error::Rejected(m) if m == "You are posting too quickly."));
}

#[tokio::test]
async fn invalid_drafts_never_reach_the_publisher() {
    assert!(matches!(ReviewDraft::new(42, "  ", 7), Err(Error::Validation(_))));
    assert!(matches!(ReviewDraft::new(42, "fine", 11), Err(Error::Validation(_))));
    assert!(matches!(
        PostDraft::new("title", "body", vec!["Not A Genre".into()]),
        Err(Error::Validation(_))
    ));
    assert!(matches!(PostDraft::new("title", "body", vec![]), Err(Error::Validation(_))));
}
