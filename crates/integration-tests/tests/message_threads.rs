//! Conversation threads: optimistic send, retry, and date grouping.

mod support;

use std::sync::Arc;

use domains::{Error, MockSocialApi};
use services::{Delivery, MessageThreads};
use support::{at, message, session};

#[tokio::test]
async fn history_is_grouped_by_local_calendar_date() {
    let mut api = MockSocialApi::new();
    // 48 hours apart so the local-time dates differ in any timezone.
    api.expect_list_conversation().returning(|_| {
        Ok(vec![
            message("mika", "still watching?", at(12, 20, 0)),
            message("rin", "yes, episode 8", at(12, 20, 5)),
            message("mika", "finished it", at(14, 20, 0)),
        ])
    });

    let threads = MessageThreads::new(Arc::new(api), session());
    threads.load_thread("mika").await.unwrap();

    let groups = threads.grouped("mika");
    assert_eq!(groups.len(), 2);
    assert!(groups[0].date < groups[1].date);
    assert_eq!(groups[0].messages.len(), 2);
    assert_eq!(groups[1].messages.len(), 1);
    assert!(groups[0].messages.windows(2).all(|w| w[0].sent_at <= w[1].sent_at));
}

#[tokio::test]
async fn blank_message_is_rejected_before_the_network() {
    // No send expectation: a remote call would panic the mock.
    let api = MockSocialApi::new();
    let threads = MessageThreads::new(Arc::new(api), session());

    let err = threads.send("mika", "   ").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(threads.thread("mika").is_empty());
}

#[tokio::test]
async fn confirmed_send_settles_to_sent_with_the_session_sender() {
    let mut api = MockSocialApi::new();
    api.expect_send_message().times(1).returning(|_, _| Ok(()));

    let threads = MessageThreads::new(Arc::new(api), session());
    let local_id = threads.send("mika", "hello").await.unwrap();

    let thread = threads.thread("mika");
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].local_id, local_id);
    assert_eq!(thread[0].sender, "rin");
    assert_eq!(thread[0].delivery, Delivery::Sent);
}

#[tokio::test]
async fn failed_send_stays_visible_and_retry_succeeds_in_place() {
    let mut api = MockSocialApi::new();
    let mut calls = 0;
    api.expect_send_message().times(2).returning(move |_, _| {
        calls += 1;
        if calls == 1 {
            Err(Error::Transport("connection reset".into()))
        } else {
            Ok(())
        }
    });

    let threads = MessageThreads::new(Arc::new(api), session());
    let err = threads.send("mika", "are you there").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));

    let thread = threads.thread("mika");
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].delivery, Delivery::Failed);
    let local_id = thread[0].local_id;

    threads.retry("mika", local_id).await.unwrap();
    let thread = threads.thread("mika");
    assert_eq!(thread[0].local_id, local_id);
    assert_eq!(thread[0].delivery, Delivery::Sent);
}

#[tokio::test]
async fn retrying_a_delivered_message_is_not_found() {
    let mut api = MockSocialApi::new();
    api.expect_send_message().times(1).returning(|_, _| Ok(()));

    let threads = MessageThreads::new(Arc::new(api), session());
    let local_id = threads.send("mika", "hello").await.unwrap();

    let err = threads.retry("mika", local_id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn reloading_keeps_unconfirmed_sends_at_the_tail() {
    let mut api = MockSocialApi::new();
    api.expect_send_message()
        .times(1)
        .returning(|_, _| Err(Error::Timeout));
    api.expect_list_conversation()
        .times(1)
        .returning(|_| Ok(vec![message("mika", "ping", at(12, 20, 0))]));

    let threads = MessageThreads::new(Arc::new(api), session());
    let _ = threads.send("mika", "pong").await;

    let thread = threads.load_thread("mika").await.unwrap();
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].sender, "mika");
    assert_eq!(thread[0].delivery, Delivery::Sent);
    assert_eq!(thread[1].text, "pong");
    assert_eq!(thread[1].delivery, Delivery::Failed);
}
