//! Shared fixtures for the engine test suite.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use domains::{Comment, ContentItem, ForumPost, Message, ReactionCounts, Review};
use services::Session;

pub fn session() -> Session {
    Session::new("rin")
}

pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, hour, minute, 0).unwrap()
}

pub fn review(id: i64, likes: u32, dislikes: u32) -> ContentItem {
    ContentItem::Review(Review {
        id,
        author: "mika".into(),
        catalog_id: 42,
        catalog_title: "Mushishi".into(),
        rating: 9,
        body: "understated and patient".into(),
        created_at: at(1, 12, id as u32 % 60),
        counts: ReactionCounts { likes, dislikes },
    })
}

pub fn post(id: i64, likes: u32, dislikes: u32) -> ContentItem {
    ContentItem::Post(ForumPost {
        id,
        author: "yuu".into(),
        title: format!("thread {id}"),
        body: "discuss".into(),
        tags: vec!["General".into()],
        created_at: at(2, 9, id as u32 % 60),
        counts: ReactionCounts { likes, dislikes },
    })
}

pub fn comment(id: i64, author: &str, text: &str) -> Comment {
    Comment { id, author: author.into(), text: text.into(), created_at: at(3, 10, 0) }
}

pub fn message(sender: &str, text: &str, sent_at: DateTime<Utc>) -> Message {
    Message { sender: sender.into(), text: text.into(), sent_at }
}
