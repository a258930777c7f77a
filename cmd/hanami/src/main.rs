//! # hanami
//!
//! Entry point that assembles the client engine: settings, the HTTP
//! adapter for the platform backend, and the service components. As a
//! standalone binary it renders a text version of the home feed — the
//! embedding UI wires the same components to its own views.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use domains::{ContentItem, FeedSource, Slot, SocialApi, SortKey};
use http_adapters::HttpSocialApi;
use services::{FeedAggregator, Friendships, Notifications, Session};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = configs::load().context("failed to load settings")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log.filter.clone())),
        )
        .init();

    let api: Arc<dyn SocialApi> = Arc::new(
        HttpSocialApi::new(
            settings.api.base_url.clone(),
            settings.api.session_token.clone(),
            Duration::from_secs(settings.api.timeout_secs),
        )
        .context("failed to build HTTP client")?,
    );
    let session = Session::new(settings.api.username.clone());

    tracing::info!(user = %session.username, base_url = %settings.api.base_url, "hanami starting");

    let feed = FeedAggregator::new(api.clone());
    let friendships = Friendships::new(api.clone(), session.clone());
    let notifications = Notifications::new(api.clone());

    // Home: bounded sections, placeholders where a section came up short.
    let home = feed.home().await;
    println!("── News ({}) ──", home.news.len());
    for item in &home.news {
        println!("  [{}] {} — {}", item.created_at.format("%Y-%m-%d"), item.title, item.author);
    }
    print_section("Top rated", &home.top_rated, |e| e.title.clone());
    print_section("Most popular", &home.most_popular, |e| e.title.clone());
    print_section("Recent reviews", &home.recent_reviews, |r| {
        format!("{} on {} ({}/10)", r.author, r.catalog_title, r.rating)
    });
    print_section("Recent posts", &home.recent_posts, |p| p.title.clone());

    // A merged forum+review feed, most popular first.
    let sources =
        [FeedSource::Reviews { catalog_id: None }, FeedSource::Posts { tag: None }];
    let page = feed.compose_feed(&sources, SortKey::Popular, 1, 10).await;
    println!("── Feed (page {}/{}) ──", page.page, page.total_pages);
    for item in &page.items {
        let label = match item {
            ContentItem::Review(r) => format!("review of {}", r.catalog_title),
            ContentItem::Post(p) => format!("post: {}", p.title),
            ContentItem::News(n) => format!("news: {}", n.title),
        };
        println!("  [{:+}] {label} — {}", item.score(), item.author());
    }

    if friendships.refresh().await.is_ok() {
        println!("── Friends ──");
        for friend in friendships.friends() {
            println!("  {friend}");
        }
        for request in friendships.pending_requests() {
            println!("  pending request from {}", request.sender);
        }
    }

    if let Ok(items) = notifications.refresh().await {
        println!("── Notifications ({} unread) ──", notifications.unread());
        for note in items.iter().take(5) {
            println!("  {}", note.message);
        }
    }

    Ok(())
}

fn print_section<T>(title: &str, slots: &[Slot<T>], label: impl Fn(&T) -> String) {
    println!("── {title} ──");
    for slot in slots {
        match slot {
            Slot::Filled(item) => println!("  {}", label(item)),
            Slot::Placeholder => println!("  ·"),
        }
    }
}
