//! # Feed Aggregator
//!
//! Merges heterogeneous content (reviews, posts, news) into ranked,
//! paginated views, and composes the fixed-width home feed. Sources are
//! fetched independently; a failed source contributes nothing rather than
//! failing the whole feed.

use std::sync::Arc;

use domains::{
    CatalogEntry, ContentItem, FeedSource, ForumPost, HomeSections, NewsItem, Page, Review, Slot,
    SocialApi, SortKey,
};
use futures::future::join_all;
use std::cmp::Reverse;
use tracing::warn;

/// Fixed display width of each home section; short sections are padded with
/// placeholder slots. Presentation contract only.
pub const SECTION_WIDTH: usize = 10;

const NEWS_LIMIT: u32 = 10;

/// The cross-type home view: bounded per-type queries, each padded to
/// [`SECTION_WIDTH`].
#[derive(Debug, Clone, Default)]
pub struct HomeFeed {
    pub news: Vec<NewsItem>,
    pub top_rated: Vec<Slot<CatalogEntry>>,
    pub most_popular: Vec<Slot<CatalogEntry>>,
    pub recent_reviews: Vec<Slot<Review>>,
    pub recent_posts: Vec<Slot<ForumPost>>,
}

pub struct FeedAggregator {
    api: Arc<dyn SocialApi>,
}

impl FeedAggregator {
    pub fn new(api: Arc<dyn SocialApi>) -> Self {
        Self { api }
    }

    /// Fetches every source, merges, sorts and slices one page.
    ///
    /// Sorting is stable so tied items keep their previous relative order
    /// and do not reflow on refresh. A page beyond the last yields an empty
    /// slice, not an error.
    pub async fn compose_feed(
        &self,
        sources: &[FeedSource],
        sort: SortKey,
        page: u32,
        page_size: u32,
    ) -> Page<ContentItem> {
        let batches = join_all(sources.iter().map(|s| self.api.fetch_source(s))).await;

        let mut items = Vec::new();
        for (source, batch) in sources.iter().zip(batches) {
            match batch {
                Ok(batch) => items.extend(batch),
                Err(err) => warn!(?source, %err, "feed source failed, contributing empty batch"),
            }
        }

        sort_items(&mut items, sort);
        paginate(items, page, page_size)
    }

    /// Composes the home feed from independent bounded queries. Either the
    /// section query or the news query may fail without taking down the
    /// other.
    pub async fn home(&self) -> HomeFeed {
        let (sections, news) =
            futures::join!(self.api.fetch_home(), self.api.fetch_news(NEWS_LIMIT));

        let sections = sections.unwrap_or_else(|err| {
            warn!(%err, "home sections failed, rendering placeholders");
            HomeSections::default()
        });
        let news = news.unwrap_or_else(|err| {
            warn!(%err, "news fetch failed, rendering without news");
            Vec::new()
        });

        HomeFeed {
            news,
            top_rated: pad_section(sections.top_rated),
            most_popular: pad_section(sections.most_popular),
            recent_reviews: pad_section(sections.recent_reviews),
            recent_posts: pad_section(sections.recent_posts),
        }
    }
}

fn sort_items(items: &mut [ContentItem], sort: SortKey) {
    match sort {
        SortKey::Recent => items.sort_by_key(|item| Reverse(item.created_at())),
        SortKey::Popular => items.sort_by_key(|item| Reverse(item.score())),
    }
}

/// `total_pages = ceil(count / page_size)`; the page index clamps below to 1
/// and an out-of-range page returns an empty slice.
fn paginate<T>(items: Vec<T>, page: u32, page_size: u32) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = (items.len() as u32).div_ceil(page_size);
    let page = page.max(1);
    let start = (page - 1) as usize * page_size as usize;
    let items = items.into_iter().skip(start).take(page_size as usize).collect();
    Page { items, page, total_pages }
}

/// Truncates to the display width and fills the remainder with placeholder
/// slots. Never persisted.
fn pad_section<T>(items: Vec<T>) -> Vec<Slot<T>> {
    let mut slots: Vec<Slot<T>> =
        items.into_iter().take(SECTION_WIDTH).map(Slot::Filled).collect();
    while slots.len() < SECTION_WIDTH {
        slots.push(Slot::Placeholder);
    }
    slots
}
