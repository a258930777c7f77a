//! Feed composition: merge, sort, paginate, and the padded home view.

mod support;

use std::sync::Arc;

use domains::{
    CatalogEntry, Error, FeedSource, HomeSections, MockSocialApi, NewsItem, SortKey,
};
use services::{FeedAggregator, SECTION_WIDTH};
use support::{at, post, review};

#[tokio::test]
async fn popular_sort_ranks_by_net_score_descending() {
    let mut api = MockSocialApi::new();
    api.expect_fetch_source()
        .times(1)
        .returning(|_| Ok(vec![review(1, 5, 1), review(2, 3, 0), review(3, 10, 8)]));

    let feed = FeedAggregator::new(Arc::new(api));
    let page = feed
        .compose_feed(&[FeedSource::Reviews { catalog_id: None }], SortKey::Popular, 1, 10)
        .await;

    let scores: Vec<i64> = page.items.iter().map(|i| i.score()).collect();
    assert_eq!(scores, vec![4, 3, 2]);
}

#[tokio::test]
async fn a_failed_source_yields_an_empty_contribution_not_a_failed_feed() {
    let mut api = MockSocialApi::new();
    api.expect_fetch_source().returning(|source| match source {
        FeedSource::Posts { .. } => Ok(vec![post(1, 2, 0), post(2, 1, 0)]),
        _ => Err(Error::Transport("review service down".into())),
    });

    let feed = FeedAggregator::new(Arc::new(api));
    let sources =
        [FeedSource::Reviews { catalog_id: None }, FeedSource::Posts { tag: None }];
    let page = feed.compose_feed(&sources, SortKey::Recent, 1, 10).await;

    assert_eq!(page.items.len(), 2);
    assert!(page.items.iter().all(|i| matches!(i, domains::ContentItem::Post(_))));
}

#[tokio::test]
async fn twelve_items_paginate_into_three_pages_and_beyond_is_empty() {
    let mut api = MockSocialApi::new();
    api.expect_fetch_source()
        .returning(|_| Ok((1..=12).map(|id| post(id, 0, 0)).collect()));

    let feed = FeedAggregator::new(Arc::new(api));
    let source = [FeedSource::Posts { tag: None }];

    let page3 = feed.compose_feed(&source, SortKey::Recent, 3, 5).await;
    assert_eq!(page3.total_pages, 3);
    assert_eq!(page3.items.len(), 2);

    let page4 = feed.compose_feed(&source, SortKey::Recent, 4, 5).await;
    assert_eq!(page4.total_pages, 3);
    assert!(page4.items.is_empty());
}

#[tokio::test]
async fn home_sections_pad_to_the_display_width() {
    let mut api = MockSocialApi::new();
    api.expect_fetch_home().times(1).returning(|| {
        Ok(HomeSections {
            top_rated: (1..=3)
                .map(|id| CatalogEntry {
                    id,
                    title: format!("title {id}"),
                    score: Some(8.5),
                    year: Some(2019),
                    image_url: None,
                })
                .collect(),
            ..HomeSections::default()
        })
    });
    api.expect_fetch_news().times(1).returning(|_| {
        Ok(vec![NewsItem {
            id: 1,
            author: "staff".into(),
            title: "maintenance window".into(),
            body: "tonight".into(),
            created_at: at(4, 8, 0),
        }])
    });

    let feed = FeedAggregator::new(Arc::new(api));
    let home = feed.home().await;

    assert_eq!(home.top_rated.len(), SECTION_WIDTH);
    assert_eq!(home.top_rated.iter().filter(|s| s.is_placeholder()).count(), SECTION_WIDTH - 3);
    assert_eq!(home.recent_posts.len(), SECTION_WIDTH);
    assert!(home.recent_posts.iter().all(|s| s.is_placeholder()));
    assert_eq!(home.news.len(), 1);
}

#[tokio::test]
async fn news_failure_does_not_take_down_the_home_feed() {
    let mut api = MockSocialApi::new();
    api.expect_fetch_home().returning(|| Ok(HomeSections::default()));
    api.expect_fetch_news()
        .returning(|_| Err(Error::Transport("news service down".into())));

    let feed = FeedAggregator::new(Arc::new(api));
    let home = feed.home().await;

    assert!(home.news.is_empty());
    assert_eq!(home.top_rated.len(), SECTION_WIDTH);
}
