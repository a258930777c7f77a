//! # http-adapters
//!
//! The reqwest implementation of the `SocialApi` port. Every call carries
//! the ambient session credential as a bearer header and is bounded by the
//! client-wide timeout; dropping an in-flight future cancels its request,
//! which is how a view tears down without setting state after unmount.
//!
//! Collaborator domain errors arrive as `{"error": "..."}` bodies and are
//! surfaced verbatim through `Error::Rejected`/`Unauthorized`/`NotFound`.

use std::time::Duration;

use async_trait::async_trait;
use domains::{
    CollectionStatus, Comment, ContentItem, ContentKind, ContentRef, Error, FeedSource,
    FriendRequest, HomeSections, Message, NewsItem, Notification, PostDraft, ReactionCounts,
    ReactionKind, ReportSubject, RequestAction, Result, ReviewDraft, SocialApi, UserHit,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

/// HTTP client for the platform backend.
pub struct HttpSocialApi {
    http: Client,
    base_url: String,
    token: SecretString,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpSocialApi {
    pub fn new(
        base_url: impl Into<String>,
        token: SecretString,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url, token })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(self.token.expose_secret())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!(path, "GET");
        let response = self.authed(self.http.get(self.url(path))).send().await;
        parse(response).await
    }

    async fn get_json_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!(path, ?query, "GET");
        let response = self.authed(self.http.get(self.url(path)).query(query)).send().await;
        parse(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        debug!(path, "POST");
        let response = self.authed(self.http.post(self.url(path)).json(body)).send().await;
        parse(response).await
    }

    /// POST where only the status matters.
    async fn post_ack<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        debug!(path, "POST");
        let response = self.authed(self.http.post(self.url(path)).json(body)).send().await;
        check(response).await
    }

    fn content_path(target: ContentRef) -> String {
        match target.kind {
            ContentKind::Review => format!("/api/review/{}", target.id),
            ContentKind::Post => format!("/api/forum/posts/{}", target.id),
        }
    }
}

#[async_trait]
impl SocialApi for HttpSocialApi {
    async fn react(&self, target: ContentRef, kind: ReactionKind) -> Result<ReactionCounts> {
        let verb = match kind {
            ReactionKind::Like => "like",
            ReactionKind::Dislike => "dislike",
        };
        let path = format!("{}/{verb}", Self::content_path(target));
        self.post_json(&path, &json!({})).await
    }

    async fn list_comments(&self, target: ContentRef) -> Result<Vec<Comment>> {
        let path = format!("{}/comments", Self::content_path(target));
        self.get_json(&path).await
    }

    async fn post_comment(&self, target: ContentRef, text: &str) -> Result<Comment> {
        let path = format!("{}/comments", Self::content_path(target));
        self.post_json(&path, &json!({ "text": text })).await
    }

    async fn report(&self, subject: ReportSubject) -> Result<String> {
        let (path, body) = match subject {
            ReportSubject::Comment(id) => ("/api/report/comment", json!({ "comment_id": id })),
            ReportSubject::Review(id) => ("/api/report/review", json!({ "review_id": id })),
        };
        let body: MessageBody = self.post_json(path, &body).await?;
        Ok(body.message)
    }

    async fn fetch_source(&self, source: &FeedSource) -> Result<Vec<ContentItem>> {
        match source {
            FeedSource::Reviews { catalog_id } => {
                let path = match catalog_id {
                    Some(id) => format!("/api/review/catalog/{id}"),
                    None => "/api/review/recent".to_string(),
                };
                let reviews: Vec<domains::Review> = self.get_json(&path).await?;
                Ok(reviews.into_iter().map(ContentItem::Review).collect())
            }
            FeedSource::Posts { tag } => {
                let posts: Vec<domains::ForumPost> = match tag {
                    Some(tag) => {
                        self.get_json_query("/api/forum/posts", &[("tag", tag.clone())]).await?
                    }
                    None => self.get_json("/api/forum/posts").await?,
                };
                Ok(posts.into_iter().map(ContentItem::Post).collect())
            }
            FeedSource::News => {
                let news: Vec<NewsItem> = self.get_json("/news").await?;
                Ok(news.into_iter().map(ContentItem::News).collect())
            }
        }
    }

    async fn fetch_home(&self) -> Result<HomeSections> {
        self.get_json("/api/home").await
    }

    async fn fetch_news(&self, limit: u32) -> Result<Vec<NewsItem>> {
        self.get_json_query("/news", &[("limit", limit.to_string())]).await
    }

    async fn submit_review(&self, draft: &ReviewDraft) -> Result<String> {
        let body: MessageBody = self.post_json("/api/review", draft).await?;
        Ok(body.message)
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<String> {
        let body: MessageBody = self.post_json("/api/forum/posts", draft).await?;
        Ok(body.message)
    }

    async fn set_collection_status(
        &self,
        catalog_id: i64,
        status: CollectionStatus,
    ) -> Result<String> {
        let body: MessageBody = self
            .post_json("/api/collections", &json!({ "catalog_id": catalog_id, "status": status }))
            .await?;
        Ok(body.message)
    }

    async fn send_friend_request(&self, target: &str) -> Result<String> {
        let body: MessageBody =
            self.post_json("/api/friends/request", &json!({ "target": target })).await?;
        Ok(body.message)
    }

    async fn list_friend_requests(&self) -> Result<Vec<FriendRequest>> {
        self.get_json("/friend-requests").await
    }

    async fn respond_friend_request(&self, request_id: i64, action: RequestAction) -> Result<()> {
        let verb = match action {
            RequestAction::Accept => "accept",
            RequestAction::Reject => "reject",
        };
        self.post_ack(&format!("/friend-request/{request_id}/{verb}"), &json!({})).await
    }

    async fn list_friends(&self) -> Result<Vec<String>> {
        self.get_json("/friends").await
    }

    async fn search_users(&self, query: &str) -> Result<Vec<UserHit>> {
        self.get_json_query("/user/search", &[("query", query.to_string())]).await
    }

    async fn list_conversation(&self, peer: &str) -> Result<Vec<Message>> {
        self.get_json(&format!("/messages/{peer}")).await
    }

    async fn send_message(&self, peer: &str, text: &str) -> Result<()> {
        self.post_ack(&format!("/messages/{peer}"), &json!({ "text": text })).await
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>> {
        self.get_json("/notifications").await
    }

    async fn mark_notifications_read(&self) -> Result<()> {
        self.post_ack("/notifications/mark-all-read", &json!({})).await
    }
}

async fn parse<T: DeserializeOwned>(
    response: std::result::Result<Response, reqwest::Error>,
) -> Result<T> {
    let response = ok_status(response).await?;
    response.json::<T>().await.map_err(|e| Error::Transport(format!("malformed response: {e}")))
}

async fn check(response: std::result::Result<Response, reqwest::Error>) -> Result<()> {
    ok_status(response).await.map(|_| ())
}

async fn ok_status(
    response: std::result::Result<Response, reqwest::Error>,
) -> Result<Response> {
    let response = response.map_err(transport)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());
    Err(map_status(status, message))
}

fn transport(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout
    } else {
        Error::Transport(err.to_string())
    }
}

/// Collaborator status codes onto the engine error taxonomy.
fn map_status(status: StatusCode, message: String) -> Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized(message),
        StatusCode::NOT_FOUND => Error::NotFound(message),
        s if s.is_client_error() => Error::Rejected(message),
        s => Error::Transport(format!("unexpected status {s}: {message}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_onto_the_taxonomy() {
        assert!(matches!(
            map_status(StatusCode::BAD_REQUEST, "Already friends".into()),
            Error::Rejected(m) if m == "Already friends"
        ));
        assert!(matches!(
            map_status(StatusCode::FORBIDDEN, "You are not friends".into()),
            Error::Unauthorized(_)
        ));
        assert!(matches!(map_status(StatusCode::NOT_FOUND, "gone".into()), Error::NotFound(_)));
        assert!(matches!(
            map_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".into()),
            Error::Transport(_)
        ));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = HttpSocialApi::new(
            "http://localhost:5000/",
            SecretString::from("token"),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(api.url("/api/home"), "http://localhost:5000/api/home");
    }

    #[test]
    fn review_batch_deserializes_into_content_items() {
        let raw = serde_json::json!([{
            "id": 3,
            "author": "mika",
            "catalog_id": 88,
            "catalog_title": "Mushishi",
            "rating": 9,
            "body": "understated",
            "created_at": "2024-05-01T12:00:00Z",
            "counts": { "likes": 4, "dislikes": 1 }
        }]);
        let reviews: Vec<domains::Review> = serde_json::from_value(raw).unwrap();
        let items: Vec<ContentItem> = reviews.into_iter().map(ContentItem::Review).collect();
        assert_eq!(items[0].score(), 3);
        assert_eq!(items[0].author(), "mika");
    }
}
