//! Client for the blog's WordPress REST API.
//!
//! Every read goes through a [`ResponseCache`] keyed by endpoint and query
//! string. Writes (newsletter, contact) bypass the cache. The client never
//! falls back to bundled content itself; that decision belongs to the query
//! controllers.

pub mod normalize;
pub mod raw;

use chrono::TimeDelta;
use reqwest::header::{ACCEPT, HeaderMap};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::cache::{CacheKey, Clock, ResponseCache, SystemClock};
use crate::config::Config;
use crate::constants::{API_NAMESPACE, limits::MAX_CATEGORIES};
use crate::domain::EmailAddress;
use crate::error::ContentError;
use crate::models::{
    Article, ArticleFilter, ArticlePage, Category, ContactMessage, SubmissionReceipt,
    eq_ignore_case,
};
use crate::source::ContentSource;

pub use normalize::Normalizer;
use raw::{RawCategory, RawPost, WpErrorBody};

const TOTAL_HEADER: &str = "x-wp-total";
const TOTAL_PAGES_HEADER: &str = "x-wp-totalpages";

/// Normalized responses held by the cache.
#[derive(Debug, Clone)]
enum Cached {
    Page(Arc<ArticlePage>),
    Article(Arc<Article>),
    Categories(Arc<Vec<Category>>),
}

#[derive(Clone)]
pub struct WordPressClient {
    client: Client,
    api_root: Url,
    cache: Arc<ResponseCache<Cached>>,
    normalizer: Normalizer,
}

impl WordPressClient {
    /// Creates a client from configuration using the system clock.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: &Config) -> Result<Self, ContentError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a client whose cache expiry reads time from `clock`.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self, ContentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.request_timeout_seconds))
            .user_agent(config.api.user_agent.as_str())
            .build()
            .map_err(|e| ContentError::Config(format!("Failed to build HTTP client: {e}")))?;

        Self::with_shared_client(client, config, clock)
    }

    /// Creates a client on top of an existing `reqwest::Client` so that
    /// connection pools can be shared.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn with_shared_client(
        client: Client,
        config: &Config,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ContentError> {
        let ttl_secs = i64::try_from(config.api.cache_ttl_seconds).unwrap_or(i64::MAX);
        let ttl = TimeDelta::try_seconds(ttl_secs).unwrap_or(TimeDelta::MAX);

        Ok(Self {
            client,
            api_root: api_root(&config.api.base_url)?,
            cache: Arc::new(ResponseCache::new(ttl, clock)),
            normalizer: Normalizer::from(&config.content),
        })
    }

    #[must_use]
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<(Url, CacheKey), ContentError> {
        let mut url = self.api_root.join(path)?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        let key = CacheKey::new(&format!("/{path}"), url.query());
        Ok((url, key))
    }

    async fn cached(&self, key: &CacheKey) -> Option<Cached> {
        let hit = self.cache.get(key).await;
        if hit.is_some() {
            debug!(key = %key, "Cache hit");
            metrics::counter!("content_cache_hits_total").increment(1);
        } else {
            debug!(key = %key, "Cache miss");
            metrics::counter!("content_cache_misses_total").increment(1);
        }
        hit
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        endpoint: &'static str,
    ) -> Result<(T, HeaderMap), ContentError> {
        debug!(url = %url, "GET");

        let result = self.fetch_json(url).await;

        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!("content_requests_total", "endpoint" => endpoint, "outcome" => outcome)
            .increment(1);

        if let Err(e) = &result {
            warn!(endpoint, error = %e, "WordPress API error");
        }
        result
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<(T, HeaderMap), ContentError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContentError::fetch(http_error_message(status, &body)));
        }

        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        let data = serde_json::from_slice(&bytes)
            .map_err(|e| ContentError::fetch(format!("Unexpected response shape: {e}")))?;
        Ok((data, headers))
    }

    async fn post_json<B: Serialize + Sync>(
        &self,
        path: &'static str,
        body: &B,
        into_error: fn(String) -> ContentError,
    ) -> Result<SubmissionReceipt, ContentError> {
        let url = self.api_root.join(path)?;
        debug!(url = %url, "POST");

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| into_error(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| into_error(e.to_string()))?;

        let outcome = if status.is_success() { "ok" } else { "error" };
        metrics::counter!("content_requests_total", "endpoint" => path, "outcome" => outcome)
            .increment(1);

        if !status.is_success() {
            warn!(endpoint = path, status = %status, "Write request rejected");
            return Err(into_error(http_error_message(status, &text)));
        }

        let receipt: SubmissionReceipt = serde_json::from_str(&text)
            .map_err(|e| into_error(format!("Unexpected response shape: {e}")))?;

        if !receipt.success {
            let message = if receipt.message.is_empty() {
                "server did not confirm the request".to_string()
            } else {
                receipt.message
            };
            return Err(into_error(message));
        }

        Ok(receipt)
    }

    /// Lists one page of posts matching `filter`.
    ///
    /// A category slug is resolved to its term id through
    /// [`Self::list_categories`] before the request is built.
    ///
    /// # Errors
    ///
    /// - Returns [`ContentError::CategoryNotFound`] for an unknown category slug
    /// - Returns [`ContentError::Fetch`] on transport, HTTP or decoding failures
    pub async fn list_articles(
        &self,
        filter: &ArticleFilter,
    ) -> Result<Arc<ArticlePage>, ContentError> {
        let filter = filter.normalized();

        let mut params = vec![
            ("page", filter.page.to_string()),
            ("per_page", filter.per_page.to_string()),
            ("_embed", "true".to_string()),
        ];

        if let Some(slug) = &filter.category {
            let category = self.find_category(slug).await?;
            params.push(("categories", category.id.to_string()));
        }
        if let Some(search) = &filter.search {
            params.push(("search", search.clone()));
        }
        if let Some(featured) = filter.featured {
            params.push(("meta_key", "featured".to_string()));
            params.push(("meta_value", if featured { "1" } else { "0" }.to_string()));
        }

        let (url, key) = self.endpoint("posts", &params)?;
        if let Some(Cached::Page(page)) = self.cached(&key).await {
            return Ok(page);
        }

        let (posts, headers): (Vec<RawPost>, HeaderMap) = self.get_json(url, "posts").await?;

        let page = Arc::new(ArticlePage {
            items: posts
                .into_iter()
                .map(|p| self.normalizer.article(p))
                .collect(),
            page: filter.page,
            per_page: filter.per_page,
            total: header_number(&headers, TOTAL_HEADER),
            total_pages: header_number(&headers, TOTAL_PAGES_HEADER),
        });

        self.cache.insert(key, Cached::Page(page.clone())).await;
        Ok(page)
    }

    /// Fetches the post with `slug`.
    ///
    /// When the server returns several posts for one slug the first wins.
    ///
    /// # Errors
    ///
    /// - Returns [`ContentError::Validation`] for a blank slug
    /// - Returns [`ContentError::NotFound`] when no post matches
    /// - Returns [`ContentError::Fetch`] on transport, HTTP or decoding failures
    pub async fn get_article_by_slug(&self, slug: &str) -> Result<Arc<Article>, ContentError> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(ContentError::validation("Slug cannot be empty"));
        }

        let params = [("slug", slug.to_string()), ("_embed", "true".to_string())];
        let (url, key) = self.endpoint("posts", &params)?;
        if let Some(Cached::Article(article)) = self.cached(&key).await {
            return Ok(article);
        }

        let (posts, _): (Vec<RawPost>, HeaderMap) = self.get_json(url, "posts").await?;

        if posts.len() > 1 {
            warn!(slug, count = posts.len(), "Several posts share a slug, using the first");
        }
        let raw = posts
            .into_iter()
            .next()
            .ok_or_else(|| ContentError::NotFound(slug.to_string()))?;

        let article = Arc::new(self.normalizer.article(raw));
        self.cache.insert(key, Cached::Article(article.clone())).await;
        Ok(article)
    }

    /// Fetches up to 100 categories in a single request.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Fetch`] on transport, HTTP or decoding failures.
    pub async fn list_categories(&self) -> Result<Arc<Vec<Category>>, ContentError> {
        let params = [("per_page", MAX_CATEGORIES.to_string())];
        let (url, key) = self.endpoint("categories", &params)?;
        if let Some(Cached::Categories(categories)) = self.cached(&key).await {
            return Ok(categories);
        }

        let (raw, _): (Vec<RawCategory>, HeaderMap) = self.get_json(url, "categories").await?;
        let categories = Arc::new(
            raw.into_iter()
                .map(|c| self.normalizer.category(c))
                .collect::<Vec<_>>(),
        );

        self.cache
            .insert(key, Cached::Categories(categories.clone()))
            .await;
        Ok(categories)
    }

    /// Resolves a category slug through the (cached) category list.
    ///
    /// # Errors
    ///
    /// - Returns [`ContentError::CategoryNotFound`] when no category has the slug
    /// - Returns [`ContentError::Fetch`] when the category list cannot be loaded
    pub async fn find_category(&self, slug: &str) -> Result<Category, ContentError> {
        self.list_categories()
            .await?
            .iter()
            .find(|c| eq_ignore_case(&c.slug, slug))
            .cloned()
            .ok_or_else(|| ContentError::CategoryNotFound(slug.to_string()))
    }

    /// Signs `email` up for the newsletter. Never cached.
    ///
    /// # Errors
    ///
    /// - Returns [`ContentError::Validation`] before any request for a malformed address
    /// - Returns [`ContentError::Subscription`] on any non-success response
    pub async fn subscribe(&self, email: &str) -> Result<SubmissionReceipt, ContentError> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a EmailAddress,
        }

        let email = EmailAddress::parse(email)?;
        self.post_json(
            "newsletter/subscribe",
            &Body { email: &email },
            ContentError::Subscription,
        )
        .await
    }

    /// Sends a contact form message. Never cached.
    ///
    /// # Errors
    ///
    /// - Returns [`ContentError::Validation`] before any request for invalid fields
    /// - Returns [`ContentError::Submission`] on any non-success response
    pub async fn submit_contact(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<SubmissionReceipt, ContentError> {
        let contact = ContactMessage::new(name, email, message)?;
        self.post_json("contact/submit", &contact, ContentError::Submission)
            .await
    }

    /// Drops every cached response.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}

#[async_trait::async_trait]
impl ContentSource for WordPressClient {
    async fn list_articles(&self, filter: &ArticleFilter) -> Result<Arc<ArticlePage>, ContentError> {
        Self::list_articles(self, filter).await
    }

    async fn get_article_by_slug(&self, slug: &str) -> Result<Arc<Article>, ContentError> {
        Self::get_article_by_slug(self, slug).await
    }

    async fn list_categories(&self) -> Result<Arc<Vec<Category>>, ContentError> {
        Self::list_categories(self).await
    }

    async fn subscribe(&self, email: &str) -> Result<SubmissionReceipt, ContentError> {
        Self::subscribe(self, email).await
    }

    async fn submit_contact(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<SubmissionReceipt, ContentError> {
        Self::submit_contact(self, name, email, message).await
    }
}

/// `<base_url>/wp-json/wp/v2/`, with the trailing slash `Url::join` needs.
fn api_root(base_url: &str) -> Result<Url, ContentError> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let root = Url::parse(&base)?.join(&format!("{API_NAMESPACE}/"))?;
    Ok(root)
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Builds the message for a non-success status, preferring the `WP_Error`
/// message when the body carries one.
fn http_error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<WpErrorBody>(body) {
        Ok(err) if !err.message.is_empty() => {
            if err.code.is_empty() {
                format!("HTTP error! status: {status} - {}", err.message)
            } else {
                format!("HTTP error! status: {status} - {} ({})", err.message, err.code)
            }
        }
        _ => format!("HTTP error! status: {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_root_appends_namespace() {
        assert_eq!(
            api_root("https://dataengineerhub.blog").unwrap().as_str(),
            "https://dataengineerhub.blog/wp-json/wp/v2/"
        );
        assert_eq!(
            api_root("http://localhost:8080/blog/").unwrap().as_str(),
            "http://localhost:8080/blog/wp-json/wp/v2/"
        );
        assert!(api_root("not a url").is_err());
    }

    #[test]
    fn endpoint_builds_url_and_cache_key() {
        let client = WordPressClient::new(&Config::default()).unwrap();
        let (url, key) = client
            .endpoint(
                "posts",
                &[("page", "2".to_string()), ("search", "delta lake".to_string())],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://dataengineerhub.blog/wp-json/wp/v2/posts?page=2&search=delta+lake"
        );
        assert_eq!(key.as_str(), "/posts?page=2&search=delta+lake");
    }

    #[test]
    fn error_message_prefers_wp_error_body() {
        let body = r#"{"code":"already_subscribed","message":"Email already subscribed","data":{"status":409}}"#;
        assert_eq!(
            http_error_message(StatusCode::CONFLICT, body),
            "HTTP error! status: 409 Conflict - Email already subscribed (already_subscribed)"
        );
        assert_eq!(
            http_error_message(StatusCode::BAD_GATEWAY, "<html>"),
            "HTTP error! status: 502 Bad Gateway"
        );
    }

    #[test]
    fn header_number_parses_totals() {
        let mut headers = HeaderMap::new();
        headers.insert(TOTAL_PAGES_HEADER, "4".parse().unwrap());
        assert_eq!(header_number::<u32>(&headers, TOTAL_PAGES_HEADER), Some(4));
        assert_eq!(header_number::<u64>(&headers, TOTAL_HEADER), None);
    }
}
