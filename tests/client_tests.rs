//! WordPress client behavior against an in-process fake of the REST API.

use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::TimeDelta;
use hubfeed::cache::ManualClock;
use hubfeed::clients::wordpress::WordPressClient;
use hubfeed::config::Config;
use hubfeed::models::ArticleFilter;
use hubfeed::ContentError;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const TOTAL_POSTS: u32 = 25;

#[derive(Default)]
struct FakeWordPress {
    post_hits: AtomicUsize,
    category_hits: AtomicUsize,
    write_hits: AtomicUsize,
    fail_posts: AtomicBool,
    last_query: Mutex<Option<String>>,
}

impl FakeWordPress {
    fn post_hits(&self) -> usize {
        self.post_hits.load(Ordering::SeqCst)
    }

    fn last_query(&self) -> String {
        self.last_query.lock().unwrap().clone().unwrap_or_default()
    }
}

fn raw_post(id: u32, slug: &str) -> Value {
    json!({
        "id": id,
        "slug": slug,
        "date": "2024-05-01T10:00:00",
        "title": { "rendered": format!("Post {id} &amp; friends") },
        "excerpt": { "rendered": "<p>Short <em>excerpt</em></p>" },
        "content": { "rendered": "<p>Delta tables on object storage</p>" },
        "meta": { "featured": "1", "trending": "" },
        "_embedded": {
            "wp:featuredmedia": [{ "source_url": "https://cdn.example.com/cover.jpg" }],
            "wp:term": [[{ "name": "Snowflake" }]],
            "author": [{ "name": "Jane Doe" }]
        }
    })
}

fn params(query: Option<&str>) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .into_owned()
        .collect()
}

async fn posts(State(wp): State<Arc<FakeWordPress>>, RawQuery(query): RawQuery) -> Response {
    wp.post_hits.fetch_add(1, Ordering::SeqCst);
    *wp.last_query.lock().unwrap() = query.clone();

    if wp.fail_posts.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "code": "db_down", "message": "Database unavailable" })),
        )
            .into_response();
    }

    let params = params(query.as_deref());

    if let Some(slug) = params.get("slug") {
        let body = match slug.as_str() {
            "missing" => json!([]),
            "duplicate" => json!([raw_post(1, "duplicate"), raw_post(2, "duplicate")]),
            other => json!([raw_post(7, other)]),
        };
        return Json(body).into_response();
    }

    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let per_page: u32 = params
        .get("per_page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(10);
    let first = (page - 1) * per_page;
    let last = (first + per_page).min(TOTAL_POSTS);
    let items: Vec<Value> = (first..last)
        .map(|i| raw_post(100 + i, &format!("post-{i}")))
        .collect();

    (
        [
            ("X-WP-Total", TOTAL_POSTS.to_string()),
            ("X-WP-TotalPages", TOTAL_POSTS.div_ceil(per_page).to_string()),
        ],
        Json(Value::Array(items)),
    )
        .into_response()
}

async fn categories(State(wp): State<Arc<FakeWordPress>>) -> Json<Value> {
    wp.category_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!([
        { "id": 3, "name": "Snowflake", "slug": "snowflake", "count": 12, "description": "" },
        { "id": 6, "name": "dbt", "slug": "dbt", "count": 14, "description": "Transformations" }
    ]))
}

async fn subscribe(State(wp): State<Arc<FakeWordPress>>, Json(body): Json<Value>) -> Response {
    wp.write_hits.fetch_add(1, Ordering::SeqCst);
    if body["email"] == "taken@example.com" {
        return (
            StatusCode::CONFLICT,
            Json(json!({
                "code": "already_subscribed",
                "message": "Email already subscribed",
                "data": { "status": 409 }
            })),
        )
            .into_response();
    }
    Json(json!({ "success": true, "message": "Thanks for subscribing!" })).into_response()
}

async fn contact(State(wp): State<Arc<FakeWordPress>>, Json(body): Json<Value>) -> Json<Value> {
    wp.write_hits.fetch_add(1, Ordering::SeqCst);
    if body["name"] == "Unconfirmed" {
        return Json(json!({ "success": false }));
    }
    Json(json!({ "success": true, "message": format!("Thanks, {}", body["name"].as_str().unwrap_or("")) }))
}

async fn spawn_wordpress() -> (Arc<FakeWordPress>, String) {
    let wp = Arc::new(FakeWordPress::default());
    let app = Router::new()
        .route("/wp-json/wp/v2/posts", get(posts))
        .route("/wp-json/wp/v2/categories", get(categories))
        .route("/wp-json/wp/v2/newsletter/subscribe", post(subscribe))
        .route("/wp-json/wp/v2/contact/submit", post(contact))
        .with_state(wp.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind fake server");
    let addr = listener.local_addr().expect("no local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake server failed");
    });

    (wp, format!("http://{addr}"))
}

async fn client() -> (Arc<FakeWordPress>, WordPressClient, Arc<ManualClock>) {
    let (wp, base_url) = spawn_wordpress().await;
    let mut config = Config::default();
    config.api.base_url = base_url;

    let clock = Arc::new(ManualClock::default());
    let client = WordPressClient::with_clock(&config, clock.clone()).expect("client builds");
    (wp, client, clock)
}

#[tokio::test]
async fn test_list_is_cached_within_ttl() {
    let (wp, client, clock) = client().await;
    let filter = ArticleFilter::default();

    let first = client.list_articles(&filter).await.unwrap();
    clock.advance(TimeDelta::seconds(299));
    let second = client.list_articles(&filter).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(wp.post_hits(), 1);
}

#[tokio::test]
async fn test_cache_expires_after_ttl() {
    let (wp, client, clock) = client().await;
    let filter = ArticleFilter::default();

    let first = client.list_articles(&filter).await.unwrap();
    clock.advance(TimeDelta::seconds(300));
    let second = client.list_articles(&filter).await.unwrap();
    let third = client.list_articles(&filter).await.unwrap();

    assert_eq!(wp.post_hits(), 2);
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&second, &third));
}

#[tokio::test]
async fn test_different_parameters_are_cached_separately() {
    let (wp, client, _clock) = client().await;

    client.list_articles(&ArticleFilter::default()).await.unwrap();
    client
        .list_articles(&ArticleFilter::default().with_page(2))
        .await
        .unwrap();
    client.list_articles(&ArticleFilter::default()).await.unwrap();

    assert_eq!(wp.post_hits(), 2);
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let (wp, client, _clock) = client().await;
    wp.fail_posts.store(true, Ordering::SeqCst);

    let err = client
        .list_articles(&ArticleFilter::default())
        .await
        .unwrap_err();
    match err {
        ContentError::Fetch(message) => {
            assert!(message.contains("500"), "unexpected message: {message}");
            assert!(message.contains("Database unavailable"));
        }
        other => panic!("expected fetch error, got {other:?}"),
    }

    wp.fail_posts.store(false, Ordering::SeqCst);
    let page = client.list_articles(&ArticleFilter::default()).await.unwrap();
    assert_eq!(page.items.len(), 10);
    assert_eq!(wp.post_hits(), 2);
}

#[tokio::test]
async fn test_absent_filters_are_omitted() {
    let (wp, client, _clock) = client().await;

    client.list_articles(&ArticleFilter::default()).await.unwrap();
    assert_eq!(wp.last_query(), "page=1&per_page=10&_embed=true");

    client
        .list_articles(&ArticleFilter::default().with_featured(true).with_per_page(3))
        .await
        .unwrap();
    assert_eq!(
        wp.last_query(),
        "page=1&per_page=3&_embed=true&meta_key=featured&meta_value=1"
    );
}

#[tokio::test]
async fn test_category_slug_resolves_to_term_id() {
    let (wp, client, _clock) = client().await;

    client
        .list_articles(&ArticleFilter::default().with_category("snowflake"))
        .await
        .unwrap();
    assert!(wp.last_query().contains("categories=3"));

    client
        .list_articles(&ArticleFilter::default().with_category("dbt"))
        .await
        .unwrap();
    assert!(wp.last_query().contains("categories=6"));

    // Category list is fetched once and reused for every lookup.
    assert_eq!(wp.category_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unknown_category_fails_before_listing_posts() {
    let (wp, client, _clock) = client().await;

    let err = client
        .list_articles(&ArticleFilter::default().with_category("kafka"))
        .await
        .unwrap_err();

    assert_eq!(err, ContentError::CategoryNotFound("kafka".to_string()));
    assert_eq!(wp.post_hits(), 0);
}

#[tokio::test]
async fn test_page_totals_come_from_headers() {
    let (_wp, client, _clock) = client().await;

    let first = client.list_articles(&ArticleFilter::default()).await.unwrap();
    assert_eq!(first.total, Some(25));
    assert_eq!(first.total_pages, Some(3));
    assert!(first.has_more());

    let last = client
        .list_articles(&ArticleFilter::default().with_page(3))
        .await
        .unwrap();
    assert_eq!(last.items.len(), 5);
    assert!(!last.has_more());
}

#[tokio::test]
async fn test_posts_are_normalized() {
    let (_wp, client, _clock) = client().await;

    let article = client.get_article_by_slug("delta-lake-intro").await.unwrap();
    assert_eq!(article.slug, "delta-lake-intro");
    assert_eq!(article.title, "Post 7 & friends");
    assert_eq!(article.excerpt, "Short excerpt");
    assert_eq!(article.category, "Snowflake");
    assert_eq!(article.author, "Jane Doe");
    assert_eq!(article.image, "https://cdn.example.com/cover.jpg");
    assert_eq!(article.read_time.to_string(), "1 min read");
    assert!(article.featured);
    assert!(!article.trending);
}

#[tokio::test]
async fn test_slug_lookup_edge_cases() {
    let (wp, client, _clock) = client().await;

    let err = client.get_article_by_slug("missing").await.unwrap_err();
    assert_eq!(err, ContentError::NotFound("missing".to_string()));

    let first = client.get_article_by_slug("duplicate").await.unwrap();
    assert_eq!(first.id.value(), 1);

    let err = client.get_article_by_slug("  ").await.unwrap_err();
    assert!(matches!(err, ContentError::Validation(_)));
    assert_eq!(wp.post_hits(), 2);
}

#[tokio::test]
async fn test_subscribe_validates_before_sending() {
    let (wp, client, _clock) = client().await;

    let err = client.subscribe("not-an-email").await.unwrap_err();
    assert!(matches!(err, ContentError::Validation(_)));
    assert_eq!(wp.write_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_subscribe_outcomes() {
    let (wp, client, _clock) = client().await;

    let receipt = client.subscribe(" reader@example.com ").await.unwrap();
    assert!(receipt.success);
    assert_eq!(receipt.message, "Thanks for subscribing!");

    let err = client.subscribe("taken@example.com").await.unwrap_err();
    match err {
        ContentError::Subscription(message) => {
            assert!(message.contains("409"));
            assert!(message.contains("Email already subscribed"));
        }
        other => panic!("expected subscription error, got {other:?}"),
    }

    // Writes are never cached.
    client.subscribe("reader@example.com").await.unwrap();
    assert_eq!(wp.write_hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_contact_submission() {
    let (_wp, client, _clock) = client().await;

    let receipt = client
        .submit_contact("Ada", "ada@example.com", "Loved the dbt series")
        .await
        .unwrap();
    assert_eq!(receipt.message, "Thanks, Ada");

    let err = client
        .submit_contact("Unconfirmed", "ada@example.com", "Hello")
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Submission(_)));

    let err = client
        .submit_contact("", "ada@example.com", "Hello")
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Validation(_)));
}

#[tokio::test]
async fn test_clear_cache_forces_refetch() {
    let (wp, client, _clock) = client().await;

    client.list_articles(&ArticleFilter::default()).await.unwrap();
    client.clear_cache().await;
    client.list_articles(&ArticleFilter::default()).await.unwrap();

    assert_eq!(wp.post_hits(), 2);
}
