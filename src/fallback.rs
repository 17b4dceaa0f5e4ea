//! Bundled articles and categories served when the content API is unreachable.
//!
//! The JSON files under `data/fallback` are compiled into the binary. The
//! store answers the same filters as the live client (category, featured,
//! search, page slicing) so callers see the same shapes from either source.

use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use std::cmp::Reverse;
use tracing::debug;

use crate::error::ContentError;
use crate::models::{Article, ArticleFilter, ArticlePage, Category, eq_ignore_case};

#[derive(RustEmbed)]
#[folder = "data/fallback"]
struct Bundled;

const ARTICLES_FILE: &str = "articles.json";
const CATEGORIES_FILE: &str = "categories.json";

fn load_bundled<T: DeserializeOwned>(name: &str) -> Result<T, ContentError> {
    let file = Bundled::get(name)
        .ok_or_else(|| ContentError::Config(format!("bundled fallback file missing: {name}")))?;
    serde_json::from_slice(&file.data)
        .map_err(|e| ContentError::Config(format!("bundled fallback file {name} is invalid: {e}")))
}

#[derive(Debug, Clone, Default)]
pub struct FallbackStore {
    /// Newest first.
    articles: Vec<Article>,
    categories: Vec<Category>,
}

impl FallbackStore {
    /// Builds a store from arbitrary content, sorting articles newest first.
    #[must_use]
    pub fn new(mut articles: Vec<Article>, categories: Vec<Category>) -> Self {
        articles.sort_by_key(|a| Reverse((a.published_at, a.id)));
        Self {
            articles,
            categories,
        }
    }

    /// Loads the content compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Config`] if a bundled file is missing or does
    /// not decode.
    pub fn bundled() -> Result<Self, ContentError> {
        let articles: Vec<Article> = load_bundled(ARTICLES_FILE)?;
        let categories: Vec<Category> = load_bundled(CATEGORIES_FILE)?;
        debug!(
            articles = articles.len(),
            categories = categories.len(),
            "Loaded bundled fallback content"
        );
        Ok(Self::new(articles, categories))
    }

    #[must_use]
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Articles matching `filter`, newest first, sliced to the requested page.
    #[must_use]
    pub fn list_articles(&self, filter: &ArticleFilter) -> ArticlePage {
        let filter = filter.normalized();

        let category_name = filter.category.as_deref().map(|slug| {
            self.categories
                .iter()
                .find(|c| c.matches(slug))
                .map_or(slug, |c| c.name.as_str())
        });
        let search = filter.search.as_deref().map(str::to_lowercase);

        let matching: Vec<&Article> = self
            .articles
            .iter()
            .filter(|a| filter.featured.is_none_or(|featured| a.featured == featured))
            .filter(|a| category_name.is_none_or(|name| eq_ignore_case(&a.category, name)))
            .filter(|a| {
                search.as_deref().is_none_or(|needle| {
                    a.title.to_lowercase().contains(needle)
                        || a.excerpt.to_lowercase().contains(needle)
                })
            })
            .collect();

        let total = matching.len();
        let per_page = filter.per_page as usize;
        let total_pages = total.div_ceil(per_page);

        let items = matching
            .into_iter()
            .skip(filter.offset())
            .take(per_page)
            .cloned()
            .collect();

        ArticlePage {
            items,
            page: filter.page,
            per_page: filter.per_page,
            total: Some(total as u64),
            total_pages: Some(u32::try_from(total_pages).unwrap_or(u32::MAX)),
        }
    }

    /// Exact slug lookup. Articles bundled without a body get a short
    /// placeholder paragraph.
    #[must_use]
    pub fn find_by_slug(&self, slug: &str) -> Option<Article> {
        let mut article = self.articles.iter().find(|a| a.slug == slug)?.clone();
        if article.body.trim().is_empty() {
            article.body = format!(
                "<p>This is a sample article about {}. The full text will be available once the blog can be reached again.</p>",
                html_escape::encode_text(&article.title)
            );
        }
        Some(article)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FallbackStore {
        FallbackStore::bundled().expect("bundled content decodes")
    }

    fn assert_newest_first(items: &[Article]) {
        for pair in items.windows(2) {
            assert!(pair[0].published_at >= pair[1].published_at);
        }
    }

    #[test]
    fn bundled_content_loads() {
        let store = store();
        assert_eq!(store.articles().len(), 15);
        assert_eq!(store.articles().iter().filter(|a| a.featured).count(), 5);
        assert_eq!(store.categories().len(), 8);
    }

    #[test]
    fn featured_page_of_three() {
        let page = store().list_articles(&ArticleFilter::default().with_featured(true).with_per_page(3));
        assert_eq!(page.items.len(), 3);
        assert!(page.items.iter().all(|a| a.featured));
        assert_newest_first(&page.items);
        assert_eq!(page.total, Some(5));
        assert!(page.has_more());
    }

    #[test]
    fn every_filter_combination_is_sorted() {
        let store = store();
        let filters = [
            ArticleFilter::default(),
            ArticleFilter::default().with_featured(false),
            ArticleFilter::default().with_category("snowflake"),
            ArticleFilter::default().with_category("AWS").with_featured(false),
            ArticleFilter::default().with_search("sql"),
            ArticleFilter::default().with_per_page(4).with_page(2),
        ];
        for filter in filters {
            assert_newest_first(&store.list_articles(&filter).items);
        }
    }

    #[test]
    fn category_matches_case_insensitively() {
        let store = store();
        let by_slug = store.list_articles(&ArticleFilter::default().with_category("dbt"));
        let by_name = store.list_articles(&ArticleFilter::default().with_category("DBT"));
        assert_eq!(by_slug.items.len(), 2);
        assert_eq!(by_slug, by_name);
        assert!(by_slug.items.iter().all(|a| a.category == "dbt"));
    }

    #[test]
    fn unknown_category_yields_empty_page() {
        let page = store().list_articles(&ArticleFilter::default().with_category("kafka"));
        assert!(page.items.is_empty());
        assert!(!page.has_more());
    }

    #[test]
    fn pagination_slices_after_filtering() {
        let store = store();
        let first = store.list_articles(&ArticleFilter::default().with_per_page(6));
        let third = store.list_articles(&ArticleFilter::default().with_per_page(6).with_page(3));
        assert_eq!(first.items.len(), 6);
        assert_eq!(third.items.len(), 3);
        assert_eq!(third.total_pages, Some(3));
        assert!(!third.has_more());
        assert_eq!(first.items[0].slug, "snowflake-cost-optimization");
    }

    #[test]
    fn find_by_slug_fills_placeholder_body() {
        let store = store();
        let article = store.find_by_slug("airflow-best-practices").unwrap();
        assert_eq!(article.slug, "airflow-best-practices");
        assert!(article.body.contains("Apache Airflow Best Practices"));
        assert!(store.find_by_slug("no-such-post").is_none());
    }

    #[test]
    fn category_filter_folds_non_ascii_case() {
        let article: Article = serde_json::from_value(serde_json::json!({
            "id": 1,
            "slug": "analisis-de-datos",
            "title": "Análisis de datos",
            "excerpt": "Primeros pasos",
            "category": "ANÁLISIS",
            "date": "2024-03-01T09:00:00",
            "image": "https://cdn.example.com/a.jpg",
            "read_time": "3 min read",
            "author": "Lucía"
        }))
        .unwrap();
        let category: Category = serde_json::from_value(serde_json::json!({
            "id": 4, "name": "Análisis", "slug": "analisis"
        }))
        .unwrap();
        let store = FallbackStore::new(vec![article], vec![category]);

        for filter in ["analisis", "Análisis", "análisis"] {
            let page = store.list_articles(&ArticleFilter::default().with_category(filter));
            assert_eq!(page.items.len(), 1, "{filter}");
        }
    }
}
