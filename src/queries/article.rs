use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{QueryCell, QuerySnapshot, Resolved};
use crate::fallback::FallbackStore;
use crate::models::Article;
use crate::source::ContentSource;

/// What a slug resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "article", rename_all = "lowercase")]
pub enum ArticleLookup {
    Found(Arc<Article>),
    /// Neither the API nor the bundled content knows this slug.
    Missing,
}

impl ArticleLookup {
    #[must_use]
    pub fn article(&self) -> Option<&Article> {
        match self {
            Self::Found(article) => Some(article),
            Self::Missing => None,
        }
    }
}

/// Single article view. `data` stays `None` until the first load finishes.
pub struct ArticleDetail {
    source: Arc<dyn ContentSource>,
    fallback: Arc<FallbackStore>,
    cell: Mutex<QueryCell<Option<ArticleLookup>>>,
}

impl ArticleDetail {
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>, fallback: Arc<FallbackStore>) -> Self {
        Self {
            source,
            fallback,
            cell: Mutex::new(QueryCell::default()),
        }
    }

    pub async fn snapshot(&self) -> QuerySnapshot<Option<ArticleLookup>> {
        self.cell.lock().await.snapshot()
    }

    /// Loads `slug`, superseding any lookup still in flight.
    ///
    /// An unknown slug is not an error: it resolves to
    /// [`ArticleLookup::Missing`].
    pub async fn load(&self, slug: &str) -> QuerySnapshot<Option<ArticleLookup>> {
        let generation = self.cell.lock().await.begin();

        let resolved = match self.source.get_article_by_slug(slug).await {
            Ok(article) => Resolved::live(ArticleLookup::Found(article)),
            Err(e) => {
                warn!(error = %e, slug, "Article lookup failed, using bundled articles");
                metrics::counter!("content_fallbacks_total", "query" => "article").increment(1);
                let lookup = self
                    .fallback
                    .find_by_slug(slug)
                    .map_or(ArticleLookup::Missing, |a| ArticleLookup::Found(Arc::new(a)));
                Resolved::fallback(lookup, e.to_string())
            }
        };

        let mut cell = self.cell.lock().await;
        if !cell.commit_replace(generation, resolved, |data, lookup| *data = Some(lookup)) {
            debug!(slug, "Discarding superseded article lookup");
        }
        cell.snapshot()
    }
}
