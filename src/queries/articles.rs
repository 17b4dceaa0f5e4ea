//! Paged article list with "load more".

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{QueryCell, QuerySnapshot, Resolved};
use crate::constants::intervals::LOAD_MORE_DELAY;
use crate::fallback::FallbackStore;
use crate::models::{Article, ArticleFilter, ArticlePage};
use crate::source::ContentSource;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedData {
    pub articles: Vec<Article>,
    pub has_more: bool,
}

/// Result of a [`ArticleFeed::load_more`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    /// The next page was appended.
    Appended { count: usize },
    /// Nothing to do: a request is in flight or no pages remain.
    Skipped,
    /// The filter changed while the page was loading; the page was dropped.
    Superseded,
}

struct FeedState {
    filter: ArticleFilter,
    cell: QueryCell<FeedData>,
}

pub struct ArticleFeed {
    source: Arc<dyn ContentSource>,
    fallback: Arc<FallbackStore>,
    load_more_delay: Duration,
    state: Mutex<FeedState>,
}

impl ArticleFeed {
    #[must_use]
    pub fn new(
        source: Arc<dyn ContentSource>,
        fallback: Arc<FallbackStore>,
        filter: ArticleFilter,
    ) -> Self {
        Self {
            source,
            fallback,
            load_more_delay: LOAD_MORE_DELAY,
            state: Mutex::new(FeedState {
                filter: filter.normalized(),
                cell: QueryCell::default(),
            }),
        }
    }

    #[must_use]
    pub const fn with_load_more_delay(mut self, delay: Duration) -> Self {
        self.load_more_delay = delay;
        self
    }

    pub async fn snapshot(&self) -> QuerySnapshot<FeedData> {
        self.state.lock().await.cell.snapshot()
    }

    pub async fn filter(&self) -> ArticleFilter {
        self.state.lock().await.filter.clone()
    }

    /// Replaces the filter and loads its page, superseding any request in
    /// flight.
    pub async fn set_filter(&self, filter: ArticleFilter) -> QuerySnapshot<FeedData> {
        let (generation, filter) = {
            let mut state = self.state.lock().await;
            state.filter = filter.normalized();
            (state.cell.begin(), state.filter.clone())
        };
        self.load_page(generation, filter).await
    }

    /// Reloads the current filter's page.
    pub async fn refetch(&self) -> QuerySnapshot<FeedData> {
        let (generation, filter) = {
            let mut state = self.state.lock().await;
            (state.cell.begin(), state.filter.clone())
        };
        self.load_page(generation, filter).await
    }

    async fn load_page(&self, generation: u64, filter: ArticleFilter) -> QuerySnapshot<FeedData> {
        let resolved = self.fetch(&filter).await;

        let mut state = self.state.lock().await;
        let applied = state.cell.commit_replace(generation, resolved, |data, page| {
            data.has_more = page.has_more();
            data.articles = page.items;
        });
        if !applied {
            debug!(page = filter.page, "Discarding superseded article page");
        }
        state.cell.snapshot()
    }

    /// Appends the page after the articles already shown.
    ///
    /// Does nothing while any request is in flight or when the last page
    /// reported no successors.
    pub async fn load_more(&self) -> LoadMore {
        let (generation, filter) = {
            let mut state = self.state.lock().await;
            if state.cell.is_loading() || !state.cell.data().has_more {
                return LoadMore::Skipped;
            }

            let per_page = state.filter.per_page.max(1);
            let loaded = u32::try_from(state.cell.data().articles.len()).unwrap_or(u32::MAX);
            let next_page = state.filter.page.max(1).saturating_add(loaded / per_page);

            let filter = state.filter.clone().with_page(next_page);
            (state.cell.begin_extend(), filter)
        };

        tokio::time::sleep(self.load_more_delay).await;
        let resolved = self.fetch(&filter).await;

        let mut state = self.state.lock().await;
        let mut count = 0;
        let applied = state.cell.commit(generation, resolved, |data, page| {
            count = page.items.len();
            data.has_more = page.has_more();
            data.articles.extend(page.items);
        });

        if applied {
            debug!(page = filter.page, count, "Appended article page");
            LoadMore::Appended { count }
        } else {
            debug!(page = filter.page, "Discarding superseded article page");
            LoadMore::Superseded
        }
    }

    async fn fetch(&self, filter: &ArticleFilter) -> Resolved<ArticlePage> {
        match self.source.list_articles(filter).await {
            Ok(page) => Resolved::live(page.as_ref().clone()),
            Err(e) => {
                warn!(error = %e, page = filter.page, "Article list failed, using bundled articles");
                metrics::counter!("content_fallbacks_total", "query" => "articles").increment(1);
                Resolved::fallback(self.fallback.list_articles(filter), e.to_string())
            }
        }
    }
}
