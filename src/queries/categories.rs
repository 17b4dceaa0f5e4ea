use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{QueryCell, QuerySnapshot, Resolved};
use crate::fallback::FallbackStore;
use crate::models::Category;
use crate::source::ContentSource;

pub struct CategoryList {
    source: Arc<dyn ContentSource>,
    fallback: Arc<FallbackStore>,
    cell: Mutex<QueryCell<Arc<Vec<Category>>>>,
}

impl CategoryList {
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>, fallback: Arc<FallbackStore>) -> Self {
        Self {
            source,
            fallback,
            cell: Mutex::new(QueryCell::default()),
        }
    }

    pub async fn snapshot(&self) -> QuerySnapshot<Arc<Vec<Category>>> {
        self.cell.lock().await.snapshot()
    }

    pub async fn load(&self) -> QuerySnapshot<Arc<Vec<Category>>> {
        let generation = self.cell.lock().await.begin();

        let resolved = match self.source.list_categories().await {
            Ok(categories) => Resolved::live(categories),
            Err(e) => {
                warn!(error = %e, "Category list failed, using bundled categories");
                metrics::counter!("content_fallbacks_total", "query" => "categories").increment(1);
                Resolved::fallback(Arc::new(self.fallback.categories().to_vec()), e.to_string())
            }
        };

        let mut cell = self.cell.lock().await;
        if !cell.commit_replace(generation, resolved, |data, categories| *data = categories) {
            debug!("Discarding superseded category list");
        }
        cell.snapshot()
    }
}
