mod article;
mod articles;
mod categories;
mod submit;

pub use article::cmd_show_article;
pub use articles::{ArticlesArgs, cmd_list_articles};
pub use categories::cmd_list_categories;
pub use submit::{cmd_contact, cmd_subscribe};

use anyhow::Context;
use std::sync::Arc;

use crate::clients::wordpress::WordPressClient;
use crate::config::Config;
use crate::fallback::FallbackStore;
use crate::queries::{DataSource, QuerySnapshot};
use crate::source::ContentSource;

/// Live client plus bundled fallback, shared by every command.
pub(crate) struct Sources {
    pub content: Arc<dyn ContentSource>,
    pub fallback: Arc<FallbackStore>,
}

impl Sources {
    pub(crate) fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client =
            WordPressClient::new(config).context("Failed to create WordPress client")?;
        let fallback = FallbackStore::bundled().context("Failed to load bundled content")?;
        Ok(Self {
            content: Arc::new(client),
            fallback: Arc::new(fallback),
        })
    }
}

/// Prints a notice when a snapshot was answered from bundled content.
pub(crate) fn print_source_notice<T>(snapshot: &QuerySnapshot<T>) {
    if snapshot.source == DataSource::Fallback {
        println!(
            "⚠ Showing bundled content: {}",
            snapshot.error.as_deref().unwrap_or("the blog could not be reached")
        );
        println!();
    }
}
