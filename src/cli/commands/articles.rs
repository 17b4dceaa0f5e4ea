//! List articles command handler

use std::time::Duration;

use super::{Sources, print_source_notice};
use crate::config::Config;
use crate::models::{Article, ArticleFilter};
use crate::queries::{ArticleFeed, LoadMore};

pub struct ArticlesArgs {
    pub page: u32,
    pub per_page: Option<u32>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub more: u32,
    pub json: bool,
}

impl ArticlesArgs {
    fn filter(&self, config: &Config) -> ArticleFilter {
        ArticleFilter {
            page: self.page,
            per_page: self.per_page.unwrap_or(config.feed.page_size),
            category: self.category.clone(),
            search: self.search.clone(),
            featured: self.featured,
        }
    }
}

pub async fn cmd_list_articles(config: &Config, args: ArticlesArgs) -> anyhow::Result<()> {
    let sources = Sources::from_config(config)?;
    let feed = ArticleFeed::new(sources.content, sources.fallback, args.filter(config))
        .with_load_more_delay(Duration::from_millis(config.feed.load_more_delay_ms));

    let mut snapshot = feed.refetch().await;
    for _ in 0..args.more {
        match feed.load_more().await {
            LoadMore::Appended { .. } => {}
            LoadMore::Skipped | LoadMore::Superseded => break,
        }
    }
    if args.more > 0 {
        snapshot = feed.snapshot().await;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    print_source_notice(&snapshot);

    let articles = &snapshot.data.articles;
    if articles.is_empty() {
        println!("No articles found.");
        return Ok(());
    }

    println!("Articles ({} shown)", articles.len());
    println!("{:-<70}", "");

    for article in articles {
        println!("{}", render_entry(article));
    }

    println!();
    if snapshot.data.has_more {
        println!("More articles available: use --more <n> or --page <n>");
    }
    println!("Legend: ★ Featured | ↑ Trending");

    Ok(())
}

/// One list entry. The excerpt is already plain text and is printed as is.
fn render_entry(article: &Article) -> String {
    let marker = if article.featured {
        "★"
    } else if article.trending {
        "↑"
    } else {
        "•"
    };

    let mut entry = format!(
        "{} {}\n  {} | {} | {} | {}\n  slug: {}",
        marker,
        article.title,
        article.published_at.format("%Y-%m-%d"),
        article.category,
        article.read_time,
        article.author,
        article.slug
    );
    if !article.excerpt.is_empty() {
        entry.push_str("\n  ");
        entry.push_str(&article.excerpt);
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(excerpt: &str) -> Article {
        serde_json::from_value(serde_json::json!({
            "id": 3,
            "slug": "html-in-dbt-docs",
            "title": "HTML in dbt docs",
            "excerpt": excerpt,
            "category": "dbt",
            "date": "2024-04-02T10:00:00",
            "image": "https://cdn.example.com/dbt.jpg",
            "read_time": "4 min read",
            "featured": true,
            "author": "Sam"
        }))
        .unwrap()
    }

    #[test]
    fn entry_keeps_excerpt_text_verbatim() {
        let entry = render_entry(&article("Wrap blocks in <div> &amp; style them"));
        assert!(entry.ends_with("\n  Wrap blocks in <div> &amp; style them"));
        assert!(entry.starts_with("★ HTML in dbt docs\n  2024-04-02 | dbt | 4 min read | Sam"));
    }

    #[test]
    fn entry_omits_empty_excerpt() {
        let entry = render_entry(&article(""));
        assert!(entry.ends_with("slug: html-in-dbt-docs"));
    }
}
