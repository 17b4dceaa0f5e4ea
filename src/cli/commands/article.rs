//! Show article command handler

use super::{Sources, print_source_notice};
use crate::clients::wordpress::normalize::plain_text;
use crate::config::Config;
use crate::queries::{ArticleDetail, ArticleLookup};

pub async fn cmd_show_article(config: &Config, slug: &str, html: bool) -> anyhow::Result<()> {
    let sources = Sources::from_config(config)?;
    let detail = ArticleDetail::new(sources.content, sources.fallback);
    let snapshot = detail.load(slug).await;

    let Some(ArticleLookup::Found(article)) = &snapshot.data else {
        println!("Article not found: {}", slug);
        println!();
        println!("List articles with: hubfeed articles");
        return Ok(());
    };

    print_source_notice(&snapshot);

    println!("{}", article.title);
    println!("{:=<70}", "");
    println!(
        "{} | {} | {} | by {}",
        article.published_at.format("%B %-d, %Y"),
        article.category,
        article.read_time,
        article.author
    );
    println!("Image: {}", article.image);
    println!();

    if html {
        println!("{}", article.body);
    } else {
        println!("{}", plain_text(&article.body));
    }

    Ok(())
}
