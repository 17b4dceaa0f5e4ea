//! List categories command handler

use super::{Sources, print_source_notice};
use crate::config::Config;
use crate::queries::CategoryList;

pub async fn cmd_list_categories(config: &Config) -> anyhow::Result<()> {
    let sources = Sources::from_config(config)?;
    let list = CategoryList::new(sources.content, sources.fallback);
    let snapshot = list.load().await;

    print_source_notice(&snapshot);

    if snapshot.data.is_empty() {
        println!("No categories found.");
        return Ok(());
    }

    println!("Categories ({} total)", snapshot.data.len());
    println!("{:-<50}", "");

    for category in snapshot.data.iter() {
        println!(
            "{:<20} {:<20} {:>4} articles",
            category.name, category.slug, category.count
        );
    }

    println!();
    println!("Filter articles with: hubfeed articles --category <slug>");

    Ok(())
}
