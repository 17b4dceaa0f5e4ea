//! CLI module - Command-line interface for hubfeed
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// hubfeed - Read the DataEngineer Hub blog from the terminal
/// Falls back to bundled articles when the blog cannot be reached
#[derive(Parser)]
#[command(name = "hubfeed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List articles, newest first
    #[command(alias = "ls", alias = "a")]
    Articles {
        /// Page to start from
        #[arg(long, default_value = "1")]
        page: u32,

        /// Articles per page (default: feed.page_size)
        #[arg(long)]
        per_page: Option<u32>,

        /// Category slug, e.g. "snowflake"
        #[arg(long, short)]
        category: Option<String>,

        /// Search in titles and excerpts
        #[arg(long, short)]
        search: Option<String>,

        /// Only featured articles
        #[arg(long, conflicts_with = "not_featured")]
        featured: bool,

        /// Only articles that are not featured
        #[arg(long)]
        not_featured: bool,

        /// Extra pages to load after the first one
        #[arg(long, default_value = "0")]
        more: u32,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single article
    #[command(alias = "show")]
    Article {
        /// Article slug
        slug: String,

        /// Print the full body as HTML instead of plain text
        #[arg(long)]
        html: bool,
    },

    /// List categories
    #[command(alias = "cats")]
    Categories,

    /// Subscribe an email address to the newsletter
    Subscribe {
        email: String,
    },

    /// Send a message through the contact form
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Message text
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
