pub mod cache;
pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod fallback;
pub mod models;
pub mod queries;
pub mod source;

use clap::Parser;
use cli::{
    ArticlesArgs, Cli, Commands, cmd_contact, cmd_list_articles, cmd_list_categories,
    cmd_show_article, cmd_subscribe,
};
pub use config::Config;
use config::LogFormat;
pub use error::ContentError;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config);

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        print_help();
        return Ok(());
    };

    match command {
        Commands::Articles {
            page,
            per_page,
            category,
            search,
            featured,
            not_featured,
            more,
            json,
        } => {
            let featured = match (featured, not_featured) {
                (true, _) => Some(true),
                (false, true) => Some(false),
                (false, false) => None,
            };
            let args = ArticlesArgs {
                page,
                per_page,
                category,
                search,
                featured,
                more,
                json,
            };
            cmd_list_articles(&config, args).await
        }

        Commands::Article { slug, html } => cmd_show_article(&config, &slug, html).await,

        Commands::Categories => cmd_list_categories(&config).await,

        Commands::Subscribe { email } => cmd_subscribe(&config, &email).await,

        Commands::Contact {
            name,
            email,
            message,
        } => cmd_contact(&config, &name, &email, &message.join(" ")).await,

        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("Created config.toml");
            } else {
                println!("config.toml already exists");
            }
            Ok(())
        }
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.general.log_format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }

    info!(api = %config.api.base_url, "hubfeed starting");
}

fn print_help() {
    println!("hubfeed - Read the DataEngineer Hub blog from the terminal");
    println!();
    println!("USAGE:");
    println!("  hubfeed <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("  articles, ls      List articles (--category, --search, --featured, --more)");
    println!("  article <slug>    Show a single article");
    println!("  categories        List categories");
    println!("  subscribe <email> Subscribe to the newsletter");
    println!("  contact           Send a message (--name, --email, <message>)");
    println!("  init              Create default config file");
    println!("  help              Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("  hubfeed articles --featured --per-page 3");
    println!("  hubfeed articles --category snowflake --more 1");
    println!("  hubfeed article airflow-best-practices");
    println!("  hubfeed subscribe you@example.com");
}
