//! `thorns` entry point.
//!
//! Loads configuration, restores the cache and runs one command, printing
//! JSON to stdout. Logging goes to stderr.

use anyhow::Result;
use clap::Parser;
use serde_json::{Value, json};
use thorns_client::ThornsClient;
use thorns_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod args;

use args::{CacheCmd, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    tracing::debug!(cache_dir = %config.cache_dir.display(), base_url = %config.base_url, "Configuration loaded");

    let client = ThornsClient::from_config(&config).await?;
    let output = run(&client, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

async fn run(client: &ThornsClient, command: Commands) -> Result<Value> {
    let value = match command {
        Commands::News => serde_json::to_value(client.all_news().await?)?,
        Commands::Image { name, contents: false } => serde_json::to_value(client.single_image(name.as_deref()).await?)?,
        Commands::Image { name, contents: true } => {
            let (image, contents) = client.image_with_contents(name.as_deref()).await?;
            json!({
                "image": image,
                "image_bytes": contents.image.len(),
                "thumbnail_bytes": contents.thumbnail.len(),
            })
        }
        Commands::Description { name } => serde_json::to_value(client.image_description(&name).await?)?,
        Commands::Images => serde_json::to_value(client.all_images().await?)?,
        Commands::Episodic => serde_json::to_value(client.full_episodic().await?)?,
        Commands::Record { name } => serde_json::to_value(client.single_record(&name).await?)?,
        Commands::Text { name } => serde_json::to_value(client.record_text(&name).await?)?,
        Commands::FullText => serde_json::to_value(client.full_record_contents().await?)?,
        Commands::Search { term, kind } => serde_json::to_value(client.domain_search(&term, &kind).await?)?,
        Commands::Cache(cmd) => match cmd.action {
            CacheCmd::Show { domain, include_stale } => client.cached_items(domain, include_stale).to_json()?,
            CacheCmd::Purge { domain, force } => {
                client.purge(domain, force).await?;
                tracing::info!(%domain, force, "Purged");
                json!({ "purged": domain })
            }
        },
    };
    Ok(value)
}
