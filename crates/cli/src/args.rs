//! Command-line surface of `thorns`.

use clap::{Parser, Subcommand};
use thorns_core::CacheDomain;

#[derive(Parser, Debug)]
#[command(name = "thorns", version, about = "Cached fractalthorns API client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// All news entries
    News,
    /// One image; the daily image when no name is given
    Image {
        name: Option<String>,
        /// Also fetch the image and thumbnail payloads
        #[arg(long)]
        contents: bool,
    },
    /// Description of an image
    Description { name: String },
    /// Every image
    Images,
    /// Every chapter and its records
    Episodic,
    /// One record
    Record { name: String },
    /// Text of one record
    Text { name: String },
    /// Text of every solved record
    FullText,
    /// Search by term; TYPE is image, episodic-item or episodic-line
    Search {
        term: String,
        #[arg(value_name = "TYPE")]
        kind: String,
    },
    /// Cache inspection and purging
    Cache(CacheArgs),
}

#[derive(Parser, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheCmd,
}

#[derive(Subcommand, Debug)]
pub enum CacheCmd {
    /// Print the entries of a domain with their cache and expiry times
    Show {
        domain: CacheDomain,
        /// Include entries past their freshness window
        #[arg(long)]
        include_stale: bool,
    },
    /// Clear a domain, subject to its purge cooldown
    Purge {
        domain: CacheDomain,
        /// Ignore the cooldown
        #[arg(long)]
        force: bool,
    },
}
