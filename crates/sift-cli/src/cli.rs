//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Sift - domain-scoped site search
#[derive(Parser, Debug)]
#[command(name = "sift", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (default: `$SIFT_CONFIG`, then the platform config dir)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a complete indexing pass and activate the result
    Index(IndexArgs),
    /// Search the active index
    Search(SearchArgs),
    /// Complete the last word of a query
    Autocomplete(AutocompleteArgs),
    /// Sitemap files
    Sitemap {
        /// Sitemap action
        #[command(subcommand)]
        action: SitemapAction,
    },
    /// Configuration file
    Config {
        /// Config action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options of `sift index`.
#[derive(Args, Debug, Default)]
pub struct IndexArgs {
    /// Directory to write sitemap files to (overrides `sitemap.output_dir`)
    #[arg(long)]
    pub sitemap_dir: Option<PathBuf>,
}

/// Options of `sift search`.
#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Query string
    pub query: String,

    /// Search domain
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Restrict to a site id
    #[arg(long)]
    pub site: Option<String>,

    /// Restrict to a language code
    #[arg(short, long)]
    pub language: Option<String>,

    /// Comma separated list of allowed tags
    #[arg(short, long)]
    pub tags: Option<String>,

    /// Page number, starting at 1
    #[arg(short, long)]
    pub page: Option<String>,

    /// Results per page
    #[arg(long)]
    pub page_size: Option<String>,

    /// Maximum snippet length
    #[arg(long)]
    pub content_match_length: Option<String>,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

/// Options of `sift autocomplete`.
#[derive(Args, Debug, Default)]
pub struct AutocompleteArgs {
    /// Query typed so far
    pub search: String,

    /// Search domain
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Restrict to a language code
    #[arg(short, long)]
    pub language: Option<String>,
}

/// Sitemap subcommands.
#[derive(Subcommand, Debug)]
pub enum SitemapAction {
    /// Render sitemap files from the active index
    Write {
        /// Output directory (overrides `sitemap.output_dir`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a stored sitemap file as it would be served
    Show {
        /// Host name
        host: String,
        /// Chunk id; the index when omitted
        chunk: Option<String>,
        /// Base URL child references are rewritten to
        #[arg(long)]
        base_url: Option<String>,
        /// Directory the files were written to (overrides `sitemap.output_dir`)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,
    /// Print a value by dotted key
    Get {
        /// Dotted key, e.g. `indexer.batch_size`
        key: String,
    },
    /// Write a default configuration file
    Init {
        /// Target file (default: platform config dir)
        #[arg(short, long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
