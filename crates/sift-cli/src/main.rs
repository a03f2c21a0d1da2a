//! Sift CLI
//!
//! Command-line interface for indexing, searching and serving sitemaps.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sift_cli::cli::{Cli, Command, SitemapAction};
use sift_cli::commands::{
    Workspace, render_page, run_autocomplete, run_index, run_search, run_sitemap_show,
    run_sitemap_write,
};
use sift_cli::config_handlers::handle_config_command;
use sift_cli::logging::init_logging;
use sift_query::SearchProvider;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    tracing::debug!(command = ?cli.command, "Starting sift");
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Config { action } => {
            handle_config_command(config_path, action)?;
        }
        Command::Index(args) => {
            let workspace = Workspace::load(config_path)?;
            let report = run_index(&workspace, &args)?;
            println!(
                "Indexed {} node(s) into generation {} ({} error(s))",
                report.nodes_indexed,
                report.activation.generation,
                report.errors.len()
            );
            for message in report.error_messages() {
                eprintln!("{message}");
            }
            return Ok(ExitCode::from(u8::try_from(report.exit_code()).unwrap_or(1)));
        }
        Command::Search(args) => {
            let workspace = Workspace::load(config_path)?;
            let provider: Arc<dyn SearchProvider> = Arc::new(workspace.open_index()?);
            let page = run_search(&workspace, provider, &args).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                print!("{}", render_page(&page));
            }
        }
        Command::Autocomplete(args) => {
            let workspace = Workspace::load(config_path)?;
            let provider: Arc<dyn SearchProvider> = Arc::new(workspace.open_index()?);
            for word in run_autocomplete(&workspace, provider, &args).await? {
                println!("{word}");
            }
        }
        Command::Sitemap { action } => {
            let workspace = Workspace::load(config_path)?;
            match action {
                SitemapAction::Write { output } => {
                    let dir = workspace
                        .sitemap_dir(output.as_deref())
                        .context("no output directory: pass --output or set sitemap.output_dir")?;
                    let provider: Arc<dyn SearchProvider> = Arc::new(workspace.open_index()?);
                    let files = run_sitemap_write(&workspace, provider, &dir).await?;
                    println!(
                        "Wrote {} chunk(s) for {} host(s) to {}",
                        files.chunk_count(),
                        files.hosts.len(),
                        dir.display()
                    );
                }
                SitemapAction::Show {
                    host,
                    chunk,
                    base_url,
                    dir,
                } => {
                    let dir = workspace
                        .sitemap_dir(dir.as_deref())
                        .context("no sitemap directory: pass --dir or set sitemap.output_dir")?;
                    let xml = run_sitemap_show(
                        &workspace,
                        &dir,
                        &host,
                        chunk.as_deref(),
                        base_url.as_deref(),
                    )?;
                    print!("{xml}");
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
