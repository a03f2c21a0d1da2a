//! # sift-cli
//!
//! The `sift` command: runs indexing passes, queries the active index and
//! manages sitemap files and the configuration file.
//!
//! - [`cli`]: Argument definitions
//! - [`commands`]: Index, search, autocomplete and sitemap handlers
//! - [`config_handlers`]: `sift config` subcommands and dotted-key helpers
//! - [`logging`]: Subscriber setup

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config_handlers;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
