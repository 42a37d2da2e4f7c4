// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
//   docker-find [global options] find <name> [options]
//   docker-find docker-cli-plugin-metadata
//
// Global options can also come from the environment (clap's `env` feature):
// DOCKER_FIND_HUB_URL, DOCKER_FIND_NAMESPACE and PAGER.
// =============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{DEFAULT_HUB_URL, DEFAULT_NAMESPACE};
use crate::hub::FindOptions;

#[derive(Parser, Debug)]
#[command(
    name = "docker-find",
    version,
    about = "Find image tags on Docker Hub",
    long_about = "docker-find lists the tags of a Docker Hub repository, page by page through your pager. \
                  It also works as a Docker CLI plugin: `docker find nginx`."
)]
pub struct Cli {
    /// Base URL of the Docker Hub API
    #[arg(long, global = true, env = "DOCKER_FIND_HUB_URL", default_value = DEFAULT_HUB_URL)]
    pub hub_url: String,

    /// Namespace used for names without one ("nginx" -> "library/nginx")
    #[arg(long, global = true, env = "DOCKER_FIND_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Pager used for the interactive listing (default: less)
    #[arg(long, global = true, env = "PAGER")]
    pub pager: Option<String>,

    /// More logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find images
    ///
    /// Example: docker-find find nginx -P 50
    Find(FindArgs),

    /// Docker CLI plugin metadata
    #[command(name = "docker-cli-plugin-metadata", hide = true)]
    PluginMetadata,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct FindArgs {
    /// Repository name, e.g. "nginx" or "bitnami/redis"
    pub name: String,

    /// The page number
    #[arg(short = 'p', long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// The number of images to return per page
    #[arg(short = 'P', long, default_value_t = 25, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub page_size: u32,

    /// Hide the header
    #[arg(short = 'H', long)]
    pub no_header: bool,

    /// Show detail of the image
    #[arg(short = 'd', long)]
    pub detail: bool,

    /// Only show detail of the image
    #[arg(short = 'D', long)]
    pub only_detail: bool,

    /// Print the description as-is instead of rendering the Markdown
    #[arg(long)]
    pub raw_description: bool,

    /// Leave out tags whose name contains this text (no pager)
    #[arg(short = 't', long)]
    pub tag: Option<String>,

    /// Print at most this many images (no pager)
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,

    /// Only images updated after this time, RFC 3339 or YYYY-MM-DD (no pager)
    #[arg(short = 'a', long, value_parser = parse_after)]
    pub after: Option<DateTime<Utc>>,

    /// Print one page to stdout instead of using the pager
    #[arg(long)]
    pub no_pager: bool,
}

impl FindArgs {
    // Any of the filtering flags switches to the one-shot batch listing
    pub fn is_batch(&self) -> bool {
        self.tag.is_some() || self.limit.is_some() || self.after.is_some() || self.no_pager
    }

    pub fn find_options(&self) -> FindOptions {
        FindOptions {
            page: self.page,
            page_size: self.page_size,
            tag: self.tag.clone(),
            limit: self.limit,
            after: self.after,
            ..FindOptions::new(self.name.clone())
        }
    }
}

// Parses the --after cutoff
//
// "2024-01-31T12:00:00Z" -> that instant
// "2024-01-31"           -> midnight UTC of that day
fn parse_after(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| format!("invalid time '{}': expected RFC 3339 or YYYY-MM-DD", value))
}
