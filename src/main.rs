// src/main.rs
// =============================================================================
// This is the entry point of docker-find.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr only; stdout is for the listing)
// 3. Dispatch to the subcommand handler
// 4. Exit with proper code (0 = success, 1 = error)
//
// `find` has two shapes:
// - interactive: pages stream into $PAGER, one page per key press
// - batch: one page, filtered, printed straight to stdout
// =============================================================================

mod cli;
mod config;
mod hub;
mod output;
mod pager;
mod plugin;
mod render;

use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, FindArgs};
use config::Config;
use hub::{Detail, HubClient};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for (level, cause) in e.chain().skip(1).enumerate() {
                eprintln!("{:indent$}Caused by: {}", "", cause, indent = (level + 1) * 2);
            }
            1
        }
    };

    // Exiting here also drops a stdin read that may still be blocked
    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::PluginMetadata => {
            plugin::write_metadata(&mut io::stdout().lock(), &plugin::Metadata::current())?;
            Ok(0)
        }
        Commands::Find(args) => {
            let config = Config::new(&cli.hub_url, &cli.namespace, cli.pager.as_deref())?;
            handle_find(&config, &args).await
        }
    }
}

// RUST_LOG wins; otherwise -v raises the level one step at a time
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

// Handles the 'find' subcommand
async fn handle_find(config: &Config, args: &FindArgs) -> Result<i32> {
    let client = HubClient::new(config)?;
    tracing::info!(name = %args.name, hub = %config.hub_url, "finding images");

    if args.detail || args.only_detail {
        let detail = client.fetch_detail(&args.name).await?;
        print_detail(&detail, args.raw_description)?;

        if args.only_detail {
            return Ok(0);
        }

        println!("\nImages: ");
    }

    let opts = args.find_options();

    if args.is_batch() {
        let images = client.find_batch(&opts).await?;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        if !args.no_header {
            writeln!(out, "{}", output::format_header())?;
        }
        for image in &images {
            writeln!(out, "{}", output::format_image(image))?;
        }
        out.flush().context("failed to write to stdout")?;

        return Ok(0);
    }

    let first = client.find_images(&opts)?;
    pager::run_session(config, first, tokio::io::stdin(), !args.no_header).await?;

    Ok(0)
}

fn print_detail(detail: &Detail, raw: bool) -> Result<()> {
    let description = detail.full_description.as_deref().unwrap_or_default();
    let description = if raw {
        description.to_string()
    } else {
        render::render_markdown(description, io::stdout().is_terminal())
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}\n", output::format_detail_summary(detail))?;
    writeln!(out, "Description: ")?;
    writeln!(out, "{}", description)?;
    Ok(())
}
