// Copyright 2026 typescrape Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use typescrape::cli::{self, output};
use typescrape::config::Config;

#[derive(Parser)]
#[command(
    name = "typescrape",
    about = "Scrape resource reference docs into TypeScript declarations",
    version,
    after_help = "Run 'typescrape <command> --help' for details on each command."
)]
struct Cli {
    /// Config file (default: $TYPESCRAPE_CONFIG, then ./typescrape.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Fetch every page over the network, bypassing the page cache
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape resource pages and emit their declarations
    Generate {
        /// Resource page URLs
        urls: Vec<String>,
        /// Write one <Identifier>.ts per page here instead of printing
        #[arg(long)]
        out: Option<PathBuf>,
        /// File with more URLs, one per line ('#' starts a comment)
        #[arg(long)]
        index: Option<PathBuf>,
        /// Pages scraped at once (overrides the config file)
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Print the resolved schema graph of one page as JSON
    Inspect {
        /// Resource page URL
        url: String,
    },
    /// Manage the page cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Remove every cached page
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all handlers can check them
    if cli.json {
        std::env::set_var(output::JSON_ENV, "1");
    }
    if cli.quiet {
        std::env::set_var(output::QUIET_ENV, "1");
    }
    init_tracing(cli.verbose, cli.json);

    let result = run(cli).await;

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if output::is_json() {
            output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        } else if !output::is_quiet() {
            eprintln!("  Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "typescrape", &mut std::io::stdout());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            urls,
            out,
            index,
            concurrency,
        } => {
            let source = cli::build_source(&config, cli.no_cache)?;
            cli::generate_cmd::run(
                source.as_ref(),
                &config.emit_options(),
                &urls,
                index.as_deref(),
                out.as_deref(),
                concurrency.unwrap_or(config.concurrency),
            )
            .await
        }
        Commands::Inspect { url } => {
            let source = cli::build_source(&config, cli.no_cache)?;
            cli::inspect_cmd::run(source.as_ref(), &url).await
        }
        Commands::Cache {
            action: CacheAction::Clear,
        } => cli::cache_cmd::run_clear(&config),
        Commands::Completions { .. } => Ok(()),
    }
}

/// Logs go to stderr; `RUST_LOG` wins over the defaults.
fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose { "typescrape=debug" } else { "typescrape=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
