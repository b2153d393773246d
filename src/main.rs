// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (to stderr, so stdout only carries the report)
// 3. Build the async runtime with the worker pool's thread settings
// 4. Run the crawl, stopping early on Ctrl-C
// 5. Print the report and exit (0 = success, 2 = error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;      // src/cli.rs - command-line parsing
mod config;   // src/config.rs - pool sizing, timeouts, user agent
mod crawl;    // src/crawl/ - the crawl engine
mod error;    // src/error.rs - error types
mod fetch;    // src/fetch/ - HTTP fetching and link extraction

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::{CrawlerConfig, PoolConfig};
use crawl::{CrawlEngine, CrawlResult};
use fetch::HttpFetcher;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let exit_code = match try_main(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("Error during crawl: {:#}", e);
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn try_main(cli: Cli) -> Result<i32> {
    let config = CrawlerConfig::default();
    let runtime = build_runtime(&config.pool)?;
    runtime.block_on(run(cli, config))
}

// Runs one crawl and prints the result
async fn run(cli: Cli, config: CrawlerConfig) -> Result<i32> {
    let request = cli.to_request();
    let fetcher = Arc::new(HttpFetcher::new(&config)?);
    let engine = CrawlEngine::new(config, fetcher);

    // Ctrl-C stops the crawl; whatever was visited is still reported
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping crawl");
            on_interrupt.cancel();
        }
    });

    let result = engine.crawl(request, cancel).await?;
    debug!("crawl completed");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", format_summary(&result));
    }

    Ok(0)
}

// The multi-thread runtime IS the worker pool's thread pool:
// `core_workers` threads, named "<prefix>1", "<prefix>2", ...
fn build_runtime(pool: &PoolConfig) -> std::io::Result<tokio::runtime::Runtime> {
    let prefix = pool.thread_name_prefix.clone();
    let next_id = AtomicUsize::new(1);

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(pool.core_workers.max(1))
        .thread_name_fn(move || format!("{}{}", prefix, next_id.fetch_add(1, Ordering::Relaxed)))
        .enable_all()
        .build()
}

fn init_logging(level: &str) {
    // RUST_LOG wins over --error-level when it's set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// Formats the human-readable report
//
// Output:
//   Crawl completed in <N> seconds
//   Visited <N> pages
//
//   Crawled URLs:
//   <url>
//   ...
fn format_summary(result: &CrawlResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("Crawl completed in {} seconds\n", result.duration.as_secs()));
    out.push_str(&format!("Visited {} pages\n", result.total_pages));
    out.push_str("\nCrawled URLs:\n");

    // visited_urls is a BTreeSet, so this is already lexicographic order
    for url in &result.visited_urls {
        out.push_str(url);
        out.push('\n');
    }
    out
}
