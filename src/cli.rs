// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Usage:
//   fast-crawler <BASE_URL> [--same-domain-only] [--max-concurrent <N>]
//                [--error-level <LEVEL>] [--json]
//
// clap only checks the SHAPE of the arguments (is there a URL, is N a number).
// Whether the URL is a real http/https URL and whether N is at least 1 is
// checked later by CrawlRequest::validate, before any crawling starts.
// =============================================================================

use clap::Parser;

use crate::crawl::CrawlRequest;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "fast-crawler",
    version = "0.1.0",
    about = "Crawl a website breadth-first and list every page visited",
    long_about = "fast-crawler starts at a base URL, follows the links it finds with a bounded \
                  number of concurrent fetches per round, and prints every distinct URL it visited."
)]
pub struct Cli {
    /// URL to start crawling from (e.g., https://example.com)
    ///
    /// This is a positional argument (required, no flag needed)
    pub base_url: String,

    /// Only follow links on the base URL's domain (subdomains included)
    #[arg(long)]
    pub same_domain_only: bool,

    /// Maximum number of pages fetched per round
    #[arg(long, default_value_t = 5)]
    pub max_concurrent: usize,

    /// Log level: trace, debug, info, warn, error or off
    ///
    /// Unknown values fall back to error. RUST_LOG overrides this when set.
    #[arg(long, default_value = "error")]
    pub error_level: String,

    /// Print the result as JSON instead of the plain summary
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    // Builds the crawl request (not yet validated)
    pub fn to_request(&self) -> CrawlRequest {
        CrawlRequest::new(self.base_url.clone(), self.same_domain_only, self.max_concurrent)
    }

    // Maps --error-level to a tracing filter directive
    pub fn log_level(&self) -> &'static str {
        match self.error_level.to_ascii_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" | "warning" => "warn",
            "off" => "off",
            _ => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_all_arguments() {
        let cli = Cli::try_parse_from([
            "fast-crawler",
            "https://example.com",
            "--same-domain-only",
            "--max-concurrent",
            "3",
        ])
        .unwrap();

        assert_eq!(
            cli.to_request(),
            CrawlRequest::new("https://example.com", true, 3)
        );
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["fast-crawler", "https://example.com"]).unwrap();
        assert!(!cli.same_domain_only);
        assert_eq!(cli.max_concurrent, 5);
        assert_eq!(cli.log_level(), "error");
        assert!(!cli.json);
    }

    #[test]
    fn test_missing_base_url_is_an_error() {
        assert!(Cli::try_parse_from(["fast-crawler"]).is_err());
    }

    #[test]
    fn test_non_numeric_max_concurrent_is_an_error() {
        let parsed = Cli::try_parse_from([
            "fast-crawler",
            "https://example.com",
            "--max-concurrent",
            "lots",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_zero_max_concurrent_parses_but_fails_validation() {
        let cli = Cli::try_parse_from([
            "fast-crawler",
            "https://example.com",
            "--max-concurrent",
            "0",
        ])
        .unwrap();
        assert!(cli.to_request().validate().is_err());
    }

    #[test]
    fn test_log_level_mapping() {
        let level = |value: &str| {
            Cli::try_parse_from(["fast-crawler", "https://example.com", "--error-level", value])
                .unwrap()
                .log_level()
        };
        assert_eq!(level("DEBUG"), "debug");
        assert_eq!(level("warn"), "warn");
        assert_eq!(level("nonsense"), "error");
    }
}
