//! Tracing configuration for the CLI and for debugging normalization.
//!
//! Supports three output formats controlled by `REPRESENTER_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`
//! - `json`: One JSON object per span/event — machine-readable
//!
//! ```bash
//! # Dump the AST before/after normalization
//! REPRESENTER_LOG=debug php-representer two-fer ./solution ./output
//!
//! # Tree output, scanner only
//! REPRESENTER_LOG=php_representer::scanner=trace REPRESENTER_LOG_FORMAT=tree ...
//! ```
//!
//! Without `REPRESENTER_LOG`/`RUST_LOG` the CLI still reports run progress at
//! `info` level; set either variable to override the filter.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse from the `REPRESENTER_LOG_FORMAT` environment variable.
    fn from_env() -> Self {
        match std::env::var("REPRESENTER_LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Build an `EnvFilter` from `REPRESENTER_LOG`, falling back to `RUST_LOG`,
/// falling back to `info`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("REPRESENTER_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("info")
    }
}

/// Initialise the global tracing subscriber.
///
/// All output goes to stderr so it never interferes with the artifacts
/// written to the output directory.
pub fn init_tracing() {
    let filter = build_filter();
    let format = LogFormat::from_env();

    match format {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
