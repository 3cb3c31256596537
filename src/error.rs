//! Error types.
//!
//! Feed errors are fatal to a scan run. Parse errors are per file and are
//! turned into an empty contribution by [`crate::parser::parse_manifest`].

use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain the indicator feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to fetch indicator feed from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("indicator feed at {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read indicator feed {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to extract dependencies from a single manifest or lockfile.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unexpected document shape: {0}")]
    Schema(&'static str),
}
