use crate::error::FeedError;
use async_trait::async_trait;
use std::path::PathBuf;

/// Package list published for the Shai-Hulud 2 npm campaign.
pub const DEFAULT_FEED_URL: &str = "https://raw.githubusercontent.com/wiz-sec-public/wiz-research-iocs/refs/heads/main/reports/shai-hulud-2-packages.csv";

/// Where the raw indicator CSV comes from.
///
/// A failed fetch is fatal to the run: there is no retry and no cached copy.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable location, for logs and progress messages.
    fn name(&self) -> String;

    async fn fetch(&self) -> Result<String, FeedError>;
}

/// Fetches the feed over HTTP(S).
pub struct HttpFeed {
    client: reqwest::Client,
    url: String,
}

impl HttpFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Default for HttpFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_URL)
    }
}

#[async_trait]
impl FeedSource for HttpFeed {
    fn name(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String, FeedError> {
        let fetch_err = |source| FeedError::Fetch {
            url: self.url.clone(),
            source,
        };

        let response = self.client.get(&self.url).send().await.map_err(fetch_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(fetch_err)
    }
}

/// Reads the feed from a local CSV file.
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for FileFeed {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String, FeedError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FeedError::Read {
                path: self.path.clone(),
                source,
            })
    }
}
