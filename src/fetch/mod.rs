//! Remote asset downloads.
//!
//! Handlers only need "given a URL, give me a byte stream". [`FileFetcher`]
//! is that seam; [`HttpFetcher`] is the production implementation and tests
//! plug in canned content instead.

use std::future::Future;
use std::io;
use std::pin::Pin;

use futures::TryStreamExt;
use thiserror::Error;
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;
use tracing::debug;

/// A streamed asset body.
pub type AssetStream = Pin<Box<dyn AsyncRead + Send>>;

/// Errors from fetching an asset.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or its response could not be read.
    #[error("request for {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("request for {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Fetches remote files as byte streams.
///
/// # Example (canned content for tests)
///
/// ```ignore
/// struct Canned(&'static [u8]);
///
/// impl FileFetcher for Canned {
///     async fn fetch(&self, _url: &str) -> Result<AssetStream, FetchError> {
///         Ok(Box::pin(std::io::Cursor::new(self.0)))
///     }
/// }
/// ```
pub trait FileFetcher: Send + Sync {
    /// Starts a download and returns its body.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<AssetStream, FetchError>> + Send;
}

/// Fetches assets over HTTP(S).
///
/// No timeout is configured: a stalled download stalls the worker.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a default client.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("theme-mirror/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Creates a fetcher around a pre-configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        HttpFetcher { client }
    }
}

impl FileFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<AssetStream, FetchError> {
        let request_failed = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        debug!(url, %status, "Fetching asset");

        let body = response.bytes_stream().map_err(io::Error::other);
        Ok(Box::pin(StreamReader::new(body)))
    }
}
