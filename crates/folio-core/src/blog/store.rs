//! Post index loading.
//!
//! Fetches the JSON post index from a URL or a local file and extracts its
//! `posts` array. Nothing is cached: every call returns a fresh snapshot.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::post::Post;

/// Categories of load failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// Transport failed: connection error, non-success HTTP status, unreadable file
    Network,
    /// Body is not valid JSON
    Parse,
    /// JSON is valid but has no usable `posts` array
    Shape,
}

impl fmt::Display for LoadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadErrorKind::Network => write!(f, "network"),
            LoadErrorKind::Parse => write!(f, "parse"),
            LoadErrorKind::Shape => write!(f, "shape"),
        }
    }
}

/// Structured error from loading the post index.
#[derive(Debug, Clone)]
pub struct LoadError {
    pub kind: LoadErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional underlying cause
    pub details: Option<String>,
}

impl LoadError {
    pub fn new(kind: LoadErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(LoadErrorKind::Network, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(LoadErrorKind::Parse, message)
    }

    pub fn shape(message: impl Into<String>) -> Self {
        Self::new(LoadErrorKind::Shape, message)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {details}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for LoadError {}

/// Result type for index loading.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Where the post index lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostSource {
    Url(Url),
    File(PathBuf),
}

impl PostSource {
    /// Interprets a user-supplied source string.
    ///
    /// `http`/`https` URLs are fetched over the network, `file://` URLs and
    /// everything else are treated as local paths.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => PostSource::Url(url),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map_or_else(|()| PostSource::File(PathBuf::from(trimmed)), PostSource::File),
            _ => PostSource::File(PathBuf::from(trimmed)),
        }
    }
}

impl From<&str> for PostSource {
    fn from(raw: &str) -> Self {
        PostSource::parse(raw)
    }
}

impl fmt::Display for PostSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostSource::Url(url) => write!(f, "{url}"),
            PostSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Transport options for [`load_with`].
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Request timeout for URL sources (`None` disables).
    pub timeout: Option<Duration>,
}

impl LoadOptions {
    /// Builds options from a timeout in seconds, where 0 disables it.
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            timeout: (secs > 0).then(|| Duration::from_secs(secs)),
        }
    }
}

/// Loads the post index with default options.
///
/// # Errors
/// Returns a [`LoadError`] if the source cannot be read, is not JSON, or has
/// no `posts` array.
pub async fn load(source: &PostSource) -> LoadResult<Vec<Post>> {
    load_with(source, &LoadOptions::default()).await
}

/// Loads the post index.
///
/// # Errors
/// Returns a [`LoadError`] if the source cannot be read, is not JSON, or has
/// no `posts` array.
pub async fn load_with(source: &PostSource, options: &LoadOptions) -> LoadResult<Vec<Post>> {
    tracing::debug!(%source, "loading post index");

    let body = match source {
        PostSource::Url(url) => fetch_url(url, options).await?,
        PostSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|error| {
            LoadError::network(format!("Failed to read {}", path.display()))
                .with_details(error.to_string())
        })?,
    };

    let posts = parse_index(&body)?;
    tracing::debug!(%source, count = posts.len(), "loaded post index");
    Ok(posts)
}

async fn fetch_url(url: &Url, options: &LoadOptions) -> LoadResult<String> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().map_err(|error| {
        LoadError::network("Failed to build HTTP client").with_details(error.to_string())
    })?;

    let response = client.get(url.clone()).send().await.map_err(|error| {
        let message = if error.is_timeout() {
            format!("Request to {url} timed out")
        } else {
            format!("Request to {url} failed")
        };
        LoadError::network(message).with_details(error.to_string())
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::network(format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )));
    }

    response.text().await.map_err(|error| {
        LoadError::network(format!("Failed to read response body from {url}"))
            .with_details(error.to_string())
    })
}

/// Extracts the `posts` array from a post index document.
///
/// # Errors
/// Returns a `Parse` error for invalid JSON and a `Shape` error when the
/// `posts` field is missing or its entries are not post objects.
pub fn parse_index(body: &str) -> LoadResult<Vec<Post>> {
    let document: Value = serde_json::from_str(body).map_err(|error| {
        LoadError::parse("Post index is not valid JSON").with_details(error.to_string())
    })?;

    let Some(posts) = document.get("posts") else {
        return Err(LoadError::shape("Post index has no `posts` field"));
    };

    Vec::<Post>::deserialize(posts).map_err(|error| {
        LoadError::shape("Post index `posts` field is malformed").with_details(error.to_string())
    })
}
