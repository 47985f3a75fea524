// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Where the three dashboard documents come from.
//!
//! A [`DataSource`] hands back raw document bodies. Parsing and the
//! tolerance rules for partial data live in [`crate::loader`].

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

use crate::error::{Result, StoreError};

/// One of the published documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Document {
    /// Current result rows.
    Results,
    /// Run metadata.
    Meta,
    /// Historical entries.
    History,
}

impl Document {
    /// File name under the data location.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Results => "results.json",
            Self::Meta => "meta.json",
            Self::History => "history.json",
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Fetches raw document bodies.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Body of `document`.
    async fn fetch(&self, document: Document) -> Result<String>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Documents in a local directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    /// Source rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DataSource for FileSource {
    async fn fetch(&self, document: Document) -> Result<String> {
        let path = self.dir.join(document.file_name());
        debug!(path = %path.display(), "Reading document");
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Documents published under a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Source for `base_url` using a default client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Source for `base_url` using `client`.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    /// Full URL of `document`.
    pub fn url(&self, document: Document) -> String {
        format!("{}/{}", self.base_url, document.file_name())
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self, document: Document) -> Result<String> {
        let url = self.url(document);
        debug!(url = %url, "Fetching document");

        let response = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(url));
        }
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.text().await?)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// `http(s)://` locations become an [`HttpSource`]; anything else is a directory.
pub fn source_from_location(location: &str) -> Box<dyn DataSource> {
    let location = location.trim();
    let lower = location.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Box::new(HttpSource::new(location))
    } else {
        Box::new(FileSource::new(location))
    }
}
