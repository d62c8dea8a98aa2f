// src/utils/http.rs

//! HTTP fetch gateway.
//!
//! All page fetches go through [`PageFetcher`], which layers the on-disk
//! response cache over a configured client and forces UTF-8 decoding for
//! text content.

use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::HttpConfig;
use crate::storage::ResponseCache;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Cache-backed fetcher shared by every extraction routine.
pub struct PageFetcher {
    client: Client,
    cache: ResponseCache,
}

impl PageFetcher {
    /// Create a fetcher from client settings and a response cache.
    pub fn new(config: &HttpConfig, cache: ResponseCache) -> Result<Self> {
        Ok(Self {
            client: create_client(config)?,
            cache,
        })
    }

    /// Fetch a URL's raw body, serving from the cache when possible.
    ///
    /// Transport failures surface as typed errors; the caller decides
    /// whether the fetch was skippable or fatal.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(bytes) = self.cache.get(url).await? {
            log::debug!("Cache hit for {url}");
            return Ok(bytes);
        }

        log::debug!("Fetching {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?.to_vec();

        if status.is_success() {
            self.cache.put(url, &bytes).await?;
        }
        Ok(bytes)
    }

    /// Fetch a URL and decode its body as UTF-8, ignoring any
    /// server-declared encoding. An empty body is a typed failure.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let bytes = self.fetch_bytes(url).await?;
        if bytes.is_empty() {
            return Err(AppError::EmptyResponse {
                url: url.to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fetcher_with_cache(tmp: &TempDir) -> (PageFetcher, ResponseCache) {
        let cache = ResponseCache::new(tmp.path());
        let fetcher = PageFetcher::new(&HttpConfig::default(), cache.clone()).unwrap();
        (fetcher, cache)
    }

    #[test]
    fn test_create_client_from_defaults() {
        assert!(create_client(&HttpConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_fetch_text_serves_cached_body_without_network() {
        let tmp = TempDir::new().unwrap();
        let (fetcher, cache) = fetcher_with_cache(&tmp);

        let body = "<html>кэш</html>";
        cache
            .put("https://docs.example.invalid/", body.as_bytes())
            .await
            .unwrap();

        let text = fetcher
            .fetch_text("https://docs.example.invalid/")
            .await
            .unwrap();
        assert_eq!(text, body);
    }

    #[tokio::test]
    async fn test_cached_empty_body_is_empty_response() {
        let tmp = TempDir::new().unwrap();
        let (fetcher, cache) = fetcher_with_cache(&tmp);

        cache
            .put("https://docs.example.invalid/empty", b"")
            .await
            .unwrap();

        let err = fetcher
            .fetch_text("https://docs.example.invalid/empty")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyResponse { .. }));
    }

    #[tokio::test]
    async fn test_fetch_bytes_keeps_binary_content_verbatim() {
        let tmp = TempDir::new().unwrap();
        let (fetcher, cache) = fetcher_with_cache(&tmp);

        let payload = [0x50, 0x4b, 0x03, 0x04, 0xff, 0x00];
        cache
            .put("https://docs.example.invalid/a.zip", &payload)
            .await
            .unwrap();

        let bytes = fetcher
            .fetch_bytes("https://docs.example.invalid/a.zip")
            .await
            .unwrap();
        assert_eq!(bytes, payload);
    }
}
