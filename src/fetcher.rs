use crate::types::{AggregatorError, FetchConfig, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{RwLock, Semaphore};
use tracing::{debug, info, warn};

/// Time-to-live result cache keyed by source URL. Optional: it only affects
/// latency and load on the sources, never correctness. Constructed by the
/// caller and injected, so tests get isolated instances.
pub struct FetchCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, (Instant, Arc<String>)>>,
}

impl FetchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    async fn get(&self, url: &str) -> Option<Arc<String>> {
        let entries = self.entries.read().await;
        let (stored_at, body) = entries.get(url)?;
        if stored_at.elapsed() < self.ttl {
            Some(body.clone())
        } else {
            None
        }
    }

    async fn put(&self, url: &str, body: Arc<String>) {
        let mut entries = self.entries.write().await;
        entries.insert(url.to_string(), (Instant::now(), body));
    }
}

/// HTTP retrieval with a global concurrency cap, a fixed identifying
/// User-Agent and a per-request timeout. No retries: a failed fetch is the
/// caller's to isolate.
pub struct Fetcher {
    client: Client,
    limiter: Arc<Semaphore>,
    cache: Option<Arc<FetchCache>>,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Self {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            limiter: Arc::new(Semaphore::new(config.concurrency)),
            cache: None,
        }
    }

    /// Attach a result cache in front of the network. Used by on-demand
    /// callers that may re-aggregate within a short window.
    pub fn with_cache(mut self, cache: Arc<FetchCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Fetch one URL as text. Waits FIFO for a concurrency permit, then
    /// performs a single attempt under the configured timeout.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        if let Some(cache) = &self.cache {
            if let Some(body) = cache.get(url).await {
                debug!("Cache hit: {}", url);
                return Ok(body.as_ref().clone());
            }
        }

        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| AggregatorError::Transport("fetch limiter closed".to_string()))?;

        debug!("Fetching: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Non-success status {} for {}", status, url);
            return Err(AggregatorError::Transport(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.text().await?;
        info!("Fetched {} ({} bytes)", url, body.len());

        if let Some(cache) = &self.cache {
            cache.put(url, Arc::new(body.clone())).await;
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_returns_body_on_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/feed.xml")
            .with_status(200)
            .with_body("<rss/>")
            .create_async()
            .await;

        let fetcher = Fetcher::new(FetchConfig::default());
        let body = fetcher
            .fetch(&format!("{}/feed.xml", server.url()))
            .await
            .unwrap();
        assert_eq!(body, "<rss/>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_a_transport_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/gone")
            .with_status(500)
            .create_async()
            .await;

        let fetcher = Fetcher::new(FetchConfig::default());
        let err = fetcher
            .fetch(&format!("{}/gone", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, AggregatorError::Transport(_)));
    }

    #[tokio::test]
    async fn cache_serves_repeat_requests_within_ttl() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/cal.ics")
            .with_status(200)
            .with_body("BEGIN:VCALENDAR\nEND:VCALENDAR")
            .expect(1)
            .create_async()
            .await;

        let cache = Arc::new(FetchCache::new(Duration::from_secs(600)));
        let fetcher = Fetcher::new(FetchConfig::default()).with_cache(cache);
        let url = format!("{}/cal.ics", server.url());

        let first = fetcher.fetch(&url).await.unwrap();
        let second = fetcher.fetch(&url).await.unwrap();
        assert_eq!(first, second);
        mock.assert_async().await;
    }
}
