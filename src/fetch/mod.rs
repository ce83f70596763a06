use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::models::capture_date;
use crate::storage::ObjectStore;

/// Batch fetch configuration.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Listing pages to download, in order.
    pub urls: Vec<String>,
    /// Bucket receiving the raw HTML.
    pub input_bucket: String,
    /// Attempts per URL before giving up on it.
    pub max_attempts: u32,
    /// Fixed delay between attempts. No backoff growth, no jitter.
    pub retry_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            urls: (1..=10)
                .map(|page| format!("https://www.fincaraiz.com.co/venta/casas/bogota/pagina{page}"))
                .collect(),
            input_bucket: "casas-raw".to_string(),
            max_attempts: 3,
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// Outcome counters for one fetch batch. The batch itself always completes;
/// per-URL failures only show up here.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FetchSummary {
    pub fetched: usize,
    pub failed: usize,
}

/// Downloads listing pages and stores the raw bodies.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Run the whole batch. Raw bodies land under
    /// `pagina_<index>_<date>.html` in the input bucket; a URL that fails
    /// every attempt is logged and skipped.
    pub async fn run(&self, store: &dyn ObjectStore) -> Result<FetchSummary> {
        let fecha = capture_date();
        let mut summary = FetchSummary::default();

        for (idx, url) in self.config.urls.iter().enumerate() {
            match self.fetch_page(url).await {
                Ok(body) => {
                    let key = format!("pagina_{}_{}.html", idx + 1, fecha);
                    info!("Storing {} ({} bytes)", key, body.len());
                    store
                        .put_object(&self.config.input_bucket, &key, body.into_bytes())
                        .await?;
                    summary.fetched += 1;
                }
                Err(e) => {
                    warn!(
                        "Giving up on {} after {} attempts: {}",
                        url, self.config.max_attempts, e
                    );
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Fetch batch complete: {} stored, {} skipped",
            summary.fetched, summary.failed
        );
        Ok(summary)
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let mut last_error = None;

        for attempt in 1..=self.config.max_attempts {
            debug!("Fetching {} (attempt {}/{})", url, attempt, self.config.max_attempts);

            match self.request(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    warn!("Attempt {}/{} failed for {}: {}", attempt, self.config.max_attempts, url, e);
                    last_error = Some(e);
                    if attempt < self.config.max_attempts {
                        sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("No fetch attempts configured")))
    }

    async fn request(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            anyhow::bail!("Server returned status {}", response.status());
        }

        response.text().await.context("Failed to read response body")
    }
}
