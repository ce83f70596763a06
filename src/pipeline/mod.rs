use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::extract;
use crate::models::{capture_date, Listing};
use crate::storage::{ObjectStore, StorageEvent};

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Bucket receiving the CSV reports.
    pub output_bucket: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            output_bucket: "casas-reportes".to_string(),
        }
    }
}

/// Turns stored raw pages into dated CSV reports.
pub struct Extractor {
    config: ExtractConfig,
}

impl Extractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// Process every object named in a notification. Objects are independent:
    /// one failing is logged and skipped, the handler still reports success.
    pub async fn handle_event(&self, store: &dyn ObjectStore, event: &StorageEvent) -> Result<()> {
        for record in &event.records {
            let bucket = &record.s3.bucket.name;
            let key = &record.s3.object.key;
            info!("Processing {}/{}", bucket, key);

            if let Err(e) = self.process_object(store, bucket, key).await {
                warn!("Skipping {}/{}: {:#}", bucket, key, e);
            }
        }
        Ok(())
    }

    /// Extract one raw page and upload the report. Reprocessing the same day
    /// overwrites the same `<date>/<date>.csv` key.
    pub async fn process_object(
        &self,
        store: &dyn ObjectStore,
        bucket: &str,
        key: &str,
    ) -> Result<()> {
        let body = store.get_object(bucket, key).await?;
        let html = String::from_utf8(body).context("Object is not valid UTF-8")?;

        let fecha = capture_date();
        let listings = extract::extract_listings(&html, &fecha);
        if listings.is_empty() {
            warn!("No listings found in {}/{}", bucket, key);
            return Ok(());
        }

        let temp_path = std::env::temp_dir().join(format!("{fecha}.csv"));
        write_csv(&temp_path, &listings)?;

        let report = tokio::fs::read(&temp_path)
            .await
            .with_context(|| format!("Failed to read back {}", temp_path.display()))?;
        let output_key = format!("{fecha}/{fecha}.csv");
        store
            .put_object(&self.config.output_bucket, &output_key, report)
            .await?;

        info!(
            "Report with {} listings stored at {}/{}",
            listings.len(),
            self.config.output_bucket,
            output_key
        );
        Ok(())
    }
}

fn write_csv(path: &Path, listings: &[Listing]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))?;

    // Headers come from the serde renames on the first serialized record.
    for listing in listings {
        writer.serialize(listing).context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush CSV")?;
    Ok(())
}
