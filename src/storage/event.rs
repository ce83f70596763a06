use anyhow::{Context, Result};
use serde::Deserialize;

/// Object-created notification, in the S3 event shape so payloads emitted by
/// a real bucket notification can be fed in unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageEvent {
    #[serde(rename = "Records")]
    pub records: Vec<EventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketRef,
    pub object: ObjectRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRef {
    pub key: String,
}

impl StorageEvent {
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).context("Failed to parse storage event payload")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bucket_and_key_from_notification() {
        let payload = r#"{
            "Records": [
                {
                    "eventName": "ObjectCreated:Put",
                    "s3": {
                        "bucket": {"name": "casas-raw", "arn": "arn:aws:s3:::casas-raw"},
                        "object": {"key": "pagina_1_2025-03-10.html", "size": 1024}
                    }
                }
            ]
        }"#;

        let event = StorageEvent::from_json(payload).unwrap();
        assert_eq!(event.records.len(), 1);
        assert_eq!(event.records[0].s3.bucket.name, "casas-raw");
        assert_eq!(event.records[0].s3.object.key, "pagina_1_2025-03-10.html");
    }

    #[test]
    fn rejects_payload_without_records() {
        assert!(StorageEvent::from_json(r#"{"Detail": "nope"}"#).is_err());
    }
}
