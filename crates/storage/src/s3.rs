//! Amazon S3 backend.
//!
//! Puts are conditional on the key being absent (`If-None-Match: *`), so a
//! second write to the same key fails with `PreconditionFailed`.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use stockflow_core::errors::{Error, Result};
use stockflow_core::storage::{ObjectStore, ObjectSummary};
use tracing::debug;

const JSON_CONTENT_TYPE: &str = "application/json";

/// [`ObjectStore`] over an S3 client.
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_conf(config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

fn to_utc(value: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        let mut objects = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page =
                page.map_err(|e| Error::storage_read(bucket, prefix, DisplayErrorContext(e)))?;

            for object in page.contents() {
                let Some(key) = object.key() else {
                    continue;
                };
                // Objects without a timestamp can never be the latest.
                let last_modified = object
                    .last_modified()
                    .and_then(to_utc)
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);

                objects.push(ObjectSummary {
                    key: key.to_string(),
                    last_modified,
                    size: object.size().unwrap_or_default().max(0) as u64,
                });
            }
        }

        debug!("S3 list s3://{}/{}: {} objects", bucket, prefix, objects.len());
        Ok(objects)
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::storage_read(bucket, key, DisplayErrorContext(e)))?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| Error::storage_read(bucket, key, e))?;

        Ok(body.into_bytes().to_vec())
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(JSON_CONTENT_TYPE)
            .if_none_match("*")
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| Error::storage_write(bucket, key, DisplayErrorContext(e)))?;

        debug!("S3 put s3://{}/{} ({} bytes)", bucket, key, size);
        Ok(())
    }
}
