//! Dataset fetching over `object_store`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{ObjectStore, RetryConfig};
use tracing::{Instrument, debug, info_span};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::retry::RetryPolicy;

/// Stream of byte chunks for one object.
pub type ByteStream = BoxStream<'static, Result<Bytes, StoreError>>;

/// Object metadata returned by [`DatasetStore::head`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// Read-only client for dataset objects in one bucket.
#[derive(Clone)]
pub struct DatasetStore {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    retry: RetryPolicy,
    timeout: Duration,
}

impl fmt::Debug for DatasetStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetStore")
            .field("store", &self.store.to_string())
            .field("bucket", &self.bucket)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl DatasetStore {
    /// Builds an S3 client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the S3 builder rejects the settings.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut builder = AmazonS3Builder::new()
            .with_region(&config.region)
            .with_bucket_name(&config.bucket)
            .with_allow_http(config.allows_http())
            // Retries are handled by RetryPolicy so the deadline covers them.
            .with_retry(RetryConfig {
                max_retries: 0,
                ..RetryConfig::default()
            });
        if let Some(endpoint) = &config.endpoint {
            builder = builder.with_endpoint(endpoint);
        }
        if let Some(access_key) = &config.access_key {
            builder = builder.with_access_key_id(access_key);
        }
        if let Some(secret_key) = &config.secret_key {
            builder = builder.with_secret_access_key(secret_key);
        }
        let store = builder
            .build()
            .map_err(|err| StoreError::Config(err.to_string()))?;
        Ok(Self::with_store(Arc::new(store), config))
    }

    /// Wraps an existing object store, taking retry and deadline settings
    /// from `config`.
    pub fn with_store(store: Arc<dyn ObjectStore>, config: &StoreConfig) -> Self {
        Self {
            store,
            bucket: config.bucket.clone(),
            retry: config.retry,
            timeout: config.request_timeout(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Reads the whole object into one buffer.
    ///
    /// The buffer is pre-sized from the object metadata and filled from the
    /// response stream, so the payload is materialized once.
    ///
    /// # Errors
    ///
    /// `NotFound` and `Access` fail immediately, `Transient` is retried per
    /// the policy, and `DeadlineExceeded` ends the whole fetch.
    pub async fn fetch(&self, key: &str) -> Result<Bytes, StoreError> {
        let span = info_span!("store.fetch", bucket = %self.bucket, key);
        let fetch = self.retry.run(key, |attempt| self.fetch_once(key, attempt));
        self.with_deadline(key, fetch).instrument(span).await
    }

    /// Opens a chunked stream over the object.
    ///
    /// Only opening the stream is retried; errors while reading chunks are
    /// surfaced to the consumer.
    ///
    /// # Errors
    ///
    /// Same classification as [`DatasetStore::fetch`].
    pub async fn fetch_stream(&self, key: &str) -> Result<ByteStream, StoreError> {
        let span = info_span!("store.fetch_stream", bucket = %self.bucket, key);
        let open = self.retry.run(key, |attempt| async move {
            debug!(attempt, "Opening object stream");
            let result = self
                .store
                .get(&Path::from(key))
                .await
                .map_err(|err| StoreError::from_object_store(key, err))?;
            let owned_key = key.to_string();
            let stream: ByteStream = result
                .into_stream()
                .map_err(move |err| StoreError::from_object_store(&owned_key, err))
                .boxed();
            Ok::<_, StoreError>(stream)
        });
        self.with_deadline(key, open).instrument(span).await
    }

    /// Returns size and last-modified time of the object.
    ///
    /// # Errors
    ///
    /// Same classification as [`DatasetStore::fetch`].
    pub async fn head(&self, key: &str) -> Result<ObjectInfo, StoreError> {
        let span = info_span!("store.head", bucket = %self.bucket, key);
        let head = self.retry.run(key, |_| async move {
            let meta = self
                .store
                .head(&Path::from(key))
                .await
                .map_err(|err| StoreError::from_object_store(key, err))?;
            Ok::<_, StoreError>(ObjectInfo {
                key: key.to_string(),
                size: meta.size,
                last_modified: meta.last_modified,
            })
        });
        self.with_deadline(key, head).instrument(span).await
    }

    async fn fetch_once(&self, key: &str, attempt: u32) -> Result<Bytes, StoreError> {
        let map_err = |err: object_store::Error| StoreError::from_object_store(key, err);
        let result = self.store.get(&Path::from(key)).await.map_err(map_err)?;
        let size = usize::try_from(result.meta.size).unwrap_or(0);
        let mut buffer = BytesMut::with_capacity(size);
        let mut stream = result.into_stream();
        while let Some(chunk) = stream.try_next().await.map_err(map_err)? {
            buffer.extend_from_slice(&chunk);
        }
        debug!(attempt, bytes = buffer.len(), "Fetched object");
        Ok(buffer.freeze())
    }

    async fn with_deadline<T>(
        &self,
        key: &str,
        future: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        tokio::time::timeout(self.timeout, future)
            .await
            .map_err(|_| StoreError::DeadlineExceeded {
                key: key.to_string(),
                timeout: self.timeout,
            })?
    }
}

#[cfg(test)]
mod tests {
    use object_store::PutPayload;
    use object_store::memory::InMemory;

    use super::*;

    async fn store_with(key: &str, payload: &'static [u8]) -> DatasetStore {
        let memory = InMemory::new();
        memory
            .put(&Path::from(key), PutPayload::from_static(payload))
            .await
            .unwrap();
        DatasetStore::with_store(Arc::new(memory), &StoreConfig::default())
    }

    #[tokio::test]
    async fn test_fetch_returns_bytes() {
        let store = store_with("sales/orders.csv", b"a,b\n1,2\n").await;
        let bytes = store.fetch("sales/orders.csv").await.unwrap();
        assert_eq!(&bytes[..], b"a,b\n1,2\n");
    }

    #[tokio::test]
    async fn test_fetch_missing_key() {
        let store = store_with("present.csv", b"x").await;
        let err = store.fetch("absent.csv").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { ref key } if key == "absent.csv"));
    }

    #[tokio::test]
    async fn test_fetch_stream_yields_all_bytes() {
        let store = store_with("data.parquet", b"PAR1....PAR1").await;
        let chunks: Vec<Bytes> = store
            .fetch_stream("data.parquet")
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        let joined: Vec<u8> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
        assert_eq!(joined, b"PAR1....PAR1");
    }

    #[tokio::test]
    async fn test_head_reports_size() {
        let store = store_with("a.csv", b"12345").await;
        let info = store.head("a.csv").await.unwrap();
        assert_eq!(info.size, 5);
        assert_eq!(info.key, "a.csv");
    }

    #[test]
    fn test_new_builds_s3_client() {
        let config = StoreConfig {
            endpoint: Some("http://localhost:9000".to_string()),
            access_key: Some("minio".to_string()),
            secret_key: Some("minio123".to_string()),
            ..StoreConfig::default()
        };
        let store = DatasetStore::new(&config).unwrap();
        assert_eq!(store.bucket(), "bi-datasets");
    }
}
