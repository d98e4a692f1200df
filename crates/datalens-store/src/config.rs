//! Store connection settings.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "ap-northeast-1";

/// Bucket used when none is configured.
pub const DEFAULT_BUCKET: &str = "bi-datasets";

/// Default deadline for one fetch, retries included.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection settings for an S3-compatible bucket.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Custom endpoint (MinIO, LocalStack). `None` uses AWS.
    pub endpoint: Option<String>,
    pub region: String,
    pub bucket: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    /// Allow plain HTTP. Defaults to true for `http://` endpoints.
    pub allow_http: Option<bool>,
    pub retry: RetryPolicy,
    /// Deadline for one fetch including all retries, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: DEFAULT_REGION.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            access_key: None,
            secret_key: None,
            allow_http: None,
            retry: RetryPolicy::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Whether plain HTTP is permitted for this endpoint.
    #[must_use]
    pub fn allows_http(&self) -> bool {
        self.allow_http.unwrap_or_else(|| {
            self.endpoint
                .as_deref()
                .is_some_and(|endpoint| endpoint.starts_with("http://"))
        })
    }
}

// Credentials stay out of logs.
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("access_key", &self.access_key.as_ref().map(|_| "***"))
            .field("secret_key", &self.secret_key.as_ref().map(|_| "***"))
            .field("allow_http", &self.allows_http())
            .field("retry", &self.retry)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
