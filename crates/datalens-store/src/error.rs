//! Error types for object store access.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while reading from the object store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The key does not exist in the bucket.
    #[error("object '{key}' not found")]
    NotFound { key: String },

    /// Credentials were rejected or lack permission for the key.
    #[error("access denied for '{key}': {message}")]
    Access { key: String, message: String },

    /// Network or service failure; the request may succeed if retried.
    #[error("transient failure reading '{key}': {message}")]
    Transient { key: String, message: String },

    /// The store refused the request in a way retrying cannot fix.
    #[error("store rejected the request for '{key}': {message}")]
    Rejected { key: String, message: String },

    /// The fetch did not complete within the request deadline.
    #[error("fetching '{key}' exceeded the {timeout:?} deadline")]
    DeadlineExceeded { key: String, timeout: Duration },

    /// The store could not be built from its configuration.
    #[error("invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    /// Maps an `object_store` error for `key` onto the store taxonomy.
    pub(crate) fn from_object_store(key: &str, err: object_store::Error) -> Self {
        match err {
            object_store::Error::NotFound { .. } => Self::NotFound {
                key: key.to_string(),
            },
            object_store::Error::PermissionDenied { .. }
            | object_store::Error::Unauthenticated { .. } => Self::Access {
                key: key.to_string(),
                message: err.to_string(),
            },
            object_store::Error::Generic { .. } | object_store::Error::JoinError { .. } => {
                Self::Transient {
                    key: key.to_string(),
                    message: err.to_string(),
                }
            }
            object_store::Error::UnknownConfigurationKey { .. } => Self::Config(err.to_string()),
            // Invalid paths, unsupported operations and failed preconditions.
            other => Self::Rejected {
                key: key.to_string(),
                message: other.to_string(),
            },
        }
    }

    /// Returns whether the backoff loop should try this request again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Returns whether the failure is temporary (retryable or timed out).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::DeadlineExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_mapping() {
        let err = object_store::Error::NotFound {
            path: "a.csv".to_string(),
            source: "missing".into(),
        };
        let mapped = StoreError::from_object_store("a.csv", err);
        assert!(matches!(mapped, StoreError::NotFound { ref key } if key == "a.csv"));
        assert!(!mapped.is_retryable());
    }

    #[test]
    fn test_permission_mapping() {
        let err = object_store::Error::PermissionDenied {
            path: "a.csv".to_string(),
            source: "denied".into(),
        };
        assert!(matches!(
            StoreError::from_object_store("a.csv", err),
            StoreError::Access { .. }
        ));
    }

    #[test]
    fn test_generic_is_transient() {
        let err = object_store::Error::Generic {
            store: "S3",
            source: "connection reset".into(),
        };
        let mapped = StoreError::from_object_store("a.csv", err);
        assert!(mapped.is_retryable());
        assert!(mapped.is_transient());
    }

    #[test]
    fn test_permanent_failures_are_not_retried() {
        let errors = vec![
            object_store::Error::NotImplemented,
            object_store::Error::NotSupported {
                source: "range requests".into(),
            },
            object_store::Error::Precondition {
                path: "a.csv".to_string(),
                source: "etag changed".into(),
            },
            object_store::Error::InvalidPath {
                source: object_store::path::Error::EmptySegment {
                    path: "a//b.csv".to_string(),
                },
            },
        ];
        for err in errors {
            let mapped = StoreError::from_object_store("a.csv", err);
            assert!(matches!(mapped, StoreError::Rejected { .. }), "{mapped}");
            assert!(!mapped.is_retryable());
            assert!(!mapped.is_transient());
        }
    }

    #[test]
    fn test_unknown_configuration_key_is_config() {
        let err = object_store::Error::UnknownConfigurationKey {
            store: "S3",
            key: "aws_regoin".to_string(),
        };
        assert!(matches!(
            StoreError::from_object_store("a.csv", err),
            StoreError::Config(_)
        ));
    }

    #[test]
    fn test_deadline_is_transient_but_not_retried() {
        let err = StoreError::DeadlineExceeded {
            key: "a.csv".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert!(err.is_transient());
        assert!(!err.is_retryable());
    }
}
