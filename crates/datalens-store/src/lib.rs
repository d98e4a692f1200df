//! Object store access for datalens.
//!
//! [`DatasetStore`] fetches raw dataset bytes from an S3-compatible bucket.
//! It knows nothing about formats: callers get bytes (or a byte stream) and
//! a [`StoreError`] classified as not-found, access, or transient.
//!
//! Transient failures are retried with bounded exponential backoff
//! ([`RetryPolicy`]) and the whole fetch, retries included, runs under the
//! configured request timeout.

mod client;
mod config;
mod error;
mod retry;

pub use client::{ByteStream, DatasetStore, ObjectInfo};
pub use config::{DEFAULT_BUCKET, DEFAULT_REGION, StoreConfig};
pub use error::StoreError;
pub use retry::RetryPolicy;
