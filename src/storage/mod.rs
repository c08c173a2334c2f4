//! Object storage access: turning cited object locations into download links

pub mod location;
pub mod presign;

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::QueryError;

pub use location::S3Location;
pub use presign::S3UrlSigner;

#[async_trait]
pub trait UrlSigner: Send + Sync {
    /// Returns a time-limited GET URL for the object at `uri`.
    async fn presign(&self, uri: &str, expires_in: Duration) -> Result<String, QueryError>;
}
