use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use std::time::Duration;
use tracing::debug;

use super::{S3Location, UrlSigner};
use crate::errors::QueryError;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Presigns S3 `GetObject` requests that open inline in the browser.
pub struct S3UrlSigner {
    client: S3Client,
}

impl S3UrlSigner {
    #[must_use]
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn from_conf(shared: &aws_config::SdkConfig) -> Self {
        Self::new(S3Client::new(shared))
    }
}

#[async_trait]
impl UrlSigner for S3UrlSigner {
    async fn presign(&self, uri: &str, expires_in: Duration) -> Result<String, QueryError> {
        let location = S3Location::parse(uri)?;
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| QueryError::SigningError(format!("presigning config: {e}")))?;

        let request = self
            .client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .response_content_disposition(content_disposition(location.file_name()))
            .response_content_type(content_type_for(&location.key))
            .presigned(presigning)
            .await
            .map_err(|e| QueryError::SigningError(format!("{}", DisplayErrorContext(&e))))?;

        debug!(bucket = %location.bucket, key = %location.key, "Presigned object URL");
        Ok(request.uri().to_string())
    }
}

/// `inline` disposition carrying the original file name (RFC 6266 / RFC 5987).
#[must_use]
pub fn content_disposition(file_name: &str) -> String {
    format!(
        "inline; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    )
}

#[must_use]
pub fn content_type_for(key: &str) -> String {
    mime_guess::from_path(key)
        .first_raw()
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_is_inline_with_encoded_name() {
        assert_eq!(
            content_disposition("Employee Handbook.pdf"),
            "inline; filename*=UTF-8''Employee%20Handbook.pdf"
        );
    }

    #[test]
    fn content_type_is_guessed_from_extension() {
        assert_eq!(content_type_for("docs/report.pdf"), "application/pdf");
        assert_eq!(content_type_for("docs/notes.txt"), "text/plain");
        assert_eq!(content_type_for("docs/blob"), FALLBACK_CONTENT_TYPE);
    }
}
