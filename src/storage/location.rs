use url::Url;

use crate::errors::QueryError;

/// Bucket and key parsed from an `s3://bucket/key` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
}

impl S3Location {
    /// # Errors
    ///
    /// Returns `QueryError::SigningError` if `uri` is not an `s3://` URI with
    /// both a bucket and a non-empty key.
    pub fn parse(uri: &str) -> Result<Self, QueryError> {
        let url = Url::parse(uri)
            .map_err(|e| QueryError::SigningError(format!("invalid object URI '{uri}': {e}")))?;

        if url.scheme() != "s3" {
            return Err(QueryError::SigningError(format!(
                "unsupported scheme '{}' in '{uri}'",
                url.scheme()
            )));
        }

        let bucket = match url.host_str() {
            Some(b) if !b.is_empty() => b.to_string(),
            _ => {
                return Err(QueryError::SigningError(format!(
                    "missing bucket in '{uri}'"
                )));
            }
        };

        // Url percent-encodes spaces and other characters in the path.
        let raw_key = url.path().trim_start_matches('/');
        let key = urlencoding::decode(raw_key)
            .map_err(|e| QueryError::SigningError(format!("invalid key in '{uri}': {e}")))?
            .into_owned();
        if key.is_empty() {
            return Err(QueryError::SigningError(format!("missing key in '{uri}'")));
        }

        Ok(Self { bucket, key })
    }

    /// Last path segment of the key, used as the download file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}
