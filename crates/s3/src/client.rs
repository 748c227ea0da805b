//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from s3sync-core.
//! The client is built once per process and shared by every transfer task.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use jiff::Timestamp;

use s3sync_core::{
    Credentials, Error, ObjectPage, ObjectReader, ObjectStore, RemoteObjectEntry, Result,
};

/// Endpoint override honored by the SDK configuration loader
const ENDPOINT_URL_ENV: &str = "AWS_ENDPOINT_URL";

/// S3 client wrapper
#[derive(Debug, Clone)]
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client from stored credentials
    ///
    /// The endpoint is resolved from the region unless `AWS_ENDPOINT_URL`
    /// points at another S3-compatible service.
    pub async fn new(credentials: &Credentials) -> Result<Self> {
        let provider = aws_credential_types::Credentials::new(
            credentials.access_key.clone(),
            credentials.secret_key.clone(),
            None, // session token
            None, // expiry
            "s3-sync-static-credentials",
        );

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(provider)
            .region(aws_config::Region::new(credentials.region.clone()))
            .load()
            .await;

        // S3-compatible services behind a custom endpoint expect path-style requests
        let custom_endpoint = std::env::var_os(ENDPOINT_URL_ENV).is_some_and(|v| !v.is_empty());
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(custom_endpoint)
            .build();

        let client = aws_sdk_s3::Client::from_conf(s3_config);
        tracing::debug!("Created S3 client for region {}", credentials.region);

        Ok(Self { inner: client })
    }
}

/// Convert an SDK timestamp, keeping sub-second precision
fn to_timestamp(value: &aws_smithy_types::DateTime) -> Option<Timestamp> {
    Timestamp::new(value.secs(), value.subsec_nanos() as i32).ok()
}

/// Stream an open file as a request body
async fn file_body(
    file: tokio::fs::File,
) -> std::result::Result<ByteStream, aws_smithy_types::byte_stream::error::Error> {
    ByteStream::read_from().file(file).build().await
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        let response = self
            .inner
            .list_buckets()
            .send()
            .await
            .map_err(|e| Error::Retrieval(DisplayErrorContext(&e).to_string()))?;

        Ok(response
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(str::to_string))
            .collect())
    }

    async fn list_objects_page(
        &self,
        bucket: &str,
        continuation_token: Option<String>,
    ) -> Result<ObjectPage> {
        let response = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .set_continuation_token(continuation_token)
            .send()
            .await
            .map_err(|e| Error::Retrieval(DisplayErrorContext(&e).to_string()))?;

        let objects = response
            .contents()
            .iter()
            .filter_map(|object| {
                let key = object.key()?;
                let last_modified = object
                    .last_modified()
                    .and_then(to_timestamp)
                    .unwrap_or(Timestamp::UNIX_EPOCH);
                let mut entry = RemoteObjectEntry::new(key, last_modified);
                if let Some(size) = object.size() {
                    entry = entry.with_size(size.max(0) as u64);
                }
                Some(entry)
            })
            .collect();

        let next_continuation_token = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        Ok(ObjectPage {
            objects,
            next_continuation_token,
        })
    }

    async fn put_object(&self, bucket: &str, key: &str, body: tokio::fs::File) -> Result<()> {
        let body = file_body(body)
            .await
            .map_err(|e| Error::Upload(format!("{key}: {e}")))?;

        let mut request = self
            .inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body);

        if let Some(mime) = mime_guess::from_path(key).first() {
            request = request.content_type(mime.essence_str());
        }

        request
            .send()
            .await
            .map_err(|e| Error::Upload(format!("{key}: {}", DisplayErrorContext(&e))))?;

        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectReader> {
        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::Download(format!("{key}: {}", DisplayErrorContext(&e))))?;

        Ok(Box::pin(response.body.into_async_read()))
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::Delete(format!("{key}: {}", DisplayErrorContext(&e))))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_timestamp_keeps_nanos() {
        let dt = aws_smithy_types::DateTime::from_secs_and_nanos(1_700_000_000, 250_000_000);
        let ts = to_timestamp(&dt).unwrap();
        assert_eq!(ts.as_second(), 1_700_000_000);
        assert_eq!(ts.subsec_millisecond(), 250);
    }

    #[tokio::test]
    async fn test_file_body_streams_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.bin");
        std::fs::write(&path, b"file contents").unwrap();

        let file = tokio::fs::File::open(&path).await.unwrap();
        let body = file_body(file).await.unwrap();
        let bytes = body.collect().await.unwrap().into_bytes();
        assert_eq!(&bytes[..], b"file contents");
    }

    #[test]
    fn test_to_timestamp_epoch() {
        let dt = aws_smithy_types::DateTime::from_secs(0);
        assert_eq!(to_timestamp(&dt), Some(Timestamp::UNIX_EPOCH));
    }
}
