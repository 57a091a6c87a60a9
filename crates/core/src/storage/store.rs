//! Object store seam and its OpenDAL implementation.

use std::future::Future;
use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use md5::{Digest, Md5};
use opendal::{Operator, services};
use tokio::io::AsyncRead;

use super::config::StorageProvider;
use super::error::StorageError;

/// User-metadata key carrying a copy of the Content-MD5 of an upload.
pub const CONTENT_MD5_METADATA_KEY: &str = "content-md5";

/// S3 checksum mode. OpenDAL sends a `Content-MD5` header on every PUT,
/// so the store rejects bodies that do not match.
pub const S3_CHECKSUM_ALGORITHM: &str = "md5";

/// Object body returned by a GET. Dropping it releases the stream.
pub type ObjectBody = Box<dyn AsyncRead + Send + Unpin>;

/// Metadata sent with every PUT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Content length in bytes.
    pub content_length: u64,
    /// Base64 of the raw MD5 digest.
    pub content_md5: String,
    /// MIME type.
    pub content_type: String,
}

impl ObjectMetadata {
    /// Compute metadata for `content`.
    #[must_use]
    pub fn for_content(content: &[u8], content_type: impl Into<String>) -> Self {
        Self {
            content_length: content.len() as u64,
            content_md5: content_md5(content),
            content_type: content_type.into(),
        }
    }
}

/// Base64-encoded MD5 digest, as expected in a `Content-MD5` header.
#[must_use]
pub fn content_md5(content: &[u8]) -> String {
    STANDARD.encode(Md5::digest(content))
}

/// Remote object store operations used by the storage service.
///
/// Implementations must be safe to share across tasks.
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key`.
    fn put_object(
        &self,
        key: &str,
        body: Bytes,
        metadata: &ObjectMetadata,
    ) -> impl Future<Output = opendal::Result<()>> + Send;

    /// Open the object stored under `key`.
    fn get_object(&self, key: &str) -> impl Future<Output = opendal::Result<ObjectBody>> + Send;
}

/// [`ObjectStore`] backed by an OpenDAL operator.
#[derive(Debug, Clone)]
pub struct OpendalObjectStore {
    operator: Operator,
}

impl OpendalObjectStore {
    /// Wrap an existing operator.
    #[must_use]
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    /// Build an operator for `provider`, scoped to `bucket`.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be initialized.
    pub fn from_provider(provider: &StorageProvider, bucket: &str) -> Result<Self, StorageError> {
        let operator = match provider {
            StorageProvider::S3 {
                endpoint,
                access_key_id,
                secret_access_key,
                region,
                virtual_host_style,
            } => {
                let mut builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region)
                    .checksum_algorithm(S3_CHECKSUM_ALGORITHM);
                if *virtual_host_style {
                    builder = builder.enable_virtual_host_style();
                }
                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::LocalFs { root } => {
                let bucket_root = root.join(bucket);
                let builder = services::Fs::default().root(
                    bucket_root
                        .to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );
                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::Memory => Operator::new(services::Memory::default())
                .map_err(|e| StorageError::configuration(e.to_string()))?
                .finish(),
        };

        Ok(Self { operator })
    }

    /// Underlying operator.
    #[must_use]
    pub fn operator(&self) -> &Operator {
        &self.operator
    }
}

impl ObjectStore for OpendalObjectStore {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        metadata: &ObjectMetadata,
    ) -> opendal::Result<()> {
        // Backends reject write options they don't advertise.
        let capability = self.operator.info().full_capability();

        let mut write = self.operator.write_with(key, body);
        if capability.write_with_content_type {
            write = write.content_type(&metadata.content_type);
        }
        if capability.write_with_user_metadata {
            write = write.user_metadata([(
                CONTENT_MD5_METADATA_KEY.to_string(),
                metadata.content_md5.clone(),
            )]);
        }
        write.await?;
        Ok(())
    }

    async fn get_object(&self, key: &str) -> opendal::Result<ObjectBody> {
        let buffer = self.operator.read(key).await?;
        Ok(Box::new(Cursor::new(buffer.to_bytes())))
    }
}
