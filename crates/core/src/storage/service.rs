//! Object storage façade: uploads return public URLs, downloads take them back.

use std::io::Cursor;
use std::path::Path;

use bytes::Bytes;
use chrono::Utc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, error, info};

use super::config::StorageConfig;
use super::content_type::{DEFAULT_CONTENT_TYPE, content_type_for, extension_of, is_image};
use super::error::StorageError;
use super::key::generate_storage_key;
use super::store::{ObjectMetadata, ObjectStore, OpendalObjectStore};

/// Extension given to raw JPEG uploads.
pub const JPEG_EXTENSION: &str = "jpeg";
/// Content type given to raw JPEG uploads.
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// A file handed in by a caller: its original name and a stream of its bytes.
#[derive(Debug)]
pub struct UploadFile<R> {
    /// Filename as supplied by the client.
    pub original_filename: String,
    /// Content stream. Consumed and dropped by the upload.
    pub content: R,
}

impl<R> UploadFile<R> {
    /// Create an upload from a name and a reader.
    #[must_use]
    pub fn new(original_filename: impl Into<String>, content: R) -> Self {
        Self {
            original_filename: original_filename.into(),
            content,
        }
    }
}

impl UploadFile<Cursor<Bytes>> {
    /// Create an upload from bytes already in memory.
    #[must_use]
    pub fn from_bytes(original_filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self::new(original_filename, Cursor::new(content.into()))
    }
}

/// Upload/download façade over an [`ObjectStore`].
pub struct ObjectStorageService<S> {
    store: S,
    config: StorageConfig,
}

impl ObjectStorageService<OpendalObjectStore> {
    /// Create a service backed by OpenDAL from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the storage
    /// provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        config.validate()?;
        let store = OpendalObjectStore::from_provider(&config.provider, &config.bucket_name)?;
        Ok(Self::new(store, config))
    }
}

impl<S: ObjectStore> ObjectStorageService<S> {
    /// Create a service over an arbitrary store.
    #[must_use]
    pub fn new(store: S, config: StorageConfig) -> Self {
        Self { store, config }
    }

    /// Upload a client file and return its public URL.
    ///
    /// The content type follows the filename extension. Image URLs get the
    /// configured style query.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the stream fails and
    /// [`StorageError::Upload`] if the store rejects the PUT.
    pub async fn upload<R>(&self, file: UploadFile<R>) -> Result<String, StorageError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let UploadFile {
            original_filename,
            mut content,
        } = file;

        let extension = extension_of(&original_filename);
        let content_type = extension.map_or_else(
            || DEFAULT_CONTENT_TYPE.to_string(),
            |ext| content_type_for(ext).to_string(),
        );
        let image = extension.is_some_and(is_image);
        let key = self.generate_storage_key(extension);

        let mut buf = Vec::new();
        let read = content.read_to_end(&mut buf).await;
        drop(content);
        if let Err(e) = read {
            error!(filename = %original_filename, error = %e, "Cannot read upload content");
            return Err(StorageError::read(original_filename, e));
        }

        self.put(key, Bytes::from(buf), content_type, image).await
    }

    /// Upload a JPEG held in memory and return its public URL.
    ///
    /// The content is not inspected: it is always stored as `image/jpeg`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Upload`] if the store rejects the PUT.
    pub async fn upload_bytes(&self, content: impl Into<Bytes>) -> Result<String, StorageError> {
        let key = self.generate_storage_key(Some(JPEG_EXTENSION));
        self.put(key, content.into(), JPEG_CONTENT_TYPE.to_string(), true)
            .await
    }

    /// Upload a file from the local filesystem and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the file cannot be opened or read
    /// and [`StorageError::Upload`] if the store rejects the PUT.
    pub async fn upload_file_path(&self, path: impl AsRef<Path>) -> Result<String, StorageError> {
        let path = path.as_ref();
        let filename = path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );

        let file = tokio::fs::File::open(path).await.map_err(|e| {
            error!(path = %path.display(), error = %e, "Cannot open file for upload");
            StorageError::read(filename.clone(), e)
        })?;

        self.upload(UploadFile::new(filename, file)).await
    }

    /// Fetch the object behind a URL previously returned by an upload.
    ///
    /// Query strings and fragments on the URL are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::MalformedUrl`] if the URL was not issued by
    /// this service and [`StorageError::Download`] if the GET or the body
    /// read fails.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        let key = self.key_from_url(url)?;

        let mut body = self.store.get_object(key).await.map_err(|e| {
            error!(url = %url, key = %key, error = %e, "File download failed");
            StorageError::download(key, e)
        })?;

        let mut data = Vec::new();
        let read = body.read_to_end(&mut data).await;
        drop(body);
        if let Err(e) = read {
            error!(url = %url, key = %key, error = %e, "Cannot read download body");
            return Err(StorageError::download(key, e));
        }

        debug!(key = %key, size = data.len(), "Object downloaded");
        Ok(data)
    }

    /// Generate a fresh key under the configured storage path.
    #[must_use]
    pub fn generate_storage_key(&self, extension: Option<&str>) -> String {
        generate_storage_key(self.config.storage_path.as_deref(), extension, Utc::now())
    }

    /// Public URL for `key`. The style query is added only for images when a
    /// style is configured.
    #[must_use]
    pub fn public_url(&self, key: &str, image: bool) -> String {
        let mut url = format!("{}/{}", self.config.download_endpoint, key);
        if image {
            if let Some(style) = &self.config.style_name {
                url.push_str(&self.config.image_process_syntax.query(style));
            }
        }
        url
    }

    /// Recover the storage key from a URL produced by [`Self::public_url`].
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::MalformedUrl`] if the URL does not start with
    /// the download endpoint or names no key.
    pub fn key_from_url<'a>(&self, url: &'a str) -> Result<&'a str, StorageError> {
        let key = url
            .strip_prefix(self.config.download_endpoint.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(|rest| rest.split(['?', '#']).next())
            .filter(|key| !key.is_empty());

        key.ok_or_else(|| {
            error!(url = %url, endpoint = %self.config.download_endpoint, "Malformed download url");
            StorageError::malformed_url(url)
        })
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Get the provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    async fn put(
        &self,
        key: String,
        content: Bytes,
        content_type: String,
        image: bool,
    ) -> Result<String, StorageError> {
        let metadata = ObjectMetadata::for_content(&content, content_type);

        if let Err(e) = self.store.put_object(&key, content, &metadata).await {
            error!(
                bucket = %self.config.bucket_name,
                key = %key,
                error = %e,
                "Object storage upload failed"
            );
            return Err(StorageError::upload(key, e));
        }

        info!(
            key = %key,
            size = metadata.content_length,
            content_type = %metadata.content_type,
            "Object uploaded"
        );
        Ok(self.public_url(&key, image))
    }
}
