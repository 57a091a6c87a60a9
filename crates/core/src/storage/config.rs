//! Storage configuration types.

use std::path::PathBuf;

use ossbridge_shared::{BackendSettings, ImageProcessSyntaxSetting, StorageSettings};

use super::error::StorageError;

/// Storage provider configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageProvider {
    /// S3-compatible storage: Huawei OBS, Aliyun OSS, AWS S3, MinIO.
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
        /// Use `<bucket>.<endpoint>` addressing.
        virtual_host_style: bool,
    },
    /// Local filesystem (development only). Objects land under `root/<bucket>`.
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// In-process memory store (tests and demos).
    Memory,
}

impl StorageProvider {
    /// Create S3-compatible provider.
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
            virtual_host_style: false,
        }
    }

    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "local",
            Self::Memory => "memory",
        }
    }
}

impl From<&BackendSettings> for StorageProvider {
    fn from(settings: &BackendSettings) -> Self {
        match settings {
            BackendSettings::S3 {
                endpoint,
                access_key_id,
                secret_access_key,
                region,
                virtual_host_style,
            } => Self::S3 {
                endpoint: endpoint.clone(),
                access_key_id: access_key_id.clone(),
                secret_access_key: secret_access_key.clone(),
                region: region.clone(),
                virtual_host_style: *virtual_host_style,
            },
            BackendSettings::LocalFs { root } => Self::local_fs(root),
            BackendSettings::Memory => Self::Memory,
        }
    }
}

/// Query syntax used to request a server-side image style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageProcessSyntax {
    /// `?x-image-process=image/<style>`
    #[default]
    ImageProcess,
    /// `?x-oss-process=style/<style>`
    OssProcess,
}

impl ImageProcessSyntax {
    /// Render the query suffix for `style`, leading `?` included.
    #[must_use]
    pub fn query(self, style: &str) -> String {
        match self {
            Self::ImageProcess => format!("?x-image-process=image/{style}"),
            Self::OssProcess => format!("?x-oss-process=style/{style}"),
        }
    }
}

impl From<ImageProcessSyntaxSetting> for ImageProcessSyntax {
    fn from(setting: ImageProcessSyntaxSetting) -> Self {
        match setting {
            ImageProcessSyntaxSetting::ImageProcess => Self::ImageProcess,
            ImageProcessSyntaxSetting::OssProcess => Self::OssProcess,
        }
    }
}

/// Storage service configuration.
///
/// Built once at startup and handed to the service by value. Optional
/// settings are normalized on the way in: blank values become `None` and
/// surrounding `/` is stripped so URL and key assembly never doubles it.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Bucket name.
    pub bucket_name: String,
    /// Public base URL, without trailing `/`.
    pub download_endpoint: String,
    /// Key prefix, without leading or trailing `/`.
    pub storage_path: Option<String>,
    /// Image style name.
    pub style_name: Option<String>,
    /// Style query syntax.
    pub image_process_syntax: ImageProcessSyntax,
}

impl StorageConfig {
    /// Create a new storage config with no prefix and no style.
    #[must_use]
    pub fn new(
        provider: StorageProvider,
        bucket_name: impl Into<String>,
        download_endpoint: impl AsRef<str>,
    ) -> Self {
        Self {
            provider,
            bucket_name: bucket_name.into(),
            download_endpoint: download_endpoint.as_ref().trim().trim_end_matches('/').to_string(),
            storage_path: None,
            style_name: None,
            image_process_syntax: ImageProcessSyntax::default(),
        }
    }

    /// Build from loaded settings, validating required fields.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the bucket or endpoint is blank.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, StorageError> {
        let config = Self::new(
            StorageProvider::from(&settings.backend),
            settings.bucket_name.trim(),
            &settings.download_endpoint,
        )
        .with_storage_path(settings.storage_path.as_deref())
        .with_style_name(settings.style_name.as_deref())
        .with_image_process_syntax(settings.image_process_syntax.into());

        config.validate()?;
        Ok(config)
    }

    /// Set the key prefix.
    #[must_use]
    pub fn with_storage_path(mut self, path: Option<&str>) -> Self {
        self.storage_path = non_blank(path.map(|p| p.trim().trim_matches('/')));
        self
    }

    /// Set the image style name.
    #[must_use]
    pub fn with_style_name(mut self, style: Option<&str>) -> Self {
        self.style_name = non_blank(style.map(str::trim));
        self
    }

    /// Set the style query syntax.
    #[must_use]
    pub fn with_image_process_syntax(mut self, syntax: ImageProcessSyntax) -> Self {
        self.image_process_syntax = syntax;
        self
    }

    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the bucket or endpoint is blank.
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.bucket_name.is_empty() {
            return Err(StorageError::configuration("bucket_name must not be blank"));
        }
        if self.download_endpoint.is_empty() {
            return Err(StorageError::configuration(
                "download_endpoint must not be blank",
            ));
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(backend: BackendSettings) -> StorageSettings {
        StorageSettings {
            backend,
            bucket_name: "media".to_string(),
            download_endpoint: "https://cdn.example.com/".to_string(),
            storage_path: Some("/avatars/".to_string()),
            style_name: Some("  ".to_string()),
            image_process_syntax: ImageProcessSyntaxSetting::OssProcess,
        }
    }

    #[test]
    fn test_storage_provider_names() {
        assert_eq!(
            StorageProvider::s3("https://obs.example.com", "ak", "sk", "auto").name(),
            "s3"
        );
        assert_eq!(StorageProvider::local_fs("./storage").name(), "local");
        assert_eq!(StorageProvider::Memory.name(), "memory");
    }

    #[test]
    fn test_from_settings_normalizes() {
        let config = StorageConfig::from_settings(&settings(BackendSettings::Memory))
            .expect("valid settings");

        assert_eq!(config.provider, StorageProvider::Memory);
        assert_eq!(config.download_endpoint, "https://cdn.example.com");
        assert_eq!(config.storage_path.as_deref(), Some("avatars"));
        assert_eq!(config.style_name, None);
        assert_eq!(config.image_process_syntax, ImageProcessSyntax::OssProcess);
    }

    #[test]
    fn test_from_settings_maps_s3_backend() {
        let config = StorageConfig::from_settings(&settings(BackendSettings::S3 {
            endpoint: "https://oss-cn-hangzhou.aliyuncs.com".to_string(),
            access_key_id: "ak".to_string(),
            secret_access_key: "sk".to_string(),
            region: "cn-hangzhou".to_string(),
            virtual_host_style: true,
        }))
        .expect("valid settings");

        assert!(matches!(
            config.provider,
            StorageProvider::S3 {
                virtual_host_style: true,
                ..
            }
        ));
    }

    #[test]
    fn test_blank_bucket_rejected() {
        let mut s = settings(BackendSettings::Memory);
        s.bucket_name = " ".to_string();
        let err = StorageConfig::from_settings(&s).unwrap_err();
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[test]
    fn test_blank_endpoint_rejected() {
        let mut s = settings(BackendSettings::Memory);
        s.download_endpoint = "/".to_string();
        let err = StorageConfig::from_settings(&s).unwrap_err();
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[test]
    fn test_image_process_query() {
        assert_eq!(
            ImageProcessSyntax::ImageProcess.query("thumb"),
            "?x-image-process=image/thumb"
        );
        assert_eq!(
            ImageProcessSyntax::OssProcess.query("thumb"),
            "?x-oss-process=style/thumb"
        );
    }
}
