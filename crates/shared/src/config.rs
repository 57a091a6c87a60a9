//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Object storage configuration.
    pub storage: StorageSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted request body in bytes (multipart uploads included).
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_body_limit() -> usize {
    20 * 1024 * 1024 // 20 MB
}

/// Backend the object store talks to.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendSettings {
    /// S3-compatible API (Huawei OBS, Aliyun OSS, AWS S3, MinIO).
    S3 {
        /// API endpoint, e.g. `https://obs.cn-north-4.myhuaweicloud.com`.
        endpoint: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        #[serde(default = "default_region")]
        region: String,
        /// Address buckets as `<bucket>.<endpoint>` (required by OSS).
        #[serde(default)]
        virtual_host_style: bool,
    },
    /// Local filesystem rooted at `root`.
    LocalFs {
        /// Root directory.
        root: String,
    },
    /// In-process memory store.
    Memory,
}

fn default_region() -> String {
    "auto".to_string()
}

/// Which query syntax selects a server-side image style.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImageProcessSyntaxSetting {
    /// `?x-image-process=image/<style>` (OBS).
    #[default]
    ImageProcess,
    /// `?x-oss-process=style/<style>` (OSS).
    OssProcess,
}

/// Object storage settings as read from config files and environment.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Backend connection settings.
    pub backend: BackendSettings,
    /// Bucket holding uploaded objects.
    pub bucket_name: String,
    /// Public base URL objects are served from.
    pub download_endpoint: String,
    /// Optional key prefix, e.g. `uploads/avatars`.
    #[serde(default)]
    pub storage_path: Option<String>,
    /// Optional image style appended to image URLs.
    #[serde(default)]
    pub style_name: Option<String>,
    /// Style query syntax.
    #[serde(default)]
    pub image_process_syntax: ImageProcessSyntaxSetting,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("OSSBRIDGE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
