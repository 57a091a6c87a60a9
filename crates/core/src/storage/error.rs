//! Storage error types.

use ossbridge_shared::AppError;
use thiserror::Error;

/// Coarse classification callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// Local content could not be read.
    Read,
    /// Remote PUT failed.
    Upload,
    /// Remote GET failed or its body could not be read.
    Download,
    /// URL was not issued by this service.
    MalformedUrl,
    /// Backend could not be configured.
    Configuration,
}

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Local file or stream content could not be read.
    #[error("cannot read content of '{name}': {reason}")]
    Read {
        /// Original filename.
        name: String,
        /// Underlying failure.
        reason: String,
    },

    /// Remote PUT failed (auth, network, quota, missing bucket).
    #[error("upload of '{key}' failed: {reason}")]
    Upload {
        /// Storage key.
        key: String,
        /// Underlying failure.
        reason: String,
    },

    /// Remote GET failed, or the response body could not be read.
    #[error("download of '{key}' failed: {reason}")]
    Download {
        /// Storage key.
        key: String,
        /// Underlying failure.
        reason: String,
    },

    /// URL does not start with the configured download endpoint.
    #[error("malformed download url: {url}")]
    MalformedUrl {
        /// The rejected URL.
        url: String,
    },

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Create a read error.
    #[must_use]
    pub fn read(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Read {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an upload error.
    #[must_use]
    pub fn upload(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Upload {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a download error.
    #[must_use]
    pub fn download(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Download {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a malformed URL error.
    #[must_use]
    pub fn malformed_url(url: impl Into<String>) -> Self {
        Self::MalformedUrl { url: url.into() }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> StorageErrorKind {
        match self {
            Self::Read { .. } => StorageErrorKind::Read,
            Self::Upload { .. } => StorageErrorKind::Upload,
            Self::Download { .. } => StorageErrorKind::Download,
            Self::MalformedUrl { .. } => StorageErrorKind::MalformedUrl,
            Self::Configuration(_) => StorageErrorKind::Configuration,
        }
    }

    /// Returns a stable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "STORAGE_READ_ERROR",
            Self::Upload { .. } => "STORAGE_UPLOAD_ERROR",
            Self::Download { .. } => "STORAGE_DOWNLOAD_ERROR",
            Self::MalformedUrl { .. } => "STORAGE_MALFORMED_URL",
            Self::Configuration(_) => "STORAGE_CONFIGURATION_ERROR",
        }
    }

    /// Message safe to hand to API callers. Backend detail stays in the logs.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Read { name, .. } => format!("Cannot read content of {name}"),
            Self::Upload { .. } => "Object storage exception".to_string(),
            Self::Download { .. } => "File download exception".to_string(),
            Self::MalformedUrl { .. } => "URL was not issued by this storage service".to_string(),
            Self::Configuration(_) => "Object storage is misconfigured".to_string(),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        let message = err.public_message();
        match err.kind() {
            StorageErrorKind::MalformedUrl => Self::Validation(message),
            StorageErrorKind::Configuration => Self::Internal(message),
            StorageErrorKind::Read | StorageErrorKind::Upload | StorageErrorKind::Download => {
                Self::SystemCustom(message)
            }
        }
    }
}
