//! Object storage façade using Apache OpenDAL.
//!
//! Files go in, public URLs come out; URLs go in, bytes come out. Backends:
//! - S3-compatible: Huawei OBS, Aliyun OSS, AWS S3, MinIO
//! - Local filesystem (development only)
//! - Memory (tests)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   ObjectStorageService                        │
//! │  upload / upload_bytes / upload_file_path        download     │
//! │  key: [path/]yyyyMMddHH<8 hex>[.ext]      url → key (strict)  │
//! │  metadata: length, Content-MD5, content type                  │
//! ├──────────────────────────────────────────────────────────────┤
//! │                 ObjectStore (put / get)                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │                 Apache OpenDAL Operator                       │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod content_type;
mod error;
mod key;
mod service;
mod store;

pub use config::{ImageProcessSyntax, StorageConfig, StorageProvider};
pub use content_type::{DEFAULT_CONTENT_TYPE, content_type_for, extension_of, is_image};
pub use error::{StorageError, StorageErrorKind};
pub use key::{RANDOM_SUFFIX_LEN, generate_storage_key};
pub use service::{JPEG_CONTENT_TYPE, JPEG_EXTENSION, ObjectStorageService, UploadFile};
pub use store::{
    CONTENT_MD5_METADATA_KEY, ObjectBody, ObjectMetadata, ObjectStore, OpendalObjectStore,
    content_md5,
};
