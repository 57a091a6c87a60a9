//! Core logic for ossbridge.
//!
//! This crate contains the object storage façade with ZERO web dependencies.
//!
//! # Modules
//!
//! - `storage` - Upload/download façade over an OpenDAL-backed object store
//!
//! # Example
//!
//! ```no_run
//! use ossbridge_core::storage::{
//!     ObjectStorageService, StorageConfig, StorageProvider, UploadFile,
//! };
//!
//! # async fn demo() -> Result<(), ossbridge_core::storage::StorageError> {
//! let config = StorageConfig::new(StorageProvider::Memory, "media", "https://cdn.example.com")
//!     .with_style_name(Some("thumb"));
//! let storage = ObjectStorageService::from_config(config)?;
//!
//! let url = storage.upload(UploadFile::from_bytes("cat.png", vec![1u8, 2, 3])).await?;
//! let bytes = storage.download(&url).await?;
//! assert_eq!(bytes, [1, 2, 3]);
//! # Ok(())
//! # }
//! ```

pub mod storage;
