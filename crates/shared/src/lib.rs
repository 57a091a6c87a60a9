//! Shared errors and configuration for ossbridge.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;

pub use crate::config::{
    AppConfig, BackendSettings, ImageProcessSyntaxSetting, ServerConfig, StorageSettings,
};
pub use crate::error::AppError;
