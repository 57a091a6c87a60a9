//! Storage key generation.
//!
//! Keys look like `[storage_path/]yyyyMMddHH<8 hex chars>[.ext]`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Length of the random part of a key.
pub const RANDOM_SUFFIX_LEN: usize = 8;

/// Generate a storage key stamped with `now`.
///
/// Uniqueness rests on the random suffix alone; collisions are not checked.
#[must_use]
pub fn generate_storage_key(
    storage_path: Option<&str>,
    extension: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let mut key = String::new();
    if let Some(path) = storage_path {
        key.push_str(path);
        key.push('/');
    }
    key.push_str(&now.format("%Y%m%d%H").to_string());
    key.push_str(&random_suffix());
    if let Some(ext) = extension {
        key.push('.');
        key.push_str(ext);
    }
    key
}

fn random_suffix() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(RANDOM_SUFFIX_LEN);
    id
}
