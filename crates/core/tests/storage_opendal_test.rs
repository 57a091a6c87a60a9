//! Integration tests for the storage façade over real OpenDAL backends.

use std::path::PathBuf;

use ossbridge_core::storage::{
    ObjectStorageService, StorageConfig, StorageErrorKind, StorageProvider, UploadFile,
};
use uuid::Uuid;

const ENDPOINT: &str = "http://localhost:8080/media";

/// Unique scratch directory under the system temp dir.
fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("ossbridge-it-{}", Uuid::new_v4()))
}

#[tokio::test]
async fn test_memory_backend_round_trip() {
    let config = StorageConfig::new(StorageProvider::Memory, "media", ENDPOINT)
        .with_storage_path(Some("docs"))
        .with_style_name(Some("thumb"));
    let service = ObjectStorageService::from_config(config).expect("memory service");

    let content = vec![7u8; 4096];
    let url = service
        .upload(UploadFile::from_bytes("scan.png", content.clone()))
        .await
        .expect("upload");

    assert!(url.starts_with("http://localhost:8080/media/docs/"));
    assert!(url.ends_with(".png?x-image-process=image/thumb"));
    assert_eq!(service.download(&url).await.expect("download"), content);
}

#[tokio::test]
async fn test_memory_backend_missing_object() {
    let config = StorageConfig::new(StorageProvider::Memory, "media", ENDPOINT);
    let service = ObjectStorageService::from_config(config).expect("memory service");

    let err = service
        .download(&format!("{ENDPOINT}/2024010100deadbeef.png"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), StorageErrorKind::Download);
}

#[tokio::test]
async fn test_local_fs_backend_writes_under_bucket() {
    let root = scratch_dir();
    let config = StorageConfig::new(StorageProvider::local_fs(&root), "media", ENDPOINT);
    let service = ObjectStorageService::from_config(config).expect("fs service");

    let url = service
        .upload_bytes(b"\xFF\xD8\xFFjpeg-ish".to_vec())
        .await
        .expect("upload");
    let key = service.key_from_url(&url).expect("own url").to_string();

    let on_disk = tokio::fs::read(root.join("media").join(&key))
        .await
        .expect("object written to disk");
    assert_eq!(on_disk, b"\xFF\xD8\xFFjpeg-ish");
    assert_eq!(
        service.download(&url).await.expect("download"),
        b"\xFF\xD8\xFFjpeg-ish"
    );

    let _ = tokio::fs::remove_dir_all(&root).await;
}

#[tokio::test]
async fn test_local_fs_traversal_filename_stays_in_bucket() {
    let root = scratch_dir();
    let store_root = root.join("store");
    let config = StorageConfig::new(StorageProvider::local_fs(&store_root), "media", ENDPOINT);
    let service = ObjectStorageService::from_config(config).expect("fs service");

    let url = service
        .upload(UploadFile::from_bytes("x./../../escaped.txt", "pwned"))
        .await
        .expect("upload");
    let key = service.key_from_url(&url).expect("own url").to_string();

    assert!(!key.contains('/'));
    assert!(!key.contains(".."));
    assert!(key.ends_with(".txt"));
    let on_disk = tokio::fs::read(store_root.join("media").join(&key))
        .await
        .expect("object written inside the bucket");
    assert_eq!(on_disk, b"pwned");
    assert!(!store_root.join("escaped.txt").exists());
    assert!(!root.join("escaped.txt").exists());

    let _ = tokio::fs::remove_dir_all(&root).await;
}

#[tokio::test]
async fn test_memory_backend_round_trip_with_url_delimiters_in_name() {
    let config = StorageConfig::new(StorageProvider::Memory, "media", ENDPOINT);
    let service = ObjectStorageService::from_config(config).expect("memory service");

    for name in ["notes.v#1.txt", "a.png?x-oss-process=style/big", "q.b?c#d"] {
        let url = service
            .upload(UploadFile::from_bytes(name, name.as_bytes().to_vec()))
            .await
            .expect("upload");
        assert_eq!(
            service.download(&url).await.expect("download"),
            name.as_bytes(),
            "round trip of {name}"
        );
    }
}

#[tokio::test]
async fn test_local_fs_upload_file_path() {
    let root = scratch_dir();
    tokio::fs::create_dir_all(&root).await.expect("scratch dir");
    let source = root.join("report.final.pdf");
    tokio::fs::write(&source, b"%PDF-1.7").await.expect("source file");

    let config = StorageConfig::new(StorageProvider::local_fs(root.join("store")), "media", ENDPOINT);
    let service = ObjectStorageService::from_config(config).expect("fs service");

    let url = service.upload_file_path(&source).await.expect("upload");

    assert!(url.ends_with(".final.pdf"));
    assert_eq!(service.download(&url).await.expect("download"), b"%PDF-1.7");

    let _ = tokio::fs::remove_dir_all(&root).await;
}

#[test]
fn test_invalid_config_rejected() {
    let config = StorageConfig::new(StorageProvider::Memory, "", ENDPOINT);
    let err = ObjectStorageService::from_config(config).err().expect("blank bucket");
    assert_eq!(err.kind(), StorageErrorKind::Configuration);
}
