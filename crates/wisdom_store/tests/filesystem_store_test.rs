//! Tests for the directory-backed wisdom store.

use std::collections::BTreeSet;
use std::path::Path;
use tempfile::TempDir;
use wisdom_store::{FileSystemStore, ImageFormat, WisdomId, WisdomStore};

fn id(value: u32) -> WisdomId {
    WisdomId::new(value).expect("non-zero id")
}

fn write(dir: &Path, name: &str, contents: &[u8]) {
    std::fs::write(dir.join(name), contents).expect("write fixture");
}

const METADATA: &str = "wisdom: Rest more.\ndescription: A sloth hanging from a branch.\n";

#[tokio::test]
async fn test_enumerate_scans_yaml_and_yml() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "00001.yaml", METADATA.as_bytes());
    write(temp_dir.path(), "00002.yml", METADATA.as_bytes());
    write(temp_dir.path(), "00007.yaml", METADATA.as_bytes());
    write(temp_dir.path(), "00001.jpg", b"jpg");

    let store = FileSystemStore::new(temp_dir.path());
    let ids = store.enumerate_candidates().await;

    assert_eq!(ids, BTreeSet::from([id(1), id(2), id(7)]));
}

#[tokio::test]
async fn test_enumerate_deduplicates_yaml_and_yml() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "00003.yaml", METADATA.as_bytes());
    write(temp_dir.path(), "00003.yml", METADATA.as_bytes());

    let store = FileSystemStore::new(temp_dir.path());
    assert_eq!(store.enumerate_candidates().await, BTreeSet::from([id(3)]));
}

#[tokio::test]
async fn test_enumerate_ignores_foreign_names() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "1.yaml", METADATA.as_bytes());
    write(temp_dir.path(), "000001.yaml", METADATA.as_bytes());
    write(temp_dir.path(), "00000.yaml", METADATA.as_bytes());
    write(temp_dir.path(), "abcde.yaml", METADATA.as_bytes());
    write(temp_dir.path(), "00004.yaml.bak", METADATA.as_bytes());
    write(temp_dir.path(), "00005.json", b"{}");
    std::fs::create_dir(temp_dir.path().join("00006.yaml")).unwrap();

    let store = FileSystemStore::new(temp_dir.path());
    assert!(store.enumerate_candidates().await.is_empty());
}

#[tokio::test]
async fn test_enumerate_missing_directory_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path().join("does-not-exist"));

    assert!(store.enumerate_candidates().await.is_empty());
}

#[tokio::test]
async fn test_load_metadata() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "00001.yaml",
        b"wisdom: Rest more.\ndescription: A sloth.\nauthor: ignored\n",
    );

    let store = FileSystemStore::new(temp_dir.path());
    let metadata = store.load_metadata(id(1)).await.unwrap().expect("metadata");

    assert_eq!(metadata.wisdom(), "Rest more.");
    assert_eq!(metadata.description(), "A sloth.");
}

#[tokio::test]
async fn test_load_metadata_falls_back_to_yml() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "00002.yml", METADATA.as_bytes());

    let store = FileSystemStore::new(temp_dir.path());
    let metadata = store.load_metadata(id(2)).await.unwrap();

    assert!(metadata.is_some());
}

#[tokio::test]
async fn test_load_metadata_skips_yaml_directory() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir(temp_dir.path().join("00001.yaml")).unwrap();
    write(temp_dir.path(), "00001.yml", METADATA.as_bytes());

    let store = FileSystemStore::new(temp_dir.path());
    assert_eq!(store.enumerate_candidates().await, BTreeSet::from([id(1)]));

    let metadata = store
        .load_metadata(id(1))
        .await
        .unwrap()
        .expect("metadata from .yml");
    assert_eq!(metadata.wisdom(), "Rest more.");
}

#[tokio::test]
async fn test_load_metadata_absent() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path());

    assert!(store.load_metadata(id(1)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_load_metadata_empty_document_is_absent() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "00001.yaml", b"");
    write(temp_dir.path(), "00002.yaml", b"{}\n");

    let store = FileSystemStore::new(temp_dir.path());

    assert!(store.load_metadata(id(1)).await.unwrap().is_none());
    assert!(store.load_metadata(id(2)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_load_metadata_missing_field_is_error() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "00001.yaml", b"wisdom: Rest more.\n");

    let store = FileSystemStore::new(temp_dir.path());
    let result = store.load_metadata(id(1)).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Invalid metadata"));
}

#[tokio::test]
async fn test_load_image_prefers_jpg() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "00001.jpg", b"jpg");
    write(temp_dir.path(), "00001.jpeg", b"jpeg");
    write(temp_dir.path(), "00001.png", b"png");

    let store = FileSystemStore::new(temp_dir.path());
    let image = store.load_image(id(1)).await.unwrap().expect("image");

    assert_eq!(image.path(), &temp_dir.path().join("00001.jpg"));
    assert_eq!(*image.format(), ImageFormat::Jpeg);
}

#[tokio::test]
async fn test_load_image_prefers_jpeg_over_png() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "00001.jpeg", b"jpeg");
    write(temp_dir.path(), "00001.png", b"png");

    let store = FileSystemStore::new(temp_dir.path());
    let image = store.load_image(id(1)).await.unwrap().expect("image");

    assert_eq!(image.file_name(), "00001.jpeg");
}

#[tokio::test]
async fn test_load_image_png() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "00001.png", b"png");

    let store = FileSystemStore::new(temp_dir.path());
    let image = store.load_image(id(1)).await.unwrap().expect("image");

    assert_eq!(*image.format(), ImageFormat::Png);
    assert_eq!(image.format().mime_type(), "image/png");
    assert_eq!(store.read_image(&image).await.unwrap(), b"png");
}

#[tokio::test]
async fn test_load_image_absent() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "00001.yaml", METADATA.as_bytes());
    write(temp_dir.path(), "00001.gif", b"gif");

    let store = FileSystemStore::new(temp_dir.path());

    assert!(store.load_image(id(1)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_read_image_removed_after_resolve_is_error() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "00001.jpg", b"jpg");

    let store = FileSystemStore::new(temp_dir.path());
    let image = store.load_image(id(1)).await.unwrap().expect("image");
    std::fs::remove_file(image.path()).unwrap();

    assert!(store.read_image(&image).await.is_err());
}

#[test]
fn test_wisdom_id_formatting() {
    assert_eq!(id(1).to_string(), "00001");
    assert_eq!(id(12345).to_string(), "12345");
    assert!(WisdomId::new(0).is_none());
    assert_eq!(WisdomId::from_metadata_file_name("00010.yml"), Some(id(10)));
    assert_eq!(WisdomId::from_metadata_file_name("00010.jpg"), None);
}
