// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn sample() -> ParamMap {
    ParamMap::from([
        ("BRANCH".to_string(), json!("main")),
        ("RETRIES".to_string(), json!(3)),
    ])
}

#[tokio::test]
async fn write_then_read_local_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deploy.params.json");
    let store = LocalFileStore::new();

    assert!(!store.exists(&path).await);
    store.write_json(&path, &sample()).await.unwrap();

    assert!(store.exists(&path).await);
    assert_eq!(store.read_json(&path).await.unwrap(), sample());
}

#[tokio::test]
async fn written_file_is_pretty_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deploy.params.json");

    LocalFileStore::new().write_json(&path, &sample()).await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "{\n  \"BRANCH\": \"main\",\n  \"RETRIES\": 3\n}\n");
}

#[tokio::test]
async fn non_object_content_is_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deploy.params.json");
    std::fs::write(&path, "[1, 2]").unwrap();

    let err = LocalFileStore::new().read_json(&path).await.unwrap_err();
    assert!(matches!(err, FileStoreError::Json { .. }), "{err:?}");
}

#[tokio::test]
async fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.params.json");

    let err = LocalFileStore::new().read_json(&path).await.unwrap_err();
    assert!(matches!(err, FileStoreError::Io { .. }), "{err:?}");
}

#[tokio::test]
async fn fake_records_calls_and_serves_content() {
    let store = FakeFileStore::new();
    let path = std::path::PathBuf::from("/work/deploy.params.json");

    assert!(!store.exists(&path).await);
    store.write_json(&path, &sample()).await.unwrap();
    let read = store.read_json(&path).await.unwrap();

    assert_eq!(read, sample());
    assert_eq!(
        store.calls(),
        vec![
            FileCall::Exists(path.clone()),
            FileCall::Write(path.clone(), sample()),
            FileCall::Read(path.clone()),
        ]
    );
}

#[tokio::test]
async fn fake_corrupt_file_exists_but_fails_to_parse() {
    let store = FakeFileStore::new();
    let path = std::path::PathBuf::from("/work/deploy.params.json");
    store.corrupt(&path);

    assert!(store.exists(&path).await);
    assert!(matches!(store.read_json(&path).await, Err(FileStoreError::Json { .. })));
}
