// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local JSON file store for parameter override files.

use async_trait::async_trait;
use jack_core::ParamMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from file store operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FileStoreError {
    #[error("failed to access {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
    #[error("{} is not a JSON object of parameters: {message}", path.display())]
    Json { path: PathBuf, message: String },
}

/// Adapter for reading and writing flat JSON mappings
#[async_trait]
pub trait FileStore: Clone + Send + Sync + 'static {
    async fn exists(&self, path: &Path) -> bool;

    async fn read_json(&self, path: &Path) -> Result<ParamMap, FileStoreError>;

    /// Write `value` as pretty-printed JSON, replacing any existing content.
    async fn write_json(&self, path: &Path, value: &ParamMap) -> Result<(), FileStoreError>;
}

/// File store backed by the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn read_json(&self, path: &Path) -> Result<ParamMap, FileStoreError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| io_error(path, e))?;
        serde_json::from_str(&content)
            .map_err(|e| FileStoreError::Json { path: path.to_path_buf(), message: e.to_string() })
    }

    async fn write_json(&self, path: &Path, value: &ParamMap) -> Result<(), FileStoreError> {
        let mut content = serde_json::to_string_pretty(value)
            .map_err(|e| FileStoreError::Json { path: path.to_path_buf(), message: e.to_string() })?;
        content.push('\n');
        tokio::fs::write(path, content).await.map_err(|e| io_error(path, e))?;
        tracing::debug!(path = %path.display(), keys = value.len(), "wrote parameters file");
        Ok(())
    }
}

fn io_error(path: &Path, error: std::io::Error) -> FileStoreError {
    FileStoreError::Io { path: path.to_path_buf(), message: error.to_string() }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{FileStore, FileStoreError};
    use async_trait::async_trait;
    use jack_core::ParamMap;
    use parking_lot::Mutex;
    use std::collections::{HashMap, HashSet};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    /// Recorded file store call
    #[derive(Debug, Clone, PartialEq)]
    pub enum FileCall {
        Exists(PathBuf),
        Read(PathBuf),
        Write(PathBuf, ParamMap),
    }

    #[derive(Default)]
    struct FakeFileStoreState {
        files: HashMap<PathBuf, ParamMap>,
        corrupt: HashSet<PathBuf>,
        calls: Vec<FileCall>,
    }

    /// In-memory file store for testing
    #[derive(Clone, Default)]
    pub struct FakeFileStore {
        inner: Arc<Mutex<FakeFileStoreState>>,
    }

    impl FakeFileStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Set file content without recording a call.
        pub fn put(&self, path: impl Into<PathBuf>, value: ParamMap) {
            let path = path.into();
            let mut state = self.inner.lock();
            state.corrupt.remove(&path);
            state.files.insert(path, value);
        }

        /// Make the file exist but fail to parse.
        pub fn corrupt(&self, path: impl Into<PathBuf>) {
            self.inner.lock().corrupt.insert(path.into());
        }

        pub fn get(&self, path: &Path) -> Option<ParamMap> {
            self.inner.lock().files.get(path).cloned()
        }

        /// Get all recorded calls
        pub fn calls(&self) -> Vec<FileCall> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl FileStore for FakeFileStore {
        async fn exists(&self, path: &Path) -> bool {
            let mut state = self.inner.lock();
            state.calls.push(FileCall::Exists(path.to_path_buf()));
            state.files.contains_key(path) || state.corrupt.contains(path)
        }

        async fn read_json(&self, path: &Path) -> Result<ParamMap, FileStoreError> {
            let mut state = self.inner.lock();
            state.calls.push(FileCall::Read(path.to_path_buf()));
            if state.corrupt.contains(path) {
                return Err(FileStoreError::Json {
                    path: path.to_path_buf(),
                    message: "expected value at line 1 column 1".to_string(),
                });
            }
            state.files.get(path).cloned().ok_or_else(|| FileStoreError::Io {
                path: path.to_path_buf(),
                message: "No such file or directory".to_string(),
            })
        }

        async fn write_json(&self, path: &Path, value: &ParamMap) -> Result<(), FileStoreError> {
            let mut state = self.inner.lock();
            state.calls.push(FileCall::Write(path.to_path_buf(), value.clone()));
            state.corrupt.remove(path);
            state.files.insert(path.to_path_buf(), value.clone());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeFileStore, FileCall};

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
