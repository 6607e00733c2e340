//! services/api/src/adapters/json_file.rs
//!
//! Shared helpers for the flat JSON files every adapter is backed by. Each file
//! holds a single JSON array that is read whole and rewritten whole.

use reader_core::ports::{PortError, PortResult};
use serde::{de::DeserializeOwned, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{error, info};

/// Reads a JSON array. A missing or blank file reads as an empty array.
pub async fn read_json_array<T: DeserializeOwned>(path: &Path) -> PortResult<Vec<T>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(storage_error(path, "read", e)),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(&bytes).map_err(|e| storage_error(path, "parse", e))
}

/// Like [`read_json_array`], but a missing file is an error.
pub async fn read_required_json_array<T: DeserializeOwned>(path: &Path) -> PortResult<Vec<T>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| storage_error(path, "read", e))?;
    serde_json::from_slice(&bytes).map_err(|e| storage_error(path, "parse", e))
}

/// Rewrites the whole file as pretty-printed JSON.
///
/// The new content goes to a sibling temp file first and is renamed over the
/// original, so readers never observe a half-written array.
pub async fn write_json_array<T: Serialize>(path: &Path, items: &[T]) -> PortResult<()> {
    let json = serde_json::to_vec_pretty(items).map_err(|e| storage_error(path, "encode", e))?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json)
        .await
        .map_err(|e| storage_error(&tmp, "write", e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| storage_error(path, "replace", e))
}

/// Creates `dir` and an empty `[]` file for each name that does not exist yet.
pub async fn ensure_data_files(dir: &Path, names: &[&str]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    for name in names {
        let path = dir.join(name);
        if !tokio::fs::try_exists(&path).await? {
            info!("Creating empty data file {}", path.display());
            tokio::fs::write(&path, "[]").await?;
        }
    }
    Ok(())
}

fn storage_error(path: &Path, action: &str, e: impl std::fmt::Display) -> PortError {
    error!("Failed to {} {}: {}", action, path.display(), e);
    PortError::Storage(format!("Failed to {} {}: {}", action, path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_and_blank_files_read_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        let items: Vec<i64> = read_json_array(&path).await.unwrap();
        assert!(items.is_empty());

        tokio::fs::write(&path, "  \n").await.unwrap();
        let items: Vec<i64> = read_json_array(&path).await.unwrap();
        assert!(items.is_empty());

        assert!(read_required_json_array::<i64>(&dir.path().join("nope.json"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn corrupt_files_are_storage_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        tokio::fs::write(&path, "[1, 2,").await.unwrap();
        let result = read_json_array::<i64>(&path).await;
        assert!(matches!(result, Err(PortError::Storage(_))));
    }

    #[tokio::test]
    async fn written_arrays_are_pretty_and_readable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("numbers.json");
        write_json_array(&path, &[1, 2, 3]).await.unwrap();

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(raw.contains('\n'));
        let items: Vec<i64> = read_json_array(&path).await.unwrap();
        assert_eq!(items, vec![1, 2, 3]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn ensure_data_files_keeps_existing_content() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        ensure_data_files(&data, &["users.json", "progress.json"]).await.unwrap();
        assert_eq!(
            tokio::fs::read_to_string(data.join("users.json")).await.unwrap(),
            "[]"
        );

        tokio::fs::write(data.join("users.json"), "[1]").await.unwrap();
        ensure_data_files(&data, &["users.json"]).await.unwrap();
        assert_eq!(
            tokio::fs::read_to_string(data.join("users.json")).await.unwrap(),
            "[1]"
        );
    }
}
