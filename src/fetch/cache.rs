//! On-disk cache of HTTP response bodies, keyed by the full request URL.
//!
//! Entries never expire. Each entry is a bincode record in a file named after the
//! SHA-256 of its URL, written to a temporary file first and then moved into place.

use crate::fetch::error::FetchError;
use crate::utils::ensure_cache_dir_exists;
use bincode::config::{Configuration, Fixint, LittleEndian};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const CACHE_FILE_EXTENSION: &str = "bin";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

#[derive(Debug, Serialize, Deserialize)]
struct CachedResponse {
    url: String,
    body: String,
}

#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    /// Opens the cache at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, FetchError> {
        let dir = dir.into();
        ensure_cache_dir_exists(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        self.dir
            .join(format!("{}.{}", hex::encode(digest), CACHE_FILE_EXTENSION))
    }

    /// Body stored for `url`, if any.
    pub async fn get(&self, url: &str) -> Result<Option<String>, FetchError> {
        let path = self.entry_path(url);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(FetchError::CacheRead(path, e)),
        };

        let (entry, _) =
            bincode::serde::decode_from_slice::<CachedResponse, _>(&bytes, BINCODE_CONFIG)
                .map_err(|e| FetchError::CacheDecode(path.clone(), Box::new(e)))?;
        if entry.url != url {
            warn!(
                "Cache file {} belongs to {}, not {}; ignoring it",
                path.display(),
                entry.url,
                url
            );
            return Ok(None);
        }
        Ok(Some(entry.body))
    }

    /// Stores `body` for `url`, replacing any previous entry.
    pub async fn put(&self, url: &str, body: &str) -> Result<(), FetchError> {
        let path = self.entry_path(url);
        let dir = self.dir.clone();
        let entry = CachedResponse {
            url: url.to_string(),
            body: body.to_string(),
        };

        let written = tokio::task::spawn_blocking(move || {
            let bytes = bincode::serde::encode_to_vec(&entry, BINCODE_CONFIG)
                .map_err(|e| FetchError::CacheEncode(Box::new(e)))?;
            let mut temp_file =
                NamedTempFile::new_in(&dir).map_err(|e| FetchError::CacheWrite(path.clone(), e))?;
            temp_file
                .write_all(&bytes)
                .map_err(|e| FetchError::CacheWrite(path.clone(), e))?;
            temp_file
                .persist(&path)
                .map_err(|e| FetchError::CacheWrite(path.clone(), e.error))?;
            Ok::<usize, FetchError>(bytes.len())
        })
        .await??;

        debug!("Cached {} bytes for {}", written, url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::open(dir.path()).await.unwrap();
        let url = "https://archive.example/v1/archive?latitude=1";

        assert_eq!(cache.get(url).await.unwrap(), None);
        cache.put(url, r#"{"ok":true}"#).await.unwrap();
        assert_eq!(cache.get(url).await.unwrap().as_deref(), Some(r#"{"ok":true}"#));
        assert_eq!(cache.get("https://archive.example/other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::open(dir.path()).await.unwrap();
        cache.put("u", "first").await.unwrap();
        cache.put("u", "second").await.unwrap();
        assert_eq!(cache.get("u").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_entry_file_name_is_url_digest() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::open(dir.path()).await.unwrap();
        let name = cache
            .entry_path("abc")
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert_eq!(
            name,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad.bin"
        );
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::open(dir.path()).await.unwrap();
        std::fs::write(cache.entry_path("u"), [0xff, 0x01]).unwrap();
        let err = cache.get("u").await.unwrap_err();
        assert!(matches!(err, FetchError::CacheDecode(..)));
        assert!(err.is_cache());
    }
}
