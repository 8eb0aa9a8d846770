//! Disk cache for downloaded forecast documents.
//!
//! One file per feed URL, named by the SHA-256 hex digest of the URL string.
//! Freshness is judged from the file's modification time; stale files are
//! left in place and overwritten by the next successful write.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{Result, YrError};

/// Default cache TTL: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Cache key for a feed URL.
///
/// Two URLs that differ only in spelling get different keys.
pub fn cache_key(feed_url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(feed_url.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone)]
pub struct DocumentCache {
    /// `None` disables caching.
    directory: Option<PathBuf>,
    ttl: Duration,
}

impl DocumentCache {
    pub fn new(directory: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            directory: Some(directory.into()),
            ttl,
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            directory: None,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.directory.is_some()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        self.directory.as_ref().map(|dir| dir.join(key))
    }

    /// Fresh cached bytes for `key`, if any.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.get_at(key, SystemTime::now())
    }

    /// Like [`get`](Self::get), judging freshness as of `now`.
    pub fn get_at(&self, key: &str, now: SystemTime) -> Option<Vec<u8>> {
        let path = self.entry_path(key)?;

        let stored_at = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not stat cache file");
                return None;
            }
        };

        // A timestamp in the future counts as age zero.
        let age = now.duration_since(stored_at).unwrap_or(Duration::ZERO);
        if age >= self.ttl {
            debug!(key, age_secs = age.as_secs(), "cache entry expired");
            return None;
        }

        match fs::read(&path) {
            Ok(bytes) => {
                debug!(key, age_secs = age.as_secs(), "cache hit");
                Some(bytes)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read cache file");
                None
            }
        }
    }

    /// Store `bytes` under `key`, replacing any previous entry.
    ///
    /// Does nothing when caching is disabled. Fails with
    /// [`YrError::CacheUnavailable`] when the configured directory is missing.
    pub fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let Some(dir) = self.directory.as_ref() else {
            return Ok(());
        };

        if !dir.is_dir() {
            return Err(YrError::CacheUnavailable(dir.clone()));
        }

        let path = dir.join(key);
        fs::write(&path, bytes).map_err(|source| YrError::CacheWrite {
            path: path.clone(),
            source,
        })?;

        debug!(key, bytes = bytes.len(), "cache entry written");
        Ok(())
    }
}
