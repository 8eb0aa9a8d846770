//! Cache-first retrieval of forecast documents.

use tracing::{debug, warn};

use crate::{
    cache::{DocumentCache, cache_key},
    document,
    error::{Result, YrError},
    transport::Transport,
};

#[derive(Debug)]
pub struct Fetcher<T> {
    cache: DocumentCache,
    transport: T,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(cache: DocumentCache, transport: T) -> Self {
        Self { cache, transport }
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Return the document at `feed_url`, from cache if fresh.
    ///
    /// Downloaded bytes must be well-formed XML before they are returned or
    /// cached. A failed cache write is logged and otherwise ignored.
    pub async fn fetch_document(&self, feed_url: &str) -> Result<Vec<u8>> {
        let (bytes, _unavailable) = self.fetch_document_checked(feed_url).await?;
        Ok(bytes)
    }

    /// Like [`fetch_document`](Self::fetch_document), but a write to a
    /// missing cache directory is reported as `(bytes, Some(error))` instead
    /// of only being logged. Other write failures are still swallowed.
    pub async fn fetch_document_checked(
        &self,
        feed_url: &str,
    ) -> Result<(Vec<u8>, Option<YrError>)> {
        let key = cache_key(feed_url);

        if let Some(bytes) = self.cache.get(&key) {
            debug!(url = feed_url, "serving forecast from cache");
            return Ok((bytes, None));
        }

        debug!(url = feed_url, "downloading forecast");
        let bytes = self.transport.get(feed_url).await?;
        document::validate(feed_url, &bytes)?;

        let unavailable = match self.cache.put(&key, &bytes) {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "forecast not cached");
                matches!(e, YrError::CacheUnavailable(_)).then_some(e)
            }
        };

        Ok((bytes, unavailable))
    }
}
