//! Raw paste content retrieval.

use std::sync::Arc;
use std::time::Duration;

use pastehunt_core::{AppConfig, Error, PasteId};

use crate::fetch::{BodyLimit, FetchRequest, PageFetcher};

/// Fetches raw paste bodies with the short content timeout.
#[derive(Clone)]
pub struct ContentFetcher {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
    timeout: Duration,
    peek_bytes: usize,
    max_body_bytes: usize,
}

impl ContentFetcher {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &AppConfig) -> Self {
        Self {
            fetcher,
            base_url: config.archive_base_url.clone(),
            timeout: config.content_timeout(),
            peek_bytes: config.content_peek_bytes,
            max_body_bytes: config.max_listing_bytes,
        }
    }

    /// First `content_peek_bytes` of the raw paste.
    pub async fn peek(&self, id: &PasteId) -> Result<String, Error> {
        let request = FetchRequest::get(id.raw_url(&self.base_url), self.timeout)
            .with_limit(BodyLimit::Truncate(self.peek_bytes));
        let response = self.fetcher.fetch(request).await?;
        tracing::debug!(paste_id = %id, bytes = response.bytes.len(), "peeked paste content");
        Ok(response.text())
    }

    /// The raw paste, rejected if it exceeds the listing size limit.
    pub async fn body(&self, id: &PasteId) -> Result<String, Error> {
        let request = FetchRequest::get(id.raw_url(&self.base_url), self.timeout)
            .with_limit(BodyLimit::Reject(self.max_body_bytes));
        let response = self.fetcher.fetch(request).await?;
        Ok(response.text())
    }
}

impl std::fmt::Debug for ContentFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentFetcher")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("peek_bytes", &self.peek_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeFetcher;

    #[tokio::test]
    async fn test_peek_truncates_and_uses_raw_url() {
        let fetcher = Arc::new(FakeFetcher::new().page("https://pastebin.com/raw/AbCd1234", &"z".repeat(3000)));
        let content = ContentFetcher::new(fetcher.clone(), &AppConfig::default());

        let id = PasteId::parse("AbCd1234").unwrap();
        let text = content.peek(&id).await.unwrap();
        assert_eq!(text.len(), 1000);

        let requests = fetcher.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].limit, BodyLimit::Truncate(1000));
        assert_eq!(requests[0].timeout, Duration::from_millis(3000));
    }

    #[tokio::test]
    async fn test_body_reads_full_paste() {
        let fetcher = Arc::new(FakeFetcher::new().page("https://pastebin.com/raw/AbCd1234", &"z".repeat(3000)));
        let content = ContentFetcher::new(fetcher, &AppConfig::default());

        let id = PasteId::parse("AbCd1234").unwrap();
        assert_eq!(content.body(&id).await.unwrap().len(), 3000);
    }

    #[tokio::test]
    async fn test_peek_propagates_errors() {
        let fetcher = Arc::new(FakeFetcher::new());
        let content = ContentFetcher::new(fetcher, &AppConfig::default());

        let id = PasteId::parse("Missing1").unwrap();
        assert!(matches!(content.peek(&id).await, Err(Error::HttpError(_))));
    }
}
