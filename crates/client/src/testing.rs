//! In-memory fetcher serving fixture documents to adapter tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{StatusCode, Url};

use pastehunt_core::Error;

use crate::fetch::{BodyLimit, FetchRequest, FetchResponse, PageFetcher};

#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, Result<String, Error>>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn failing(mut self, url: &str, error: Error) -> Self {
        self.pages.insert(url.to_string(), Err(error));
        self
    }

    pub fn delayed(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, Error> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delays.get(&request.url) {
            tokio::time::sleep(*delay).await;
        }

        let body = match self.pages.get(&request.url) {
            Some(Ok(body)) => body.clone(),
            Some(Err(e)) => return Err(e.clone()),
            None => return Err(Error::HttpError(format!("status 404 from {}", request.url))),
        };

        let (bytes, truncated) = match request.limit {
            BodyLimit::Truncate(max) if body.len() > max => (Bytes::from(body.as_bytes()[..max].to_vec()), true),
            BodyLimit::Reject(max) if body.len() > max => {
                return Err(Error::FetchTooLarge(format!("body exceeds {} bytes", max)));
            }
            _ => (Bytes::from(body), false),
        };

        let url = Url::parse(&request.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Ok(FetchResponse {
            final_url: url.clone(),
            url,
            status: StatusCode::OK,
            content_type: Some("text/html".to_string()),
            bytes,
            truncated,
            fetch_ms: 0,
        })
    }
}
