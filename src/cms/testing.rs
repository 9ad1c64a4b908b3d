//! In-memory repository used by tests

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{ApiResponse, CmsError, ContentApi, Query, RawDocument, Result};

pub(crate) const ENDPOINT: &str = "https://blog.cdn.prismic.io/api/v2";

/// Serves fixed pages of documents; page `n` is reachable through `cursor(n)`
#[derive(Default)]
pub(crate) struct MemoryContentApi {
    pages: Vec<Vec<RawDocument>>,
    failing: Mutex<HashSet<usize>>,
    failing_lookups: AtomicBool,
    fetches: AtomicUsize,
}

impl MemoryContentApi {
    pub fn with_pages(pages: Vec<Vec<RawDocument>>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    /// Make fetches of page `n` fail with a network error
    pub fn fail_page(&self, page: usize) {
        self.failing.lock().unwrap().insert(page);
    }

    pub fn heal_page(&self, page: usize) {
        self.failing.lock().unwrap().remove(&page);
    }

    /// Make every `get_by_uid` fail with an API error
    pub fn fail_lookups(&self) {
        self.failing_lookups.store(true, Ordering::SeqCst);
    }

    /// Number of requests served so far
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn cursor(page: usize) -> String {
        format!("{}/documents/search?page={}", ENDPOINT, page)
    }

    fn page(&self, page: usize) -> Result<ApiResponse> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.failing.lock().unwrap().contains(&page) {
            return Err(CmsError::Network("connection reset".to_string()));
        }
        let results = self
            .pages
            .get(page.wrapping_sub(1))
            .cloned()
            .ok_or_else(|| CmsError::Api {
                status: 404,
                message: format!("no page {}", page),
            })?;

        Ok(ApiResponse {
            page: page as u32,
            results_per_page: results.len() as u32,
            total_pages: self.pages.len() as u32,
            next_page: (page < self.pages.len()).then(|| Self::cursor(page + 1)),
            results,
            ..Default::default()
        })
    }
}

#[async_trait]
impl ContentApi for MemoryContentApi {
    async fn query(&self, _query: &Query) -> Result<ApiResponse> {
        self.page(1)
    }

    async fn fetch_page(&self, cursor: &str) -> Result<ApiResponse> {
        let page = cursor
            .rsplit("page=")
            .next()
            .and_then(|n| n.parse::<usize>().ok())
            .ok_or_else(|| CmsError::InvalidCursor(cursor.to_string()))?;
        self.page(page)
    }

    async fn get_by_uid(&self, _doc_type: &str, uid: &str) -> Result<Option<RawDocument>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing_lookups.load(Ordering::SeqCst) {
            return Err(CmsError::Api {
                status: 400,
                message: "malformed query".to_string(),
            });
        }
        Ok(self
            .pages
            .iter()
            .flatten()
            .find(|doc| doc.uid.as_deref() == Some(uid))
            .cloned())
    }
}

/// A `posts` document with a rich-text title and one content group
pub(crate) fn raw_post(uid: &str, title: &str) -> RawDocument {
    serde_json::from_value(json!({
        "id": format!("id-{}", uid),
        "uid": uid,
        "type": "posts",
        "first_publication_date": "2021-03-15T19:25:28+0000",
        "last_publication_date": "2021-03-25T19:25:28+0000",
        "data": {
            "title": [{ "type": "heading1", "text": title, "spans": [] }],
            "subtitle": "Pensando em sincronização em vez de ciclos de vida",
            "author": [{ "type": "paragraph", "text": "Joseph Oliveira", "spans": [] }],
            "banner": { "url": "https://images.prismic.io/blog/banner.png" },
            "content": [{
                "heading": "A B",
                "body": [{ "type": "paragraph", "text": "C D E", "spans": [] }]
            }]
        }
    }))
    .unwrap()
}
