//! HTTP client for the Prismic REST API

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::document::{ApiInfo, ApiResponse, RawDocument};
use super::error::{CmsError, Result};
use super::query::{same_origin, Query};
use crate::config::ApiConfig;

/// Read access to a content repository
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Run a documents search against the current master ref
    async fn query(&self, query: &Query) -> Result<ApiResponse>;

    /// Fetch the page behind a `next_page` cursor
    async fn fetch_page(&self, cursor: &str) -> Result<ApiResponse>;

    /// Fetch a single document by its uid; `None` if it does not exist
    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Option<RawDocument>>;
}

pub struct PrismicClient {
    client: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
}

impl PrismicClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("prismic-blog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    /// Resolve the ref that published content is read from
    async fn master_ref(&self) -> Result<String> {
        let url = self.with_token(Url::parse(&self.endpoint)?);
        let info: ApiInfo = self.get_json(url).await?;

        info.refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or(CmsError::MissingRef)
    }

    fn with_token(&self, mut url: Url) -> Url {
        if let Some(ref token) = self.access_token {
            let has_token = url.query_pairs().any(|(k, _)| k == "access_token");
            if !has_token {
                url.query_pairs_mut().append_pair("access_token", token);
            }
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", redact(&url));

        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(CmsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ContentApi for PrismicClient {
    async fn query(&self, query: &Query) -> Result<ApiResponse> {
        let reference = self.master_ref().await?;

        let mut url = Url::parse(&format!("{}/documents/search", self.endpoint))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("ref", &reference);
            for (key, value) in query.params() {
                pairs.append_pair(key, &value);
            }
        }

        self.get_json(self.with_token(url)).await
    }

    async fn fetch_page(&self, cursor: &str) -> Result<ApiResponse> {
        if !same_origin(&self.endpoint, cursor) {
            return Err(CmsError::InvalidCursor(cursor.to_string()));
        }
        let url = self.with_token(Url::parse(cursor)?);
        self.get_json(url).await
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Option<RawDocument>> {
        let query = Query::document_type(doc_type)
            .at(&format!("my.{}.uid", doc_type), uid)
            .page_size(1);
        let response = self.query(&query).await?;
        Ok(response.results.into_iter().next())
    }
}

/// Strip the access token before a URL is logged
fn redact(url: &Url) -> String {
    let mut url = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "access_token")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query as QueryParams, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    async fn spawn_repository() -> String {
        async fn api_root() -> Json<serde_json::Value> {
            Json(json!({
                "refs": [
                    { "id": "preview", "ref": "draft-ref", "isMasterRef": false },
                    { "id": "master", "ref": "master-ref", "isMasterRef": true }
                ]
            }))
        }

        async fn search(
            QueryParams(params): QueryParams<HashMap<String, String>>,
        ) -> Json<serde_json::Value> {
            assert_eq!(params.get("ref").map(String::as_str), Some("master-ref"));
            assert_eq!(params.get("access_token").map(String::as_str), Some("secret"));

            let q = params.get("q").cloned().unwrap_or_default();
            if q.contains("my.posts.uid") && !q.contains("\"hello\"") {
                return Json(json!({ "page": 1, "results": [], "next_page": null }));
            }

            let page = params.get("page").cloned().unwrap_or_else(|| "1".to_string());
            Json(json!({
                "page": page.parse::<u32>().unwrap_or(1),
                "next_page": if page == "1" { json!("NEXT") } else { json!(null) },
                "results": [{ "uid": format!("post-{}", page), "type": "posts", "data": {} }]
            }))
        }

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/api/v2", get(api_root))
            .route("/api/v2/documents/search", get(search));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/v2", addr)
    }

    fn client(endpoint: &str) -> PrismicClient {
        PrismicClient::new(&ApiConfig {
            endpoint: endpoint.to_string(),
            access_token: Some("secret".to_string()),
            ..ApiConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_query_uses_master_ref() {
        let endpoint = spawn_repository().await;
        let client = client(&endpoint);

        let query = Query::document_type("posts").fetch(["posts.title"]).page_size(1);
        let response = client.query(&query).await.unwrap();
        assert_eq!(response.results[0].uid.as_deref(), Some("post-1"));
        assert_eq!(response.next_page.as_deref(), Some("NEXT"));
    }

    #[tokio::test]
    async fn test_fetch_page_follows_cursor() {
        let endpoint = spawn_repository().await;
        let client = client(&endpoint);

        let cursor = format!("{}/documents/search?ref=master-ref&page=2", endpoint);
        let response = client.fetch_page(&cursor).await.unwrap();
        assert_eq!(response.page, 2);
        assert!(response.next_page.is_none());
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_foreign_cursor() {
        let client = client("https://blog.cdn.prismic.io/api/v2");
        let err = client
            .fetch_page("https://evil.example/steal")
            .await
            .unwrap_err();
        assert!(matches!(err, CmsError::InvalidCursor(_)));
    }

    #[tokio::test]
    async fn test_get_by_uid() {
        let endpoint = spawn_repository().await;
        let client = client(&endpoint);

        let found = client.get_by_uid("posts", "hello").await.unwrap();
        assert!(found.is_some());
        let missing = client.get_by_uid("posts", "nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let endpoint = spawn_repository().await;
        let client = client(&format!("{}/missing", endpoint));
        let err = client.query(&Query::document_type("posts")).await.unwrap_err();
        assert!(matches!(err, CmsError::Api { status: 404, .. }));
    }

    #[test]
    fn test_redact_token() {
        let url = Url::parse("https://x.io/api?ref=a&access_token=secret").unwrap();
        assert_eq!(redact(&url), "https://x.io/api?ref=a");
    }
}
