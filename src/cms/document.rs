//! Wire format of the content API

use serde::{Deserialize, Serialize};

use crate::richtext::{RichText, TextField};

/// One page of search results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results_per_page: u32,
    #[serde(default)]
    pub total_results_size: u32,
    #[serde(default)]
    pub total_pages: u32,
    /// Cursor URL of the following page, `null` on the last one
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub prev_page: Option<String>,
    #[serde(default)]
    pub results: Vec<RawDocument>,
}

/// A document as returned by the API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type", default)]
    pub doc_type: String,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub last_publication_date: Option<String>,
    #[serde(default)]
    pub data: RawPostData,
}

/// Custom fields of a `posts` document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPostData {
    #[serde(default)]
    pub title: Option<TextField>,
    #[serde(default)]
    pub subtitle: Option<TextField>,
    #[serde(default)]
    pub author: Option<TextField>,
    #[serde(default)]
    pub banner: Option<RawImage>,
    #[serde(default)]
    pub content: Option<Vec<RawContentBlock>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Repeatable group entry: a heading followed by rich text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawContentBlock {
    #[serde(default)]
    pub heading: Option<TextField>,
    #[serde(default)]
    pub body: Option<RichText>,
}

/// Repository metadata served at the API root
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiInfo {
    #[serde(default)]
    pub refs: Vec<ApiRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRef {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_search_response() {
        let json = r#"{
            "page": 1,
            "results_per_page": 1,
            "total_results_size": 2,
            "total_pages": 2,
            "next_page": "https://blog.cdn.prismic.io/api/v2/documents/search?page=2",
            "prev_page": null,
            "results": [{
                "id": "YF0",
                "uid": "como-utilizar-hooks",
                "type": "posts",
                "first_publication_date": "2021-03-15T19:25:28+0000",
                "last_publication_date": null,
                "data": {
                    "title": "Como utilizar Hooks",
                    "subtitle": [{"type": "paragraph", "text": "Pensando em sincronização", "spans": []}],
                    "author": null
                }
            }]
        }"#;
        let response: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.total_pages, 2);
        assert!(response.next_page.is_some());
        let doc = &response.results[0];
        assert_eq!(doc.uid.as_deref(), Some("como-utilizar-hooks"));
        assert!(matches!(doc.data.title, Some(TextField::Plain(_))));
        assert!(matches!(doc.data.subtitle, Some(TextField::Rich(_))));
        assert!(doc.data.author.is_none());
        assert!(doc.data.content.is_none());
    }
}
