//! Post models shown by the list and detail pages

use serde::Serialize;

use super::reading_time;
use crate::richtext::RichText;

/// A list entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    /// Routing key of the detail page
    pub uid: String,

    /// Display-formatted first publication date
    pub first_publication_date: String,

    pub title: String,

    pub subtitle: String,

    pub author: String,
}

/// A fully fetched post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    pub uid: String,

    /// Display-formatted publication date
    pub publication_date: String,

    pub title: String,

    pub banner_url: Option<String>,

    pub author: String,

    pub content: Vec<ContentBlock>,
}

impl PostDetail {
    /// Estimated reading time in minutes
    pub fn reading_time(&self, words_per_minute: usize) -> usize {
        reading_time::reading_time(&self.content, words_per_minute)
    }
}

/// A heading and the rich text that follows it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentBlock {
    /// Plain heading text, empty when the group has none
    pub heading: String,

    pub body: RichText,
}

/// Location of the next page of results
///
/// An absent or empty cursor means there is nothing more to fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor(Option<String>);

impl Cursor {
    pub fn new(next_page: Option<String>) -> Self {
        Self(next_page.filter(|url| !url.trim().is_empty()))
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_exhausted(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Option<String>> for Cursor {
    fn from(next_page: Option<String>) -> Self {
        Self::new(next_page)
    }
}

/// One fetched page of summaries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPage {
    pub results: Vec<PostSummary>,
    pub next_page: Cursor,
}
