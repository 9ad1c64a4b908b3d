//! Mapping from API documents to post models

use std::sync::Arc;

use super::{ContentBlock, Cursor, PostDetail, PostPage, PostSummary};
use crate::cms::{ApiResponse, RawDocument};
use crate::config::SiteConfig;
use crate::helpers::{is_routable_uid, DateFormatter};
use crate::richtext::{RichTextRenderer, TextField};

/// Shapes raw documents into display models
#[derive(Clone)]
pub struct PostMapper {
    renderer: Arc<dyn RichTextRenderer>,
    dates: DateFormatter,
}

impl PostMapper {
    pub fn new(renderer: Arc<dyn RichTextRenderer>, dates: DateFormatter) -> Self {
        Self { renderer, dates }
    }

    pub fn from_config(config: &SiteConfig, renderer: Arc<dyn RichTextRenderer>) -> Self {
        Self::new(renderer, DateFormatter::from_config(config))
    }

    pub fn renderer(&self) -> &dyn RichTextRenderer {
        self.renderer.as_ref()
    }

    fn text(&self, field: Option<&TextField>) -> String {
        self.renderer.field_text(field)
    }

    /// List entry for `doc`; `None` when it has no uid to link to
    pub fn summary(&self, doc: &RawDocument) -> Option<PostSummary> {
        let uid = doc.uid.as_deref().filter(|uid| is_routable_uid(uid))?;
        Some(PostSummary {
            uid: uid.to_string(),
            first_publication_date: self.dates.display(doc.first_publication_date.as_deref()),
            title: self.text(doc.data.title.as_ref()),
            subtitle: self.text(doc.data.subtitle.as_ref()),
            author: self.text(doc.data.author.as_ref()),
        })
    }

    /// Map a search response, keeping API order
    pub fn page(&self, response: &ApiResponse) -> PostPage {
        let results = response
            .results
            .iter()
            .filter_map(|doc| {
                let summary = self.summary(doc);
                if summary.is_none() {
                    tracing::warn!("Skipping document {:?} without a usable uid", doc.id);
                }
                summary
            })
            .collect();

        PostPage {
            results,
            next_page: Cursor::new(response.next_page.clone()),
        }
    }

    pub fn detail(&self, doc: &RawDocument) -> PostDetail {
        let published = doc
            .last_publication_date
            .as_deref()
            .or(doc.first_publication_date.as_deref());

        let content = doc
            .data
            .content
            .iter()
            .flatten()
            .map(|group| ContentBlock {
                heading: self.text(group.heading.as_ref()),
                body: group.body.clone().unwrap_or_default(),
            })
            .collect();

        PostDetail {
            uid: doc.uid.clone().unwrap_or_default(),
            publication_date: self.dates.display(published),
            title: self.text(doc.data.title.as_ref()),
            banner_url: doc
                .data
                .banner
                .as_ref()
                .and_then(|b| b.url.clone())
                .filter(|url| !url.is_empty()),
            author: self.text(doc.data.author.as_ref()),
            content,
        }
    }
}
