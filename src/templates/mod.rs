//! Built-in theme templates using the Tera template engine
//!
//! Templates and static assets are embedded in the binary.

use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{PostDetail, PostSummary};
use crate::helpers::{full_url_for, post_url, url_for};
use crate::richtext::RichTextRenderer;

/// An embedded static file
pub struct Asset {
    pub path: &'static str,
    pub content_type: &'static str,
    pub body: &'static str,
}

pub const ASSETS: &[Asset] = &[
    Asset {
        path: "Logo.svg",
        content_type: "image/svg+xml",
        body: include_str!("theme/assets/Logo.svg"),
    },
    Asset {
        path: "styles.css",
        content_type: "text/css; charset=utf-8",
        body: include_str!("theme/assets/styles.css"),
    },
];

/// Seconds before the loading placeholder reloads itself
const LOADING_REFRESH_SECS: u64 = 1;

/// Page renderer with the embedded theme
pub struct PageRenderer {
    tera: Tera,
    config: SiteConfig,
    rich_text: Arc<dyn RichTextRenderer>,
}

impl PageRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig, rich_text: Arc<dyn RichTextRenderer>) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post.html", include_str!("theme/post.html")),
            ("loading.html", include_str!("theme/loading.html")),
            ("not_found.html", include_str!("theme/not_found.html")),
            ("error.html", include_str!("theme/error.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("theme/partials/header.html"),
            ),
            (
                "partials/post_items.html",
                include_str!("theme/partials/post_items.html"),
            ),
        ])?;

        Ok(Self {
            tera,
            config: config.clone(),
            rich_text,
        })
    }

    /// List page with the first page of posts
    ///
    /// `more_url` is where the load-more trigger fetches the next fragment;
    /// without it the trigger is not rendered.
    pub fn render_index(&self, posts: &[PostSummary], more_url: Option<&str>) -> Result<String> {
        let mut context = self.base_context();
        context.insert("posts", &self.post_items(posts));
        context.insert("more_url", &more_url);
        self.render("index.html", &context)
    }

    /// List entries only, appended by the load-more script
    pub fn render_fragment(&self, posts: &[PostSummary]) -> Result<String> {
        let mut context = self.base_context();
        context.insert("posts", &self.post_items(posts));
        self.render("partials/post_items.html", &context)
    }

    pub fn render_post(&self, post: &PostDetail) -> Result<String> {
        let view = PostView {
            title: post.title.clone(),
            date: post.publication_date.clone(),
            author: post.author.clone(),
            reading_time: post.reading_time(self.config.words_per_minute),
            banner_url: post.banner_url.clone(),
            blocks: post
                .content
                .iter()
                .map(|block| BlockView {
                    heading: block.heading.clone(),
                    html: self.rich_text.as_html(&block.body),
                })
                .collect(),
        };

        let mut context = self.base_context();
        context.insert("post", &view);
        self.render("post.html", &context)
    }

    /// Placeholder shown while a post is still being resolved
    pub fn render_loading(&self) -> Result<String> {
        let mut context = self.base_context();
        context.insert("refresh_secs", &LOADING_REFRESH_SECS);
        self.render("loading.html", &context)
    }

    pub fn render_not_found(&self) -> Result<String> {
        self.render("not_found.html", &self.base_context())
    }

    pub fn render_error(&self, message: &str) -> Result<String> {
        let mut context = self.base_context();
        context.insert("message", message);
        self.render("error.html", &context)
    }

    fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    fn base_context(&self) -> Context {
        let site = SiteData {
            title: self.config.title.clone(),
            language: self.config.language.clone(),
            home_url: url_for(&self.config, "/"),
            canonical_url: full_url_for(&self.config, "/"),
            logo_url: url_for(&self.config, "Logo.svg"),
            styles_url: url_for(&self.config, "styles.css"),
        };

        let mut context = Context::new();
        context.insert("site", &site);
        context
    }

    fn post_items(&self, posts: &[PostSummary]) -> Vec<PostItem> {
        posts
            .iter()
            .map(|p| PostItem {
                uid: p.uid.clone(),
                href: post_url(&self.config, &p.uid),
                title: p.title.clone(),
                subtitle: p.subtitle.clone(),
                date: p.first_publication_date.clone(),
                author: p.author.clone(),
            })
            .collect()
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub language: String,
    pub home_url: String,
    pub canonical_url: String,
    pub logo_url: String,
    pub styles_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostItem {
    pub uid: String,
    pub href: String,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub author: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub title: String,
    pub date: String,
    pub author: String,
    pub reading_time: usize,
    pub banner_url: Option<String>,
    pub blocks: Vec<BlockView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockView {
    pub heading: String,
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentBlock;
    use crate::richtext::{Block, PrismicRichText, RichText};

    fn renderer() -> PageRenderer {
        PageRenderer::new(&SiteConfig::default(), Arc::new(PrismicRichText)).unwrap()
    }

    fn summary(uid: &str, title: &str) -> PostSummary {
        PostSummary {
            uid: uid.to_string(),
            first_publication_date: "15 mar 2021".to_string(),
            title: title.to_string(),
            subtitle: "Subtitle".to_string(),
            author: "Joseph Oliveira".to_string(),
        }
    }

    #[test]
    fn test_index_links_posts_by_uid() {
        let html = renderer()
            .render_index(&[summary("hello-world", "Hello")], Some("/posts/more?cursor=x"))
            .unwrap();
        assert!(html.contains(r#"href="/post/hello-world""#));
        assert!(html.contains(r#"data-uid="hello-world""#));
        assert!(html.contains("Hello"));
        assert!(html.contains("Carregar mais posts"));
        assert!(html.contains(r#"alt="logo""#));
    }

    #[test]
    fn test_index_without_cursor_has_no_trigger() {
        let html = renderer().render_index(&[summary("a", "A")], None).unwrap();
        assert!(!html.contains("Carregar mais posts"));
    }

    #[test]
    fn test_titles_are_escaped() {
        let html = renderer()
            .render_fragment(&[summary("x", "<script>alert(1)</script>")])
            .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_post_page() {
        let post = PostDetail {
            uid: "hello".to_string(),
            publication_date: "25 mar 2021".to_string(),
            title: "Hello".to_string(),
            banner_url: Some("https://images.prismic.io/banner.png".to_string()),
            author: "Joseph Oliveira".to_string(),
            content: vec![ContentBlock {
                heading: "A B".to_string(),
                body: RichText(vec![Block::paragraph("C D E")]),
            }],
        };
        let html = renderer().render_post(&post).unwrap();
        assert!(html.contains("1 min"));
        assert!(html.contains("<h1>A B</h1>"));
        assert!(html.contains("<p>C D E</p>"));
        assert!(html.contains("25 mar 2021"));
    }

    #[test]
    fn test_loading_and_not_found() {
        let renderer = renderer();
        assert!(renderer.render_loading().unwrap().contains("Carregando..."));
        assert!(renderer.render_not_found().unwrap().contains("404"));
    }
}
