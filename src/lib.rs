//! prismic-blog: a server-rendered blog backed by a Prismic repository
//!
//! Posts are read from the repository's REST API, paginated with the cursor
//! the API hands back, and rendered through embedded Tera templates either
//! live (`server`) or into a static directory (`generate`).

pub mod cms;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod pagination;
pub mod richtext;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cms::{ContentApi, PrismicClient, Query};
use content::{PostDetail, PostMapper};
use pagination::PostList;
use richtext::{PrismicRichText, RichTextRenderer};
use templates::PageRenderer;

/// The blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Extra static files copied or served as-is
    pub static_dir: PathBuf,
    api: Arc<dyn ContentApi>,
    rich_text: Arc<dyn RichTextRenderer>,
    mapper: PostMapper,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };
        config.apply_env();

        let api = Arc::new(PrismicClient::new(&config.api)?);
        Ok(Self::with_api(config, base_dir, api))
    }

    /// Create a Blog reading from the given content API
    pub fn with_api(
        config: config::SiteConfig,
        base_dir: PathBuf,
        api: Arc<dyn ContentApi>,
    ) -> Self {
        let rich_text: Arc<dyn RichTextRenderer> = Arc::new(PrismicRichText);
        let mapper = PostMapper::from_config(&config, rich_text.clone());
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            public_dir,
            static_dir,
            api,
            rich_text,
            mapper,
        }
    }

    pub fn api(&self) -> &dyn ContentApi {
        self.api.as_ref()
    }

    pub fn mapper(&self) -> &PostMapper {
        &self.mapper
    }

    /// Page renderer sharing this blog's rich text renderer
    pub fn renderer(&self) -> Result<PageRenderer> {
        PageRenderer::new(&self.config, self.rich_text.clone())
    }

    /// The list query: configured type, selected fields and page size
    pub fn list_query(&self) -> Query {
        Query::document_type(&self.config.api.document_type)
            .fetch(self.config.api.fetch.iter().cloned())
            .page_size(self.config.api.page_size)
    }

    /// Fetch the first page of posts
    pub async fn first_page(&self) -> Result<PostList> {
        let response = self.api.query(&self.list_query()).await?;
        Ok(PostList::seed(self.mapper.page(&response)))
    }

    /// Fetch a single post; `None` if the uid is unknown
    pub async fn post(&self, uid: &str) -> Result<Option<PostDetail>> {
        let doc = self
            .api
            .get_by_uid(&self.config.api.document_type, uid)
            .await?;
        Ok(doc.map(|doc| self.mapper.detail(&doc)))
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
