//! Generator module - exports the site as static files
//!
//! The list page is written with its first page of posts; every later page
//! becomes a JSON fragment the load-more script fetches, each pointing at the
//! next. Detail pages are written for every post reachable through the cursor.

use anyhow::Result;
use std::fs;
use std::path::Path;

use percent_encoding::percent_decode_str;
use walkdir::WalkDir;

use crate::helpers::{post_path, url_for};
use crate::server::MoreResponse;
use crate::templates::{PageRenderer, ASSETS};
use crate::Blog;

/// Counts reported after a generation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub posts: usize,
    pub list_pages: usize,
}

/// Static site generator
pub struct Generator {
    blog: Blog,
    renderer: PageRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            renderer: blog.renderer()?,
            blog: blog.clone(),
        })
    }

    /// Generate the entire site
    pub async fn generate(&self) -> Result<GenerateStats> {
        let public_dir = &self.blog.public_dir;
        fs::create_dir_all(public_dir)?;

        self.write_assets()?;
        self.copy_static_files()?;

        let stats = self.generate_list_pages().await?;
        self.generate_not_found_page()?;

        Ok(stats)
    }

    /// Write the index and one fragment per following page, then the posts
    async fn generate_list_pages(&self) -> Result<GenerateStats> {
        let api = self.blog.api();
        let mapper = self.blog.mapper();

        let mut list = self.blog.first_page().await?;
        let more = list.has_more().then(|| self.fragment_url(2));
        let html = self.renderer.render_index(list.posts(), more.as_deref())?;
        self.write("index.html", &html)?;

        let mut list_pages = 1;
        while let Some(appended) = list.load_more(api, mapper).await? {
            list_pages += 1;
            let fragment = MoreResponse {
                html: self.renderer.render_fragment(&list.posts()[appended])?,
                next: list.has_more().then(|| self.fragment_url(list_pages + 1)),
            };
            self.write(
                &format!("page/{}.json", list_pages),
                &serde_json::to_string(&fragment)?,
            )?;
        }

        let mut posts = 0;
        for summary in list.posts() {
            let Some(post) = self.blog.post(&summary.uid).await? else {
                tracing::warn!("Post {:?} disappeared while generating", summary.uid);
                continue;
            };

            // Written where a file server resolves the list link to
            let dir = percent_decode_str(&post_path(&summary.uid))
                .decode_utf8()?
                .into_owned();
            let html = self.renderer.render_post(&post)?;
            self.write(&format!("{}/index.html", dir), &html)?;
            posts += 1;
        }

        Ok(GenerateStats { posts, list_pages })
    }

    fn generate_not_found_page(&self) -> Result<()> {
        let html = self.renderer.render_not_found()?;
        self.write("404.html", &html)
    }

    fn write_assets(&self) -> Result<()> {
        for asset in ASSETS {
            self.write(asset.path, asset.body)?;
        }
        Ok(())
    }

    /// Copy the static directory into the public directory
    fn copy_static_files(&self) -> Result<()> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let relative = entry.path().strip_prefix(static_dir)?;
            let dest = self.blog.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
            tracing::debug!("Copied: {:?}", relative);
        }

        Ok(())
    }

    fn fragment_url(&self, page: usize) -> String {
        url_for(&self.blog.config, &format!("page/{}.json", page))
    }

    fn write(&self, relative: &str, content: &str) -> Result<()> {
        let output_path = self.blog.public_dir.join(Path::new(relative));
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
        }
        fs::write(&output_path, content)
            .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }
}
