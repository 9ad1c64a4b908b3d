//! Initialize a new blog directory

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# Blog Configuration

# Site
title: ProjetoZero
language: pt-BR
timezone: America/Sao_Paulo

# URL
url: http://localhost:3000
root: /

# Directory
public_dir: public
static_dir: static

# Writing
date_format: dd LLL yyyy
words_per_minute: 200

# Server
## Render a loading placeholder while an unknown post is fetched
fallback: true
## Most post pages remembered between requests
detail_cache_size: 1000

# Content API
## PRISMIC_API_ENDPOINT and PRISMIC_ACCESS_TOKEN override these values
api:
  endpoint: https://your-repo.cdn.prismic.io/api/v2
  access_token:
  document_type: posts
  fetch:
    - posts.title
    - posts.subtitle
    - posts.author
  page_size: 1
  timeout_secs: 30
"#;

/// Initialize a new blog in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("static"))?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }
    fs::write(&config_path, CONFIG_TEMPLATE)?;
    tracing::debug!("Wrote {:?}", config_path);

    Ok(())
}
