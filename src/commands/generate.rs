//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Export the whole site into the public directory
pub async fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(blog)?;
    let stats = generator.generate().await?;

    tracing::info!(
        "Generated {} posts across {} list pages in {:.2}s",
        stats.posts,
        stats.list_pages,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
