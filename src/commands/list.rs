//! List posts in the repository

use anyhow::Result;

use crate::Blog;

/// Print every post, walking the pagination cursor to the end
pub async fn run(blog: &Blog) -> Result<()> {
    let mut list = blog.first_page().await?;
    list.load_all(blog.api(), blog.mapper()).await?;

    println!("Posts ({}):", list.posts().len());
    for post in list.posts() {
        println!(
            "  {} - {} [{}] ({})",
            post.first_publication_date, post.title, post.uid, post.author
        );
    }

    Ok(())
}
