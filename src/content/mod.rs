//! Content module - post models, API-to-view mapping and reading time

mod mapping;
mod post;
pub mod reading_time;

pub use mapping::PostMapper;
pub use post::{ContentBlock, Cursor, PostDetail, PostPage, PostSummary};
