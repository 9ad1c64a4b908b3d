//! Content API access
//!
//! The [`ContentApi`] trait is the seam between page controllers and the
//! repository; [`PrismicClient`] implements it over HTTP.

mod client;
mod document;
mod error;
mod query;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ContentApi, PrismicClient};
pub use document::{ApiResponse, RawContentBlock, RawDocument, RawImage, RawPostData};
pub use error::{CmsError, Result};
pub use query::{same_origin, Predicate, Query};
