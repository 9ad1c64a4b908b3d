//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped in a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/post/hello") // -> "/blog/post/hello"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Whether `uid` can name a detail page as a single path segment
pub fn is_routable_uid(uid: &str) -> bool {
    !uid.is_empty()
        && uid != "."
        && uid != ".."
        && !uid.chars().any(|c| c == '/' || c == '\\' || c.is_control())
}

/// Root-relative path of a post detail page, percent-encoded
///
/// Links use it as is; the static export writes the decoded form so any
/// file server maps the link back to the same file.
pub fn post_path(uid: &str) -> String {
    format!("post/{}", utf8_percent_encode(uid, SEGMENT))
}

/// Link target of a post detail page
pub fn post_url(config: &SiteConfig, uid: &str) -> String {
    url_for(config, &post_path(uid))
}

/// Generate a full URL including the domain
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}
