//! Incremental post list pagination
//!
//! A [`PostList`] is seeded with the first page and grows by appending the
//! page behind its cursor. Loading is split into three steps so the list never
//! has to be borrowed across an await:
//!
//! 1. [`PostList::begin_load`] checks the cursor and marks a load in flight,
//! 2. [`LoadRequest::run`] fetches and maps the next page,
//! 3. [`PostList::apply`] folds the outcome back into the list.

use std::collections::HashSet;
use std::ops::Range;

use crate::cms::{CmsError, ContentApi};
use crate::content::{Cursor, PostMapper, PostPage, PostSummary};

/// Ordered posts of one list view plus the cursor of the next page
#[derive(Debug, Clone, Default)]
pub struct PostList {
    posts: Vec<PostSummary>,
    seen: HashSet<String>,
    cursor: Cursor,
    loading: bool,
    last_error: Option<CmsError>,
}

/// A pending fetch of the page behind a cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    cursor: String,
}

/// Result of a page fetch
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Loaded(PostPage),
    Failed(CmsError),
}

impl PostList {
    /// Start a list from server-provided initial data
    pub fn seed(page: PostPage) -> Self {
        let mut list = Self::default();
        list.append(page);
        list
    }

    /// Continue a list whose earlier pages are already shown elsewhere
    ///
    /// The list starts empty at `cursor`; posts with a uid in `shown` are
    /// skipped when later pages arrive.
    pub fn resume<I>(cursor: Cursor, shown: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            seen: shown.into_iter().collect(),
            cursor,
            ..Self::default()
        }
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn has_more(&self) -> bool {
        !self.cursor.is_exhausted()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error of the most recent failed load, cleared by the next success
    pub fn last_error(&self) -> Option<&CmsError> {
        self.last_error.as_ref()
    }

    /// Claim the next page for loading
    ///
    /// Returns `None` when the cursor is exhausted or a load is already in
    /// flight; no fetch must happen in either case.
    pub fn begin_load(&mut self) -> Option<LoadRequest> {
        if self.loading {
            tracing::debug!("Load already in flight, ignoring");
            return None;
        }
        let cursor = self.cursor.as_str()?.to_string();
        self.loading = true;
        Some(LoadRequest { cursor })
    }

    /// Fold a load outcome into the list
    ///
    /// On success returns the index range of the appended posts. On failure
    /// posts and cursor are left untouched and the error is kept for display.
    pub fn apply(&mut self, outcome: LoadOutcome) -> Result<Range<usize>, CmsError> {
        self.loading = false;
        match outcome {
            LoadOutcome::Loaded(page) => {
                self.last_error = None;
                Ok(self.append(page))
            }
            LoadOutcome::Failed(err) => {
                tracing::warn!("Failed to load more posts: {}", err);
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Fetch and append the next page
    ///
    /// `Ok(None)` means there was nothing to load.
    pub async fn load_more(
        &mut self,
        api: &dyn ContentApi,
        mapper: &PostMapper,
    ) -> Result<Option<Range<usize>>, CmsError> {
        let Some(request) = self.begin_load() else {
            return Ok(None);
        };
        let outcome = request.run(api, mapper).await;
        self.apply(outcome).map(Some)
    }

    /// Keep loading until the cursor is exhausted
    pub async fn load_all(
        &mut self,
        api: &dyn ContentApi,
        mapper: &PostMapper,
    ) -> Result<(), CmsError> {
        while self.load_more(api, mapper).await?.is_some() {}
        Ok(())
    }

    fn append(&mut self, page: PostPage) -> Range<usize> {
        let start = self.posts.len();
        for post in page.results {
            if !self.seen.insert(post.uid.clone()) {
                tracing::warn!("Skipping duplicate post {:?}", post.uid);
                continue;
            }
            self.posts.push(post);
        }
        self.cursor = page.next_page;
        start..self.posts.len()
    }
}

impl LoadRequest {
    pub async fn run(self, api: &dyn ContentApi, mapper: &PostMapper) -> LoadOutcome {
        tracing::debug!("Loading next page");
        match api.fetch_page(&self.cursor).await {
            Ok(response) => LoadOutcome::Loaded(mapper.page(&response)),
            Err(err) => LoadOutcome::Failed(err),
        }
    }
}
