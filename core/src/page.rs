//! Paginated post listings.
//!
//! # Design
//! A `Page` is one response from a post-listing endpoint: the stubs it
//! contained, the exact parameters that produced it, and the cursoring
//! strategy of its lineage. Pages are never mutated by pagination;
//! `next_by_offset` and `next_by_since_id` validate the request against the
//! page's strategy, then fetch a brand-new page from a copy of the
//! parameters.
//!
//! A root page (from `Page::fetch`) is `Unset`, so either strategy may be
//! started from it. A page derived by offset is `ByOffset` and only accepts
//! `next_by_offset`; a page derived by `since_id` is `BySinceId` and only
//! accepts `next_by_since_id`. Validation happens before any request.
//!
//! Typed posts are resolved lazily behind a `OnceLock`: concurrent first
//! calls are serialized and the decode runs once per page.

use std::sync::OnceLock;

use serde::Deserialize;
use serde_json::Value;

use crate::blog::normalize_blog_name;
use crate::client::Client;
use crate::error::ApiError;
use crate::params::Params;
use crate::post::{Post, PostStub};
use crate::resolver;
use crate::response::Response;

/// How a lineage of pages advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    Unset,
    ByOffset,
    BySinceId,
}

/// Which of a blog's post listings to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogListing {
    Published,
    Queue,
    Drafts,
    Submissions,
}

impl BlogListing {
    fn path_suffix(&self) -> &'static str {
        match self {
            BlogListing::Published => "posts",
            BlogListing::Queue => "posts/queue",
            BlogListing::Drafts => "posts/draft",
            BlogListing::Submissions => "posts/submission",
        }
    }
}

/// The endpoint a page of posts was fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostSource {
    Dashboard,
    Likes,
    Blog { name: String, listing: BlogListing },
}

impl PostSource {
    pub fn path(&self) -> String {
        match self {
            PostSource::Dashboard => "/user/dashboard".to_string(),
            PostSource::Likes => "/user/likes".to_string(),
            PostSource::Blog { name, listing } => {
                format!("/blog/{}/{}", normalize_blog_name(name), listing.path_suffix())
            }
        }
    }

    /// Key of the post array inside the `response` section.
    pub fn items_key(&self) -> &'static str {
        match self {
            PostSource::Likes => "liked_posts",
            _ => "posts",
        }
    }

    /// Key of the server's total-count hint inside the `response` section.
    pub fn total_key(&self) -> &'static str {
        match self {
            PostSource::Likes => "liked_count",
            _ => "total_posts",
        }
    }
}

#[derive(Debug)]
enum Resolution {
    Complete(Vec<Post>),
    /// The full decode failed; only the stub-derived shells are kept.
    Degraded { shells: Vec<Post>, reason: String },
}

#[derive(Debug)]
pub struct Page {
    client: Client,
    source: PostSource,
    params: Params,
    stubs: Vec<PostStub>,
    total: Option<u64>,
    strategy: Strategy,
    response: Response,
    resolved: OnceLock<Resolution>,
}

impl Page {
    /// Fetch a root page. Root pages are always `Strategy::Unset`, whatever
    /// parameters they were fetched with.
    pub fn fetch(client: &Client, source: PostSource, params: Params) -> Result<Page, ApiError> {
        Self::fetch_tagged(client, source, params, Strategy::Unset)
    }

    fn fetch_tagged(
        client: &Client,
        source: PostSource,
        params: Params,
        strategy: Strategy,
    ) -> Result<Page, ApiError> {
        let response = client.get(&source.path(), &params)?;
        let (stubs, total) = decode_listing(&response, &source)?;
        log::debug!(
            "{} page: {} posts, strategy {strategy:?}",
            source.path(),
            stubs.len()
        );
        Ok(Page {
            client: client.clone(),
            source,
            params,
            stubs,
            total,
            strategy,
            response,
            resolved: OnceLock::new(),
        })
    }

    /// The page after this one by position: `offset` advances by the number
    /// of posts on this page.
    pub fn next_by_offset(&self) -> Result<Page, ApiError> {
        if self.strategy == Strategy::BySinceId {
            return Err(ApiError::MixedPaginationMethods);
        }
        if self.stubs.is_empty() {
            return Err(ApiError::NoNextPage);
        }
        let current = self.params.get_u64("offset")?.unwrap_or(0);
        let offset = current
            .checked_add(self.stubs.len() as u64)
            .ok_or_else(|| ApiError::InvalidParam {
                key: "offset".to_string(),
                value: current.to_string(),
            })?;
        let mut params = self.params.clone();
        params.set("offset", offset);
        Self::fetch_tagged(&self.client, self.source.clone(), params, Strategy::ByOffset)
    }

    /// The page after this one by watermark: `since_id` is the id of the
    /// last post on this page.
    pub fn next_by_since_id(&self) -> Result<Page, ApiError> {
        if self.strategy == Strategy::ByOffset {
            return Err(ApiError::MixedPaginationMethods);
        }
        let last = self.stubs.last().ok_or(ApiError::NoNextPage)?;
        let mut params = self.params.clone();
        params.set("since_id", last.id);
        Self::fetch_tagged(&self.client, self.source.clone(), params, Strategy::BySinceId)
    }

    /// Every post on the page, fully typed.
    ///
    /// The first call decodes; later calls return the same slice. If the
    /// decode fails, the first call returns the decode error and later calls
    /// return `ApiError::Degraded` without decoding again.
    pub fn all_typed(&self) -> Result<&[Post], ApiError> {
        let mut failure = None;
        let resolution = self.resolved.get_or_init(|| {
            match resolver::resolve(&self.response, self.source.items_key(), &self.stubs) {
                Ok(posts) => Resolution::Complete(posts),
                Err(err) => {
                    log::warn!("{}: typed decode failed: {err}", self.source.path());
                    let reason = err.to_string();
                    failure = Some(err);
                    Resolution::Degraded {
                        shells: resolver::select_slots(&self.stubs),
                        reason,
                    }
                }
            }
        });
        if let Some(err) = failure {
            return Err(err);
        }
        match resolution {
            Resolution::Complete(posts) => Ok(posts),
            Resolution::Degraded { reason, .. } => Err(ApiError::Degraded(reason.clone())),
        }
    }

    /// The typed post at `index`, or `None` when out of range. On a degraded
    /// page this is the stub-derived shell.
    pub fn item_at(&self, index: usize) -> Option<&Post> {
        match self.all_typed() {
            Ok(posts) => posts.get(index),
            Err(_) => self.degraded_shells()?.get(index),
        }
    }

    /// Shells kept after a failed decode.
    pub fn degraded_shells(&self) -> Option<&[Post]> {
        match self.resolved.get()? {
            Resolution::Degraded { shells, .. } => Some(shells),
            Resolution::Complete(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    pub fn stubs(&self) -> &[PostStub] {
        &self.stubs
    }

    pub fn len(&self) -> usize {
        self.stubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stubs.is_empty()
    }

    /// The server's total-count hint, when the endpoint reports one.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn source(&self) -> &PostSource {
        &self.source
    }

    pub fn response(&self) -> &Response {
        &self.response
    }
}

fn decode_listing(
    response: &Response,
    source: &PostSource,
) -> Result<(Vec<PostStub>, Option<u64>), ApiError> {
    let Some(result) = response.result()? else {
        return Ok((Vec::new(), None));
    };
    let stubs = match result.get(source.items_key()) {
        Some(items) => Vec::<PostStub>::deserialize(items)?,
        None => Vec::new(),
    };
    let total = result.get(source.total_key()).and_then(Value::as_u64);
    Ok((stubs, total))
}
