//! Synchronous client core for the Tumblr v2 API.
//!
//! # Overview
//! The core builds `HttpRequest` values and interprets `HttpResponse`
//! values; the host supplies the network through a `Transport`
//! implementation. Every endpoint call is deterministic given the
//! transport's answers, so the whole crate is testable without sockets.
//!
//! # Design
//! - `Client` holds a `ClientConfig` and a shared `Transport`. Endpoint
//!   groups (`dashboard`, `likes`, `blog`, `followers`, `user`) add their
//!   methods to it.
//! - Post listings come back as immutable `Page` values. Pagination derives
//!   new pages by `offset` or by `since_id`, never both in one lineage.
//! - Typed posts are decoded in two passes: the `type` discriminator picks a
//!   payload slot per post, then each slot is filled from the raw item. The
//!   result is memoized per page.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod blog;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod followers;
pub mod http;
pub mod likes;
pub mod page;
pub mod params;
pub mod post;
pub mod resolver;
pub mod response;
pub mod user;

#[cfg(test)]
mod testing;

pub use blog::{Blog, BlogRef};
pub use client::Client;
pub use config::ClientConfig;
pub use error::{ApiError, UnknownPostType};
pub use followers::{Follower, FollowerList, FollowingList};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use page::{BlogListing, Page, PostSource, Strategy};
pub use params::Params;
pub use post::{Post, PostBody, PostKind, PostStub};
pub use response::Response;
pub use user::{ShortBlog, User};
