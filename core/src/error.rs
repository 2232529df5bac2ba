//! Error types for the Tumblr API client.
//!
//! # Design
//! `NotFound` keeps a dedicated variant because callers frequently
//! distinguish "the resource does not exist" from "the server returned an
//! unexpected status". Pagination failures (`NoNextPage`, `NoPrevPage`,
//! `MixedPaginationMethods`) are validation results: they are produced
//! before any request is issued and leave the page untouched.
//!
//! `UnknownPostType` is not an `ApiError` variant. It is attached to the
//! individual post whose discriminator was not recognised and never aborts
//! a batch.

use crate::http::TransportError;

/// Errors returned by client operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The transport could not complete the round-trip.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status outside 2xx/3xx other than 404.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The body is not the JSON shape the operation expects.
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unable to populate from empty body")]
    EmptyBody,

    #[error("no next page")]
    NoNextPage,

    #[error("no previous page")]
    NoPrevPage,

    #[error("pagination by offset and by since_id cannot be mixed")]
    MixedPaginationMethods,

    /// An earlier full decode of this page failed; only stub shells remain.
    #[error("typed posts unavailable: {0}")]
    Degraded(String),

    #[error("invalid value {value:?} for parameter {key}")]
    InvalidParam { key: String, value: String },

    #[error("property {0} does not exist")]
    UnknownProperty(String),

    #[error("unable to detect avatar location")]
    MissingAvatar,
}

/// Non-fatal marker for a post whose `type` matches none of the known kinds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown post type: {0}")]
pub struct UnknownPostType(pub String);
