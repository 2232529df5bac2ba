//! The user's likes and like/unlike.

use crate::client::Client;
use crate::error::ApiError;
use crate::page::{Page, PostSource};
use crate::params::Params;

impl Client {
    /// Posts the user has liked. Accepts `limit`, `offset`, `before` and
    /// `after` (timestamps). The page's `total()` is the `liked_count`.
    pub fn likes(&self, params: Params) -> Result<Page, ApiError> {
        Page::fetch(self, PostSource::Likes, params)
    }

    pub fn like_post(&self, post_id: u64, reblog_key: &str) -> Result<(), ApiError> {
        self.post("/user/like", &like_form(post_id, reblog_key))?;
        Ok(())
    }

    pub fn unlike_post(&self, post_id: u64, reblog_key: &str) -> Result<(), ApiError> {
        self.post("/user/unlike", &like_form(post_id, reblog_key))?;
        Ok(())
    }
}

fn like_form(post_id: u64, reblog_key: &str) -> Params {
    Params::new()
        .with("id", post_id)
        .with("reblog_key", reblog_key)
}
