//! The authenticated user's account.

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::ApiError;
use crate::params::Params;

/// One of the user's own blogs, as listed in `/user/info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortBlog {
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub title: String,
    #[serde(rename = "primary", deserialize_with = "crate::post::null_as_default")]
    pub is_primary: bool,
    #[serde(rename = "followers", deserialize_with = "crate::post::null_as_default")]
    pub follower_count: u32,
    #[serde(rename = "tweet", deserialize_with = "crate::post::null_as_default")]
    pub post_to_twitter: String,
    #[serde(rename = "facebook", deserialize_with = "crate::post::null_as_default")]
    pub post_to_facebook: String,
    #[serde(rename = "type", deserialize_with = "crate::post::null_as_default")]
    pub visibility: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub following: u32,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub likes: u64,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub default_post_format: String,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub blogs: Vec<ShortBlog>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct UserInfo {
    #[serde(deserialize_with = "crate::post::null_as_default")]
    user: User,
}

impl Client {
    pub fn user_info(&self) -> Result<User, ApiError> {
        let response = self.get("/user/info", &Params::new())?;
        Ok(response.decode::<UserInfo>()?.user)
    }
}
