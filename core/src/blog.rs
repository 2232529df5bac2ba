//! Blog endpoints.
//!
//! `Client::blog` returns a `BlogRef`, a borrowed handle that scopes every
//! `/blog/{name}/...` call to one blog. Names without a dot are treated as
//! `<name>.tumblr.com`.

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::ApiError;
use crate::followers::FollowerList;
use crate::page::{BlogListing, Page, PostSource};
use crate::params::Params;

/// Blog information as returned by `/blog/{name}/info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blog {
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub posts: i64,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub total_posts: i64,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub updated: i64,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub ask: bool,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub ask_anon: bool,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub ask_page_title: String,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub can_send_fan_mail: bool,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub can_submit: bool,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub can_subscribe: bool,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub followed: bool,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub is_blocked_from_primary: bool,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub is_nsfw: bool,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub share_likes: bool,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub submission_page_title: String,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub subscribed: bool,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct BlogInfo {
    #[serde(deserialize_with = "crate::post::null_as_default")]
    blog: Blog,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CreatedPost {
    #[serde(deserialize_with = "crate::post::null_as_default")]
    id: u64,
}

pub fn normalize_blog_name(name: &str) -> String {
    if name.contains('.') {
        name.to_string()
    } else {
        format!("{name}.tumblr.com")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BlogRef<'c> {
    client: &'c Client,
    name: &'c str,
}

impl Client {
    pub fn blog<'c>(&'c self, name: &'c str) -> BlogRef<'c> {
        BlogRef { client: self, name }
    }
}

impl<'c> BlogRef<'c> {
    pub fn name(&self) -> &str {
        self.name
    }

    fn path(&self, suffix: &str) -> String {
        format!("/blog/{}/{suffix}", normalize_blog_name(self.name))
    }

    pub fn info(&self) -> Result<Blog, ApiError> {
        let response = self.client.get(&self.path("info"), &Params::new())?;
        Ok(response.decode::<BlogInfo>()?.blog)
    }

    /// URL of the blog's avatar. The API answers with a redirect whose
    /// `Location` is the image; some deployments answer 200 with the URL in
    /// the body instead.
    pub fn avatar(&self) -> Result<String, ApiError> {
        let response = self.client.get(&self.path("avatar"), &Params::new())?;
        if let Some(location) = response.header("location").filter(|l| !l.is_empty()) {
            return Ok(location.to_string());
        }
        let result = response.result()?.ok_or(ApiError::MissingAvatar)?;
        ["avatar_url", "location"]
            .iter()
            .find_map(|key| result.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .ok_or(ApiError::MissingAvatar)
    }

    pub fn followers(&self) -> Result<FollowerList, ApiError> {
        let response = self.client.get(&self.path("followers"), &Params::new())?;
        response.decode()
    }

    fn listing(&self, listing: BlogListing, params: Params) -> Result<Page, ApiError> {
        let source = PostSource::Blog {
            name: self.name.to_string(),
            listing,
        };
        Page::fetch(self.client, source, params)
    }

    /// Published posts. Accepts `type`, `tag`, `id`, `limit`, `offset`,
    /// `reblog_info`, `notes_info` and `filter`.
    pub fn posts(&self, params: Params) -> Result<Page, ApiError> {
        self.listing(BlogListing::Published, params)
    }

    pub fn queue(&self, params: Params) -> Result<Page, ApiError> {
        self.listing(BlogListing::Queue, params)
    }

    pub fn drafts(&self, params: Params) -> Result<Page, ApiError> {
        self.listing(BlogListing::Drafts, params)
    }

    pub fn submissions(&self, params: Params) -> Result<Page, ApiError> {
        self.listing(BlogListing::Submissions, params)
    }

    /// Create a post and return its id.
    pub fn create_post(&self, params: Params) -> Result<u64, ApiError> {
        let response = self.client.post(&self.path("post"), &params)?;
        Ok(response.decode::<CreatedPost>()?.id)
    }

    pub fn edit_post(&self, post_id: u64, mut params: Params) -> Result<(), ApiError> {
        params.set("id", post_id);
        self.client.post(&self.path("post/edit"), &params)?;
        Ok(())
    }

    /// Reblog `post_id` onto this blog and return the new post's id.
    pub fn reblog_post(
        &self,
        post_id: u64,
        reblog_key: &str,
        mut params: Params,
    ) -> Result<u64, ApiError> {
        params.set("id", post_id);
        params.set("reblog_key", reblog_key);
        let response = self.client.post(&self.path("post/reblog"), &params)?;
        Ok(response.decode::<CreatedPost>()?.id)
    }

    pub fn delete_post(&self, post_id: u64) -> Result<(), ApiError> {
        let form = Params::new().with("id", post_id);
        self.client.post(&self.path("post/delete"), &form)?;
        Ok(())
    }

    pub fn follow(&self) -> Result<(), ApiError> {
        self.client.follow(self.name)
    }

    pub fn unfollow(&self) -> Result<(), ApiError> {
        self.client.unfollow(self.name)
    }
}
