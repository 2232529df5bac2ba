//! Followers, following, and follow/unfollow.

use serde::{Deserialize, Serialize};

use crate::blog::{normalize_blog_name, Blog};
use crate::client::Client;
use crate::error::ApiError;
use crate::params::Params;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Follower {
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub following: bool,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub updated: i64,
}

/// Response of `/blog/{name}/followers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerList {
    #[serde(deserialize_with = "crate::post::null_as_default")]
    pub total_users: u32,
    #[serde(rename = "users", deserialize_with = "crate::post::null_as_default")]
    pub followers: Vec<Follower>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct FollowingResponse {
    #[serde(deserialize_with = "crate::post::null_as_default")]
    total_blogs: u32,
    #[serde(deserialize_with = "crate::post::null_as_default")]
    blogs: Vec<Blog>,
}

/// One offset-paginated page of the blogs the user follows.
#[derive(Debug, Clone)]
pub struct FollowingList {
    client: Client,
    total: u32,
    blogs: Vec<Blog>,
    offset: u32,
    limit: u32,
}

impl FollowingList {
    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn blogs(&self) -> &[Blog] {
        &self.blogs
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Page size used to step `next`/`prev`.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn next(&self) -> Result<FollowingList, ApiError> {
        let offset = self.offset.saturating_add(self.limit);
        if self.limit == 0 || offset >= self.total {
            return Err(ApiError::NoNextPage);
        }
        self.client.following(offset, self.limit)
    }

    /// The previous page. The offset never goes below zero.
    pub fn prev(&self) -> Result<FollowingList, ApiError> {
        if self.offset == 0 {
            return Err(ApiError::NoPrevPage);
        }
        self.client
            .following(self.offset.saturating_sub(self.limit), self.limit)
    }
}

impl Client {
    /// Blogs the user follows. A `limit` of zero leaves the page size to the
    /// server and adopts the size of the returned page.
    pub fn following(&self, offset: u32, limit: u32) -> Result<FollowingList, ApiError> {
        let mut params = Params::new().with("offset", offset);
        if limit > 0 {
            params.set("limit", limit);
        }
        let response: FollowingResponse = self.get("/user/following", &params)?.decode()?;
        let limit = if limit == 0 {
            response.blogs.len() as u32
        } else {
            limit
        };
        Ok(FollowingList {
            client: self.clone(),
            total: response.total_blogs,
            blogs: response.blogs,
            offset,
            limit,
        })
    }

    pub fn follow(&self, blog_name: &str) -> Result<(), ApiError> {
        let form = Params::new().with("url", normalize_blog_name(blog_name));
        self.post("/user/follow", &form)?;
        Ok(())
    }

    pub fn unfollow(&self, blog_name: &str) -> Result<(), ApiError> {
        let form = Params::new().with("url", normalize_blog_name(blog_name));
        self.post("/user/unfollow", &form)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::testing::RecordingTransport;
    use serde_json::json;

    fn setup() -> (Client, RecordingTransport) {
        let transport = RecordingTransport::new();
        let client = Client::new(ClientConfig::new("http://localhost:3000/v2"), transport.clone());
        (client, transport)
    }

    fn blogs(names: &[&str]) -> serde_json::Value {
        names.iter().map(|name| json!({"name": name})).collect()
    }

    #[test]
    fn following_sends_offset_and_limit() {
        let (client, transport) = setup();
        transport.push_json(json!({"total_blogs": 5, "blogs": blogs(&["a", "b"])}));
        let list = client.following(0, 2).unwrap();
        assert_eq!(list.total(), 5);
        assert_eq!(list.blogs().len(), 2);
        let req = transport.last_request().unwrap();
        assert_eq!(req.query.get("offset"), Some("0"));
        assert_eq!(req.query.get("limit"), Some("2"));
    }

    #[test]
    fn next_steps_by_limit_until_total() {
        let (client, transport) = setup();
        transport.push_json(json!({"total_blogs": 5, "blogs": blogs(&["a", "b"])}));
        transport.push_json(json!({"total_blogs": 5, "blogs": blogs(&["c", "d"])}));
        transport.push_json(json!({"total_blogs": 5, "blogs": blogs(&["e"])}));
        let first = client.following(0, 2).unwrap();
        let second = first.next().unwrap();
        let third = second.next().unwrap();
        assert_eq!(second.offset(), 2);
        assert_eq!(third.offset(), 4);
        assert!(matches!(third.next().unwrap_err(), ApiError::NoNextPage));
        assert_eq!(transport.requests().len(), 3);
    }

    #[test]
    fn default_limit_adopts_returned_page_size() {
        let (client, transport) = setup();
        transport.push_json(json!({"total_blogs": 10, "blogs": blogs(&["a", "b", "c"])}));
        let list = client.following(0, 0).unwrap();
        assert_eq!(list.limit(), 3);
        assert!(!transport.last_request().unwrap().query.contains("limit"));
    }

    #[test]
    fn empty_default_page_has_no_next() {
        let (client, transport) = setup();
        transport.push_json(json!({"total_blogs": 10, "blogs": []}));
        let list = client.following(0, 0).unwrap();
        assert!(matches!(list.next().unwrap_err(), ApiError::NoNextPage));
    }

    #[test]
    fn prev_clamps_at_zero() {
        let (client, transport) = setup();
        transport.push_json(json!({"total_blogs": 10, "blogs": blogs(&["a"])}));
        transport.push_json(json!({"total_blogs": 10, "blogs": blogs(&["a", "b", "c", "d"])}));
        let list = client.following(3, 4).unwrap();
        let prev = list.prev().unwrap();
        assert_eq!(prev.offset(), 0);
        assert_eq!(transport.last_request().unwrap().query.get("offset"), Some("0"));
        assert!(matches!(prev.prev().unwrap_err(), ApiError::NoPrevPage));
    }

    #[test]
    fn follow_and_unfollow_post_normalized_url() {
        let (client, transport) = setup();
        transport.push_json(json!({}));
        transport.push_json(json!({}));
        client.follow("staff").unwrap();
        client.blog("staff").unfollow().unwrap();
        let requests = transport.requests();
        assert!(requests[0].url.ends_with("/user/follow"));
        assert_eq!(requests[0].body.as_deref(), Some("url=staff.tumblr.com"));
        assert!(requests[1].url.ends_with("/user/unfollow"));
    }
}
