//! The user's dashboard.

use crate::client::Client;
use crate::error::ApiError;
use crate::page::{Page, PostSource};
use crate::params::Params;

impl Client {
    /// First page of the dashboard. Accepts `limit`, `offset`, `type`,
    /// `since_id`, `reblog_info` and `notes_info`. The caller's `params`
    /// are moved into the page and never altered by later pagination.
    pub fn fetch_dashboard(&self, params: Params) -> Result<Page, ApiError> {
        Page::fetch(self, PostSource::Dashboard, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::page::Strategy;
    use crate::post::PostKind;
    use crate::testing::RecordingTransport;
    use serde_json::json;

    fn setup() -> (Client, RecordingTransport) {
        let transport = RecordingTransport::new();
        let client = Client::new(ClientConfig::new("http://localhost:3000/v2"), transport.clone());
        (client, transport)
    }

    fn three_posts() -> serde_json::Value {
        json!({"posts": [
            {"id": 101, "type": "text", "title": "first"},
            {"id": 102, "type": "quote", "text": "second"},
            {"id": 12345, "type": "link", "url": "https://example.com"}
        ]})
    }

    #[test]
    fn dashboard_client_error_is_returned() {
        let (client, _transport) = setup();
        assert!(matches!(
            client.fetch_dashboard(Params::new()).unwrap_err(),
            ApiError::Transport(_)
        ));
    }

    #[test]
    fn dashboard_json_error_is_returned() {
        let (client, transport) = setup();
        transport.push_response(200, "{");
        assert!(matches!(
            client.fetch_dashboard(Params::new()).unwrap_err(),
            ApiError::Decode(_)
        ));
    }

    #[test]
    fn dashboard_hits_user_dashboard() {
        let (client, transport) = setup();
        transport.push_json(three_posts());
        let page = client.fetch_dashboard(Params::new().with("limit", 3)).unwrap();
        assert_eq!(page.len(), 3);
        let kinds: Vec<_> = page.stubs().iter().map(|s| s.kind.clone()).collect();
        assert_eq!(kinds, ["text", "quote", "link"]);

        let req = transport.last_request().unwrap();
        assert_eq!(req.url, "http://localhost:3000/v2/user/dashboard");
        assert_eq!(req.query.get("limit"), Some("3"));
    }

    #[test]
    fn offset_walk_then_since_id_is_rejected() {
        let (client, transport) = setup();
        transport.push_json(three_posts());
        transport.push_json(json!({"posts": [{"id": 12346, "type": "text"}]}));
        let root = client.fetch_dashboard(Params::new()).unwrap();
        let next = root.next_by_offset().unwrap();

        assert_eq!(transport.last_request().unwrap().query.get("offset"), Some("3"));
        assert_eq!(next.strategy(), Strategy::ByOffset);
        assert!(matches!(
            next.next_by_since_id().unwrap_err(),
            ApiError::MixedPaginationMethods
        ));
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn since_id_walk_then_offset_is_rejected() {
        let (client, transport) = setup();
        transport.push_json(three_posts());
        transport.push_json(json!({"posts": [{"id": 12400, "type": "text"}]}));
        let root = client.fetch_dashboard(Params::new()).unwrap();
        let next = root.next_by_since_id().unwrap();

        let req = transport.last_request().unwrap();
        assert_eq!(req.query.get("since_id"), Some("12345"));
        assert!(!req.query.contains("offset"));
        assert_eq!(next.strategy(), Strategy::BySinceId);
        assert!(matches!(
            next.next_by_offset().unwrap_err(),
            ApiError::MixedPaginationMethods
        ));
    }

    #[test]
    fn root_page_can_start_either_lineage() {
        let (client, transport) = setup();
        transport.push_json(three_posts());
        transport.push_json(json!({"posts": []}));
        transport.push_json(json!({"posts": []}));
        let root = client.fetch_dashboard(Params::new()).unwrap();
        root.next_by_offset().unwrap();
        root.next_by_since_id().unwrap();
        assert_eq!(root.strategy(), Strategy::Unset);
        assert!(root.params().is_empty());
    }

    #[test]
    fn typed_posts_are_resolved_in_order() {
        let (client, transport) = setup();
        transport.push_json(three_posts());
        let page = client.fetch_dashboard(Params::new()).unwrap();
        let posts = page.all_typed().unwrap();
        assert_eq!(posts[0].kind(), Some(PostKind::Text));
        assert_eq!(posts[1].as_quote().unwrap().text, "second");
        assert_eq!(posts[2].as_link().unwrap().url, "https://example.com");
    }

    #[test]
    fn unknown_post_type_keeps_its_slot() {
        let (client, transport) = setup();
        transport.push_json(json!({"posts": [
            {"id": 1, "type": "poll"},
            {"id": 2, "type": "text", "title": "after"}
        ]}));
        let page = client.fetch_dashboard(Params::new()).unwrap();
        let posts = page.all_typed().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].unknown_type().map(|t| t.0.as_str()), Some("poll"));
        assert_eq!(posts[0].id(), 1);
        assert_eq!(posts[1].as_text().unwrap().title, "after");
    }
}
