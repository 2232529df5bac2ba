//! Two-pass resolution of post stubs into typed posts.
//!
//! # Design
//! Listing endpoints return a heterogeneous array of posts. The first pass
//! (done when the page is fetched) decodes only [`PostStub`]s. Resolution
//! then runs in two steps over the same payload:
//!
//! 1. `select_slots` picks an empty payload per stub from its discriminator.
//! 2. `fill_slots` decodes array element *i* into slot *i*.
//!
//! Binding is positional, and the discriminator is trusted from the first
//! pass. A failure anywhere in the second step fails the whole resolution;
//! partially filled results are never returned.

use serde::de::Error as _;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::post::{Post, PostCommon, PostStub};
use crate::response::Response;

/// Resolve `stubs` against the `response.<items_key>` array of `response`.
pub fn resolve(
    response: &Response,
    items_key: &str,
    stubs: &[PostStub],
) -> Result<Vec<Post>, ApiError> {
    let slots = select_slots(stubs);
    let elements = match response.result()?.and_then(|result| result.get(items_key)) {
        Some(Value::Array(elements)) => elements.as_slice(),
        Some(_) => {
            let message = format!("response.{items_key} is not an array");
            return Err(serde_json::Error::custom(message).into());
        }
        None => &[],
    };
    let posts = fill_slots(slots, elements)?;
    log::debug!("resolved {} {items_key}", posts.len());
    Ok(posts)
}

/// First step: one empty, kind-tagged post per stub.
pub fn select_slots(stubs: &[PostStub]) -> Vec<Post> {
    stubs
        .iter()
        .map(|stub| {
            let slot = Post::shell(stub);
            if let Some(unknown) = slot.unknown_type() {
                log::warn!("post {}: {unknown}", stub.id);
            }
            slot
        })
        .collect()
}

/// Second step: decode `elements[i]` into `slots[i]`.
pub fn fill_slots(slots: Vec<Post>, elements: &[Value]) -> Result<Vec<Post>, ApiError> {
    if slots.len() != elements.len() {
        return Err(serde_json::Error::custom(format!(
            "expected {} posts in payload, found {}",
            slots.len(),
            elements.len()
        ))
        .into());
    }
    slots
        .into_iter()
        .zip(elements)
        .map(|(slot, element)| -> Result<Post, ApiError> {
            Ok(Post {
                common: PostCommon::deserialize(element)?,
                body: slot.body.fill(element)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnknownPostType;
    use crate::post::{PostBody, PostKind, TextPost};
    use serde_json::json;

    fn response_with(posts: Value) -> Response {
        let body = json!({"meta": {"status": 200}, "response": {"posts": posts}});
        Response::new(serde_json::to_vec(&body).unwrap(), Vec::new())
    }

    fn stubs_of(posts: &Value) -> Vec<PostStub> {
        serde_json::from_value(posts.clone()).unwrap()
    }

    #[test]
    fn each_known_discriminator_resolves_to_its_variant() {
        let posts = Value::Array(
            PostKind::ALL
                .iter()
                .enumerate()
                .map(|(i, kind)| json!({"id": i as u64 + 1, "type": kind.as_str()}))
                .collect(),
        );
        let resolved = resolve(&response_with(posts.clone()), "posts", &stubs_of(&posts)).unwrap();
        let kinds: Vec<_> = resolved.iter().map(Post::kind).collect();
        let expected: Vec<_> = PostKind::ALL.iter().copied().map(Some).collect();
        assert_eq!(kinds, expected);
    }

    #[test]
    fn unknown_type_is_marked_and_batch_continues() {
        let posts = json!([
            {"id": 1, "type": "text", "title": "first"},
            {"id": 2, "type": "poll", "blog_name": "staff"},
            {"id": 3, "type": "quote", "text": "third"}
        ]);
        let resolved = resolve(&response_with(posts.clone()), "posts", &stubs_of(&posts)).unwrap();
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0].as_text().unwrap().title, "first");
        assert_eq!(
            resolved[1].unknown_type(),
            Some(&UnknownPostType("poll".to_string()))
        );
        assert_eq!(resolved[1].common.blog_name, "staff");
        assert_eq!(resolved[2].as_quote().unwrap().text, "third");
    }

    #[test]
    fn null_fields_do_not_fail_the_batch() {
        let posts = json!([
            {"id": 1, "type": "link", "url": "https://a", "excerpt": null, "link_author": null},
            {"id": 2, "type": "text", "title": "second", "source_url": null, "tags": null}
        ]);
        let resolved = resolve(&response_with(posts.clone()), "posts", &stubs_of(&posts)).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].as_link().unwrap().url, "https://a");
        assert_eq!(resolved[0].as_link().unwrap().link_author, "");
        assert_eq!(resolved[1].as_text().unwrap().title, "second");
        assert!(resolved[1].common.tags.is_empty());
    }

    #[test]
    fn binding_is_positional_and_trusts_first_pass() {
        let posts = json!([{"id": 10, "type": "link", "url": "https://a", "title": "t"}]);
        let stubs = vec![PostStub {
            id: 10,
            kind: "text".to_string(),
            reblog_key: String::new(),
        }];
        let resolved = resolve(&response_with(posts), "posts", &stubs).unwrap();
        assert_eq!(resolved[0].body, PostBody::Text(TextPost { title: "t".to_string() }));
    }

    #[test]
    fn type_mismatch_fails_the_whole_batch() {
        let posts = json!([
            {"id": 1, "type": "text"},
            {"id": 2, "type": "photo", "photos": "not-a-list"}
        ]);
        let err = resolve(&response_with(posts.clone()), "posts", &stubs_of(&posts)).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn length_mismatch_is_a_decode_error() {
        let posts = json!([{"id": 1, "type": "text"}]);
        let err = resolve(&response_with(posts), "posts", &[]).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn liked_posts_key() {
        let body = json!({"response": {"liked_posts": [{"id": 4, "type": "answer", "question": "q?"}]}});
        let response = Response::new(serde_json::to_vec(&body).unwrap(), Vec::new());
        let stubs = stubs_of(&body["response"]["liked_posts"]);
        let resolved = resolve(&response, "liked_posts", &stubs).unwrap();
        assert_eq!(resolved[0].as_answer().unwrap().question, "q?");
    }

    #[test]
    fn missing_array_with_no_stubs_is_empty() {
        let response = Response::new(b"{}".to_vec(), Vec::new());
        assert!(resolve(&response, "posts", &[]).unwrap().is_empty());
    }
}
