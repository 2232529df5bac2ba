//! Fixed corpus the server starts with.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::{Store, USER_BLOG};

/// Timestamp the seeded posts count from.
pub const NOW: u64 = 1_700_000_000;

const FIRST_FREE_ID: u64 = 2000;

fn blog(name: &str, title: &str, description: &str) -> (String, Value) {
    let blog = json!({
        "name": name,
        "title": title,
        "description": description,
        "url": format!("https://{name}.tumblr.com/"),
        "updated": NOW,
        "ask": true,
        "ask_anon": false,
        "ask_page_title": "Ask me anything",
        "can_submit": name == USER_BLOG,
        "share_likes": true,
        "is_nsfw": false,
    });
    (name.to_string(), blog)
}

/// A post with the fields every kind shares, plus `extra`.
fn post(id: u64, blog: &str, kind: &str, state: &str, extra: Value) -> (u64, Value) {
    let mut post = json!({
        "id": id,
        "type": kind,
        "blog_name": blog,
        "reblog_key": format!("rk{id}"),
        "post_url": format!("https://{blog}.tumblr.com/post/{id}"),
        "short_url": format!("https://tmblr.co/{id}"),
        "slug": format!("{kind}-{id}"),
        "timestamp": NOW + id,
        "date": "2023-11-14 22:13:20 GMT",
        "state": state,
        "format": "html",
        "tags": [kind],
        "note_count": id % 7,
        "can_like": true,
        "can_reblog": true,
    });
    if let (Some(fields), Value::Object(extra)) = (post.as_object_mut(), extra) {
        fields.extend(extra);
    }
    (id, post)
}

fn posts() -> BTreeMap<u64, Value> {
    [
        post(1001, "staff", "text", "published", json!({
            "title": "Welcome",
            "body": "<p>Hello from staff.</p>",
        })),
        post(1002, "david", "photo", "published", json!({
            "caption": "<p>Sunset</p>",
            "image_permalink": "https://david.tumblr.com/image/1002",
            "photos": [{
                "caption": "",
                "original_size": {"width": 1280, "height": 720, "url": "https://64.media.mock.test/1002_1280.jpg"},
                "alt_sizes": [
                    {"width": 500, "height": 281, "url": "https://64.media.mock.test/1002_500.jpg"},
                    {"width": 100, "height": 56, "url": "https://64.media.mock.test/1002_100.jpg"}
                ]
            }],
        })),
        post(1003, "staff", "quote", "published", json!({
            "text": "Not all those who wander are lost.",
            "source": "J.R.R. Tolkien",
        })),
        post(1004, "david", "link", "published", json!({
            "title": "Rust",
            "url": "https://www.rust-lang.org",
            "description": "<p>A language empowering everyone.</p>",
            "link_author": "The Rust Team",
            "excerpt": "Reliable and efficient software",
        })),
        post(1005, "staff", "chat", "published", json!({
            "title": "Overheard",
            "body": "A: hi\nB: hello",
            "dialogue": [
                {"label": "A:", "name": "A", "phrase": "hi"},
                {"label": "B:", "name": "B", "phrase": "hello"}
            ],
        })),
        post(1006, "david", "audio", "published", json!({
            "artist": "Daft Punk",
            "album_art": "https://64.media.mock.test/1006_album.jpg",
            "audio_type": "tumblr",
            "audio_url": "https://a.mock.test/1006.mp3",
            "player": "<embed src=\"https://a.mock.test/player\"/>",
            "plays": 42,
            "track_name": "Harder, Better, Faster, Stronger",
        })),
        post(1007, "staff", "video", "published", json!({
            "video_type": "youtube",
            "thumbnail_url": "https://i.ytimg.mock.test/1007.jpg",
            "thumbnail_width": 480,
            "thumbnail_height": 360,
            "player": [
                {"width": 250, "embed_code": "<iframe width=\"250\"></iframe>"},
                {"width": "auto", "embed_code": "<iframe></iframe>"}
            ],
            "video": {"youtube": {"video_id": "dQw4w9WgXcQ", "width": 540, "height": 304}},
        })),
        post(1008, "david", "answer", "published", json!({
            "asking_name": "anonymous",
            "asking_url": null,
            "question": "What are you reading?",
            "answer": "<p>The Rust book.</p>",
        })),
        post(1009, "staff", "poll", "published", json!({
            "question": "Tabs or spaces?",
        })),
        post(1010, "david", "text", "published", json!({
            "title": "Reblogged",
            "body": "<p>Agreed.</p>",
            "reblog": {"comment": "<p>Agreed.</p>", "tree_html": "<p>Hello from staff.</p>"},
            "trail": [{
                "blog": {"name": "staff", "active": true},
                "post": {"id": "1001"},
                "content": "<p>Hello from staff.</p>",
                "content_raw": "<p>Hello from staff.</p>",
                "is_current_item": false
            }],
        })),
        post(1011, USER_BLOG, "text", "queued", json!({"title": "Queued"})),
        post(1012, USER_BLOG, "text", "draft", json!({"title": "Draft"})),
        post(1013, USER_BLOG, "text", "submission", json!({
            "title": "Submitted",
            "post_author": "david",
        })),
    ]
    .into_iter()
    .collect()
}

pub fn store() -> Store {
    Store {
        blogs: [
            blog(USER_BLOG, "Mock Blog", "The authenticated user's blog."),
            blog("staff", "Tumblr Staff", "Official news."),
            blog("david", "David's Log", "Notes and links."),
        ]
        .into_iter()
        .collect(),
        posts: posts(),
        likes: [1006, 1007].into_iter().collect(),
        following: vec!["staff".to_string(), "david".to_string()],
        followers: [
            (USER_BLOG.to_string(), vec!["david".to_string()]),
            ("staff".to_string(), vec![USER_BLOG.to_string(), "david".to_string()]),
            ("david".to_string(), vec![USER_BLOG.to_string()]),
        ]
        .into_iter()
        .collect(),
        next_id: FIRST_FREE_ID,
    }
}
