//! Post model.
//!
//! # Design
//! A post is `PostCommon` (the fields every post type shares) plus a
//! `PostBody` carrying the fields specific to its kind. The `type` field is
//! the discriminator: [`PostKind`] is the closed set of kinds this crate
//! knows, and anything else becomes `PostBody::Unknown` with an attached
//! [`UnknownPostType`] rather than a decode failure.
//!
//! Every field defaults when absent or `null`. The API omits fields freely
//! depending on post state and endpoint, and a missing caption should never
//! make a whole page undecodable.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{ApiError, UnknownPostType};

/// Decode `null` as the field's default. `#[serde(default)]` only covers
/// absent keys, and the API sends explicit `null` for empty strings, lists
/// and counts.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The eight post kinds the API documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Text,
    Photo,
    Quote,
    Link,
    Chat,
    Audio,
    Video,
    Answer,
}

impl PostKind {
    pub const ALL: [PostKind; 8] = [
        PostKind::Text,
        PostKind::Photo,
        PostKind::Quote,
        PostKind::Link,
        PostKind::Chat,
        PostKind::Audio,
        PostKind::Video,
        PostKind::Answer,
    ];

    /// The discriminator string used in the `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            PostKind::Text => "text",
            PostKind::Photo => "photo",
            PostKind::Quote => "quote",
            PostKind::Link => "link",
            PostKind::Chat => "chat",
            PostKind::Audio => "audio",
            PostKind::Video => "video",
            PostKind::Answer => "answer",
        }
    }
}

impl FromStr for PostKind {
    type Err = UnknownPostType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownPostType(s.to_string()))
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The minimal shape every post decodes to, whatever its kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostStub {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub reblog_key: String,
}

/// Fields shared by all post kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostCommon {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub reblog_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub blog_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub post_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub short_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub permalink_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub format: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(deserialize_with = "null_as_default")]
    pub caption: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub highlighted: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub note_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub liked: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub followed: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub can_like: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub can_reblog: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub can_reply: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub can_send_in_message: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub display_avatar: bool,
    pub recommended_source: Option<String>,
    pub recommended_color: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub source_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub reblog: ReblogInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub trail: Vec<ReblogTrailItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReblogInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub comment: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tree_html: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReblogTrailItem {
    #[serde(deserialize_with = "null_as_default")]
    pub blog: TrailBlog,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content_raw: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_current_item: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub post: TrailPost,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailBlog {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailPost {
    #[serde(deserialize_with = "null_as_default")]
    pub id: TrailPostId,
}

/// Trail post ids arrive either as JSON numbers or as numeric strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrailPostId {
    Number(u64),
    Text(String),
}

impl Default for TrailPostId {
    fn default() -> Self {
        TrailPostId::Number(0)
    }
}

impl TrailPostId {
    /// The id as a number, when it is one or parses as one.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            TrailPostId::Number(id) => Some(*id),
            TrailPostId::Text(raw) => raw.parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextPost {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoPost {
    #[serde(deserialize_with = "null_as_default")]
    pub image_permalink: String,
    #[serde(deserialize_with = "null_as_default")]
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Photo {
    #[serde(deserialize_with = "null_as_default")]
    pub caption: String,
    #[serde(deserialize_with = "null_as_default")]
    pub original_size: PhotoSize,
    #[serde(deserialize_with = "null_as_default")]
    pub alt_sizes: Vec<PhotoSize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoSize {
    #[serde(deserialize_with = "null_as_default")]
    pub width: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub height: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotePost {
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkPost {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub excerpt: String,
    #[serde(deserialize_with = "null_as_default")]
    pub link_author: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatPost {
    #[serde(alias = "dialogue", deserialize_with = "null_as_default")]
    pub dialog: Vec<DialogLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogLine {
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phrase: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioPost {
    #[serde(deserialize_with = "null_as_default")]
    pub album_art: String,
    #[serde(deserialize_with = "null_as_default")]
    pub artist: String,
    #[serde(deserialize_with = "null_as_default")]
    pub audio_source_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub audio_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub audio_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub embed: String,
    #[serde(deserialize_with = "null_as_default")]
    pub player: String,
    #[serde(deserialize_with = "null_as_default")]
    pub plays: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoPost {
    #[serde(deserialize_with = "null_as_default")]
    pub html5_capable: bool,
    #[serde(rename = "player", deserialize_with = "null_as_default")]
    pub players: Vec<VideoPlayer>,
    #[serde(deserialize_with = "null_as_default")]
    pub thumbnail_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub thumbnail_width: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub thumbnail_height: u32,
    /// Embed descriptors keyed by provider name.
    #[serde(deserialize_with = "null_as_default")]
    pub video: BTreeMap<String, VideoEmbed>,
    #[serde(deserialize_with = "null_as_default")]
    pub video_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoPlayer {
    #[serde(deserialize_with = "null_as_default")]
    pub embed_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub width: PlayerWidth,
}

/// Player widths are pixel counts, except for responsive players which
/// report a string such as `"auto"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerWidth {
    Pixels(u32),
    Named(String),
}

impl Default for PlayerWidth {
    fn default() -> Self {
        PlayerWidth::Pixels(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoEmbed {
    #[serde(deserialize_with = "null_as_default")]
    pub width: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub height: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub video_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerPost {
    #[serde(deserialize_with = "null_as_default")]
    pub asking_name: String,
    /// `null` for anonymous askers.
    pub asking_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub question: String,
    #[serde(deserialize_with = "null_as_default")]
    pub answer: String,
    #[serde(deserialize_with = "null_as_default")]
    pub publisher: String,
}

/// Kind-specific payload of a post.
#[derive(Debug, Clone, PartialEq)]
pub enum PostBody {
    Text(TextPost),
    Photo(PhotoPost),
    Quote(QuotePost),
    Link(LinkPost),
    Chat(ChatPost),
    Audio(AudioPost),
    Video(VideoPost),
    Answer(AnswerPost),
    /// The discriminator matched no known kind; only `PostCommon` is decoded.
    Unknown(UnknownPostType),
}

impl PostBody {
    /// An empty payload of the given kind, ready to be filled.
    pub fn empty(kind: PostKind) -> Self {
        match kind {
            PostKind::Text => PostBody::Text(TextPost::default()),
            PostKind::Photo => PostBody::Photo(PhotoPost::default()),
            PostKind::Quote => PostBody::Quote(QuotePost::default()),
            PostKind::Link => PostBody::Link(LinkPost::default()),
            PostKind::Chat => PostBody::Chat(ChatPost::default()),
            PostKind::Audio => PostBody::Audio(AudioPost::default()),
            PostKind::Video => PostBody::Video(VideoPost::default()),
            PostKind::Answer => PostBody::Answer(AnswerPost::default()),
        }
    }

    /// Select the payload slot for a discriminator. Unrecognised values give
    /// `Unknown`, never an error.
    pub fn for_discriminator(discriminator: &str) -> Self {
        match discriminator.parse::<PostKind>() {
            Ok(kind) => PostBody::empty(kind),
            Err(unknown) => PostBody::Unknown(unknown),
        }
    }

    pub fn kind(&self) -> Option<PostKind> {
        match self {
            PostBody::Text(_) => Some(PostKind::Text),
            PostBody::Photo(_) => Some(PostKind::Photo),
            PostBody::Quote(_) => Some(PostKind::Quote),
            PostBody::Link(_) => Some(PostKind::Link),
            PostBody::Chat(_) => Some(PostKind::Chat),
            PostBody::Audio(_) => Some(PostKind::Audio),
            PostBody::Video(_) => Some(PostKind::Video),
            PostBody::Answer(_) => Some(PostKind::Answer),
            PostBody::Unknown(_) => None,
        }
    }

    /// Decode `value` into a payload of the same kind as `self`. The
    /// discriminator inside `value` is not consulted.
    pub fn fill(&self, value: &Value) -> Result<PostBody, serde_json::Error> {
        Ok(match self {
            PostBody::Text(_) => PostBody::Text(TextPost::deserialize(value)?),
            PostBody::Photo(_) => PostBody::Photo(PhotoPost::deserialize(value)?),
            PostBody::Quote(_) => PostBody::Quote(QuotePost::deserialize(value)?),
            PostBody::Link(_) => PostBody::Link(LinkPost::deserialize(value)?),
            PostBody::Chat(_) => PostBody::Chat(ChatPost::deserialize(value)?),
            PostBody::Audio(_) => PostBody::Audio(AudioPost::deserialize(value)?),
            PostBody::Video(_) => PostBody::Video(VideoPost::deserialize(value)?),
            PostBody::Answer(_) => PostBody::Answer(AnswerPost::deserialize(value)?),
            PostBody::Unknown(unknown) => PostBody::Unknown(unknown.clone()),
        })
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            PostBody::Text(p) => serde_json::to_value(p),
            PostBody::Photo(p) => serde_json::to_value(p),
            PostBody::Quote(p) => serde_json::to_value(p),
            PostBody::Link(p) => serde_json::to_value(p),
            PostBody::Chat(p) => serde_json::to_value(p),
            PostBody::Audio(p) => serde_json::to_value(p),
            PostBody::Video(p) => serde_json::to_value(p),
            PostBody::Answer(p) => serde_json::to_value(p),
            PostBody::Unknown(_) => Ok(Value::Object(Map::new())),
        }
    }
}

/// A fully typed post.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub common: PostCommon,
    pub body: PostBody,
}

impl Post {
    /// A post carrying only what the stub knows: identity, discriminator and
    /// reblog key, with an empty payload of the stub's kind.
    pub fn shell(stub: &PostStub) -> Self {
        Post {
            common: PostCommon {
                id: stub.id,
                kind: stub.kind.clone(),
                reblog_key: stub.reblog_key.clone(),
                ..PostCommon::default()
            },
            body: PostBody::for_discriminator(&stub.kind),
        }
    }

    pub fn id(&self) -> u64 {
        self.common.id
    }

    pub fn kind(&self) -> Option<PostKind> {
        self.body.kind()
    }

    /// The raw discriminator, including unrecognised ones.
    pub fn discriminator(&self) -> &str {
        &self.common.kind
    }

    pub fn unknown_type(&self) -> Option<&UnknownPostType> {
        match &self.body {
            PostBody::Unknown(unknown) => Some(unknown),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextPost> {
        match &self.body {
            PostBody::Text(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_photo(&self) -> Option<&PhotoPost> {
        match &self.body {
            PostBody::Photo(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_quote(&self) -> Option<&QuotePost> {
        match &self.body {
            PostBody::Quote(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&LinkPost> {
        match &self.body {
            PostBody::Link(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_chat(&self) -> Option<&ChatPost> {
        match &self.body {
            PostBody::Chat(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_audio(&self) -> Option<&AudioPost> {
        match &self.body {
            PostBody::Audio(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_video(&self) -> Option<&VideoPost> {
        match &self.body {
            PostBody::Video(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_answer(&self) -> Option<&AnswerPost> {
        match &self.body {
            PostBody::Answer(p) => Some(p),
            _ => None,
        }
    }

    /// Attribute name → value, using the API's field names. Kind-specific
    /// fields are merged over the common ones.
    pub fn attributes(&self) -> Map<String, Value> {
        let mut attributes = match serde_json::to_value(&self.common) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        if let Ok(Value::Object(extra)) = self.body.to_value() {
            attributes.extend(extra);
        }
        attributes
    }

    /// Look up a single attribute by its API field name.
    pub fn property(&self, name: &str) -> Result<Value, ApiError> {
        self.attributes()
            .remove(name)
            .ok_or_else(|| ApiError::UnknownProperty(name.to_string()))
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string_pretty(&self.attributes()).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
