//! In-memory stand-in for the Tumblr v2 API.
//!
//! Every route lives under `/v2` and answers with the API envelope
//! `{"meta": {"status", "msg"}, "response": ...}`. Posts are kept in id
//! order and listings return them ascending, so `since_id` walks forward
//! through the corpus.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

mod seed;

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 20;

/// Name of the blog owned by the authenticated user.
pub const USER_BLOG: &str = "mock";

#[derive(Debug, Default)]
pub struct Store {
    pub blogs: BTreeMap<String, Value>,
    pub posts: BTreeMap<u64, Value>,
    pub likes: BTreeSet<u64>,
    pub following: Vec<String>,
    pub followers: BTreeMap<String, Vec<String>>,
    pub next_id: u64,
}

pub type Db = Arc<RwLock<Store>>;

type Params = HashMap<String, String>;
type Failure = (StatusCode, Json<Value>);
type Reply = Result<(StatusCode, Json<Value>), Failure>;

/// Router over the seeded corpus.
pub fn app() -> Router {
    router(Arc::new(RwLock::new(seed::store())))
}

pub fn router(db: Db) -> Router {
    Router::new()
        .route("/v2/user/info", get(user_info))
        .route("/v2/user/dashboard", get(dashboard))
        .route("/v2/user/likes", get(likes))
        .route("/v2/user/like", post(like))
        .route("/v2/user/unlike", post(unlike))
        .route("/v2/user/following", get(following))
        .route("/v2/user/follow", post(follow))
        .route("/v2/user/unfollow", post(unfollow))
        .route("/v2/blog/{blog}/info", get(blog_info))
        .route("/v2/blog/{blog}/avatar", get(avatar))
        .route("/v2/blog/{blog}/avatar/{size}", get(avatar_sized))
        .route("/v2/blog/{blog}/followers", get(followers))
        .route("/v2/blog/{blog}/posts", get(published))
        .route("/v2/blog/{blog}/posts/queue", get(queue))
        .route("/v2/blog/{blog}/posts/draft", get(drafts))
        .route("/v2/blog/{blog}/posts/submission", get(submissions))
        .route("/v2/blog/{blog}/post", post(create_post))
        .route("/v2/blog/{blog}/post/edit", post(edit_post))
        .route("/v2/blog/{blog}/post/reblog", post(reblog_post))
        .route("/v2/blog/{blog}/post/delete", post(delete_post))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn envelope(status: StatusCode, response: Value) -> (StatusCode, Json<Value>) {
    let msg = status.canonical_reason().unwrap_or("Error");
    let body = json!({
        "meta": {"status": status.as_u16(), "msg": msg},
        "response": response,
    });
    (status, Json(body))
}

fn ok(response: Value) -> Reply {
    Ok(envelope(StatusCode::OK, response))
}

fn fail(status: StatusCode) -> Failure {
    envelope(status, json!([]))
}

/// `david`, `david.tumblr.com` and `https://david.tumblr.com/` all name the
/// same blog.
fn blog_key(name: &str) -> String {
    let name = name
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    name.strip_suffix(".tumblr.com").unwrap_or(name).to_string()
}

fn number(params: &Params, key: &str) -> Result<Option<u64>, Failure> {
    match params.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| fail(StatusCode::BAD_REQUEST)),
    }
}

fn required_id(params: &Params) -> Result<u64, Failure> {
    number(params, "id")?.ok_or_else(|| fail(StatusCode::BAD_REQUEST))
}

fn limit(params: &Params) -> Result<usize, Failure> {
    Ok(number(params, "limit")?
        .map(|l| (l as usize).clamp(1, MAX_LIMIT))
        .unwrap_or(DEFAULT_LIMIT))
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or_default()
}

impl Store {
    fn blog(&self, name: &str) -> Result<&Value, Failure> {
        self.blogs
            .get(&blog_key(name))
            .ok_or_else(|| fail(StatusCode::NOT_FOUND))
    }

    fn post_count(&self, blog: &str) -> usize {
        self.posts
            .values()
            .filter(|p| str_field(p, "blog_name") == blog && str_field(p, "state") == "published")
            .count()
    }

    fn blog_info(&self, name: &str) -> Result<Value, Failure> {
        let mut blog = self.blog(name)?.clone();
        let count = self.post_count(&blog_key(name));
        if let Some(fields) = blog.as_object_mut() {
            fields.insert("posts".to_string(), json!(count));
            fields.insert("total_posts".to_string(), json!(count));
            fields.insert("followed".to_string(), json!(self.following.contains(&blog_key(name))));
        }
        Ok(blog)
    }

    fn render(&self, post: &Value) -> Value {
        let mut post = post.clone();
        let id = post.get("id").and_then(Value::as_u64).unwrap_or_default();
        if let Some(fields) = post.as_object_mut() {
            fields.insert("liked".to_string(), json!(self.likes.contains(&id)));
        }
        post
    }

    /// Check that `id` exists and that `reblog_key` matches it.
    fn keyed_post(&self, params: &Params) -> Result<u64, Failure> {
        let id = required_id(params)?;
        let post = self
            .posts
            .get(&id)
            .ok_or_else(|| fail(StatusCode::NOT_FOUND))?;
        let given = params.get("reblog_key").map(String::as_str).unwrap_or_default();
        if str_field(post, "reblog_key") != given {
            return Err(fail(StatusCode::BAD_REQUEST));
        }
        Ok(id)
    }

    /// Apply `type`, `tag`, `id`, `since_id`, `offset` and `limit` to a
    /// listing. The total counts every post matching the filters, ignoring
    /// the cursor.
    fn listing<'a>(
        &'a self,
        posts: impl Iterator<Item = &'a Value>,
        params: &Params,
    ) -> Result<(Vec<Value>, usize), Failure> {
        let since_id = number(params, "since_id")?.unwrap_or(0);
        let offset = number(params, "offset")?.unwrap_or(0) as usize;
        let only_id = number(params, "id")?;
        let limit = limit(params)?;
        let kind = params.get("type");
        let tag = params.get("tag");

        let matching: Vec<&Value> = posts
            .filter(|p| kind.map_or(true, |k| str_field(p, "type") == k))
            .filter(|p| only_id.map_or(true, |id| p.get("id").and_then(Value::as_u64) == Some(id)))
            .filter(|p| {
                tag.map_or(true, |t| {
                    p.get("tags")
                        .and_then(Value::as_array)
                        .is_some_and(|tags| tags.iter().any(|x| x.as_str() == Some(t.as_str())))
                })
            })
            .collect();
        let total = matching.len();
        let page = matching
            .into_iter()
            .filter(|p| p.get("id").and_then(Value::as_u64).unwrap_or_default() > since_id)
            .skip(offset)
            .take(limit)
            .map(|p| self.render(p))
            .collect();
        Ok((page, total))
    }

    fn blog_posts(&self, name: &str, state: &str, params: &Params) -> Reply {
        let blog = self.blog_info(name)?;
        let key = blog_key(name);
        let posts = self
            .posts
            .values()
            .filter(|p| str_field(p, "blog_name") == key && str_field(p, "state") == state);
        let (posts, total) = self.listing(posts, params)?;
        ok(json!({"blog": blog, "posts": posts, "total_posts": total}))
    }

    fn short_blog(&self, name: &str) -> Value {
        let blog = self.blogs.get(name).cloned().unwrap_or_default();
        json!({
            "name": name,
            "title": str_field(&blog, "title"),
            "url": str_field(&blog, "url"),
            "updated": blog.get("updated").cloned().unwrap_or(json!(0)),
            "description": str_field(&blog, "description"),
        })
    }
}

fn post_fields(form: &Params) -> Map<String, Value> {
    form.iter()
        .filter(|(key, _)| !matches!(key.as_str(), "id" | "reblog_key" | "api_key"))
        .map(|(key, value)| {
            let value = if key == "tags" {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(|t| json!(t))
                    .collect()
            } else {
                json!(value)
            };
            (key.clone(), value)
        })
        .collect()
}

async fn user_info(State(db): State<Db>) -> Reply {
    let store = db.read().await;
    let own = store.blog_info(USER_BLOG)?;
    let followers = store.followers.get(USER_BLOG).map_or(0, Vec::len);
    ok(json!({"user": {
        "name": USER_BLOG,
        "following": store.following.len(),
        "likes": store.likes.len(),
        "default_post_format": "html",
        "blogs": [{
            "name": USER_BLOG,
            "url": str_field(&own, "url"),
            "title": str_field(&own, "title"),
            "primary": true,
            "followers": followers,
            "tweet": "N",
            "facebook": "N",
            "type": "public",
        }],
    }}))
}

async fn dashboard(State(db): State<Db>, Query(params): Query<Params>) -> Reply {
    let store = db.read().await;
    let posts = store
        .posts
        .values()
        .filter(|p| str_field(p, "state") == "published");
    let (posts, _) = store.listing(posts, &params)?;
    ok(json!({"posts": posts}))
}

async fn likes(State(db): State<Db>, Query(params): Query<Params>) -> Reply {
    let store = db.read().await;
    let posts = store.likes.iter().filter_map(|id| store.posts.get(id));
    let (posts, total) = store.listing(posts, &params)?;
    ok(json!({"liked_posts": posts, "liked_count": total}))
}

async fn like(State(db): State<Db>, Form(form): Form<Params>) -> Reply {
    let mut store = db.write().await;
    let id = store.keyed_post(&form)?;
    store.likes.insert(id);
    ok(json!([]))
}

async fn unlike(State(db): State<Db>, Form(form): Form<Params>) -> Reply {
    let mut store = db.write().await;
    let id = store.keyed_post(&form)?;
    store.likes.remove(&id);
    ok(json!([]))
}

async fn following(State(db): State<Db>, Query(params): Query<Params>) -> Reply {
    let store = db.read().await;
    let offset = number(&params, "offset")?.unwrap_or(0) as usize;
    let limit = limit(&params)?;
    let blogs: Vec<Value> = store
        .following
        .iter()
        .skip(offset)
        .take(limit)
        .map(|name| store.short_blog(name))
        .collect();
    ok(json!({"total_blogs": store.following.len(), "blogs": blogs}))
}

async fn follow(State(db): State<Db>, Form(form): Form<Params>) -> Reply {
    let mut store = db.write().await;
    let url = form.get("url").ok_or_else(|| fail(StatusCode::BAD_REQUEST))?;
    store.blog(url)?;
    let name = blog_key(url);
    if !store.following.contains(&name) {
        log::info!("following {name}");
        store.following.push(name);
    }
    ok(json!([]))
}

async fn unfollow(State(db): State<Db>, Form(form): Form<Params>) -> Reply {
    let mut store = db.write().await;
    let url = form.get("url").ok_or_else(|| fail(StatusCode::BAD_REQUEST))?;
    let name = blog_key(url);
    store.following.retain(|followed| *followed != name);
    ok(json!([]))
}

async fn blog_info(State(db): State<Db>, Path(blog): Path<String>) -> Reply {
    let store = db.read().await;
    ok(json!({"blog": store.blog_info(&blog)?}))
}

async fn avatar(State(db): State<Db>, Path(blog): Path<String>) -> Response {
    avatar_redirect(&db, &blog, 64).await
}

async fn avatar_sized(State(db): State<Db>, Path((blog, size)): Path<(String, u32)>) -> Response {
    avatar_redirect(&db, &blog, size).await
}

async fn avatar_redirect(db: &Db, blog: &str, size: u32) -> Response {
    let store = db.read().await;
    if let Err(failure) = store.blog(blog) {
        return failure.into_response();
    }
    let url = format!("https://assets.mock.test/avatar/{}_{size}.png", blog_key(blog));
    let (status, body) = envelope(StatusCode::MOVED_PERMANENTLY, json!({"avatar_url": url}));
    (status, [(header::LOCATION, url)], body).into_response()
}

async fn followers(State(db): State<Db>, Path(blog): Path<String>) -> Reply {
    let store = db.read().await;
    store.blog(&blog)?;
    let names = store.followers.get(&blog_key(&blog)).cloned().unwrap_or_default();
    let users: Vec<Value> = names
        .iter()
        .map(|name| {
            let short = store.short_blog(name);
            json!({
                "name": name,
                "url": short["url"],
                "updated": short["updated"],
                "following": store.following.contains(name),
            })
        })
        .collect();
    ok(json!({"total_users": users.len(), "users": users}))
}

async fn published(
    State(db): State<Db>,
    Path(blog): Path<String>,
    Query(params): Query<Params>,
) -> Reply {
    db.read().await.blog_posts(&blog, "published", &params)
}

async fn queue(
    State(db): State<Db>,
    Path(blog): Path<String>,
    Query(params): Query<Params>,
) -> Reply {
    db.read().await.blog_posts(&blog, "queued", &params)
}

async fn drafts(
    State(db): State<Db>,
    Path(blog): Path<String>,
    Query(params): Query<Params>,
) -> Reply {
    db.read().await.blog_posts(&blog, "draft", &params)
}

async fn submissions(
    State(db): State<Db>,
    Path(blog): Path<String>,
    Query(params): Query<Params>,
) -> Reply {
    db.read().await.blog_posts(&blog, "submission", &params)
}

async fn create_post(
    State(db): State<Db>,
    Path(blog): Path<String>,
    Form(form): Form<Params>,
) -> Reply {
    let mut store = db.write().await;
    store.blog(&blog)?;
    let id = store.next_id;
    store.next_id += 1;

    let mut post = post_fields(&form);
    post.entry("type").or_insert_with(|| json!("text"));
    post.entry("state").or_insert_with(|| json!("published"));
    post.insert("id".to_string(), json!(id));
    post.insert("blog_name".to_string(), json!(blog_key(&blog)));
    post.insert("reblog_key".to_string(), json!(format!("rk{id}")));
    post.insert("timestamp".to_string(), json!(seed::NOW + id));
    log::info!("created post {id} on {}", blog_key(&blog));
    store.posts.insert(id, Value::Object(post));
    Ok(envelope(StatusCode::CREATED, json!({"id": id})))
}

async fn edit_post(
    State(db): State<Db>,
    Path(blog): Path<String>,
    Form(form): Form<Params>,
) -> Reply {
    let mut store = db.write().await;
    let id = required_id(&form)?;
    let post = store
        .posts
        .get_mut(&id)
        .filter(|p| str_field(p, "blog_name") == blog_key(&blog))
        .and_then(Value::as_object_mut)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND))?;
    post.extend(post_fields(&form));
    ok(json!({"id": id}))
}

async fn reblog_post(
    State(db): State<Db>,
    Path(blog): Path<String>,
    Form(form): Form<Params>,
) -> Reply {
    let mut store = db.write().await;
    store.blog(&blog)?;
    let source = store.keyed_post(&form)?;
    let id = store.next_id;
    store.next_id += 1;

    let mut post = store.posts.get(&source).cloned().unwrap_or_default();
    if let Some(fields) = post.as_object_mut() {
        fields.insert("id".to_string(), json!(id));
        fields.insert("blog_name".to_string(), json!(blog_key(&blog)));
        fields.insert("reblog_key".to_string(), json!(format!("rk{id}")));
        fields.insert("state".to_string(), json!("published"));
        fields.insert("reblogged_from_id".to_string(), json!(source));
        if let Some(comment) = form.get("comment") {
            fields.insert("reblog".to_string(), json!({"comment": comment, "tree_html": ""}));
        }
    }
    log::info!("reblogged {source} to {} as {id}", blog_key(&blog));
    store.posts.insert(id, post);
    Ok(envelope(StatusCode::CREATED, json!({"id": id})))
}

async fn delete_post(
    State(db): State<Db>,
    Path(blog): Path<String>,
    Form(form): Form<Params>,
) -> Reply {
    let mut store = db.write().await;
    let id = required_id(&form)?;
    let owned = store
        .posts
        .get(&id)
        .is_some_and(|p| str_field(p, "blog_name") == blog_key(&blog));
    if !owned {
        return Err(fail(StatusCode::NOT_FOUND));
    }
    store.posts.remove(&id);
    store.likes.remove(&id);
    log::info!("deleted post {id}");
    ok(json!({"id": id}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blog_key_strips_scheme_and_domain() {
        assert_eq!(blog_key("david"), "david");
        assert_eq!(blog_key("david.tumblr.com"), "david");
        assert_eq!(blog_key("https://david.tumblr.com/"), "david");
        assert_eq!(blog_key("blog.example.com"), "blog.example.com");
    }

    #[test]
    fn limit_is_clamped() {
        let params: Params = [("limit".to_string(), "500".to_string())].into();
        assert_eq!(limit(&params).unwrap(), MAX_LIMIT);
        assert_eq!(limit(&Params::new()).unwrap(), DEFAULT_LIMIT);
        let params: Params = [("limit".to_string(), "x".to_string())].into();
        assert_eq!(limit(&params).unwrap_err().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn post_fields_split_tags_and_drop_reserved_keys() {
        let form: Params = [
            ("tags".to_string(), "a, b,,c".to_string()),
            ("id".to_string(), "9".to_string()),
            ("title".to_string(), "Hello".to_string()),
        ]
        .into();
        let fields = post_fields(&form);
        assert_eq!(fields["tags"], json!(["a", "b", "c"]));
        assert_eq!(fields["title"], "Hello");
        assert!(!fields.contains_key("id"));
    }

    #[test]
    fn listing_filters_then_applies_cursor() {
        let store = seed::store();
        let published = || store.posts.values().filter(|p| str_field(p, "state") == "published");

        let params: Params = [("limit".to_string(), "2".to_string())].into();
        let (page, total) = store.listing(published(), &params).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(total, store.posts.values().filter(|p| str_field(p, "state") == "published").count());

        let params: Params = [("since_id".to_string(), "1008".to_string())].into();
        let (page, _) = store.listing(published(), &params).unwrap();
        assert!(page.iter().all(|p| p["id"].as_u64().unwrap() > 1008));

        let params: Params = [("type".to_string(), "quote".to_string())].into();
        let (page, total) = store.listing(published(), &params).unwrap();
        assert_eq!(total, 1);
        assert_eq!(page[0]["type"], "quote");
    }

    #[test]
    fn envelope_carries_status_and_reason() {
        let (status, Json(body)) = envelope(StatusCode::NOT_FOUND, json!([]));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["meta"]["status"], 404);
        assert_eq!(body["meta"]["msg"], "Not Found");
    }
}
