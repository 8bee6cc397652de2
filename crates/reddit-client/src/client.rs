//! Authenticated Reddit API client (OAuth2 password grant).
//!
//! Only the endpoints the bot needs are wrapped; everything else stays
//! behind [`RedditApi`] so the watchers never see reqwest directly.

#[cfg(test)]
#[path = "client_tests.rs"]
mod client_tests;

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::{RedditError, ReplyError, Result};
use crate::types::{Comment, Fullname, Mention, ReplySummary, Submission};

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";

/// Renew the bearer token this long before Reddit would expire it.
const TOKEN_SLACK: Duration = Duration::from_secs(60);

/// Script-app credentials for the password grant.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

/// The slice of Reddit the watchers need.
/// Implemented by [`RedditClient`] (real) and `MockRedditApi` (tests).
#[allow(async_fn_in_trait)]
pub trait RedditApi: Send + Sync {
    /// Username the client is authenticated as.
    fn me(&self) -> &str;

    /// Post a reply under `target` and return the new comment's fullname.
    async fn reply(&self, target: &Fullname, text: &str) -> std::result::Result<Fullname, ReplyError>;

    /// Stop the given comment (ours) from generating inbox notifications.
    async fn disable_inbox_replies(&self, comment: &Fullname) -> Result<()>;

    /// Mark an inbox item as read.
    async fn mark_read(&self, item: &Fullname) -> Result<()>;

    /// Fetch the target's direct replies, always fresh from Reddit.
    /// For a submission this is the first-level comment listing; for a
    /// comment, its immediate children within `thread`.
    async fn direct_replies(&self, target: &Fullname, thread: &Fullname) -> Result<Vec<ReplySummary>>;

    /// Author of an arbitrary thing, `None` for deleted accounts.
    async fn author_of(&self, target: &Fullname) -> Result<Option<String>>;
}

struct BearerToken {
    access_token: String,
    expires_at: Instant,
}

/// Reqwest-backed Reddit client. Cheap to share behind an `Arc`; the
/// bearer token is renewed lazily under an internal lock.
pub struct RedditClient {
    http: reqwest::Client,
    credentials: Credentials,
    me: String,
    token: RwLock<Option<BearerToken>>,
}

impl RedditClient {
    /// Authenticate and resolve the bot's own username.
    pub async fn login(credentials: Credentials, user_agent: &str) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(user_agent).build()?;
        let mut client = Self {
            http,
            credentials,
            me: String::new(),
            token: RwLock::new(None),
        };
        client.refresh_token().await?;
        let me: MeResponse = client.get_json("/api/v1/me").await?;
        info!("authenticated as u/{}", me.name);
        client.me = me.name;
        Ok(client)
    }

    async fn refresh_token(&self) -> Result<String> {
        let params = [
            ("grant_type", "password"),
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
        ];
        let response = self
            .http
            .post(TOKEN_URL)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&params)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RedditError::Auth(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }
        let token: TokenResponse = response.json().await?;
        if token.access_token.is_empty() {
            return Err(RedditError::Auth("empty access token".to_string()));
        }
        debug!("bearer token renewed, expires in {}s", token.expires_in);
        let access = token.access_token.clone();
        *self.token.write().await = Some(BearerToken {
            access_token: token.access_token,
            expires_at: Instant::now()
                + Duration::from_secs(token.expires_in.saturating_sub(TOKEN_SLACK.as_secs())),
        });
        Ok(access)
    }

    async fn bearer(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.access_token.clone());
            }
        }
        self.refresh_token().await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let token = self.bearer().await?;
        let response = self
            .http
            .get(format!("{API_BASE}{path_and_query}"))
            .bearer_auth(token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RedditError::Status {
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }

    async fn post_form(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<(reqwest::StatusCode, Value)> {
        let token = self.bearer().await?;
        let response = self
            .http
            .post(format!("{API_BASE}{path}"))
            .bearer_auth(token)
            .form(params)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Ok((status, body))
    }

    // ── Listings ───────────────────────────────────────────────────────────

    /// Newest submissions across the given `+`-joined subreddit path.
    pub async fn new_submissions(&self, subreddits: &str, limit: u32) -> Result<Vec<Submission>> {
        let listing: Listing<RawSubmission> = self
            .get_json(&format!("/r/{subreddits}/new?limit={limit}&raw_json=1"))
            .await?;
        Ok(listing.data.children.into_iter().map(|t| t.data.into()).collect())
    }

    /// Newest comments across the given `+`-joined subreddit path.
    pub async fn new_comments(&self, subreddits: &str, limit: u32) -> Result<Vec<Comment>> {
        let listing: Listing<RawComment> = self
            .get_json(&format!("/r/{subreddits}/comments?limit={limit}&raw_json=1"))
            .await?;
        Ok(listing.data.children.into_iter().map(|t| t.data.into()).collect())
    }

    /// Username mentions from the inbox, newest first.
    pub async fn mentions(&self, limit: u32) -> Result<Vec<Mention>> {
        let listing: Listing<RawMention> = self
            .get_json(&format!("/message/mentions?limit={limit}&raw_json=1"))
            .await?;
        Ok(listing.data.children.into_iter().map(|t| t.data.into()).collect())
    }
}

impl RedditApi for RedditClient {
    fn me(&self) -> &str {
        &self.me
    }

    async fn reply(&self, target: &Fullname, text: &str) -> std::result::Result<Fullname, ReplyError> {
        let (status, body) = self
            .post_form(
                "/api/comment",
                &[("api_type", "json"), ("thing_id", target.as_str()), ("text", text)],
            )
            .await
            .map_err(ReplyError::Api)?;
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(ReplyError::Forbidden);
        }
        if !status.is_success() {
            return Err(ReplyError::Api(RedditError::Status {
                status,
                body: body.to_string(),
            }));
        }
        classify_reply_response(&body)
    }

    async fn disable_inbox_replies(&self, comment: &Fullname) -> Result<()> {
        let (status, body) = self
            .post_form("/api/sendreplies", &[("id", comment.as_str()), ("state", "false")])
            .await?;
        if !status.is_success() {
            return Err(RedditError::Status { status, body: body.to_string() });
        }
        Ok(())
    }

    async fn mark_read(&self, item: &Fullname) -> Result<()> {
        let (status, body) = self
            .post_form("/api/read_message", &[("id", item.as_str())])
            .await?;
        if !status.is_success() {
            return Err(RedditError::Status { status, body: body.to_string() });
        }
        Ok(())
    }

    async fn direct_replies(&self, target: &Fullname, thread: &Fullname) -> Result<Vec<ReplySummary>> {
        let tree: Value = if target.is_submission() {
            self.get_json(&format!(
                "/comments/{}?limit=100&depth=1&raw_json=1",
                target.id36()
            ))
            .await?
        } else {
            self.get_json(&format!(
                "/comments/{}?comment={}&depth=2&raw_json=1",
                thread.id36(),
                target.id36()
            ))
            .await?
        };
        if target.is_submission() {
            Ok(top_level_replies(&tree))
        } else {
            Ok(comment_replies(&tree, target))
        }
    }

    async fn author_of(&self, target: &Fullname) -> Result<Option<String>> {
        let listing: Value = self
            .get_json(&format!("/api/info?id={}&raw_json=1", target))
            .await?;
        let author = children_of(Some(&listing))
            .next()
            .and_then(|child| child.pointer("/data/author"))
            .and_then(Value::as_str)
            .filter(|author| *author != "[deleted]")
            .map(str::to_owned);
        Ok(author)
    }
}

/// Decide the outcome of an `/api/comment` call from its JSON envelope.
/// Reddit reports soft failures as 200s with an error list inside.
fn classify_reply_response(body: &Value) -> std::result::Result<Fullname, ReplyError> {
    let errors = body
        .pointer("/json/errors")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    for error in errors {
        let code = error.get(0).and_then(Value::as_str).unwrap_or("");
        let message = error.get(1).and_then(Value::as_str).unwrap_or("").to_string();
        match code {
            "TOO_LONG" => return Err(ReplyError::ContentTooLong),
            "RATELIMIT" => return Err(ReplyError::RateLimited { message }),
            "THREAD_LOCKED" | "DELETED_LINK" | "DELETED_COMMENT" => {
                return Err(ReplyError::Forbidden)
            }
            "" => {}
            other => {
                return Err(ReplyError::Api(RedditError::Rejected {
                    code: other.to_string(),
                    message,
                }))
            }
        }
    }
    body.pointer("/json/data/things/0/data/name")
        .and_then(Value::as_str)
        .map(Fullname::from)
        .ok_or_else(|| {
            ReplyError::Api(RedditError::Rejected {
                code: "NO_THING".to_string(),
                message: "reply envelope carried no created comment".to_string(),
            })
        })
}

/// First-level replies of a submission from a `/comments/{id}` response
/// (an array of two listings: the post, then its top-level comments).
fn top_level_replies(tree: &Value) -> Vec<ReplySummary> {
    children_of(tree.get(1)).filter_map(reply_summary).collect()
}

/// Direct children of `target` from a `/comments/{thread}?comment={id}`
/// response: locate the focal comment, then walk its `replies` listing.
fn comment_replies(tree: &Value, target: &Fullname) -> Vec<ReplySummary> {
    for child in children_of(tree.get(1)) {
        let name = child.pointer("/data/name").and_then(Value::as_str);
        if name == Some(target.as_str()) {
            return children_of(child.pointer("/data/replies"))
                .filter_map(reply_summary)
                .collect();
        }
    }
    Vec::new()
}

fn children_of<'a>(listing: Option<&'a Value>) -> impl Iterator<Item = &'a Value> {
    listing
        .and_then(|l| l.pointer("/data/children"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn reply_summary(child: &Value) -> Option<ReplySummary> {
    // Truncated listings carry "more" placeholders; only real comments count.
    if child.get("kind").and_then(Value::as_str) != Some("t1") {
        return None;
    }
    let data = child.get("data")?;
    Some(ReplySummary {
        name: data.get("name").and_then(Value::as_str)?.into(),
        author: data
            .get("author")
            .and_then(Value::as_str)
            .filter(|author| *author != "[deleted]")
            .map(str::to_owned),
    })
}

/// Thread fullname from an inbox item's context path,
/// e.g. `/r/yugioh/comments/abc123/title/def456/?context=3`.
fn thread_from_context(context: &str) -> Option<Fullname> {
    let mut parts = context.split('/');
    while let Some(part) = parts.next() {
        if part == "comments" {
            return parts.next().filter(|id| !id.is_empty()).map(Fullname::submission);
        }
    }
    None
}

fn normalize_author(author: Option<String>) -> Option<String> {
    author.filter(|a| a != "[deleted]")
}

// ── Wire types ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default = "default_expiry")]
    expires_in: u64,
}

fn default_expiry() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Listing<T> {
    data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
struct ListingData<T> {
    children: Vec<Thing<T>>,
}

#[derive(Debug, Deserialize)]
struct Thing<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct RawSubmission {
    name: String,
    subreddit: String,
    #[serde(default)]
    author: Option<String>,
    title: String,
    #[serde(default)]
    selftext: String,
    created_utc: f64,
    permalink: String,
}

impl From<RawSubmission> for Submission {
    fn from(raw: RawSubmission) -> Self {
        Submission {
            name: raw.name.into(),
            subreddit: raw.subreddit,
            author: normalize_author(raw.author),
            title: raw.title,
            selftext: raw.selftext,
            created_utc: raw.created_utc as i64,
            permalink: raw.permalink,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawComment {
    name: String,
    link_id: String,
    parent_id: String,
    subreddit: String,
    #[serde(default)]
    author: Option<String>,
    body: String,
    created_utc: f64,
    #[serde(default)]
    permalink: String,
}

impl From<RawComment> for Comment {
    fn from(raw: RawComment) -> Self {
        Comment {
            name: raw.name.into(),
            link_id: raw.link_id.into(),
            parent_id: raw.parent_id.into(),
            subreddit: raw.subreddit,
            author: normalize_author(raw.author),
            body: raw.body,
            created_utc: raw.created_utc as i64,
            permalink: raw.permalink,
        }
    }
}

/// Inbox mention. Unlike listing comments these carry no `link_id`; the
/// thread is recovered from the context path, falling back to the parent
/// as a stable (if less precise) counter key.
#[derive(Debug, Deserialize)]
struct RawMention {
    id: String,
    #[serde(default)]
    name: Option<String>,
    parent_id: String,
    subreddit: String,
    #[serde(default)]
    author: Option<String>,
    body: String,
    created_utc: f64,
    new: bool,
    #[serde(default)]
    context: String,
}

impl From<RawMention> for Mention {
    fn from(raw: RawMention) -> Self {
        let parent_id: Fullname = raw.parent_id.into();
        let link_id = thread_from_context(&raw.context).unwrap_or_else(|| parent_id.clone());
        Mention {
            comment: Comment {
                name: raw
                    .name
                    .map(Fullname::from)
                    .unwrap_or_else(|| Fullname::comment(&raw.id)),
                link_id,
                parent_id,
                subreddit: raw.subreddit,
                author: normalize_author(raw.author),
                body: raw.body,
                created_utc: raw.created_utc as i64,
                permalink: raw.context,
            },
            new: raw.new,
        }
    }
}
