//! Loop and duplicate-reply guards
//!
//! No local database: every predicate is answered from the bot identity
//! and live queries against Reddit, so concurrent replies from other
//! instances are observed.

#[cfg(test)]
#[path = "antiabuse_tests.rs"]
mod antiabuse_tests;

use std::sync::Arc;

use reddit_client::{Comment, Fullname, RedditApi, Result};

pub struct AntiAbuseGuard<A: RedditApi> {
    api: Arc<A>,
}

impl<A: RedditApi> AntiAbuseGuard<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Whether the event was authored by the bot itself. Events with no
    /// resolvable author (deleted accounts) are never self.
    pub fn is_self(&self, author: Option<&str>) -> bool {
        author == Some(self.api.me())
    }

    /// Whether the comment's immediate parent was authored by the bot.
    ///
    /// One-hop check only: a longer chain such as bot → other bot A →
    /// other bot B → bot is not detected. Accepted risk; walking the full
    /// ancestry would cost a fetch per level on every comment.
    pub async fn is_reply_loop(&self, comment: &Comment) -> Result<bool> {
        if comment.is_root() {
            return Ok(false);
        }
        let parent_author = self.api.author_of(&comment.parent_id).await?;
        Ok(parent_author.as_deref() == Some(self.api.me()))
    }

    /// Whether the bot already posted a direct reply under `target`.
    /// Always re-fetches the reply listing; errors propagate and the
    /// caller suppresses the reply (a missed reply beats a duplicate).
    pub async fn already_answered(&self, target: &Fullname, thread: &Fullname) -> Result<bool> {
        let replies = self.api.direct_replies(target, thread).await?;
        Ok(replies
            .iter()
            .any(|reply| reply.author.as_deref() == Some(self.api.me())))
    }
}
