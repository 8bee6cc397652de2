//! In-memory `RedditApi` for unit tests, no network.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::client::RedditApi;
use crate::error::{RedditError, ReplyError, Result};
use crate::types::{Fullname, ReplySummary};

/// Scripted in-memory Reddit. Serves canned reply listings and authors,
/// records every write the watcher performs.
///
/// # Example
/// ```rust,ignore
/// let api = MockRedditApi::new("cardbot");
/// api.set_author(&Fullname::comment("parent"), Some("cardbot"));
/// api.script_reply_error(ReplyError::ContentTooLong);
/// ```
pub struct MockRedditApi {
    me: String,
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    replies_posted: Vec<(Fullname, String)>,
    reply_errors: VecDeque<ReplyError>,
    direct_replies: HashMap<Fullname, Vec<ReplySummary>>,
    authors: HashMap<Fullname, Option<String>>,
    fail_reads: bool,
    inbox_disabled: Vec<Fullname>,
    marked_read: Vec<Fullname>,
    next_id: u64,
}

impl MockRedditApi {
    pub fn new(me: impl Into<String>) -> Self {
        Self {
            me: me.into(),
            state: Mutex::new(MockState::default()),
        }
    }

    /// Queue an error for the next `reply` call; calls after the queue
    /// drains succeed.
    pub fn script_reply_error(&self, error: ReplyError) {
        self.state.lock().unwrap().reply_errors.push_back(error);
    }

    /// Serve this reply listing for `target` from `direct_replies`.
    pub fn set_direct_replies(&self, target: &Fullname, replies: Vec<ReplySummary>) {
        self.state
            .lock()
            .unwrap()
            .direct_replies
            .insert(target.clone(), replies);
    }

    /// Serve this author for `target` from `author_of`.
    pub fn set_author(&self, target: &Fullname, author: Option<&str>) {
        self.state
            .lock()
            .unwrap()
            .authors
            .insert(target.clone(), author.map(str::to_owned));
    }

    /// Make `direct_replies` and `author_of` fail, simulating an outage.
    pub fn fail_reads(&self) {
        self.state.lock().unwrap().fail_reads = true;
    }

    /// All (target, body) pairs posted so far, in order.
    pub fn replies_posted(&self) -> Vec<(Fullname, String)> {
        self.state.lock().unwrap().replies_posted.clone()
    }

    pub fn reply_count(&self) -> usize {
        self.state.lock().unwrap().replies_posted.len()
    }

    /// Comments whose inbox notifications were disabled, in order.
    pub fn inbox_disabled(&self) -> Vec<Fullname> {
        self.state.lock().unwrap().inbox_disabled.clone()
    }

    /// Inbox items marked read, in order.
    pub fn marked_read(&self) -> Vec<Fullname> {
        self.state.lock().unwrap().marked_read.clone()
    }
}

fn scripted_outage() -> RedditError {
    RedditError::Status {
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        body: "scripted outage".to_string(),
    }
}

impl RedditApi for MockRedditApi {
    fn me(&self) -> &str {
        &self.me
    }

    async fn reply(&self, target: &Fullname, text: &str) -> std::result::Result<Fullname, ReplyError> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.reply_errors.pop_front() {
            return Err(error);
        }
        state.next_id += 1;
        let name = Fullname::comment(&format!("mock{}", state.next_id));
        state.replies_posted.push((target.clone(), text.to_string()));
        Ok(name)
    }

    async fn disable_inbox_replies(&self, comment: &Fullname) -> Result<()> {
        self.state.lock().unwrap().inbox_disabled.push(comment.clone());
        Ok(())
    }

    async fn mark_read(&self, item: &Fullname) -> Result<()> {
        self.state.lock().unwrap().marked_read.push(item.clone());
        Ok(())
    }

    async fn direct_replies(&self, target: &Fullname, _thread: &Fullname) -> Result<Vec<ReplySummary>> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(scripted_outage());
        }
        Ok(state.direct_replies.get(target).cloned().unwrap_or_default())
    }

    async fn author_of(&self, target: &Fullname) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(scripted_outage());
        }
        Ok(state.authors.get(target).cloned().flatten())
    }
}
