//! Event model shared by the feeds and the watchers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reddit "thing" fullname, e.g. `t3_abc123` (submission) or `t1_def456`
/// (comment). Used both as the reply target and as the dedup/counter key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fullname(String);

impl Fullname {
    pub fn submission(id36: &str) -> Self {
        Self(format!("t3_{id36}"))
    }

    pub fn comment(id36: &str) -> Self {
        Self(format!("t1_{id36}"))
    }

    pub fn is_submission(&self) -> bool {
        self.0.starts_with("t3_")
    }

    pub fn is_comment(&self) -> bool {
        self.0.starts_with("t1_")
    }

    /// The base-36 id without the kind prefix.
    pub fn id36(&self) -> &str {
        self.0.split_once('_').map(|(_, id)| id).unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Fullname {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Fullname {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for Fullname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A self-post as delivered by the new-submission listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub name: Fullname,
    pub subreddit: String,
    /// `None` for deleted accounts.
    pub author: Option<String>,
    pub title: String,
    pub selftext: String,
    pub created_utc: i64,
    pub permalink: String,
}

/// A comment as delivered by the new-comment listing or the inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub name: Fullname,
    /// The submission this comment ultimately belongs to.
    pub link_id: Fullname,
    /// Immediate parent: a comment, or the submission for top-level comments.
    pub parent_id: Fullname,
    pub subreddit: String,
    pub author: Option<String>,
    pub body: String,
    pub created_utc: i64,
    pub permalink: String,
}

impl Comment {
    /// Whether this comment replies directly to the submission.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_submission()
    }
}

/// A username mention from the inbox. Mentions that also qualify as a post
/// or comment reply do not show up in this listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mention {
    pub comment: Comment,
    /// Unread marker; already-read mentions are skipped.
    pub new: bool,
}

/// A direct reply as seen in a freshly fetched reply listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplySummary {
    pub name: Fullname,
    pub author: Option<String>,
}

/// One item from any of the three watched channels.
#[derive(Debug, Clone)]
pub enum Event {
    Submission(Submission),
    Comment(Comment),
    Mention(Mention),
}

impl Event {
    pub fn name(&self) -> &Fullname {
        match self {
            Event::Submission(s) => &s.name,
            Event::Comment(c) => &c.name,
            Event::Mention(m) => &m.comment.name,
        }
    }

    /// The thread (root submission) the event belongs to.
    pub fn thread_id(&self) -> &Fullname {
        match self {
            Event::Submission(s) => &s.name,
            Event::Comment(c) => &c.link_id,
            Event::Mention(m) => &m.comment.link_id,
        }
    }

    pub fn author(&self) -> Option<&str> {
        match self {
            Event::Submission(s) => s.author.as_deref(),
            Event::Comment(c) => c.author.as_deref(),
            Event::Mention(m) => m.comment.author.as_deref(),
        }
    }

    /// The summonable text: selftext for submissions, body otherwise.
    pub fn body(&self) -> &str {
        match self {
            Event::Submission(s) => &s.selftext,
            Event::Comment(c) => &c.body,
            Event::Mention(m) => &m.comment.body,
        }
    }

    pub fn subreddit(&self) -> &str {
        match self {
            Event::Submission(s) => &s.subreddit,
            Event::Comment(c) => &c.subreddit,
            Event::Mention(m) => &m.comment.subreddit,
        }
    }

    pub fn created_utc(&self) -> i64 {
        match self {
            Event::Submission(s) => s.created_utc,
            Event::Comment(c) => c.created_utc,
            Event::Mention(m) => m.comment.created_utc,
        }
    }

    pub fn permalink(&self) -> &str {
        match self {
            Event::Submission(s) => &s.permalink,
            Event::Comment(c) => &c.permalink,
            Event::Mention(m) => &m.comment.permalink,
        }
    }
}
