//! Polling adapters that turn Reddit listings into bounded event channels.
//!
//! Each feed runs as its own task: fetch the newest page, emit items not
//! seen before in chronological order, and back off while the listing is
//! idle or the fetch fails. The channel has capacity 1, so a slow consumer
//! back-pressures the poll loop instead of buffering events. Fetch errors
//! never end the task; the feed is the watcher's supervisor.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::RedditClient;
use crate::error::Result;
use crate::types::Event;

const FEED_PAGE: u32 = 100;
const MENTION_PAGE: u32 = 25;

/// Poll delay bounds; doubles while idle or failing, resets on activity.
const MIN_DELAY: Duration = Duration::from_secs(2);
const MAX_DELAY: Duration = Duration::from_secs(16);

/// How many recently emitted ids to remember per feed. One page is 100
/// items, so this absorbs listing jitter without unbounded growth.
const SEEN_CAPACITY: usize = 300;

/// Which listing a feed polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Submissions,
    Comments,
    Mentions,
}

impl FeedKind {
    pub fn name(self) -> &'static str {
        match self {
            FeedKind::Submissions => "submissions",
            FeedKind::Comments => "comments",
            FeedKind::Mentions => "mentions",
        }
    }
}

/// Spawn a polling task for `kind` and hand back its event channel.
/// `subreddits` is the `+`-joined subreddit path (unused for mentions,
/// which are account-wide).
pub fn spawn_feed(
    api: Arc<RedditClient>,
    kind: FeedKind,
    subreddits: String,
) -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(run_feed(api, kind, subreddits, tx));
    rx
}

async fn run_feed(
    api: Arc<RedditClient>,
    kind: FeedKind,
    subreddits: String,
    tx: mpsc::Sender<Event>,
) {
    let mut seen = SeenSet::new(SEEN_CAPACITY);
    let mut delay = MIN_DELAY;
    info!(feed = kind.name(), "feed starting");
    loop {
        match fetch_page(&api, kind, &subreddits).await {
            Ok(batch) => {
                let mut fresh = 0usize;
                // Listings are newest-first; emit in chronological order.
                for event in batch.into_iter().rev() {
                    if !seen.insert(event.name().as_str()) {
                        continue;
                    }
                    fresh += 1;
                    if tx.send(event).await.is_err() {
                        warn!(feed = kind.name(), "event channel closed, feed stopping");
                        return;
                    }
                }
                debug!(feed = kind.name(), fresh, "poll complete");
                delay = if fresh > 0 { MIN_DELAY } else { next_delay(delay) };
            }
            Err(e) => {
                warn!(feed = kind.name(), "poll failed: {e}");
                delay = next_delay(delay);
            }
        }
        tokio::time::sleep(delay).await;
    }
}

async fn fetch_page(api: &RedditClient, kind: FeedKind, subreddits: &str) -> Result<Vec<Event>> {
    Ok(match kind {
        FeedKind::Submissions => api
            .new_submissions(subreddits, FEED_PAGE)
            .await?
            .into_iter()
            .map(Event::Submission)
            .collect(),
        FeedKind::Comments => api
            .new_comments(subreddits, FEED_PAGE)
            .await?
            .into_iter()
            .map(Event::Comment)
            .collect(),
        FeedKind::Mentions => api
            .mentions(MENTION_PAGE)
            .await?
            .into_iter()
            .map(Event::Mention)
            .collect(),
    })
}

fn next_delay(current: Duration) -> Duration {
    (current * 2).min(MAX_DELAY)
}

/// Insertion-ordered bounded set of emitted ids.
struct SeenSet {
    order: VecDeque<String>,
    set: HashSet<String>,
    capacity: usize,
}

impl SeenSet {
    fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            set: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns `true` if the id was not seen before.
    fn insert(&mut self, id: &str) -> bool {
        if self.set.contains(id) {
            return false;
        }
        self.set.insert(id.to_string());
        self.order.push_back(id.to_string());
        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.set.remove(&evicted);
            }
        }
        true
    }
}
