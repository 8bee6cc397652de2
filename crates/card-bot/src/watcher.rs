//! Event watchers: the stream → guard → resolve → reply state machine
//!
//! One generic watcher covers all three channels; the per-channel
//! differences (counter use, mention-only policies) live in
//! [`WatcherKind`] instead of a subclass hierarchy.

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod watcher_tests;

use std::sync::Arc;

use anyhow::Result;
use chrono::DateTime;
use reddit_client::{Event, RedditApi, ReplyError};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::antiabuse::AntiAbuseGuard;
use crate::card::{CardLookup, SummonResolver};
use crate::config::Config;
use crate::counter::ReplyCounter;
use crate::render;
use crate::summon::parse_summons;

/// Posted instead of the full render when Reddit rejects it as too long.
const TOO_LONG_FALLBACK: &str = "Sorry, the card data was too long to fit in one \
comment. Try summoning fewer cards at once.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherKind {
    Submissions,
    Comments,
    Mentions,
}

impl WatcherKind {
    pub fn name(self) -> &'static str {
        match self {
            WatcherKind::Submissions => "submissions",
            WatcherKind::Comments => "comments",
            WatcherKind::Mentions => "mentions",
        }
    }

    /// Submissions are exempt from the per-thread reply budget; comments
    /// and mentions share it.
    fn uses_counter(self) -> bool {
        !matches!(self, WatcherKind::Submissions)
    }
}

pub struct Watcher<A: RedditApi, L: CardLookup> {
    kind: WatcherKind,
    api: Arc<A>,
    guard: AntiAbuseGuard<A>,
    resolver: SummonResolver<L>,
    counter: Arc<ReplyCounter>,
    config: Arc<Config>,
}

impl<A, L> Watcher<A, L>
where
    A: RedditApi,
    L: CardLookup,
{
    pub fn new(
        kind: WatcherKind,
        api: Arc<A>,
        resolver: SummonResolver<L>,
        counter: Arc<ReplyCounter>,
        config: Arc<Config>,
    ) -> Self {
        let guard = AntiAbuseGuard::new(Arc::clone(&api));
        Self {
            kind,
            api,
            guard,
            resolver,
            counter,
            config,
        }
    }

    /// Consume the feed until its channel closes. A failing event is
    /// logged and dropped; the loop always advances to the next event.
    pub async fn run(self, mut events: mpsc::Receiver<Event>) {
        info!(watcher = self.kind.name(), "starting");
        while let Some(event) = events.recv().await {
            let timestamp = DateTime::from_timestamp(event.created_utc(), 0)
                .map(|t| t.to_rfc3339())
                .unwrap_or_default();
            info!("{}|{}|{timestamp}", event.name(), event.permalink());
            if let Err(e) = self.process(&event).await {
                error!(
                    watcher = self.kind.name(),
                    "{}: dropped after error: {e:#}",
                    event.name()
                );
            }
        }
        warn!(watcher = self.kind.name(), "event feed closed");
    }

    /// Guard order: self-filter, thread budget, loop check (mentions),
    /// tokens, dedup, cross-forum. First matching guard drops the event.
    async fn process(&self, event: &Event) -> Result<()> {
        if let Event::Mention(mention) = event {
            if !mention.new {
                debug!("{}: skip, already read", event.name());
                return Ok(());
            }
            if let Err(e) = self.api.mark_read(&mention.comment.name).await {
                warn!("{}: failed to mark mention read: {e}", event.name());
            }
        }

        if self.kind.uses_counter() {
            if self.guard.is_self(event.author()) {
                debug!("{}: skip, own comment", event.name());
                return Ok(());
            }
            if self.counter.at_cap(event.thread_id()) {
                warn!(
                    "{}: skip, exceeded reply limit for {}",
                    event.name(),
                    event.thread_id()
                );
                return Ok(());
            }
        }

        if let Event::Mention(mention) = event {
            if self.guard.is_reply_loop(&mention.comment).await? {
                info!("{}: skip, parent comment is me", event.name());
                return Ok(());
            }
        }

        let summons = parse_summons(event.body());
        info!("{}| summons: {summons:?}", event.name());
        if summons.is_empty() {
            if self.kind == WatcherKind::Mentions {
                self.send_reply(event, &render::HELP).await;
            }
            return Ok(());
        }

        match event {
            Event::Submission(submission) => {
                if self
                    .guard
                    .already_answered(&submission.name, &submission.name)
                    .await?
                {
                    info!("{}: skip, already answered", event.name());
                    return Ok(());
                }
            }
            Event::Comment(comment) => {
                if self
                    .guard
                    .already_answered(&comment.name, &comment.link_id)
                    .await?
                    || self.guard.is_reply_loop(comment).await?
                {
                    info!("{}: skip, already answered or summon chain", event.name());
                    return Ok(());
                }
            }
            Event::Mention(mention) => {
                // In-forum mentions with summons belong to the comment watcher
                if self.config.is_watched(&mention.comment.subreddit) {
                    debug!("{}: skip, handled by the comment watcher", event.name());
                    return Ok(());
                }
            }
        }

        let cards = self.resolver.get_cards(&summons).await;
        info!(
            "{}| {} of {} summons matched",
            event.name(),
            cards.len(),
            summons.len()
        );
        if cards.is_empty() {
            if self.kind == WatcherKind::Mentions {
                self.send_reply(event, &render::HELP).await;
            }
            return Ok(());
        }

        let text = self.resolver.render(&cards);
        self.send_reply(event, &text).await;
        Ok(())
    }

    /// Post the reply with the per-class failure policy: one fallback
    /// retry for over-long bodies, drop on everything else.
    async fn send_reply(&self, event: &Event, text: &str) {
        let posted = match self.api.reply(event.name(), text).await {
            Ok(posted) => posted,
            Err(ReplyError::ContentTooLong) => {
                warn!("{}: reply too long, retrying with fallback text", event.name());
                match self.api.reply(event.name(), TOO_LONG_FALLBACK).await {
                    Ok(posted) => posted,
                    Err(e) => {
                        error!("{}: fallback reply failed: {e}", event.name());
                        return;
                    }
                }
            }
            Err(ReplyError::Forbidden) => {
                warn!("{}: reply forbidden", event.name());
                return;
            }
            Err(e) => {
                error!("{}: reply failed: {e}", event.name());
                return;
            }
        };
        info!("{}: posted reply {posted}", event.name());
        // Our own reply must not come back through the mention stream
        if let Err(e) = self.api.disable_inbox_replies(&posted).await {
            warn!("{posted}: failed to disable inbox replies: {e}");
        }
        if self.kind.uses_counter() {
            let count = self.counter.record_reply(event.thread_id());
            debug!(
                "{}: thread {} at {count} replies this run",
                event.name(),
                event.thread_id()
            );
        }
    }
}
