//! Reddit platform client for the card bot.
//!
//! Wraps the small slice of the Reddit JSON API the bot needs: listing
//! polls, the reply primitive, reply-list refreshes, and inbox
//! maintenance. Watchers consume the API through the [`RedditApi`] trait
//! so tests can substitute the in-memory [`mock::MockRedditApi`].

pub mod client;
pub mod error;
pub mod mock;
pub mod stream;
pub mod types;

pub use client::{Credentials, RedditApi, RedditClient};
pub use error::{RedditError, ReplyError, Result};
pub use stream::{spawn_feed, FeedKind};
pub use types::{Comment, Event, Fullname, Mention, ReplySummary, Submission};
