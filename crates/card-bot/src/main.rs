//! Reddit card bot
//!
//! Watches configured subreddits for `{{Card Name}}` summons in new
//! submissions and comments (and the inbox for mentions anywhere),
//! resolves each summon against the card search API, and replies with a
//! formatted rendering.

mod antiabuse;
mod card;
mod config;
mod counter;
mod health;
mod limit_regulation;
mod render;
mod rush;
mod summon;
mod watcher;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reddit_client::{spawn_feed, FeedKind, RedditApi, RedditClient};

use crate::card::{CardClient, SummonResolver};
use crate::config::{Args, Config};
use crate::counter::ReplyCounter;
use crate::limit_regulation::LimitRegulationVector;
use crate::watcher::{Watcher, WatcherKind};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "card_bot=debug,reddit_client=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting card bot");

    let args = Args::parse();
    let config = Arc::new(Config::from_args(args)?);
    info!("Watching subreddits: {:?}", config.subreddits);
    info!("Card API: {}", config.api_url);

    let user_agent = config.user_agent();
    let reddit = Arc::new(RedditClient::login(config.credentials.clone(), &user_agent).await?);

    // Regulation vectors refresh on their own schedule; rendering reads
    // whatever snapshot is current.
    let http = reqwest::Client::builder().user_agent(&user_agent).build()?;
    let master_duel = Arc::new(LimitRegulationVector::new(
        http.clone(),
        config.master_duel_vector_url.clone(),
    ));
    let rush = Arc::new(LimitRegulationVector::new(http, config.rush_vector_url.clone()));
    master_duel.spawn_refresh_task();
    rush.spawn_refresh_task();

    let health_state =
        health::BotHealthState::new(reddit.me().to_string(), config.subreddits.clone());
    let health_port = config.health_port;
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(health_state, health_port).await {
            error!("health server error: {e}");
        }
    });

    let cards = CardClient::new(config.api_url.clone(), &user_agent)?;
    let counter = Arc::new(ReplyCounter::new());
    let resolver = || {
        SummonResolver::new(cards.clone(), Arc::clone(&master_duel), Arc::clone(&rush))
    };

    let submissions = Watcher::new(
        WatcherKind::Submissions,
        Arc::clone(&reddit),
        resolver(),
        Arc::clone(&counter),
        Arc::clone(&config),
    );
    let comments = Watcher::new(
        WatcherKind::Comments,
        Arc::clone(&reddit),
        resolver(),
        Arc::clone(&counter),
        Arc::clone(&config),
    );
    let mentions = Watcher::new(
        WatcherKind::Mentions,
        Arc::clone(&reddit),
        resolver(),
        Arc::clone(&counter),
        Arc::clone(&config),
    );

    let submission_rx = spawn_feed(
        Arc::clone(&reddit),
        FeedKind::Submissions,
        config.subreddit_path(),
    );
    let comment_rx = spawn_feed(
        Arc::clone(&reddit),
        FeedKind::Comments,
        config.subreddit_path(),
    );
    let mention_rx = spawn_feed(Arc::clone(&reddit), FeedKind::Mentions, String::new());

    info!("Bot initialized, watchers starting");

    tokio::try_join!(
        tokio::spawn(submissions.run(submission_rx)),
        tokio::spawn(comments.run(comment_rx)),
        tokio::spawn(mentions.run(mention_rx)),
    )?;

    warn!("all watchers stopped");
    Ok(())
}
