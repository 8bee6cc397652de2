//! Configuration for the card bot

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

use anyhow::{ensure, Result};
use clap::Parser;
use reddit_client::Credentials;

const MASTER_DUEL_VECTOR_URL: &str =
    "https://dawnbrandbots.github.io/yaml-yugi-limit-regulation/master-duel/current.vector.json";
const RUSH_VECTOR_URL: &str =
    "https://dawnbrandbots.github.io/yaml-yugi-limit-regulation/rush/current.vector.json";

/// Card bot CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Watched subreddits, `+`-separated (e.g. "yugioh+masterduel")
    #[arg(long, env = "SUBREDDITS")]
    pub subreddits: String,

    /// Reddit script-app client id
    #[arg(long, env = "REDDIT_CLIENT_ID")]
    pub reddit_client_id: String,

    /// Reddit script-app client secret
    #[arg(long, env = "REDDIT_CLIENT_SECRET", hide_env_values = true)]
    pub reddit_client_secret: String,

    /// Bot account username
    #[arg(long, env = "REDDIT_USERNAME")]
    pub reddit_username: String,

    /// Bot account password
    #[arg(long, env = "REDDIT_PASSWORD", hide_env_values = true)]
    pub reddit_password: String,

    /// Base URL of the card search API
    #[arg(long, env = "API_URL")]
    pub api_url: String,

    /// Build identifier stamped into the outbound user agent
    #[arg(long, env = "REVISION", default_value = "dev")]
    pub revision: String,

    /// Master Duel limit regulation vector URL
    #[arg(long, env = "MASTER_DUEL_VECTOR_URL", default_value = MASTER_DUEL_VECTOR_URL)]
    pub master_duel_vector_url: String,

    /// Rush Duel limit regulation vector URL
    #[arg(long, env = "RUSH_VECTOR_URL", default_value = RUSH_VECTOR_URL)]
    pub rush_vector_url: String,

    /// Health check server port
    #[arg(long, env = "HEALTH_CHECK_PORT", default_value = "3000")]
    pub health_port: u16,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Watched subreddits, lowercased.
    pub subreddits: Vec<String>,
    pub credentials: Credentials,
    pub api_url: String,
    pub revision: String,
    pub master_duel_vector_url: String,
    pub rush_vector_url: String,
    pub health_port: u16,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        let subreddits: Vec<String> = args
            .subreddits
            .split('+')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        ensure!(!subreddits.is_empty(), "SUBREDDITS must name at least one subreddit");

        Ok(Self {
            subreddits,
            credentials: Credentials {
                client_id: args.reddit_client_id,
                client_secret: args.reddit_client_secret,
                username: args.reddit_username,
                password: args.reddit_password,
            },
            api_url: args.api_url.trim_end_matches('/').to_string(),
            revision: args.revision,
            master_duel_vector_url: args.master_duel_vector_url,
            rush_vector_url: args.rush_vector_url,
            health_port: args.health_port,
        })
    }

    /// The `+`-joined path segment for multi-subreddit listings.
    pub fn subreddit_path(&self) -> String {
        self.subreddits.join("+")
    }

    /// Whether a subreddit is in the watched set (case-insensitive).
    pub fn is_watched(&self, subreddit: &str) -> bool {
        let subreddit = subreddit.to_lowercase();
        self.subreddits.iter().any(|s| *s == subreddit)
    }

    /// Outbound identification for both Reddit and the card API.
    pub fn user_agent(&self) -> String {
        format!(
            "card-bot/{} (by /u/{}) rust/{}",
            self.revision,
            self.credentials.username,
            env!("CARGO_PKG_VERSION")
        )
    }
}
