//! Card search client and payload types
//!
//! One search request per summon token, dispatched concurrently with a
//! per-request timeout. Failures and misses are elided per token; results
//! come back in input order.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::limit_regulation::LimitRegulationVector;
use crate::render;

/// A slow search must not stall the other lookups; timeouts count as misses.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Localized string bundle; only the English text is rendered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: Option<String>,
}

impl LocalizedText {
    pub fn new(en: &str) -> Self {
        Self { en: Some(en.to_string()) }
    }
}

/// ATK/DEF value; `?` stats come through as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stat {
    Value(i64),
    Text(String),
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stat::Value(v) => write!(f, "{v}"),
            Stat::Text(t) => f.write_str(t),
        }
    }
}

/// Paper limit regulations by format, as labels ("Forbidden", "Limited"…).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitRegulation {
    pub tcg: Option<String>,
    pub ocg: Option<String>,
    pub speed: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardImage {
    pub image: String,
}

/// An OCG/TCG card record from the search API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcgCard {
    pub name: LocalizedText,
    /// "Monster", "Spell" or "Trap".
    pub card_type: String,
    pub password: Option<u64>,
    pub konami_id: Option<u64>,
    pub fake_password: Option<u64>,
    #[serde(default)]
    pub limit_regulation: LimitRegulation,
    pub master_duel_rarity: Option<String>,
    pub monster_type_line: Option<String>,
    pub attribute: Option<String>,
    pub level: Option<u32>,
    pub rank: Option<u32>,
    pub link_arrows: Option<Vec<String>>,
    pub atk: Option<Stat>,
    pub def: Option<Stat>,
    pub pendulum_scale: Option<u32>,
    pub pendulum_effect: Option<LocalizedText>,
    /// Spell/Trap property ("Quick-Play", "Counter", …).
    pub property: Option<String>,
    pub text: Option<LocalizedText>,
    pub images: Option<Vec<CardImage>>,
}

/// A Rush Duel card record from the search API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RushCard {
    pub name: LocalizedText,
    pub card_type: String,
    pub konami_id: Option<u64>,
    pub yugipedia_page_id: Option<u64>,
    #[serde(default)]
    pub legend: bool,
    pub monster_type_line: Option<String>,
    pub attribute: Option<String>,
    pub level: Option<u32>,
    pub atk: Option<Stat>,
    pub def: Option<Stat>,
    pub maximum_atk: Option<Stat>,
    pub summoning_condition: Option<LocalizedText>,
    pub materials: Option<LocalizedText>,
    pub requirement: Option<LocalizedText>,
    pub effect: Option<LocalizedText>,
    pub effect_types: Option<Vec<String>>,
    pub property: Option<String>,
    pub text: Option<LocalizedText>,
}

/// A search hit from either card pool.
#[derive(Debug, Clone)]
pub enum Card {
    Ocg(OcgCard),
    Rush(RushCard),
}

/// Lookup seam so watcher tests can serve canned cards without a server.
#[allow(async_fn_in_trait)]
pub trait CardLookup: Send + Sync {
    /// Resolve each name to at most one card, results in input order,
    /// misses elided.
    async fn get_cards(&self, names: &[String]) -> Vec<Card>;
}

/// Reqwest-backed search client against the card API.
#[derive(Clone)]
pub struct CardClient {
    http: reqwest::Client,
    base_url: String,
}

impl CardClient {
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(LOOKUP_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Search the OCG/TCG pool, falling through to the Rush Duel pool on a
    /// miss. Any failure is logged and treated as a miss for this token.
    async fn lookup(&self, name: &str) -> Option<Card> {
        let query = urlencoding::encode(name);
        match self.fetch::<OcgCard>(&format!("{}/ocg-tcg/search?name={query}", self.base_url)).await {
            Ok(Some(card)) => return Some(Card::Ocg(card)),
            Ok(None) => {}
            Err(e) => {
                warn!("search failed for '{name}': {e}");
                return None;
            }
        }
        match self.fetch::<RushCard>(&format!("{}/rush-duel/search?name={query}", self.base_url)).await {
            Ok(Some(card)) => Some(Card::Rush(card)),
            Ok(None) => {
                debug!("no card matched '{name}'");
                None
            }
            Err(e) => {
                warn!("rush search failed for '{name}': {e}");
                None
            }
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: &str) -> anyhow::Result<Option<T>> {
        let response = self.http.get(url).send().await?;
        if response.status().is_client_error() {
            return Ok(None);
        }
        let response = response.error_for_status()?;
        Ok(Some(response.json().await?))
    }
}

impl CardLookup for CardClient {
    async fn get_cards(&self, names: &[String]) -> Vec<Card> {
        let lookups = names.iter().map(|name| self.lookup(name));
        join_all(lookups).await.into_iter().flatten().collect()
    }
}

/// The token → lookup → render pipeline shared by all watchers.
pub struct SummonResolver<L: CardLookup> {
    lookup: L,
    master_duel: Arc<LimitRegulationVector>,
    rush: Arc<LimitRegulationVector>,
}

impl<L: CardLookup> SummonResolver<L> {
    pub fn new(
        lookup: L,
        master_duel: Arc<LimitRegulationVector>,
        rush: Arc<LimitRegulationVector>,
    ) -> Self {
        Self { lookup, master_duel, rush }
    }

    pub async fn get_cards(&self, names: &[String]) -> Vec<Card> {
        self.lookup.get_cards(names).await
    }

    /// Render the reply body for a non-empty card list.
    pub fn render(&self, cards: &[Card]) -> String {
        render::display_cards(cards, &self.master_duel, &self.rush)
    }
}
