//! Background-refreshed limit regulation vectors
//!
//! Maps a Konami card id to a restriction level 0..=3. The table is
//! replaced wholesale on refresh; a failed refresh keeps serving the
//! previous table (stale beats empty).

#[cfg(test)]
#[path = "limit_regulation_tests.rs"]
mod limit_regulation_tests;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

const REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Deserialize)]
struct VectorPayload {
    regulation: HashMap<String, u8>,
}

/// One regulation vector (Master Duel or Rush Duel), an injected service
/// instance rather than a process-wide global.
pub struct LimitRegulationVector {
    http: reqwest::Client,
    url: String,
    table: RwLock<HashMap<u64, u8>>,
}

impl LimitRegulationVector {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            table: RwLock::new(HashMap::new()),
        }
    }

    /// Vector preloaded with a fixed table; used by tests and rendering
    /// fixtures where no refresh ever runs.
    pub fn preloaded(table: HashMap<u64, u8>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: String::new(),
            table: RwLock::new(table),
        }
    }

    /// Current restriction level for a card, if the vector lists it.
    pub fn get(&self, konami_id: u64) -> Option<u8> {
        self.table.read().unwrap().get(&konami_id).copied()
    }

    pub fn len(&self) -> usize {
        self.table.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().unwrap().is_empty()
    }

    /// Fetch a full replacement table and swap it in atomically. On any
    /// failure the existing table is left untouched.
    pub async fn refresh(&self) -> Result<()> {
        info!("updating limit regulation from [{}]", self.url);
        let payload: VectorPayload = self
            .http
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("GET {}", self.url))?
            .error_for_status()?
            .json()
            .await
            .context("decoding regulation vector")?;
        let table = parse_vector(payload);
        info!("read {} regulation entries", table.len());
        *self.table.write().unwrap() = table;
        Ok(())
    }

    /// Refresh now, then hourly. The first fetch happens immediately;
    /// afterwards at most one fetch per hour.
    pub fn spawn_refresh_task(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let vector = Arc::clone(self);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(REFRESH_INTERVAL);
            loop {
                tick.tick().await;
                if let Err(e) = vector.refresh().await {
                    warn!("limit regulation refresh failed: {e:#}");
                }
            }
        })
    }
}

/// Keys arrive as strings; entries that do not parse as ids are dropped.
fn parse_vector(payload: VectorPayload) -> HashMap<u64, u8> {
    payload
        .regulation
        .into_iter()
        .filter_map(|(konami_id, level)| match konami_id.parse::<u64>() {
            Ok(id) => Some((id, level)),
            Err(_) => {
                warn!("skipping unparseable regulation key '{konami_id}'");
                None
            }
        })
        .collect()
}
