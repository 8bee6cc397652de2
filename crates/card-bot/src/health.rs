//! Health check endpoint for the card bot.

use std::sync::Arc;
use std::time::SystemTime;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub username: String,
    pub subreddits: Vec<String>,
    pub uptime_secs: u64,
}

/// Shared application state for health checks
#[derive(Clone)]
pub struct BotHealthState {
    pub start_time: SystemTime,
    pub username: Arc<String>,
    pub subreddits: Arc<Vec<String>>,
}

impl BotHealthState {
    pub fn new(username: String, subreddits: Vec<String>) -> Self {
        Self {
            start_time: SystemTime::now(),
            username: Arc::new(username),
            subreddits: Arc::new(subreddits),
        }
    }
}

async fn health_handler(State(state): State<BotHealthState>) -> (StatusCode, Json<HealthStatus>) {
    let uptime = state.start_time.elapsed().unwrap_or_default().as_secs();
    (
        StatusCode::OK,
        Json(HealthStatus {
            status: "ok".to_string(),
            username: (*state.username).clone(),
            subreddits: (*state.subreddits).clone(),
            uptime_secs: uptime,
        }),
    )
}

async fn live_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Start the health check server
pub async fn start_health_server(state: BotHealthState, port: u16) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/live", get(live_handler))
        .with_state(state);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("health server listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serde() {
        let status = HealthStatus {
            status: "ok".to_string(),
            username: "cardbot".to_string(),
            subreddits: vec!["yugioh".to_string()],
            uptime_secs: 42,
        };
        let json = serde_json::to_string(&status).unwrap();
        let back: HealthStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status, "ok");
        assert_eq!(back.username, "cardbot");
        assert_eq!(back.subreddits, vec!["yugioh"]);
        assert_eq!(back.uptime_secs, 42);
    }

    #[test]
    fn test_health_state_new() {
        let state = BotHealthState::new("cardbot".to_string(), vec!["yugioh".to_string()]);
        assert_eq!(*state.username, "cardbot");
        assert_eq!(state.subreddits.len(), 1);
    }
}
