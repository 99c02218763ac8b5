use fanpulse_core::QueryParams;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::{ApiClient, ApiError};

/// Triggers a collection run over the configured subreddits.
pub async fn collect_reddit(api: &ApiClient) -> Result<JsonValue, ApiError> {
    api.post_empty("/reddit/collect", &QueryParams::new()).await
}

pub async fn collect_subreddit(api: &ApiClient, name: &str) -> Result<JsonValue, ApiError> {
    let name = name.trim().trim_start_matches("r/");
    api.post_empty(&format!("/reddit/subreddit/{name}"), &QueryParams::new())
        .await
}

pub async fn collect_youtube(api: &ApiClient) -> Result<JsonValue, ApiError> {
    api.post_empty("/youtube/collect", &QueryParams::new()).await
}

/// Subreddits the live stream follows when restarted from the dashboard.
pub const LIVE_SUBREDDITS: [&str; 9] = [
    "Turkey",
    "superlig",
    "soccer",
    "galatasaray",
    "fenerbahce",
    "besiktas",
    "trabzonspor",
    "turkishfootball",
    "SuperLigTurkey",
];

#[derive(Serialize)]
struct LiveStreamRequest<'a> {
    subreddits: &'a [&'a str],
}

/// (Re)starts the live Reddit stream over `subreddits`.
pub async fn start_live_stream(api: &ApiClient, subreddits: &[&str]) -> Result<JsonValue, ApiError> {
    api.post("/live/reddit/start", &LiveStreamRequest { subreddits })
        .await
}

pub async fn live_stream_status(api: &ApiClient) -> Result<JsonValue, ApiError> {
    api.get("/live/reddit/status", &QueryParams::new()).await
}
